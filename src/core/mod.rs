pub mod config;
pub mod download;
pub mod http;
pub mod package;
pub mod progress;
