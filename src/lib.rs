//! vpm library
//!
//! Configuration, package resolution and download logic behind the `vpm` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
