use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VpmError>;

#[derive(Error, Debug)]
pub enum VpmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cannot find \"libs\" path in {}", .path.display())]
    LibsPathNotFound { path: PathBuf },

    #[error("Path cannot be empty")]
    EmptyPath,

    #[error("{} already exists", .path.display())]
    ConfigAlreadyExists { path: PathBuf },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Error downloading file from: {url} (HTTP {status})")]
    DownloadError { url: String, status: u16 },

    #[error("Permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },
}

impl VpmError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        VpmError::ConfigError {
            message: message.into(),
        }
    }
}
