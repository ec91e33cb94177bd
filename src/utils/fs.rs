use crate::error::{Result, VpmError};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

fn map_io_error(path: &Path, e: std::io::Error) -> VpmError {
    match e.kind() {
        ErrorKind::PermissionDenied => VpmError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => VpmError::from(e),
    }
}

/// Create `path` as a directory unless it already is one. A regular file in
/// its place is an error.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e))?;
    }
    Ok(())
}

/// Write `contents` to a file that must not exist yet.
pub fn write_new_file(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => VpmError::ConfigAlreadyExists {
                path: path.to_path_buf(),
            },
            _ => map_io_error(path, e),
        })?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}
