use crate::core::config::Config;
use crate::error::{Result, VpmError};
use crate::utils::fs;
use std::io::BufRead;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    AlreadyExists,
    Created(Config),
}

/// Create the configuration file from a directory path read from `input`.
///
/// Nothing is read or written when the file already exists. The library
/// directory is created (with parents) before the file is written.
pub fn create_config<R: BufRead>(config_path: &Path, mut input: R) -> Result<InitOutcome> {
    if config_path.exists() {
        return Ok(InitOutcome::AlreadyExists);
    }

    let example = if cfg!(windows) { "C:\\libs" } else { "/opt/libs" };
    println!("Enter the path to the directory where libraries will be stored (e.g., {example}):");

    let mut line = String::new();
    input.read_line(&mut line)?;
    let libs_path = line.trim_end_matches(['\n', '\r']);

    if libs_path.is_empty() {
        return Err(VpmError::EmptyPath);
    }

    let config = Config::new(libs_path);
    fs::ensure_dir_exists(&config.libs_dir)?;
    config.create(config_path)?;
    debug!("Wrote {}", config_path.display());

    Ok(InitOutcome::Created(config))
}

pub fn init_config<R: BufRead>(config_path: &Path, input: R) -> Result<()> {
    let file_name = config_path.display();

    match create_config(config_path, input) {
        Ok(InitOutcome::AlreadyExists) => println!("{file_name} already exists."),
        Ok(InitOutcome::Created(config)) => println!(
            "{file_name} has been created with the path: {}",
            config.libs_dir.display()
        ),
        Err(VpmError::EmptyPath) => println!("Path cannot be empty."),
        Err(e) => println!("Error creating {file_name}: {e}"),
    }

    Ok(())
}
