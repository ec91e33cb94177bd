use crate::error::{Result, VpmError};
use crate::utils::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default configuration file, resolved against the working directory
pub const CONFIG_FILE_NAME: &str = "config.txt";

const LIBS_PREFIX: &str = "libs=";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub libs_dir: PathBuf,
}

impl Config {
    pub fn new<P: Into<PathBuf>>(libs_dir: P) -> Self {
        Config {
            libs_dir: libs_dir.into(),
        }
    }

    /// Parse configuration text. Only the first `libs=` line is honored;
    /// an empty value there means no library directory is configured.
    pub fn parse(content: &str) -> Option<Self> {
        let value = content
            .lines()
            .find_map(|line| line.strip_prefix(LIBS_PREFIX))?;

        if value.is_empty() {
            return None;
        }

        Some(Config::new(value))
    }

    /// Load the configuration file, returning `None` when it does not exist
    /// or does not name a library directory.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file");
            return Ok(None);
        }

        if path.is_dir() {
            return Err(VpmError::config_error(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Write this configuration to a file that must not exist yet.
    pub fn create(&self, path: &Path) -> Result<()> {
        fs::write_new_file(path, &self.to_line())
    }

    pub fn to_line(&self) -> String {
        format!("{LIBS_PREFIX}{}", self.libs_dir.display())
    }
}

/// Library directory recorded in the configuration file, or an empty string
/// when there is none.
///
/// String-returning reader for callers that only need the raw path. The CLI
/// goes through [`Config::load`] so it can pass a typed `Config` around.
pub fn read_libs_path(path: &Path) -> String {
    match Config::load(path) {
        Ok(Some(config)) => config.libs_dir.to_string_lossy().into_owned(),
        Ok(None) => String::new(),
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            String::new()
        }
    }
}
