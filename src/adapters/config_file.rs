//! JSON config-file adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document on disk.
//!
//! - `load` does not validate: CLI flags are applied on top afterwards and
//!   the merged result is validated once by the binary.
//! - `save` validates, then writes to a sibling temp file and renames it,
//!   so a crash mid-write never leaves a truncated config behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::{SwitchConfig, validate_config};

pub struct FileConfigAdapter {
    path: PathBuf,
}

impl FileConfigAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigPort for FileConfigAdapter {
    fn load(&self) -> Result<SwitchConfig, ConfigError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError(format!("{}: {}", self.path.display(), e)),
        })?;
        let config: SwitchConfig = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Corrupted(format!("{}: {}", self.path.display(), e)))?;
        info!("Config loaded from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &SwitchConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        let tmp = self.temp_path();
        let io_err = |e: std::io::Error| ConfigError::IoError(format!("{}: {}", tmp.display(), e));
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        info!("Config saved to {}", self.path.display());
        Ok(())
    }
}
