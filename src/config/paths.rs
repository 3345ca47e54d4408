//! Path management for backoffice-cli
//!
//! ## Path Resolution Order
//!
//! 1. `BACKOFFICE_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/backoffice` on Linux,
//!    `~/Library/Application Support/backoffice` on macOS,
//!    `%APPDATA%\backoffice\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BackofficeError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BACKOFFICE_DATA_DIR";

/// Manages all paths used by backoffice-cli
#[derive(Debug, Clone)]
pub struct BackofficePaths {
    /// Base directory for all backoffice-cli data
    base_dir: PathBuf,
}

impl BackofficePaths {
    /// Create a new BackofficePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BackofficeError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "backoffice")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    BackofficeError::Config("Could not determine a home directory".into())
                })?
        };

        Ok(Self { base_dir })
    }

    /// Create BackofficePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the log directory (daily rolling files)
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the default export directory
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), BackofficeError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BackofficeError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.log_dir())
            .map_err(|e| BackofficeError::Io(format!("Failed to create log directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir()).map_err(|e| {
            BackofficeError::Io(format!("Failed to create export directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if backoffice-cli has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
