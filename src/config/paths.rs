//! Path management for PayStreet
//!
//! ## Path Resolution Order
//!
//! 1. `PAYSTREET_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/paystreet` on Linux, `~/Library/Application Support/...` on macOS,
//!    `%APPDATA%\paystreet` on Windows)
//! 3. `$HOME/.config/paystreet` when the platform lookup fails

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::PaystreetError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "PAYSTREET_DATA_DIR";

/// Manages all paths used by PayStreet
#[derive(Debug, Clone)]
pub struct PaystreetPaths {
    /// Base directory for settings and logs
    base_dir: PathBuf,
}

impl PaystreetPaths {
    /// Create a new PaystreetPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, PaystreetError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create PaystreetPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the diagnostic log written while the TUI is running
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("paystreet.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), PaystreetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PaystreetError::Io(format!("Failed to create base directory: {}", e)))
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default base directory for the current platform
fn resolve_default_path() -> Result<PathBuf, PaystreetError> {
    if let Some(dirs) = ProjectDirs::from("com", "PayStreet", "paystreet") {
        return Ok(dirs.config_dir().to_path_buf());
    }

    let home = std::env::var("HOME")
        .map_err(|_| PaystreetError::Config("Could not determine home directory".into()))?;
    Ok(PathBuf::from(home).join(".config").join("paystreet"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PaystreetPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
        assert_eq!(paths.log_file(), temp_dir.path().join("paystreet.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PaystreetPaths::with_base_dir(temp_dir.path().join("nested").join("paystreet"));

        assert!(!paths.base_dir().exists());
        paths.ensure_directories().unwrap();
        assert!(paths.base_dir().exists());
        assert!(!paths.is_initialized());
    }
}
