//! Path management for the usage analyzer
//!
//! The analyzer keeps a single file on disk, `settings.json`. Its location is
//! resolved from the environment:
//!
//! 1. `USAGE_ANALYZER_SETTINGS`: explicit settings file (e.g. a per-project
//!    file carrying that project's CSV column names)
//! 2. `USAGE_ANALYZER_HOME`: directory holding `settings.json`
//! 3. Unix: `$XDG_CONFIG_HOME/usage-analyzer` or `~/.config/usage-analyzer`
//! 4. Windows: `%APPDATA%\usage-analyzer`

use std::path::{Path, PathBuf};

use crate::error::AnalyzerError;

/// Environment variable that overrides the base directory
pub const HOME_ENV_VAR: &str = "USAGE_ANALYZER_HOME";

/// Environment variable that points at a specific settings file
pub const SETTINGS_ENV_VAR: &str = "USAGE_ANALYZER_SETTINGS";

const APP_DIR: &str = "usage-analyzer";
const SETTINGS_FILE: &str = "settings.json";

/// Where the analyzer's settings live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerPaths {
    base_dir: PathBuf,
    settings_file: PathBuf,
}

impl AnalyzerPaths {
    /// Resolve paths from the process environment
    pub fn new() -> Result<Self, AnalyzerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve paths through `lookup` instead of the process environment
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AnalyzerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(file) = var(SETTINGS_ENV_VAR) {
            let settings_file = PathBuf::from(file);
            let base_dir = settings_file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            log::debug!("settings file from {}: {}", SETTINGS_ENV_VAR, settings_file.display());
            return Ok(Self {
                base_dir,
                settings_file,
            });
        }

        let base_dir = match var(HOME_ENV_VAR) {
            Some(custom) => PathBuf::from(custom),
            None => default_base_dir(&var)?,
        };
        Ok(Self::with_base_dir(base_dir))
    }

    /// Use `settings.json` inside `base_dir`
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        let settings_file = base_dir.join(SETTINGS_FILE);
        Self {
            base_dir,
            settings_file,
        }
    }

    /// Directory holding the settings file
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.settings_file.clone()
    }

    /// Ensure the directory of the settings file exists
    pub fn ensure_directories(&self) -> Result<(), AnalyzerError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            AnalyzerError::Io(format!(
                "Failed to create {}: {}",
                self.base_dir.display(),
                e
            ))
        })
    }

    /// Check if settings have been written (`init` has run)
    pub fn is_initialized(&self) -> bool {
        self.settings_file.exists()
    }
}

#[cfg(not(windows))]
fn default_base_dir(var: &dyn Fn(&str) -> Option<String>) -> Result<PathBuf, AnalyzerError> {
    let config_base = match var("XDG_CONFIG_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => var("HOME")
            .map(|home| PathBuf::from(home).join(".config"))
            .ok_or_else(|| AnalyzerError::Config("HOME environment variable not set".into()))?,
    };
    Ok(config_base.join(APP_DIR))
}

#[cfg(windows)]
fn default_base_dir(var: &dyn Fn(&str) -> Option<String>) -> Result<PathBuf, AnalyzerError> {
    let appdata = var("APPDATA")
        .ok_or_else(|| AnalyzerError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR))
}
