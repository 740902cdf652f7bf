/// Application configuration
///
/// Read once at startup from a JSON file. The file is optional and
/// never written back; the form starts from these values every launch.
///
/// Lookup order:
/// - `$PCB_CHANGE_DETECT_CONFIG` if set
/// - Linux: ~/.config/pcb-change-detect/config.json
/// - macOS: ~/Library/Application Support/pcb-change-detect/config.json
/// - Windows: %APPDATA%\pcb-change-detect\config.json

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::state::params::ProcessingParams;

pub const CONFIG_ENV_VAR: &str = "PCB_CHANGE_DETECT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Program used to run the comparison script
    pub interpreter: String,
    /// Comparison script passed as the interpreter's first argument
    pub script: PathBuf,
    /// Pre-filled output directory
    pub default_output_dir: String,
    /// Pre-filled processing parameters
    pub defaults: ProcessingParams,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            interpreter: "python".to_string(),
            script: PathBuf::from("main.py"),
            default_output_dir: "example_output".to_string(),
            defaults: ProcessingParams::default(),
            log_filter: "pcb_change_detect=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the default location. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        Ok(Self::load_from(&path)?.unwrap_or_default())
    }

    /// Read and parse `path`. A missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }

        let mut path = dirs::config_dir()?;
        path.push("pcb-change-detect");
        path.push("config.json");
        Some(path)
    }
}
