// src/config/app.rs
use super::defaults::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_memory")]
    pub memory: Memory,
    #[serde(default = "default_vault")]
    pub vault: Vault,
    #[serde(default = "default_files")]
    pub files: Files,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Memory {
    /// Refuse to hand out hardened buffers whose pages could not be locked
    pub require_lock: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Vault {
    pub file_name: String,
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Files {
    /// Extension appended on in-place encryption, stripped on decryption
    pub extension: String,
    /// Never touched by directory batches
    pub skip_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            memory: default_memory(),
            vault: default_vault(),
            files: default_files(),
        }
    }
}

impl Config {
    /// Parse a TOML config file. Missing sections fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Directories `locate_vault` walks, in priority order
    pub fn vault_search_dirs(&self) -> Vec<PathBuf> {
        if self.vault.search_dirs.is_empty() {
            default_search_dirs()
        } else {
            self.vault.search_dirs.clone()
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var(REQUIRE_MLOCK_ENV) {
            self.memory.require_lock = !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let config_path = Path::new(&config_path);

        let mut conf = if config_path.exists() {
            match Config::from_file(config_path) {
                Ok(conf) => conf,
                Err(err) => {
                    tracing::warn!(
                        path = %config_path.display(),
                        "ignoring unreadable config ({err}), using built-in defaults"
                    );
                    Config::default()
                }
            }
        } else {
            tracing::debug!("no config file found, using built-in defaults");
            Config::default()
        };

        conf.apply_env_overrides();
        conf
    })
}
