// src/config/defaults.rs
use std::path::PathBuf;

use crate::config::app::{Files, Memory, Vault};
use crate::consts::{DEFAULT_ENCRYPTED_EXT, DEFAULT_VAULT_FILE_NAME};

pub const DEFAULT_CONFIG_FILE: &str = "sealed-vault.toml";
pub const CONFIG_PATH_ENV: &str = "SEALED_VAULT_CONFIG";
pub const REQUIRE_MLOCK_ENV: &str = "SEALED_VAULT_REQUIRE_MLOCK";

pub fn default_memory() -> Memory {
    Memory { require_lock: true }
}

pub fn default_vault() -> Vault {
    Vault {
        file_name: DEFAULT_VAULT_FILE_NAME.into(),
        search_dirs: Vec::new(),
    }
}

pub fn default_files() -> Files {
    Files {
        extension: DEFAULT_ENCRYPTED_EXT.into(),
        skip_extensions: vec!["exe".into(), "dll".into(), "pdb".into()],
    }
}

/// Working directory first, then the user's home
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(home) = dirs::home_dir() {
        dirs.push(home);
    }
    dirs
}
