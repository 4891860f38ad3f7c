// src/config/mod.rs
//! Configuration system for sealed-vault
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{load, Config, Files, Memory, Vault};
pub use defaults::{CONFIG_PATH_ENV, REQUIRE_MLOCK_ENV};

mod app;
mod defaults;
