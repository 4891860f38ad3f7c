// src/error.rs
//! Public error type for the entire crate
//!
//! A canary mismatch has no variant here: it aborts the process instead of
//! being returned (see [`crate::memory`]).

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    /// The OS refused to map, protect or lock hardened memory.
    #[error("hardened memory unavailable: {0}")]
    Resource(String),

    /// Input is not a valid encrypted value, hex string or vault file.
    #[error("not a valid encrypted value or file: {0}")]
    Format(String),

    /// Tag mismatch. Wrong password and tampered data are deliberately
    /// indistinguishable.
    #[error("incorrect password or corrupted data")]
    Authentication,

    #[error("file not found or unreadable: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no record at index {0}")]
    RecordNotFound(usize),

    /// Backend rejected its parameters; unreachable with the fixed constants.
    #[error("crypto backend failure: {0}")]
    Crypto(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl CoreError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        CoreError::Format(msg.into())
    }
}
