// tests/common.rs
//! Shared test utilities
#![allow(dead_code)]

use std::sync::Once;

#[cfg(feature = "logging")]
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sealed_vault::config::REQUIRE_MLOCK_ENV;
use sealed_vault::Password;

static INIT: Once = Once::new();

pub fn password() -> Password {
    Password::from_slice(b"test_password_123").unwrap()
}

pub fn wrong_password() -> Password {
    Password::from_slice(b"wrong_password").unwrap()
}

/// Call first in every test.
///
/// CI runners often ship a tiny RLIMIT_MEMLOCK, so locking is made best-effort
/// before the global config is first read.
pub fn setup() {
    INIT.call_once(|| {
        std::env::set_var(REQUIRE_MLOCK_ENV, "0");

        #[cfg(feature = "logging")]
        tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer())
            .with(EnvFilter::from_default_env())
            .try_init()
            .ok();
    });
}
