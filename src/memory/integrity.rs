// src/memory/integrity.rs
//! Fatal path for a corrupted canary

/// A linear write ran past the end of a hardened buffer. Whatever sits next to
/// it can no longer be trusted, so nothing is unwound and nothing is returned.
#[cold]
#[inline(never)]
pub(crate) fn violation(capacity: usize) -> ! {
    tracing::error!(capacity, "hardened buffer canary overwritten, aborting");
    std::process::abort()
}
