// src/hardening.rs
//! One-time process hardening
//!
//! Call [`harden_process`] before any secret reaches memory. Each measure is
//! reported individually; measures the platform has no equivalent for come
//! back as [`Status::Unsupported`] instead of being silently skipped.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// `RLIMIT_CORE` forced to zero
    CoreDumpsDisabled,
    /// `PR_SET_DUMPABLE` cleared: no core dumps, no same-user ptrace
    NonDumpable,
    DynamicCodeBlocked,
    SignedModulesOnly,
    RemoteSessionsBlocked,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Applied,
    Failed(String),
    Unsupported,
}

#[derive(Debug, Clone, Serialize)]
pub struct HardeningReport {
    pub entries: Vec<(Capability, Status)>,
}

impl HardeningReport {
    pub fn status(&self, capability: Capability) -> Option<&Status> {
        self.entries
            .iter()
            .find(|(c, _)| *c == capability)
            .map(|(_, s)| s)
    }

    /// Every measure this platform supports took effect
    pub fn fully_applied(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, s)| !matches!(s, Status::Failed(_)))
    }
}

fn last_os_error() -> Status {
    Status::Failed(std::io::Error::last_os_error().to_string())
}

fn disable_core_dumps() -> Status {
    let limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: `limit` is a valid rlimit for the duration of the call.
    if unsafe { libc::setrlimit(libc::RLIMIT_CORE, &limit) } == 0 {
        Status::Applied
    } else {
        last_os_error()
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn mark_non_dumpable() -> Status {
    // SAFETY: PR_SET_DUMPABLE takes a plain integer argument.
    if unsafe { libc::prctl(libc::PR_SET_DUMPABLE, 0, 0, 0, 0) } == 0 {
        Status::Applied
    } else {
        last_os_error()
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn mark_non_dumpable() -> Status {
    Status::Unsupported
}

/// Apply every available measure and report what happened
pub fn harden_process() -> HardeningReport {
    let entries = vec![
        (Capability::CoreDumpsDisabled, disable_core_dumps()),
        (Capability::NonDumpable, mark_non_dumpable()),
        (Capability::DynamicCodeBlocked, Status::Unsupported),
        (Capability::SignedModulesOnly, Status::Unsupported),
        (Capability::RemoteSessionsBlocked, Status::Unsupported),
    ];

    for (capability, status) in &entries {
        match status {
            Status::Applied => tracing::debug!(?capability, "hardening applied"),
            Status::Failed(reason) => tracing::warn!(?capability, "hardening failed: {reason}"),
            Status::Unsupported => tracing::debug!(?capability, "hardening unsupported here"),
        }
    }

    HardeningReport { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_capability_is_reported() {
        let report = harden_process();
        assert_eq!(report.entries.len(), 5);
        assert_eq!(report.status(Capability::CoreDumpsDisabled), Some(&Status::Applied));
        assert_eq!(
            report.status(Capability::RemoteSessionsBlocked),
            Some(&Status::Unsupported)
        );
        assert!(report.fully_applied());
    }

    #[test]
    fn report_serializes() {
        let report = HardeningReport {
            entries: vec![(Capability::NonDumpable, Status::Failed("EPERM".into()))],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("non_dumpable"));
        assert!(!report.fully_applied());
    }
}
