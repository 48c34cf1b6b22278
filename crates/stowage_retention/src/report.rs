//! Sweep outcomes.

use stowage_core::Namespace;

/// An entry the sweep could not inspect or delete.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct SweepFailure {
    /// Name of the entry
    file_name: String,
    /// What went wrong
    error: String,
}

impl SweepFailure {
    pub(crate) fn new(file_name: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            file_name: file_name.into(),
            error: error.to_string(),
        }
    }
}

/// Summary of one sweep pass over a namespace.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct SweepReport {
    /// Namespace that was swept
    namespace: Namespace,
    /// Whether the namespace did not exist, making the pass a no-op
    namespace_absent: bool,
    /// Entries examined
    scanned: usize,
    /// Names of the assets deleted by this pass
    deleted: Vec<String>,
    /// Assets young enough to keep
    retained: usize,
    /// Bytes freed by the deletions
    bytes_reclaimed: u64,
    /// Entries skipped because of an error
    failures: Vec<SweepFailure>,
}

impl SweepReport {
    pub(crate) fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            namespace_absent: false,
            scanned: 0,
            deleted: Vec::new(),
            retained: 0,
            bytes_reclaimed: 0,
            failures: Vec::new(),
        }
    }

    pub(crate) fn absent(namespace: Namespace) -> Self {
        Self {
            namespace_absent: true,
            ..Self::new(namespace)
        }
    }

    pub(crate) fn record_scanned(&mut self) {
        self.scanned += 1;
    }

    pub(crate) fn record_retained(&mut self) {
        self.retained += 1;
    }

    pub(crate) fn record_deleted(&mut self, file_name: impl Into<String>, size_bytes: u64) {
        self.deleted.push(file_name.into());
        self.bytes_reclaimed += size_bytes;
    }

    pub(crate) fn record_failure(&mut self, failure: SweepFailure) {
        self.failures.push(failure);
    }

    /// Whether every examined entry was handled without error.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
