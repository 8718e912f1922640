//! Recovered export problems
//!
//! Malformed geometry and dangling references do not stop an export; the
//! pipeline substitutes a default, records what happened here and moves on.

use tracing::warn;

use scenebridge_core::{Error, ErrorKind};

/// Ordered list of recovered errors
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recovered error and log it
    pub fn record(&mut self, error: Error) {
        debug_assert!(error.is_recoverable(), "fatal error recorded as diagnostic: {error}");
        warn!(kind = ?error.kind(), "{error}");
        self.entries.push(error);
    }

    /// Append everything recorded in `other`
    pub fn merge(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.entries.iter()
    }

    /// Number of recorded errors of one kind
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.entries.iter().filter(|e| e.kind() == kind).count()
    }
}
