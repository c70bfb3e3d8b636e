//! Audit log configuration.

use serde::{Deserialize, Serialize};

/// Default number of entries the audit log retains.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Configuration for the audit log store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Maximum number of retained entries. Older entries are evicted once
    /// this limit is exceeded.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Whether to mirror each stored entry as a JSON line on stdout.
    #[serde(default)]
    pub stdout: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            stdout: false,
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}
