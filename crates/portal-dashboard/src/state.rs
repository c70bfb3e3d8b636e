//! Dashboard application state.

use portal_audit::AuditLog;
use std::sync::Arc;

/// Shared application state for the dashboard.
#[derive(Clone)]
pub struct AppState {
    audit_log: Arc<AuditLog>,
}

impl AppState {
    /// Create state over the process-wide audit log.
    pub fn new(audit_log: Arc<AuditLog>) -> Self {
        Self { audit_log }
    }

    /// Get the audit log.
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit_log
    }
}
