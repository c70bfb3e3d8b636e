//! Request and response types for the audit API.

use chrono::{DateTime, Utc};
use portal_audit::{AuditFilter, AuditLogEntry, LoginAttemptStats, LoginTimeframe};
use serde::{Deserialize, Serialize};

/// Page size used when the caller does not pass `limit`.
pub const DEFAULT_PAGE_SIZE: usize = 100;

// =============================================================================
// Audit Log Types
// =============================================================================

/// Query parameters for listing audit entries.
#[derive(Debug, Default, Deserialize)]
pub struct AuditQueryParams {
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub resource: Option<String>,
    pub resource_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub success: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl AuditQueryParams {
    /// Filter without pagination, so the total match count can be reported.
    pub fn to_filter(&self) -> AuditFilter {
        AuditFilter {
            user_id: self.user_id.clone(),
            action: self.action.clone(),
            resource: self.resource.clone(),
            resource_id: self.resource_id.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            success: self.success,
            limit: None,
            offset: None,
        }
    }

    /// Pagination-only filter applied to the matched entries.
    pub fn to_page(&self) -> AuditFilter {
        AuditFilter {
            limit: Some(self.limit.unwrap_or(DEFAULT_PAGE_SIZE)),
            offset: self.offset,
            ..Default::default()
        }
    }
}

/// Audit log listing response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuditListResponse {
    pub entries: Vec<AuditLogEntry>,
    /// Number of entries matching the filter before pagination.
    pub total: usize,
    pub has_more: bool,
    /// Retention limit of the log.
    pub capacity: usize,
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Query parameters for login statistics.
#[derive(Debug, Default, Deserialize)]
pub struct LoginStatsParams {
    /// `hour`, `day` or `week`; anything else means `day`.
    pub timeframe: Option<String>,
}

/// Login statistics response.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginStatsResponse {
    pub timeframe: LoginTimeframe,
    #[serde(flatten)]
    pub stats: LoginAttemptStats,
}
