//! Query filters and result ordering.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::event::AuditLogEntry;

/// Filter for querying audit entries. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditFilter {
    /// Filter by acting user.
    pub user_id: Option<String>,
    /// Filter by action tag.
    pub action: Option<String>,
    /// Filter by resource class.
    pub resource: Option<String>,
    /// Filter by resource instance.
    pub resource_id: Option<String>,
    /// Earliest timestamp (inclusive).
    pub start_time: Option<DateTime<Utc>>,
    /// Latest timestamp (inclusive).
    pub end_time: Option<DateTime<Utc>>,
    /// Filter by outcome.
    pub success: Option<bool>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
}

impl AuditFilter {
    /// Check whether an entry matches all active filters.
    ///
    /// `limit` and `offset` are not part of matching; see [`AuditFilter::paginate`].
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(ref user_id) = self.user_id
            && entry.user_id.as_ref() != Some(user_id)
        {
            return false;
        }
        if let Some(ref action) = self.action
            && entry.action != *action
        {
            return false;
        }
        if let Some(ref resource) = self.resource
            && entry.resource != *resource
        {
            return false;
        }
        if let Some(ref resource_id) = self.resource_id
            && entry.resource_id.as_ref() != Some(resource_id)
        {
            return false;
        }
        if let Some(start) = self.start_time
            && entry.timestamp < start
        {
            return false;
        }
        if let Some(end) = self.end_time
            && entry.timestamp > end
        {
            return false;
        }
        if let Some(success) = self.success
            && entry.success != success
        {
            return false;
        }
        true
    }

    /// Apply offset and limit to an already ordered result set.
    pub fn paginate(&self, mut entries: Vec<AuditLogEntry>) -> Vec<AuditLogEntry> {
        if let Some(offset) = self.offset {
            if offset >= entries.len() {
                return Vec::new();
            }
            entries.drain(..offset);
        }
        if let Some(limit) = self.limit {
            entries.truncate(limit);
        }
        entries
    }
}

/// Newest-first ordering: timestamp descending, then append sequence descending.
pub fn newest_first(a: &AuditLogEntry, b: &AuditLogEntry) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| b.sequence.cmp(&a.sequence))
}
