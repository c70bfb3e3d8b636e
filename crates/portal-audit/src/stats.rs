//! Aggregates over the audit log for analytics dashboards.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::action;
use crate::logger::AuditLog;
use crate::query::AuditFilter;

/// Bucket used when a request entry carries no document type or status.
pub const UNKNOWN: &str = "unknown";

/// Trailing window for login statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoginTimeframe {
    Hour,
    #[default]
    Day,
    Week,
}

impl LoginTimeframe {
    /// Parse a timeframe, falling back to [`LoginTimeframe::Day`] for anything unrecognised.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Length of the window.
    pub fn window(self) -> Duration {
        match self {
            Self::Hour => Duration::hours(1),
            Self::Day => Duration::days(1),
            Self::Week => Duration::weeks(1),
        }
    }
}

impl FromStr for LoginTimeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            other => Err(format!("unknown timeframe: {other}")),
        }
    }
}

impl fmt::Display for LoginTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hour => write!(f, "hour"),
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
        }
    }
}

/// Login counts within a timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoginAttemptStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Document request counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestStatistics {
    /// Number of `REQUEST_CREATED` entries.
    pub total: usize,
    /// Created requests by document type.
    pub by_type: BTreeMap<String, usize>,
    /// Status updates by the status reached.
    pub by_status: BTreeMap<String, usize>,
}

impl AuditLog {
    /// Count `USER_LOGIN` entries with `now - window <= timestamp <= now`.
    pub fn login_attempts(&self, timeframe: LoginTimeframe) -> LoginAttemptStats {
        let now = self.now();
        let logins = self.query(&AuditFilter {
            action: Some(action::USER_LOGIN.to_string()),
            start_time: Some(now - timeframe.window()),
            end_time: Some(now),
            ..Default::default()
        });

        let successful = logins.iter().filter(|e| e.success).count();
        LoginAttemptStats {
            total: logins.len(),
            successful,
            failed: logins.len() - successful,
        }
    }

    /// Count created requests by document type and status updates by target status.
    pub fn request_statistics(&self) -> RequestStatistics {
        let mut stats = RequestStatistics::default();

        // One snapshot so both counts describe the same store state.
        for entry in self.query(&AuditFilter::default()) {
            match entry.action.as_str() {
                action::REQUEST_CREATED => {
                    stats.total += 1;
                    let document_type = entry.details.document_type().unwrap_or(UNKNOWN);
                    *stats.by_type.entry(document_type.to_string()).or_insert(0) += 1;
                }
                action::REQUEST_STATUS_UPDATED => {
                    let status = entry.details.new_status().unwrap_or(UNKNOWN);
                    *stats.by_status.entry(status.to_string()).or_insert(0) += 1;
                }
                _ => {}
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::clock::Clock;
    use crate::event::{AuditDetails, AuditLogEntry, NewAuditEntry};
    use crate::storage::{AuditStorage, MemoryStorage};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn log_with_clock() -> (AuditLog, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 9, 10, 8, 0, 0).unwrap(),
        ));
        let log = AuditLog::with_capacity(1000)
            .unwrap()
            .with_clock(clock.clone());
        (log, clock)
    }

    #[test]
    fn test_parse_timeframe() {
        assert_eq!("hour".parse::<LoginTimeframe>(), Ok(LoginTimeframe::Hour));
        assert_eq!("WEEK".parse::<LoginTimeframe>(), Ok(LoginTimeframe::Week));
        assert!("month".parse::<LoginTimeframe>().is_err());

        assert_eq!(LoginTimeframe::parse_lenient("month"), LoginTimeframe::Day);
        assert_eq!(LoginTimeframe::parse_lenient(""), LoginTimeframe::Day);
        assert_eq!(LoginTimeframe::parse_lenient(" hour "), LoginTimeframe::Hour);
        assert_eq!(LoginTimeframe::Week.to_string(), "week");
    }

    #[test]
    fn test_login_attempts_last_hour() {
        let (log, clock) = log_with_clock();

        // Two hours ago: outside the hourly window.
        log.log_login(Some("u1"), "a@uni.edu.gh", true, None, None);
        clock.advance(Duration::minutes(90));
        log.log_login(Some("u1"), "a@uni.edu.gh", false, None, None);
        clock.advance(Duration::minutes(20));
        log.log_login(Some("u2"), "b@uni.edu.gh", true, None, None);
        log.log_request_created("u2", "req-1", "transcript", true);
        clock.advance(Duration::minutes(10));

        assert_eq!(
            log.login_attempts(LoginTimeframe::Hour),
            LoginAttemptStats {
                total: 2,
                successful: 1,
                failed: 1,
            }
        );
        assert_eq!(log.login_attempts(LoginTimeframe::Day).total, 3);
    }

    #[test]
    fn test_login_window_boundary_is_inclusive() {
        let (log, clock) = log_with_clock();
        log.log_login(Some("u1"), "a@uni.edu.gh", true, None, None);
        clock.advance(Duration::hours(1));
        assert_eq!(log.login_attempts(LoginTimeframe::Hour).total, 1);

        clock.advance(Duration::seconds(1));
        assert_eq!(log.login_attempts(LoginTimeframe::Hour).total, 0);
    }

    #[test]
    fn test_login_attempts_ignore_future_entries() {
        let (log, clock) = log_with_clock();
        clock.advance(Duration::hours(2));
        log.log_login(Some("u1"), "a@uni.edu.gh", true, None, None);
        clock.advance(Duration::hours(-2));
        assert_eq!(log.login_attempts(LoginTimeframe::Week).total, 0);
    }

    #[test]
    fn test_request_statistics_by_type() {
        let (log, _clock) = log_with_clock();
        log.log_request_created("u1", "r1", "transcript", true);
        log.log_request_created("u2", "r2", "transcript", true);
        log.log_request_created("u3", "r3", "certificate", true);

        let stats = log.request_statistics();
        assert_eq!(stats.total, 3);
        assert_eq!(
            stats.by_type,
            BTreeMap::from([
                ("transcript".to_string(), 2),
                ("certificate".to_string(), 1),
            ])
        );
        assert!(stats.by_status.is_empty());
    }

    #[test]
    fn test_request_statistics_by_target_status() {
        let (log, _clock) = log_with_clock();
        log.log_request_status_updated("hod", "r1", "pending", "approved");
        log.log_request_status_updated("hod", "r2", "paid", "approved");
        log.log_request_status_updated("admin", "r1", "approved", "completed");

        let stats = log.request_statistics();
        assert_eq!(stats.total, 0);
        assert_eq!(
            stats.by_status,
            BTreeMap::from([("approved".to_string(), 2), ("completed".to_string(), 1)])
        );
    }

    #[test]
    fn test_request_statistics_free_form_entries() {
        let (log, _clock) = log_with_clock();
        log.append(
            NewAuditEntry::builder(action::REQUEST_CREATED, "document_request")
                .details(AuditDetails::Custom {
                    data: json!({ "document_type": "attestation" }),
                })
                .build(),
        );
        log.append(NewAuditEntry::new(action::REQUEST_CREATED, "document_request"));

        let stats = log.request_statistics();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_type.get("attestation"), Some(&1));
        assert_eq!(stats.by_type.get(UNKNOWN), Some(&1));
    }

    /// Storage that records a status update right after the first read,
    /// standing in for a writer racing the statistics query.
    struct RacingStorage {
        inner: MemoryStorage,
        clock: ManualClock,
        raced: AtomicBool,
    }

    impl AuditStorage for RacingStorage {
        fn store(&self, entry: NewAuditEntry, clock: &dyn Clock) -> AuditLogEntry {
            self.inner.store(entry, clock)
        }

        fn snapshot(&self, filter: &AuditFilter) -> Vec<AuditLogEntry> {
            let entries = self.inner.snapshot(filter);
            if !self.raced.swap(true, Ordering::SeqCst) {
                self.inner.store(
                    NewAuditEntry::builder(action::REQUEST_STATUS_UPDATED, "document_request")
                        .details(AuditDetails::RequestStatusUpdated {
                            request_id: "r1".to_string(),
                            old_status: "pending".to_string(),
                            new_status: "approved".to_string(),
                        })
                        .build(),
                    &self.clock,
                );
            }
            entries
        }

        fn get(&self, id: &str) -> Option<AuditLogEntry> {
            self.inner.get(id)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }

        fn capacity(&self) -> usize {
            self.inner.capacity()
        }
    }

    #[test]
    fn test_request_statistics_read_one_snapshot() {
        let now = Utc.with_ymd_and_hms(2024, 9, 10, 8, 0, 0).unwrap();
        let storage = Arc::new(RacingStorage {
            inner: MemoryStorage::new(10).unwrap(),
            clock: ManualClock::new(now),
            raced: AtomicBool::new(false),
        });
        let log = AuditLog::with_storage(storage, Arc::new(ManualClock::new(now)));

        // The update lands after the read, so it must not show up at all.
        assert_eq!(log.request_statistics(), RequestStatistics::default());

        let stats = log.request_statistics();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.by_status.get("approved"), Some(&1));
    }

    #[test]
    fn test_statistics_are_idempotent() {
        let (log, _clock) = log_with_clock();
        log.log_request_created("u1", "r1", "transcript", true);
        log.log_login(Some("u1"), "a@uni.edu.gh", true, None, None);

        assert_eq!(log.request_statistics(), log.request_statistics());
        assert_eq!(
            log.login_attempts(LoginTimeframe::Day),
            log.login_attempts(LoginTimeframe::Day)
        );
    }
}
