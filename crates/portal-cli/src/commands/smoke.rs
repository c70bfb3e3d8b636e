//! Smoke command.
//!
//! `portal smoke` - Record one event of every category in a fresh audit log,
//! check the results, and print what was stored.

use anyhow::ensure;
use portal_audit::action;
use portal_audit::{
    AuditDetails, AuditLog, AuditLogEntry, LoginAttemptStats, LoginTimeframe, RequestStatistics,
};
use portal_core::{AuditConfig, PortalConfig};
use serde_json::json;

/// Number of entries the smoke scenario appends.
const SMOKE_EVENTS: usize = 16;

/// What a smoke run recorded.
#[derive(Debug)]
pub struct SmokeReport {
    pub entries: Vec<AuditLogEntry>,
    pub login_attempts: LoginAttemptStats,
    pub request_statistics: RequestStatistics,
}

pub fn run_smoke(config: &PortalConfig, as_json: bool) -> anyhow::Result<()> {
    let report = smoke(&config.audit)?;

    if as_json {
        let output = json!({
            "entries": report.entries,
            "login_attempts": report.login_attempts,
            "request_statistics": report.request_statistics,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for entry in &report.entries {
            println!("{}", entry.to_log_line());
        }
        println!(
            "logins (last hour): total={} successful={} failed={}",
            report.login_attempts.total,
            report.login_attempts.successful,
            report.login_attempts.failed,
        );
        println!(
            "requests: total={} by_type={:?} by_status={:?}",
            report.request_statistics.total,
            report.request_statistics.by_type,
            report.request_statistics.by_status,
        );
    }

    tracing::info!(entries = report.entries.len(), "Smoke test passed");
    Ok(())
}

/// Run the smoke scenario against a fresh, non-mirrored log.
pub fn smoke(audit: &AuditConfig) -> anyhow::Result<SmokeReport> {
    let config = AuditConfig {
        stdout: false,
        ..audit.clone()
    };
    let log = AuditLog::new(&config)?;

    log.log_system_event("smoke start", json!(null), true);
    log.log_registration("stu-1", "ama@uni.edu.gh", "student", true);
    log.log_login(
        Some("stu-1"),
        "ama@uni.edu.gh",
        true,
        Some("127.0.0.1"),
        Some("portal-smoke"),
    );
    log.log_login(
        None,
        "kofi@uni.edu.gh",
        false,
        Some("127.0.0.1"),
        Some("portal-smoke"),
    );
    log.log_ghana_card_upload("stu-1", "GHA-123456789-0", true);
    log.log_ghana_card_verified("stu-1", "admin-1", true, None);
    log.log_request_created("stu-1", "req-1", "transcript", true);
    log.log_request_created("stu-1", "req-2", "transcript", true);
    log.log_request_created("stu-1", "req-3", "certificate", true);
    log.log_payment_processed("stu-1", "pay-1", 5000, "GHS", "PSK-0001", "success", true);
    log.log_request_status_updated("hod-1", "req-1", "pending", "approved");
    log.log_document_generated("admin-1", "req-1", "transcript", true);
    log.log_document_downloaded("stu-1", "req-1", "transcript");
    log.log_sms_sent(Some("stu-1"), "+23324***89", "request_approved", true);
    log.log_admin_action(
        "admin-1",
        "approve request",
        Some("document_request"),
        Some("req-1"),
        json!({}),
    );
    let last = log.log_system_event("smoke end", json!(null), true);

    let entries = log.all_logs();
    let expected = SMOKE_EVENTS.min(log.capacity());
    ensure!(
        entries.len() == expected,
        "expected {} retained entries, found {}",
        expected,
        entries.len()
    );
    ensure!(
        entries.first().map(|e| &e.id) == Some(&last.id),
        "entries are not ordered newest first"
    );

    let uploads = log.logs_by_action(action::GHANA_CARD_UPLOADED);
    if let Some(upload) = uploads.first() {
        ensure!(
            upload.details
                == AuditDetails::GhanaCardUpload {
                    card_number: "GHA-123456***".to_string()
                },
            "Ghana-Card number was not masked"
        );
    }

    let login_attempts = log.login_attempts(LoginTimeframe::Hour);
    let request_statistics = log.request_statistics();

    // Statistics are only predictable when nothing was evicted.
    if expected == SMOKE_EVENTS {
        ensure!(
            login_attempts
                == LoginAttemptStats {
                    total: 2,
                    successful: 1,
                    failed: 1
                },
            "unexpected login statistics: {:?}",
            login_attempts
        );
        ensure!(
            request_statistics.total == 3
                && request_statistics.by_type.get("transcript") == Some(&2)
                && request_statistics.by_type.get("certificate") == Some(&1)
                && request_statistics.by_status.get("approved") == Some(&1),
            "unexpected request statistics: {:?}",
            request_statistics
        );
    }

    check_eviction()?;

    Ok(SmokeReport {
        entries,
        login_attempts,
        request_statistics,
    })
}

fn check_eviction() -> anyhow::Result<()> {
    let log = AuditLog::with_capacity(3)?;
    let stored: Vec<_> = (0..5)
        .map(|i| log.log_system_event(&format!("tick {i}"), json!(null), true))
        .collect();

    let retained: Vec<_> = log.all_logs().into_iter().map(|e| e.id).collect();
    let expected: Vec<_> = stored[2..].iter().rev().map(|e| e.id.clone()).collect();
    ensure!(
        retained == expected,
        "capacity eviction kept the wrong entries"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke_with_default_config() {
        let report = smoke(&AuditConfig::default()).unwrap();
        assert_eq!(report.entries.len(), SMOKE_EVENTS);
        assert_eq!(report.entries[0].action, "SYSTEM_SMOKE_END");
        assert_eq!(report.entries[15].action, "SYSTEM_SMOKE_START");
        assert_eq!(report.request_statistics.total, 3);
        assert_eq!(report.login_attempts.total, 2);
    }

    #[test]
    fn test_smoke_with_small_capacity() {
        let config = AuditConfig {
            capacity: 4,
            stdout: true,
        };
        let report = smoke(&config).unwrap();
        assert_eq!(report.entries.len(), 4);
        assert_eq!(report.entries[0].action, "SYSTEM_SMOKE_END");
    }

    #[test]
    fn test_check_eviction() {
        check_eviction().unwrap();
    }
}
