//! # portal-audit
//!
//! Audit logging for the document-request portal.
//!
//! This crate provides:
//! - An append-only, capacity-bounded in-memory audit log ([`AuditLog`])
//! - One logging helper per portal event category, with stable action tags
//! - Filtered queries ordered newest first
//! - Login and document-request statistics for dashboards
//!
//! ## Action Tags
//!
//! | Helper | Action | Resource |
//! |--------|--------|----------|
//! | `log_login` | `USER_LOGIN` | `user` |
//! | `log_registration` | `USER_REGISTRATION` | `user` |
//! | `log_request_created` | `REQUEST_CREATED` | `document_request` |
//! | `log_request_status_updated` | `REQUEST_STATUS_UPDATED` | `document_request` |
//! | `log_payment_processed` | `PAYMENT_PROCESSED` | `payment` |
//! | `log_ghana_card_upload` | `GHANA_CARD_UPLOADED` | `ghana_card` |
//! | `log_ghana_card_verified` | `GHANA_CARD_VERIFIED` | `ghana_card` |
//! | `log_document_generated` | `DOCUMENT_GENERATED` | `document` |
//! | `log_document_downloaded` | `DOCUMENT_DOWNLOADED` | `document` |
//! | `log_sms_sent` | `SMS_SENT` | `sms` |
//! | `log_admin_action` | `ADMIN_*` | target or `admin` |
//! | `log_system_event` | `SYSTEM_*` | `system` |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use portal_audit::{AuditLog, LoginTimeframe};
//! use portal_core::AuditConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let log = AuditLog::new(&AuditConfig::default())?;
//!
//! log.log_login(Some("stu-42"), "ama@uni.edu.gh", true, Some("10.0.0.7"), None);
//! log.log_request_created("stu-42", "req-1001", "transcript", true);
//! log.log_ghana_card_upload("stu-42", "GHA-123456789-0", true);
//!
//! let recent = log.logs_by_user("stu-42");
//! let logins = log.login_attempts(LoginTimeframe::Hour);
//! let requests = log.request_statistics();
//! # let _ = (recent, logins, requests);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod clock;
pub mod error;
pub mod event;
pub mod logger;
pub mod mask;
pub mod query;
pub mod stats;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuditError;
pub use event::{AuditDetails, AuditEntryBuilder, AuditLogEntry, NewAuditEntry};
pub use logger::AuditLog;
pub use query::AuditFilter;
pub use stats::{LoginAttemptStats, LoginTimeframe, RequestStatistics};
pub use storage::{AuditStorage, MemoryStorage, MirroredStorage};
