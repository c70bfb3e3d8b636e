//! Audit log implementation.
//!
//! Provides the main `AuditLog` type with one helper per event category of
//! the document-request portal, plus the query operations used by dashboards.

use chrono::{DateTime, Utc};
use portal_core::AuditConfig;
use std::io::Write;
use std::sync::Arc;

use crate::action::{self, resource};
use crate::clock::{Clock, SystemClock};
use crate::error::AuditError;
use crate::event::{AuditDetails, AuditLogEntry, NewAuditEntry};
use crate::mask::mask_card_number;
use crate::query::AuditFilter;
use crate::storage::{AuditStorage, MemoryStorage, MirroredStorage};

/// The audit log store.
///
/// Construct one at startup and share it as `Arc<AuditLog>`. Appends never
/// fail and queries always return, possibly empty.
pub struct AuditLog {
    storage: Arc<dyn AuditStorage>,
    clock: Arc<dyn Clock>,
}

impl AuditLog {
    /// Create a new audit log from configuration.
    pub fn new(config: &AuditConfig) -> Result<Self, AuditError> {
        Self::with_mirror(config, || Box::new(std::io::stdout()))
    }

    /// Create a log from configuration, mirroring to `mirror()` when
    /// `config.stdout` is set.
    pub fn with_mirror<F>(config: &AuditConfig, mirror: F) -> Result<Self, AuditError>
    where
        F: FnOnce() -> Box<dyn Write + Send>,
    {
        let storage: Arc<dyn AuditStorage> = if config.stdout {
            Arc::new(MirroredStorage::new(config.capacity, mirror())?)
        } else {
            Arc::new(MemoryStorage::new(config.capacity)?)
        };

        Ok(Self::with_storage(storage, Arc::new(SystemClock)))
    }

    /// Create an in-memory log with the given capacity and the system clock.
    pub fn with_capacity(capacity: usize) -> Result<Self, AuditError> {
        Ok(Self::with_storage(
            Arc::new(MemoryStorage::new(capacity)?),
            Arc::new(SystemClock),
        ))
    }

    /// Create a log with a custom storage backend and clock.
    pub fn with_storage(storage: Arc<dyn AuditStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Replace the clock used to stamp entries and evaluate time windows.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current instant according to the log's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Append an entry and return it as stored.
    pub fn append(&self, entry: NewAuditEntry) -> AuditLogEntry {
        let stored = self.storage.store(entry, self.clock.as_ref());

        tracing::debug!(
            id = %stored.id,
            sequence = stored.sequence,
            action = %stored.action,
            resource = %stored.resource,
            user_id = stored.user_id.as_deref().unwrap_or("-"),
            success = stored.success,
            "Audit entry"
        );

        stored
    }

    /// Log a login attempt. `user_id` is unknown for failed lookups.
    pub fn log_login(
        &self,
        user_id: Option<&str>,
        email: &str,
        success: bool,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> AuditLogEntry {
        let mut builder = NewAuditEntry::builder(action::USER_LOGIN, resource::USER)
            .maybe_user(user_id)
            .details(AuditDetails::Login {
                email: email.to_string(),
            })
            .success(success);

        if let Some(user_id) = user_id {
            builder = builder.resource_id(user_id);
        }
        if let Some(ip) = ip_address {
            builder = builder.ip_address(ip);
        }
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent);
        }

        self.append(builder.build())
    }

    /// Log an account registration.
    pub fn log_registration(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
        success: bool,
    ) -> AuditLogEntry {
        let entry = NewAuditEntry::builder(action::USER_REGISTRATION, resource::USER)
            .user(user_id)
            .resource_id(user_id)
            .details(AuditDetails::Registration {
                email: email.to_string(),
                role: role.to_string(),
            })
            .success(success)
            .build();

        self.append(entry)
    }

    /// Log creation of a document request (transcript, certificate, ...).
    pub fn log_request_created(
        &self,
        user_id: &str,
        request_id: &str,
        document_type: &str,
        success: bool,
    ) -> AuditLogEntry {
        let entry = NewAuditEntry::builder(action::REQUEST_CREATED, resource::DOCUMENT_REQUEST)
            .user(user_id)
            .resource_id(request_id)
            .details(AuditDetails::RequestCreated {
                request_id: request_id.to_string(),
                document_type: document_type.to_string(),
            })
            .success(success)
            .build();

        self.append(entry)
    }

    /// Log a request status transition, e.g. HOD approval.
    pub fn log_request_status_updated(
        &self,
        user_id: &str,
        request_id: &str,
        old_status: &str,
        new_status: &str,
    ) -> AuditLogEntry {
        let entry =
            NewAuditEntry::builder(action::REQUEST_STATUS_UPDATED, resource::DOCUMENT_REQUEST)
                .user(user_id)
                .resource_id(request_id)
                .details(AuditDetails::RequestStatusUpdated {
                    request_id: request_id.to_string(),
                    old_status: old_status.to_string(),
                    new_status: new_status.to_string(),
                })
                .build();

        self.append(entry)
    }

    /// Log a payment outcome reported by the gateway.
    #[allow(clippy::too_many_arguments)]
    pub fn log_payment_processed(
        &self,
        user_id: &str,
        payment_id: &str,
        amount: u64,
        currency: &str,
        reference: &str,
        status: &str,
        success: bool,
    ) -> AuditLogEntry {
        let entry = NewAuditEntry::builder(action::PAYMENT_PROCESSED, resource::PAYMENT)
            .user(user_id)
            .resource_id(payment_id)
            .details(AuditDetails::PaymentProcessed {
                payment_id: payment_id.to_string(),
                amount,
                currency: currency.to_string(),
                reference: reference.to_string(),
                status: status.to_string(),
            })
            .success(success)
            .build();

        self.append(entry)
    }

    /// Log a Ghana-Card upload. Only a masked card number is stored.
    pub fn log_ghana_card_upload(
        &self,
        user_id: &str,
        card_number: &str,
        success: bool,
    ) -> AuditLogEntry {
        let entry = NewAuditEntry::builder(action::GHANA_CARD_UPLOADED, resource::GHANA_CARD)
            .user(user_id)
            .resource_id(user_id)
            .details(AuditDetails::GhanaCardUpload {
                card_number: mask_card_number(card_number),
            })
            .success(success)
            .build();

        self.append(entry)
    }

    /// Log a Ghana-Card verification decision for `user_id`.
    pub fn log_ghana_card_verified(
        &self,
        user_id: &str,
        verified_by: &str,
        verified: bool,
        reason: Option<&str>,
    ) -> AuditLogEntry {
        let entry = NewAuditEntry::builder(action::GHANA_CARD_VERIFIED, resource::GHANA_CARD)
            .user(verified_by)
            .resource_id(user_id)
            .details(AuditDetails::GhanaCardVerification {
                verified_by: verified_by.to_string(),
                verified,
                reason: reason.map(str::to_string),
            })
            .success(verified)
            .build();

        self.append(entry)
    }

    /// Log PDF generation for a request.
    pub fn log_document_generated(
        &self,
        user_id: &str,
        request_id: &str,
        document_type: &str,
        success: bool,
    ) -> AuditLogEntry {
        let entry = NewAuditEntry::builder(action::DOCUMENT_GENERATED, resource::DOCUMENT)
            .user(user_id)
            .resource_id(request_id)
            .details(AuditDetails::DocumentGenerated {
                request_id: request_id.to_string(),
                document_type: document_type.to_string(),
            })
            .success(success)
            .build();

        self.append(entry)
    }

    pub fn log_document_downloaded(
        &self,
        user_id: &str,
        request_id: &str,
        document_type: &str,
    ) -> AuditLogEntry {
        let entry = NewAuditEntry::builder(action::DOCUMENT_DOWNLOADED, resource::DOCUMENT)
            .user(user_id)
            .resource_id(request_id)
            .details(AuditDetails::DocumentDownloaded {
                request_id: request_id.to_string(),
                document_type: document_type.to_string(),
            })
            .build();

        self.append(entry)
    }

    /// Log an outgoing SMS. `recipient` must already be masked.
    pub fn log_sms_sent(
        &self,
        user_id: Option<&str>,
        recipient: &str,
        message_type: &str,
        success: bool,
    ) -> AuditLogEntry {
        let entry = NewAuditEntry::builder(action::SMS_SENT, resource::SMS)
            .maybe_user(user_id)
            .details(AuditDetails::SmsSent {
                recipient: recipient.to_string(),
                message_type: message_type.to_string(),
            })
            .success(success)
            .build();

        self.append(entry)
    }

    /// Log an admin action. The action tag is always `ADMIN_<NAME>`.
    ///
    /// Without a `target_resource` the entry is filed under the `admin` resource.
    pub fn log_admin_action(
        &self,
        admin_id: &str,
        name: &str,
        target_resource: Option<&str>,
        target_id: Option<&str>,
        data: serde_json::Value,
    ) -> AuditLogEntry {
        let mut builder = NewAuditEntry::builder(
            action::admin_action(name),
            target_resource.unwrap_or(resource::ADMIN),
        )
        .user(admin_id)
        .details(AuditDetails::AdminAction { data });

        if let Some(target_id) = target_id {
            builder = builder.resource_id(target_id);
        }

        self.append(builder.build())
    }

    /// Log a system event. The action tag is always `SYSTEM_<NAME>`.
    pub fn log_system_event(
        &self,
        name: &str,
        data: serde_json::Value,
        success: bool,
    ) -> AuditLogEntry {
        let entry = NewAuditEntry::builder(action::system_event(name), resource::SYSTEM)
            .details(AuditDetails::System { data })
            .success(success)
            .build();

        self.append(entry)
    }

    /// Query entries with filters, newest first.
    pub fn query(&self, filter: &AuditFilter) -> Vec<AuditLogEntry> {
        self.storage.snapshot(filter)
    }

    /// Get an entry by ID.
    pub fn get(&self, id: &str) -> Option<AuditLogEntry> {
        self.storage.get(id)
    }

    /// All retained entries, newest first.
    pub fn all_logs(&self) -> Vec<AuditLogEntry> {
        self.query(&AuditFilter::default())
    }

    pub fn logs_by_user(&self, user_id: &str) -> Vec<AuditLogEntry> {
        self.query(&AuditFilter {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        })
    }

    pub fn logs_by_action(&self, action: &str) -> Vec<AuditLogEntry> {
        self.query(&AuditFilter {
            action: Some(action.to_string()),
            ..Default::default()
        })
    }

    /// Entries for a resource class, optionally narrowed to one instance.
    pub fn logs_by_resource(
        &self,
        resource: &str,
        resource_id: Option<&str>,
    ) -> Vec<AuditLogEntry> {
        self.query(&AuditFilter {
            resource: Some(resource.to_string()),
            resource_id: resource_id.map(str::to_string),
            ..Default::default()
        })
    }

    /// Entries with `start <= timestamp <= end`.
    pub fn logs_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<AuditLogEntry> {
        self.query(&AuditFilter {
            start_time: Some(start),
            end_time: Some(end),
            ..Default::default()
        })
    }
}
