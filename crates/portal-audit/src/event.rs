//! Audit entry types.
//!
//! Callers describe an event with a [`NewAuditEntry`]; the store turns it into
//! an immutable [`AuditLogEntry`] by assigning the id, sequence number and
//! timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event-specific payload, keyed by the kind of action being recorded.
///
/// Serialized internally tagged by `kind`. Anything without a dedicated
/// variant goes into [`AuditDetails::Custom`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditDetails {
    /// No payload.
    #[default]
    Empty,

    /// Login attempt.
    Login {
        email: String,
    },

    /// Account registration.
    Registration {
        email: String,
        role: String,
    },

    /// A student created a document request.
    RequestCreated {
        request_id: String,
        document_type: String,
    },

    /// A document request moved to another status.
    RequestStatusUpdated {
        request_id: String,
        old_status: String,
        new_status: String,
    },

    /// Gateway payment outcome.
    PaymentProcessed {
        payment_id: String,
        /// Amount in minor currency units (pesewas for GHS).
        amount: u64,
        currency: String,
        reference: String,
        status: String,
    },

    /// Ghana-Card upload. The card number is always masked.
    GhanaCardUpload {
        card_number: String,
    },

    /// Ghana-Card verification decision.
    GhanaCardVerification {
        verified_by: String,
        verified: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    DocumentGenerated {
        request_id: String,
        document_type: String,
    },

    DocumentDownloaded {
        request_id: String,
        document_type: String,
    },

    /// SMS notification. `recipient` must be masked by the caller.
    SmsSent {
        recipient: String,
        message_type: String,
    },

    /// Admin action with free-form context.
    AdminAction {
        #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
        data: serde_json::Value,
    },

    /// System event with free-form context.
    System {
        #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
        data: serde_json::Value,
    },

    /// Free-form payload for events without a dedicated variant.
    Custom {
        data: serde_json::Value,
    },
}

impl AuditDetails {
    /// Document type declared by a request-creation payload.
    ///
    /// Free-form payloads are consulted for a `document_type` string field.
    pub fn document_type(&self) -> Option<&str> {
        match self {
            Self::RequestCreated { document_type, .. }
            | Self::DocumentGenerated { document_type, .. }
            | Self::DocumentDownloaded { document_type, .. } => Some(document_type.as_str()),
            Self::Custom { data } => data.get("document_type").and_then(|v| v.as_str()),
            _ => None,
        }
    }

    /// Status reached by a status-update payload.
    pub fn new_status(&self) -> Option<&str> {
        match self {
            Self::RequestStatusUpdated { new_status, .. } => Some(new_status.as_str()),
            Self::Custom { data } => data.get("new_status").and_then(|v| v.as_str()),
            _ => None,
        }
    }
}

/// The caller-supplied part of an audit entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub user_id: Option<String>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub details: AuditDetails,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub success: bool,
}

impl NewAuditEntry {
    /// Create a successful entry with no user, resource id or payload.
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            user_id: None,
            action: action.into(),
            resource: resource.into(),
            resource_id: None,
            details: AuditDetails::Empty,
            ip_address: None,
            user_agent: None,
            success: true,
        }
    }

    /// Create a builder for an entry.
    pub fn builder(action: impl Into<String>, resource: impl Into<String>) -> AuditEntryBuilder {
        AuditEntryBuilder {
            entry: Self::new(action, resource),
        }
    }
}

/// Builder for [`NewAuditEntry`].
#[derive(Debug)]
pub struct AuditEntryBuilder {
    entry: NewAuditEntry,
}

impl AuditEntryBuilder {
    /// Set the acting user.
    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.entry.user_id = Some(user_id.into());
        self
    }

    /// Set the acting user if one is known.
    pub fn maybe_user(mut self, user_id: Option<&str>) -> Self {
        self.entry.user_id = user_id.map(str::to_string);
        self
    }

    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.entry.resource_id = Some(id.into());
        self
    }

    pub fn details(mut self, details: AuditDetails) -> Self {
        self.entry.details = details;
        self
    }

    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.entry.ip_address = Some(ip.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.entry.user_agent = Some(user_agent.into());
        self
    }

    /// Set the outcome of the action being recorded.
    pub fn success(mut self, success: bool) -> Self {
        self.entry.success = success;
        self
    }

    pub fn build(self) -> NewAuditEntry {
        self.entry
    }
}

/// A stored, immutable audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique entry ID.
    pub id: String,

    /// Append order within the store. Breaks timestamp ties.
    pub sequence: u64,

    /// When the entry was stored.
    pub timestamp: DateTime<Utc>,

    /// Acting principal; absent for system-initiated events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Upper-snake action tag (e.g. `USER_LOGIN`).
    pub action: String,

    /// Resource class the action applies to.
    pub resource: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    pub details: AuditDetails,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Outcome of the recorded action (not of the logging itself).
    pub success: bool,
}

impl AuditLogEntry {
    pub(crate) fn from_new(
        entry: NewAuditEntry,
        id: String,
        sequence: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sequence,
            timestamp,
            user_id: entry.user_id,
            action: entry.action,
            resource: entry.resource,
            resource_id: entry.resource_id,
            details: entry.details,
            ip_address: entry.ip_address,
            user_agent: entry.user_agent,
            success: entry.success,
        }
    }

    /// Format the entry as a human-readable log line.
    ///
    /// Format: `[timestamp] ACTION resource=...[/id] [user=...] ok|failed [ip=...]`
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "[{}] {} resource={}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.action,
            self.resource,
        );

        if let Some(ref resource_id) = self.resource_id {
            line.push_str(&format!("/{}", resource_id));
        }

        if let Some(ref user_id) = self.user_id {
            line.push_str(&format!(" user={}", user_id));
        }

        line.push_str(if self.success { " ok" } else { " failed" });

        if let Some(ref ip) = self.ip_address {
            line.push_str(&format!(" ip={}", ip));
        }

        line
    }
}
