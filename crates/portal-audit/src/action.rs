//! Action and resource naming.
//!
//! Every action tag is upper-snake so that log lines can be grepped by a
//! stable token. Admin actions always start with `ADMIN_` and system events
//! with `SYSTEM_`, whatever the caller passes in.

pub const USER_LOGIN: &str = "USER_LOGIN";
pub const USER_REGISTRATION: &str = "USER_REGISTRATION";
pub const REQUEST_CREATED: &str = "REQUEST_CREATED";
pub const REQUEST_STATUS_UPDATED: &str = "REQUEST_STATUS_UPDATED";
pub const PAYMENT_PROCESSED: &str = "PAYMENT_PROCESSED";
pub const GHANA_CARD_UPLOADED: &str = "GHANA_CARD_UPLOADED";
pub const GHANA_CARD_VERIFIED: &str = "GHANA_CARD_VERIFIED";
pub const DOCUMENT_GENERATED: &str = "DOCUMENT_GENERATED";
pub const DOCUMENT_DOWNLOADED: &str = "DOCUMENT_DOWNLOADED";
pub const SMS_SENT: &str = "SMS_SENT";

pub const ADMIN_PREFIX: &str = "ADMIN_";
pub const SYSTEM_PREFIX: &str = "SYSTEM_";

/// Resource classes that actions apply to.
pub mod resource {
    pub const USER: &str = "user";
    pub const DOCUMENT_REQUEST: &str = "document_request";
    pub const PAYMENT: &str = "payment";
    pub const GHANA_CARD: &str = "ghana_card";
    pub const DOCUMENT: &str = "document";
    pub const SMS: &str = "sms";
    pub const ADMIN: &str = "admin";
    pub const SYSTEM: &str = "system";
}

/// Action tag for an admin action, e.g. `"approve request"` -> `ADMIN_APPROVE_REQUEST`.
pub fn admin_action(name: &str) -> String {
    prefixed(ADMIN_PREFIX, name)
}

/// Action tag for a system event, e.g. `"startup"` -> `SYSTEM_STARTUP`.
pub fn system_event(name: &str) -> String {
    prefixed(SYSTEM_PREFIX, name)
}

fn prefixed(prefix: &str, name: &str) -> String {
    let normalized = to_upper_snake(name);
    let bare = normalized.strip_prefix(prefix).unwrap_or(&normalized);
    if bare.is_empty() {
        format!("{prefix}UNKNOWN")
    } else {
        format!("{prefix}{bare}")
    }
}

/// Normalize a free-form name to upper-snake case.
///
/// ASCII alphanumerics are kept and upper-cased, a lower-to-upper case change
/// starts a new word, and every other run of characters becomes one `_`.
pub fn to_upper_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;
    let mut prev_lower_or_digit = false;

    for c in name.chars() {
        if !c.is_ascii_alphanumeric() {
            pending_separator = !out.is_empty();
            prev_lower_or_digit = false;
            continue;
        }

        if c.is_ascii_uppercase() && prev_lower_or_digit {
            pending_separator = true;
        }
        if pending_separator {
            out.push('_');
            pending_separator = false;
        }

        out.push(c.to_ascii_uppercase());
        prev_lower_or_digit = c.is_ascii_lowercase() || c.is_ascii_digit();
    }

    out
}
