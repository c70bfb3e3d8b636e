//! Redaction helpers for identifiers that must not be stored in clear.

/// Number of leading Ghana-Card characters kept in audit entries.
pub const CARD_VISIBLE_PREFIX: usize = 10;

/// Suffix appended in place of the hidden characters.
pub const MASK_SUFFIX: &str = "***";

/// Mask a Ghana-Card number, keeping only its leading characters.
///
/// `GHA-123456789-0` becomes `GHA-123456***`. Short inputs are kept as-is but
/// still carry the suffix so a masked value is always recognisable.
pub fn mask_card_number(card_number: &str) -> String {
    let mut masked: String = card_number
        .trim()
        .chars()
        .take(CARD_VISIBLE_PREFIX)
        .collect();
    masked.push_str(MASK_SUFFIX);
    masked
}
