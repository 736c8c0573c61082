//! # Innate Primitives
//!
//! Hardcoded runtime constants for the relchron CORE.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Together they keep every operation computationally bounded: input sizes
//! are capped before they reach the store, and conflict enumeration has a
//! hard ceiling.

/// Date-only anchor format (calendar date, no time-of-day).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date + time-of-day anchor format.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Maximum length for event titles.
///
/// Titles longer than this are rejected by the builder.
/// This prevents memory exhaustion from malicious or malformed input.
pub const MAX_TITLE_LENGTH: usize = 1024;

/// Maximum length for event descriptions.
pub const MAX_DESC_LENGTH: usize = 65536;

/// Maximum number of relation targets in a single spec list.
///
/// A before/after/same list longer than this is rejected by the builder.
pub const MAX_RELATION_TARGETS: usize = 1000;

/// Maximum allowed size of a persisted collection document.
///
/// Validated BEFORE attempting deserialization to prevent allocation-based
/// memory exhaustion on corrupted or hostile input.
pub const MAX_DOCUMENT_SIZE: usize = 50 * 1024 * 1024; // 50 MB

/// Maximum number of cycles reported by a single conflict query.
///
/// Dense contradiction graphs can hold combinatorially many simple cycles;
/// enumeration stops at this ceiling so the query stays bounded. One cycle
/// is already proof of contradiction.
pub const MAX_CYCLES: usize = 4096;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parse_their_own_examples() {
        assert!(chrono::NaiveDate::parse_from_str("2021-04-17", DATE_FORMAT).is_ok());
        assert!(
            chrono::NaiveDateTime::parse_from_str("2021-04-17T11:10:27", DATETIME_FORMAT).is_ok()
        );
    }

    #[test]
    fn cycle_ceiling_is_positive() {
        assert!(MAX_CYCLES > 0);
    }
}
