//! # Shared App Helpers

/// Split a comma-separated identifier list, trimming whitespace and
/// dropping empty segments.
///
/// Both the CLI flags and the HTTP request fields carry relation targets
/// in this form.
#[must_use]
pub fn comma_separated_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
