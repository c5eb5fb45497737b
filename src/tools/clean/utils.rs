/// Private helper functions for text cleaning
use once_cell::sync::Lazy;
use regex::Regex;

// Lazy static regex for whitespace normalization
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Remove zero-width characters that are invisible but break length checks.
pub(super) fn remove_zero_width_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(*c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}'))
        .collect()
}

/// Collapse runs of whitespace (including newlines) into one space and trim.
pub(super) fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}
