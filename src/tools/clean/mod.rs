mod utils;

use utils::*;

/// Clean rendered text line by line.
///
/// Each line has zero-width characters removed and whitespace collapsed;
/// blank lines are dropped. Line structure is kept because the packaging
/// extractor looks at the last lines of a product card.
///
/// # Examples
/// ```
/// use catalog_crawl::tools::clean::clean_lines;
///
/// assert_eq!(clean_lines("  Fresh   Apples \n\n  12 CT "), "Fresh Apples\n12 CT");
/// ```
pub fn clean_lines(text: &str) -> String {
    text.lines()
        .map(|line| normalize_whitespace(&remove_zero_width_chars(line)))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clean text into a single line.
pub fn clean_text(text: &str) -> String {
    normalize_whitespace(&remove_zero_width_chars(text))
}

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Resolve a possibly relative `href`/`src` against the page location.
///
/// Falls back to the raw value when either side does not parse.
pub fn absolutize(base: &str, raw: &str) -> String {
    let raw = raw.trim();
    match url::Url::parse(base) {
        Ok(base) if raw.starts_with("//") => format!("{}:{}", base.scheme(), raw),
        Ok(base) => url::Url::parse(raw)
            .or_else(|_| base.join(raw))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}
