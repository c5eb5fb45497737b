use once_cell::sync::Lazy;
use regex::Regex;

use crate::driver::{Element, PageDriver};
use crate::selectors::IMAGE_SOURCE_ATTRS;
use crate::tools::clean::absolutize;

/// Loose unit hint for text found under a pack/size-like element.
pub(super) static UNIT_HINT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+.*(?:CT|CS|EA|LB|OZ|GAL|QT|PT)").expect("valid regex")
});

/// Quantity patterns scanned over a whole card, in priority order.
pub(super) static QUANTITY_REGEXES: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        r"(?i)\b\d+[-/\d]*\s*(CT|CS|EA|LB|OZ|GAL|QT|PT)\b",
        r"(?i)\b\d+\s*[xX]\s*\d+\s*(CT|CS|EA|LB|OZ)\b",
        r"(?i)\b\d+\.\d+\s*(LB|OZ|GAL)\b",
        r"(?i)\b\d+/\d+\s*(CT|CS|EA|LB|OZ)\b",
    ]
    .map(|p| Regex::new(p).expect("valid regex"))
});

/// How many trailing lines of a card are searched first.
pub(super) const TRAILING_LINES: usize = 3;

pub(super) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Trimmed text of the first match of `selector` under `scope`.
pub(super) fn scoped_text<D: PageDriver + ?Sized>(
    driver: &D,
    scope: Element,
    selector: &str,
) -> Option<String> {
    let el = driver.query_one(scope, selector)?;
    Some(driver.text(el).trim().to_string())
}

/// Trimmed text of the first match of `selector` on the page.
pub(super) fn page_text<D: PageDriver + ?Sized>(driver: &D, selector: &str) -> Option<String> {
    let el = driver.query_first(selector)?;
    Some(driver.text(el).trim().to_string())
}

/// Image URL from the lazy-load attribute, falling back to `src`.
pub(super) fn image_source<D: PageDriver + ?Sized>(driver: &D, img: Element) -> Option<String> {
    let raw = IMAGE_SOURCE_ATTRS
        .iter()
        .filter_map(|attr| driver.attribute(img, attr))
        .find(|v| !v.trim().is_empty())?;
    Some(absolutize(&driver.current_location(), &raw))
}
