//! Field Extractors
//!
//! One fallback chain per catalog field. Every extractor returns `None`
//! when nothing acceptable is found; absence is an expected outcome and
//! callers decide the empty/sentinel value.

mod tests;
mod utils;

use utils::*;

use crate::driver::{Element, PageDriver};
use crate::selectors;
use crate::tools::chain::FallbackChain;
use crate::tools::image;

/// Anchor or heading text must be longer than this to count as a name.
const NAME_MIN_CHARS: usize = 5;
/// Container titles at or above this length are treated as blurbs.
const NAME_MAX_CHARS: usize = 200;
/// Brand and packaging labels are short.
const LABEL_MAX_CHARS: usize = 50;

/// Product name: the anchor's own text, then title-like elements in the card.
pub fn extract_name<D: PageDriver + ?Sized>(
    driver: &D,
    anchor: Element,
    container: Element,
) -> Option<String> {
    let mut chain = FallbackChain::new(|t: &String| char_len(t) > NAME_MIN_CHARS)
        .then("anchor text", move || Some(driver.text(anchor).trim().to_string()));

    for &selector in selectors::NAME {
        chain = chain.then(selector, move || {
            scoped_text(driver, container, selector).filter(|t| char_len(t) < NAME_MAX_CHARS)
        });
    }

    let hit = chain.resolve()?;
    tracing::trace!("name via {}", hit.strategy);
    Some(hit.value)
}

/// Brand: brand/manufacturer-like elements in the card.
pub fn extract_brand<D: PageDriver + ?Sized>(driver: &D, container: Element) -> Option<String> {
    let mut chain = FallbackChain::new(|t: &String| is_short_label(t));
    for &selector in selectors::BRAND {
        chain = chain.then(selector, move || scoped_text(driver, container, selector));
    }
    chain.resolve_value()
}

/// Packaging: pack/size-like elements whose text carries a unit, then a
/// scan of the whole card text.
pub fn extract_packaging<D: PageDriver + ?Sized>(
    driver: &D,
    container: Element,
) -> Option<String> {
    let mut chain = FallbackChain::new(|t: &String| is_short_label(t) && UNIT_HINT_REGEX.is_match(t));
    for &selector in selectors::PACKAGING {
        chain = chain.then(selector, move || scoped_text(driver, container, selector));
    }
    chain
        .then("card text", move || packaging_from_text(&driver.text(container)))
        .resolve_value()
}

/// Scan free text for a pack size.
///
/// Matches in the last lines win (cards put the pack size near the bottom),
/// searching the bottom line first; otherwise the first pattern that matches
/// anywhere decides.
///
/// # Examples
/// ```
/// use catalog_crawl::tools::fields::packaging_from_text;
///
/// assert_eq!(packaging_from_text("Fresh Apples\n12 CT").as_deref(), Some("12 CT"));
/// assert_eq!(packaging_from_text("no quantities here"), None);
/// ```
pub fn packaging_from_text(text: &str) -> Option<String> {
    if !QUANTITY_REGEXES.iter().any(|re| re.is_match(text)) {
        return None;
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let tail = &lines[lines.len().saturating_sub(TRAILING_LINES)..];
    let first_in = |haystack: &str| {
        QUANTITY_REGEXES
            .iter()
            .find_map(|re| re.find(haystack))
            .map(|m| m.as_str().to_string())
    };

    tail.iter()
        .rev()
        .find_map(|line| first_in(*line))
        .or_else(|| first_in(text))
}

/// Listing image: the anchor first, then the card, across the image
/// selector list.
pub fn extract_listing_image<D: PageDriver + ?Sized>(
    driver: &D,
    anchor: Element,
    container: Element,
) -> Option<String> {
    let mut chain = FallbackChain::new(|u: &String| image::is_valid(u));
    for scope in [anchor, container] {
        for &selector in selectors::LISTING_IMAGE {
            chain = chain.then(selector, move || {
                let img = driver.query_one(scope, selector)?;
                image_source(driver, img)
            });
        }
    }
    chain.resolve_value()
}

/// Detail-page image: the main product image control, then the detail
/// gallery selectors, then the listing selectors over the whole page.
pub fn extract_detail_image<D: PageDriver + ?Sized>(driver: &D) -> Option<String> {
    let mut chain = FallbackChain::new(|u: &String| image::is_valid(u)).then(
        selectors::DETAIL_MAIN_IMAGE,
        move || {
            let img = driver.query_first(selectors::DETAIL_MAIN_IMAGE)?;
            let src = driver.attribute(img, "src")?;
            Some(crate::tools::clean::absolutize(&driver.current_location(), &src))
        },
    );
    for &selector in selectors::DETAIL_IMAGE.iter().chain(selectors::LISTING_IMAGE) {
        chain = chain.then(selector, move || {
            let img = driver.query_first(selector)?;
            image_source(driver, img)
        });
    }
    chain.resolve_value()
}

/// Detail-page brand control.
pub fn extract_detail_brand<D: PageDriver + ?Sized>(driver: &D) -> Option<String> {
    page_text(driver, selectors::DETAIL_BRAND).filter(|t| !t.is_empty())
}

/// Detail-page pack size control.
pub fn extract_detail_packaging<D: PageDriver + ?Sized>(driver: &D) -> Option<String> {
    page_text(driver, selectors::DETAIL_PACKAGING).filter(|t| !t.is_empty())
}

fn is_short_label(text: &str) -> bool {
    !text.is_empty() && char_len(text) < LABEL_MAX_CHARS
}
