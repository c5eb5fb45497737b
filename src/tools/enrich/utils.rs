use std::time::Duration;

use crate::driver::PageDriver;
use crate::selectors;
use crate::tools::chain::FallbackChain;
use crate::tools::clean::truncate_chars;

/// Text the source renders when a product has no description.
pub(super) const DESCRIPTION_UNAVAILABLE: &str = "Product description is not available";

/// Marker present in the location of a genuine detail page.
pub(super) const DETAIL_MARKER: &str = "product-details";

const PRIMARY_MIN_CHARS: usize = 10;
const FALLBACK_MIN_CHARS: usize = 30;

/// Phrases that betray purchase widgets rather than product copy.
const UI_PHRASES: [&str; 3] = ["sign in", "add to cart", "quantity"];

/// Description from the dedicated control, else from the first qualifying
/// element across the generic description selectors.
pub(super) fn extract_description<D: PageDriver + ?Sized>(
    driver: &mut D,
    timeout: Duration,
    max_chars: usize,
) -> Option<String> {
    let mut primary = driver
        .wait_for(selectors::DETAIL_DESCRIPTION, timeout)
        .ok()
        .map(|el| driver.text(el).trim().to_string());

    let driver = &*driver;
    // each strategy applies its own threshold
    let mut chain = FallbackChain::new(|_: &String| true)
        .then(selectors::DETAIL_DESCRIPTION, move || {
            primary.take().filter(|t| is_primary_description(t))
        });
    for &selector in selectors::DETAIL_DESCRIPTION_FALLBACK {
        chain = chain.then(selector, move || {
            driver
                .query_all(selector)
                .into_iter()
                .map(|el| driver.text(el).trim().to_string())
                .find(|t| is_fallback_description(t))
        });
    }

    let hit = chain.resolve()?;
    tracing::debug!("description via {}", hit.strategy);
    Some(truncate_chars(&hit.value, max_chars))
}

fn is_primary_description(text: &str) -> bool {
    !text.is_empty()
        && text != DESCRIPTION_UNAVAILABLE
        && text.chars().count() > PRIMARY_MIN_CHARS
}

fn is_fallback_description(text: &str) -> bool {
    let lower = text.to_lowercase();
    text.chars().count() > FALLBACK_MIN_CHARS && !UI_PHRASES.iter().any(|p| lower.contains(p))
}
