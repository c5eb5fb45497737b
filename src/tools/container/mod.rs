//! Container Resolver
//!
//! Product cards carry no stable semantic wrapper, so the card is found by
//! walking up from the anchor until an ancestor's class or style mentions a
//! card-like keyword.


use crate::driver::{Element, PageDriver};

/// How many ancestors to inspect before giving up.
pub const MAX_DEPTH: usize = 5;

const CARD_KEYWORDS: [&str; 4] = ["product", "item", "card", "tile"];

const CARD_ATTRS: [&str; 2] = ["class", "style"];

/// Find the smallest ancestor of `anchor` that looks like a product card.
///
/// Never fails: without a match the deepest ancestor reached is returned,
/// and an anchor without parents is its own container.
pub fn resolve_container<D: PageDriver + ?Sized>(driver: &D, anchor: Element) -> Element {
    let mut current = anchor;
    for _ in 0..MAX_DEPTH {
        let Some(parent) = driver.parent(current) else {
            break;
        };
        if looks_like_card(driver, parent) {
            return parent;
        }
        current = parent;
    }
    current
}

fn looks_like_card<D: PageDriver + ?Sized>(driver: &D, element: Element) -> bool {
    CARD_ATTRS.iter().any(|attr| {
        driver
            .attribute(element, attr)
            .map(|value| {
                let value = value.to_lowercase();
                CARD_KEYWORDS.iter().any(|k| value.contains(k))
            })
            .unwrap_or(false)
    })
}
