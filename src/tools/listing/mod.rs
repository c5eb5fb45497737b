//! Listing Page Extractor
//!
//! Turns the product anchors of one rendered listing page into records.
//! Anchors without a SKU and SKUs already accepted are skipped silently.


use crate::driver::{Element, PageDriver};
use crate::selectors;
use crate::tools::clean::absolutize;
use crate::tools::container::resolve_container;
use crate::tools::fields;
use crate::tools::sku::extract_sku;
use crate::types::{ProductRecord, SkuSet};

/// Product anchors on the current page: the opco-scoped selector, or the
/// loose one when the page uses a different markup variant.
pub fn product_anchors<D: PageDriver + ?Sized>(driver: &D) -> Vec<Element> {
    let anchors = driver.query_all(selectors::ANCHOR_PRIMARY);
    if !anchors.is_empty() {
        return anchors;
    }
    driver.query_all(selectors::ANCHOR_LOOSE)
}

/// Extract every new product on the current page, in document order.
///
/// Accepted SKUs go into `seen` immediately, so a later failure during
/// enrichment cannot make the same product reappear.
pub fn extract_page<D: PageDriver + ?Sized>(
    driver: &D,
    category: &str,
    seen: &mut SkuSet,
) -> Vec<ProductRecord> {
    let location = driver.current_location();
    let anchors = product_anchors(driver);
    tracing::debug!("{} product anchors on {}", anchors.len(), location);

    let mut records = Vec::new();
    for anchor in anchors {
        let Some(href) = driver.attribute(anchor, "href") else {
            continue;
        };
        let product_url = absolutize(&location, &href);
        let Some(sku) = extract_sku(&product_url) else {
            continue;
        };
        if seen.contains(&sku) {
            continue;
        }

        let container = resolve_container(driver, anchor);
        let mut record = ProductRecord::new(category, sku, product_url);
        if let Some(name) = fields::extract_name(driver, anchor, container) {
            record.product_name = name;
        }
        record.brand_name = fields::extract_brand(driver, container).unwrap_or_default();
        record.packaging_info = fields::extract_packaging(driver, container).unwrap_or_default();
        record.picture_url =
            fields::extract_listing_image(driver, anchor, container).unwrap_or_default();

        seen.insert(record.sku.clone());
        records.push(record);
    }
    records
}
