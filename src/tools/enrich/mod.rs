//! Detail Enricher
//!
//! Visits the detail pages of the first few records of a listing page to
//! fill the description and any field the listing pass left empty. The
//! visit bound caps page loads per listing page; it is a cost trade-off and
//! records beyond it simply keep their listing values.

mod utils;

use utils::*;

use crate::driver::{DriverResult, PageDriver};
use crate::tools::clean::truncate_chars;
use crate::tools::fields;
use crate::types::{CrawlConfig, ProductRecord};

/// What happened to the records selected for enrichment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    /// Detail pages requested.
    pub attempted: usize,
    /// Records skipped because navigation failed or did not land on a detail page.
    pub skipped: usize,
    pub descriptions: usize,
}

/// Enrich up to `config.enrich_limit` records in place, then finalize all
/// of them.
///
/// Recoverable driver failures skip the affected record. A systemic failure
/// stops enrichment and is returned; the records are finalized either way.
pub fn enrich<D: PageDriver + ?Sized>(
    driver: &mut D,
    records: &mut [ProductRecord],
    config: &CrawlConfig,
) -> DriverResult<EnrichStats> {
    let mut stats = EnrichStats::default();
    let bound = config.enrich_limit.min(records.len());

    let result = records[..bound]
        .iter_mut()
        .try_for_each(|record| enrich_one(driver, record, config, &mut stats));

    for record in records.iter_mut() {
        record.finalize();
    }
    result.map(|()| stats)
}

fn enrich_one<D: PageDriver + ?Sized>(
    driver: &mut D,
    record: &mut ProductRecord,
    config: &CrawlConfig,
    stats: &mut EnrichStats,
) -> DriverResult<()> {
    let Some(url) = record.product_url.clone() else {
        return Ok(());
    };
    stats.attempted += 1;

    if let Err(e) = driver.navigate(&url) {
        if e.is_fatal() {
            return Err(e);
        }
        tracing::warn!("Error fetching details for {}: {}", record.sku, e);
        stats.skipped += 1;
        return Ok(());
    }

    let location = driver.current_location();
    if !location.contains(DETAIL_MARKER) {
        tracing::warn!("Not on product details page: {}", location);
        stats.skipped += 1;
        return Ok(());
    }

    driver.pause(config.detail_settle());

    match extract_description(driver, config.wait_timeout(), config.description_max_chars) {
        Some(description) => {
            tracing::info!(
                "Found description for SKU {}: {}...",
                record.sku,
                truncate_chars(&description, 50)
            );
            record.description = description;
            stats.descriptions += 1;
        }
        None => tracing::warn!("No description found for SKU {}", record.sku),
    }

    let driver = &*driver;
    fill_if_empty(&mut record.brand_name, || fields::extract_detail_brand(driver));
    fill_if_empty(&mut record.packaging_info, || {
        fields::extract_detail_packaging(driver)
    });
    fill_if_empty(&mut record.picture_url, || fields::extract_detail_image(driver));
    Ok(())
}

fn fill_if_empty(slot: &mut String, extract: impl FnOnce() -> Option<String>) {
    if slot.is_empty() {
        if let Some(value) = extract() {
            *slot = value;
        }
    }
}
