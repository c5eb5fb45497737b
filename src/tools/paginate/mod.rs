//! Pagination Controller
//!
//! Walks one category's listing pages in increasing order. The source has
//! no "last page" signal, so a run of empty pages is the stop condition,
//! with a hard page ceiling as the backstop.

mod tests;

use crate::driver::{DriverError, PageDriver};
use crate::selectors;
use crate::tools::enrich::enrich;
use crate::tools::listing::extract_page;
use crate::types::{Category, CategoryOutcome, CrawlConfig, ProductRecord, SkuSet, StopReason};

/// Crawl every page of `category` until the empty streak or the ceiling
/// stops it.
///
/// Never fails: a systemic driver failure ends the category with
/// [`StopReason::Failed`] and the records accepted so far are kept.
pub fn paginate_category<D: PageDriver + ?Sized>(
    driver: &mut D,
    category: &Category,
    config: &CrawlConfig,
    seen: &mut SkuSet,
) -> CategoryOutcome {
    let mut outcome = CategoryOutcome {
        category: category.label.clone(),
        records: Vec::new(),
        pages_visited: 0,
        stop: StopReason::PageCeiling(config.max_pages),
    };
    let mut consecutive_empty = 0;

    for page in 1..=config.max_pages {
        let url = match config.listing_url(category, page) {
            Ok(url) => url,
            Err(e) => {
                outcome.stop = StopReason::Failed(e.to_string());
                return outcome;
            }
        };
        outcome.pages_visited = page;

        let page_records = match crawl_page(driver, &url, category, config, seen) {
            Ok(records) => records,
            Err(PageFailure { records, error }) => {
                tracing::error!("{} - Page {}: {}", category.label, page, error);
                outcome.records.extend(records);
                outcome.stop = StopReason::Failed(error.to_string());
                return outcome;
            }
        };

        if page_records.is_empty() {
            consecutive_empty += 1;
            tracing::info!(
                "{} - Page {}: No products found (empty pages: {})",
                category.label,
                page,
                consecutive_empty
            );
            if consecutive_empty >= config.empty_page_limit {
                tracing::info!(
                    "{}: Stopping after {} empty pages",
                    category.label,
                    consecutive_empty
                );
                outcome.stop = StopReason::EmptyStreak(consecutive_empty);
                return outcome;
            }
            continue;
        }

        consecutive_empty = 0;
        let found = page_records.len();
        outcome.records.extend(page_records);
        tracing::info!(
            "{} - Page {}: Found {} products (Total: {})",
            category.label,
            page,
            found,
            outcome.records.len()
        );
    }

    tracing::info!("{}: Reached the {} page ceiling", category.label, config.max_pages);
    outcome
}

/// A systemic failure mid-page, with whatever the page already produced.
struct PageFailure {
    records: Vec<ProductRecord>,
    error: DriverError,
}

fn crawl_page<D: PageDriver + ?Sized>(
    driver: &mut D,
    url: &str,
    category: &Category,
    config: &CrawlConfig,
    seen: &mut SkuSet,
) -> Result<Vec<ProductRecord>, PageFailure> {
    if let Err(error) = driver.navigate(url) {
        if error.is_fatal() {
            return Err(PageFailure {
                records: Vec::new(),
                error,
            });
        }
        tracing::warn!("{}: {}", category.label, error);
        return Ok(Vec::new());
    }

    driver.pause(config.page_settle());
    // Pages that never render anchors are simply empty.
    let _ = driver.wait_for(selectors::ANCHOR_LOOSE, config.wait_timeout());

    let mut records = extract_page(&*driver, &category.label, seen);
    if records.is_empty() {
        return Ok(records);
    }

    if config.fetch_descriptions {
        tracing::info!(
            "{}: Fetching descriptions for up to {} products...",
            category.label,
            config.enrich_limit
        );
        match enrich(driver, &mut records, config) {
            Ok(stats) if stats.descriptions > 0 => {
                tracing::info!("{}: Got {} descriptions", category.label, stats.descriptions)
            }
            Ok(_) => {}
            Err(error) => return Err(PageFailure { records, error }),
        }
    } else {
        records.iter_mut().for_each(ProductRecord::finalize);
    }
    Ok(records)
}
