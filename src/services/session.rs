//! Crawl Session
//!
//! Sole owner of the driver, the Dedup Set and the accumulated records.
//! Categories run in configured order; each one is isolated, so a systemic
//! failure ends that category only. After every category the full record
//! list is checkpointed and the resume manifest updated.

use std::time::{Duration, Instant};

use crate::driver::{Element, PageDriver};
use crate::error::Result;
use crate::selectors;
use crate::services::store::{CsvSink, RecordSink, ResumeManifest};
use crate::tools::paginate::paginate_category;
use crate::types::{CrawlConfig, CrawlReport, ProductRecord, SkuSet, StopReason};

const GUEST_POLL: Duration = Duration::from_millis(250);

pub struct CrawlSession<D, S = CsvSink> {
    driver: D,
    sink: S,
    config: CrawlConfig,
    seen: SkuSet,
    products: Vec<ProductRecord>,
    manifest: ResumeManifest,
}

impl<D: PageDriver, S: RecordSink> CrawlSession<D, S> {
    pub fn new(driver: D, sink: S, config: CrawlConfig) -> Self {
        Self {
            driver,
            sink,
            config,
            seen: SkuSet::new(),
            products: Vec::new(),
            manifest: ResumeManifest::new(),
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn seen(&self) -> &SkuSet {
        &self.seen
    }

    /// Seed state from the manifest and checkpoint of an interrupted run.
    ///
    /// Returns the number of records carried over. Zero, with fresh state,
    /// when there is no manifest or the checkpoint does not match it.
    pub fn resume(&mut self) -> Result<usize> {
        let Some(manifest) = ResumeManifest::load(&self.config.manifest_path)? else {
            tracing::info!(
                "No manifest at {}, starting a fresh crawl",
                self.config.manifest_path.display()
            );
            return Ok(0);
        };

        let checkpoint = &self.config.checkpoint_path;
        let records = if checkpoint.exists() {
            self.sink.read_records(checkpoint)?
        } else {
            Vec::new()
        };

        if records.len() != manifest.records {
            tracing::warn!(
                "Checkpoint {} holds {} products but the manifest expects {}; starting a fresh crawl",
                checkpoint.display(),
                records.len(),
                manifest.records
            );
            return Ok(0);
        }

        self.seen = records.iter().collect();
        self.products = records;
        self.manifest = manifest;
        tracing::info!(
            "Resuming: {} products carried over, {} categories already complete",
            self.products.len(),
            self.manifest.completed_categories.len()
        );
        Ok(self.products.len())
    }

    /// Pick guest access and the delivery zip code so listings show the
    /// right regional catalog. Every failure is a warning.
    pub fn bootstrap(&mut self) {
        let base_url = self.config.base_url.clone();
        if let Err(e) = self.driver.navigate(&base_url) {
            tracing::warn!("Could not open {}: {}", base_url, e);
            return;
        }
        self.driver.pause(self.config.detail_settle());

        match self.find_guest_button() {
            Some(button) => match self.driver.click(button) {
                Ok(()) => self.driver.pause(self.config.page_settle()),
                Err(e) => tracing::debug!("Guest button: {}", e),
            },
            None => tracing::debug!("No guest button within the bootstrap timeout"),
        }

        let zip = self.config.zip_code.clone();
        let filled = match self.driver.query_first(selectors::ZIP_INPUT) {
            Some(input) => self.driver.fill(input, &zip).map_err(|e| e.to_string()),
            None => Err(String::from("zip code input not found")),
        };
        match filled {
            Ok(()) => {
                self.driver.pause(self.config.detail_settle());
                tracing::info!("Set location to {}", zip);
            }
            Err(reason) => tracing::warn!("Could not set location: {}", reason),
        }
    }

    /// Poll for a button labelled as guest access until the bootstrap timeout
    /// runs out. Other buttons on the page never satisfy the wait.
    fn find_guest_button(&mut self) -> Option<Element> {
        let timeout = self.config.bootstrap_timeout();
        let polls = (timeout.as_millis() / GUEST_POLL.as_millis()).max(1);
        for poll in 0..polls {
            let guest = self
                .driver
                .query_all(selectors::BUTTON)
                .into_iter()
                .find(|&b| self.driver.text(b).contains(selectors::GUEST_LABEL));
            if guest.is_some() {
                return guest;
            }
            if poll + 1 < polls {
                self.driver.pause(GUEST_POLL);
            }
        }
        None
    }

    /// Crawl every active category and write the final snapshot.
    ///
    /// Only persistence failures are errors; category failures end up in
    /// the report.
    pub fn run(&mut self) -> Result<CrawlReport> {
        let started = Instant::now();
        self.bootstrap();

        if let Some(limit) = self.config.category_limit {
            tracing::info!("Limited to first {} categories for testing", limit);
        }

        let mut failed = Vec::new();
        let mut resumed = Vec::new();
        let categories = self.config.active_categories().to_vec();
        for category in &categories {
            if self.manifest.is_completed(&category.label) {
                tracing::info!("{}: already complete, skipping", category.label);
                resumed.push(category.label.clone());
                continue;
            }

            let rule = "=".repeat(50);
            tracing::info!("{rule}");
            tracing::info!("Scraping category: {}", category.label);
            tracing::info!("{rule}");

            let outcome =
                paginate_category(&mut self.driver, category, &self.config, &mut self.seen);
            tracing::debug!(
                "{}: {} pages, stopped by {:?}",
                outcome.category,
                outcome.pages_visited,
                outcome.stop
            );
            self.products.extend(outcome.records);

            match outcome.stop {
                StopReason::Failed(reason) => {
                    tracing::error!("{}: category failed: {}", category.label, reason);
                    self.manifest.mark_failed(&category.label);
                    failed.push((category.label.clone(), reason));
                }
                StopReason::EmptyStreak(_) | StopReason::PageCeiling(_) => {
                    self.manifest.mark_completed(&category.label);
                }
            }

            tracing::info!("Category complete. Total products so far: {}", self.products.len());
            self.checkpoint()?;
        }

        self.sink.write_records(&self.products, &self.config.output_path)?;

        let mut report = CrawlReport::from_records(&self.products);
        report.failed = failed;
        report.resumed = resumed;
        report.elapsed = started.elapsed();
        Ok(report)
    }

    fn checkpoint(&mut self) -> Result<()> {
        let path = &self.config.checkpoint_path;
        if self.products.is_empty() && path.exists() {
            // a snapshot left by an earlier run must not outlive this one
            std::fs::remove_file(path)?;
        }
        self.sink.write_records(&self.products, path)?;
        self.manifest.records = self.products.len();
        self.manifest.save(&self.config.manifest_path)
    }
}
