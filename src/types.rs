use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{CrawlError, Result};

/// Name used when no naming strategy finds anything.
pub const PRODUCT_NAME_NOT_FOUND: &str = "Product Name Not Found";

/// Persisted column order.
pub const CSV_COLUMNS: [&str; 7] = [
    "category",
    "brand_name",
    "product_name",
    "packaging_info",
    "sku",
    "picture_url",
    "description",
];

/// One catalog entry.
///
/// Field order is the persisted column order. `product_url` only lives
/// while detail enrichment is pending and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRecord {
    pub category: String,
    pub brand_name: String,
    pub product_name: String,
    pub packaging_info: String,
    pub sku: String,
    pub picture_url: String,
    pub description: String,
    #[serde(skip)]
    pub product_url: Option<String>,
}

impl ProductRecord {
    pub fn new(category: &str, sku: String, product_url: String) -> Self {
        Self {
            category: category.to_string(),
            sku,
            product_name: PRODUCT_NAME_NOT_FOUND.to_string(),
            product_url: Some(product_url),
            ..Default::default()
        }
    }

    /// Drop transient fields; the record now has its persisted shape.
    pub fn finalize(&mut self) {
        self.product_url = None;
    }

    pub fn is_final(&self) -> bool {
        self.product_url.is_none()
    }
}

/// SKUs already accepted this session. Only grows.
#[derive(Debug, Clone, Default)]
pub struct SkuSet(HashSet<String>);

impl SkuSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.0.contains(sku)
    }

    /// Returns `false` when the SKU was already present.
    pub fn insert(&mut self, sku: impl Into<String>) -> bool {
        self.0.insert(sku.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a ProductRecord> for SkuSet {
    fn from_iter<I: IntoIterator<Item = &'a ProductRecord>>(iter: I) -> Self {
        Self(iter.into_iter().map(|r| r.sku.clone()).collect())
    }
}

/// A listing category: display label plus the source's category id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub id: String,
}

impl Category {
    pub fn new(label: &str, id: &str) -> Self {
        Self {
            label: label.to_string(),
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_zip_code")]
    pub zip_code: String,

    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub fetch_descriptions: bool,

    #[serde(default)]
    pub category_limit: Option<usize>,

    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    #[serde(default = "default_empty_page_limit")]
    pub empty_page_limit: u32,

    #[serde(default = "default_enrich_limit")]
    pub enrich_limit: usize,

    #[serde(default = "default_description_max_chars")]
    pub description_max_chars: usize,

    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    #[serde(default = "default_bootstrap_timeout_ms")]
    pub bootstrap_timeout_ms: u64,

    #[serde(default = "default_page_settle_ms")]
    pub page_settle_ms: u64,

    #[serde(default = "default_detail_settle_ms")]
    pub detail_settle_ms: u64,

    #[serde(default = "default_checkpoint_path")]
    pub checkpoint_path: PathBuf,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            zip_code: default_zip_code(),
            categories: default_categories(),
            fetch_descriptions: false,
            category_limit: None,
            max_pages: default_max_pages(),
            empty_page_limit: default_empty_page_limit(),
            enrich_limit: default_enrich_limit(),
            description_max_chars: default_description_max_chars(),
            wait_timeout_ms: default_wait_timeout_ms(),
            bootstrap_timeout_ms: default_bootstrap_timeout_ms(),
            page_settle_ms: default_page_settle_ms(),
            detail_settle_ms: default_detail_settle_ms(),
            checkpoint_path: default_checkpoint_path(),
            output_path: default_output_path(),
            manifest_path: default_manifest_path(),
            log_file: default_log_file(),
        }
    }
}

impl CrawlConfig {
    /// Read a JSON config; missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url).map_err(|_| CrawlError::InvalidUrl(self.base_url.clone()))?;
        if self.empty_page_limit == 0 {
            return Err(CrawlError::Config("emptyPageLimit must be at least 1".into()));
        }
        if self.max_pages == 0 {
            return Err(CrawlError::Config("maxPages must be at least 1".into()));
        }
        Ok(())
    }

    /// Categories in configured order, cut to `category_limit`.
    pub fn active_categories(&self) -> &[Category] {
        let n = self
            .category_limit
            .map_or(self.categories.len(), |n| n.min(self.categories.len()));
        &self.categories[..n]
    }

    pub fn listing_url(&self, category: &Category, page: u32) -> Result<String> {
        let mut url = Url::parse(&self.base_url)
            .and_then(|base| base.join("/app/catalog"))
            .map_err(|_| CrawlError::InvalidUrl(self.base_url.clone()))?;
        url.query_pairs_mut()
            .append_pair("BUSINESS_CENTER_ID", &category.id)
            .append_pair("page", &page.to_string());
        Ok(url.to_string())
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn bootstrap_timeout(&self) -> Duration {
        Duration::from_millis(self.bootstrap_timeout_ms)
    }

    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn detail_settle(&self) -> Duration {
        Duration::from_millis(self.detail_settle_ms)
    }
}

fn default_base_url() -> String {
    String::from("https://shop.sysco.com")
}

fn default_zip_code() -> String {
    String::from("97205")
}

fn default_categories() -> Vec<Category> {
    [
        ("Produce", "syy_cust_tax_produce"),
        ("Dairy & Eggs", "syy_cust_tax_dairyeggs"),
        ("Meat & Seafood", "syy_cust_tax_meatseafood"),
        ("Bakery & Bread", "syy_cust_tax_bakerybread"),
        ("Beverages", "syy_cust_tax_beverages"),
        ("Canned & Dry", "syy_cust_tax_canneddry"),
        ("Frozen Foods", "syy_cust_tax_frozenfoods"),
        ("Chemicals", "syy_cust_tax_chemicals"),
        ("Disposables", "syy_cust_tax_disposables"),
        ("Equipment & Supplies", "syy_cust_tax_equipmentsupplies"),
        ("Fruit & Vegetables", "syy_cust_tax_fruitvegetables"),
    ]
    .iter()
    .map(|(label, id)| Category::new(label, id))
    .collect()
}

fn default_max_pages() -> u32 {
    100
}

fn default_empty_page_limit() -> u32 {
    3
}

fn default_enrich_limit() -> usize {
    3
}

fn default_description_max_chars() -> usize {
    500
}

fn default_wait_timeout_ms() -> u64 {
    5_000
}

fn default_bootstrap_timeout_ms() -> u64 {
    3_000
}

fn default_page_settle_ms() -> u64 {
    1_000
}

fn default_detail_settle_ms() -> u64 {
    2_000
}

fn default_checkpoint_path() -> PathBuf {
    PathBuf::from("catalog_products_temp.csv")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("catalog_products.csv")
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("catalog_products_temp.manifest.json")
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("catalog_crawl.log"))
}

/// Why a category's pagination ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// This many consecutive pages yielded nothing.
    EmptyStreak(u32),
    /// The hard page ceiling was reached.
    PageCeiling(u32),
    /// A systemic failure cut the category short.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CategoryOutcome {
    pub category: String,
    pub records: Vec<ProductRecord>,
    pub pages_visited: u32,
    pub stop: StopReason,
}

#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub total: usize,
    pub per_category: BTreeMap<String, usize>,
    pub with_description: usize,
    /// Categories cut short by a systemic failure, with the reason.
    pub failed: Vec<(String, String)>,
    /// Categories skipped because a resumed run had already completed them.
    pub resumed: Vec<String>,
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn from_records(records: &[ProductRecord]) -> Self {
        let mut per_category = BTreeMap::new();
        for r in records {
            *per_category.entry(r.category.clone()).or_insert(0) += 1;
        }
        Self {
            total: records.len(),
            per_category,
            with_description: records.iter().filter(|r| !r.description.is_empty()).count(),
            ..Default::default()
        }
    }

    pub fn description_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.with_description as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{rule}\nSUMMARY: {} products scraped\n{rule}", self.total)?;
        for (category, count) in &self.per_category {
            writeln!(f, "{category}: {count} products")?;
        }
        if self.total > 0 {
            writeln!(
                f,
                "Products with descriptions: {} ({:.1}%)",
                self.with_description,
                self.description_rate()
            )?;
        }
        for label in &self.resumed {
            writeln!(f, "{label}: carried over from checkpoint")?;
        }
        for (label, reason) in &self.failed {
            writeln!(f, "{label}: FAILED ({reason})")?;
        }
        write!(f, "Completed in {:.1} minutes", self.elapsed.as_secs_f64() / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_source_site() {
        let config = CrawlConfig::default();
        assert_eq!(config.categories.len(), 11);
        assert_eq!(config.categories[0], Category::new("Produce", "syy_cust_tax_produce"));
        assert_eq!(config.max_pages, 100);
        assert_eq!(config.empty_page_limit, 3);
        assert_eq!(config.enrich_limit, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_config_takes_defaults() {
        let config: CrawlConfig =
            serde_json::from_str(r#"{"zipCode": "10001", "categoryLimit": 2, "pageSettleMs": 0}"#)
                .unwrap();
        assert_eq!(config.zip_code, "10001");
        assert_eq!(config.page_settle_ms, 0);
        assert_eq!(config.base_url, "https://shop.sysco.com");
        assert_eq!(config.active_categories().len(), 2);
    }

    #[test]
    fn category_limit_larger_than_list() {
        let config = CrawlConfig {
            category_limit: Some(50),
            ..Default::default()
        };
        assert_eq!(config.active_categories().len(), 11);
    }

    #[test]
    fn listing_url_carries_category_and_page() {
        let config = CrawlConfig::default();
        let url = config
            .listing_url(&Category::new("Dairy & Eggs", "syy_cust_tax_dairyeggs"), 4)
            .unwrap();
        assert_eq!(
            url,
            "https://shop.sysco.com/app/catalog?BUSINESS_CENTER_ID=syy_cust_tax_dairyeggs&page=4"
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad_url = CrawlConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(bad_url.validate(), Err(CrawlError::InvalidUrl(_))));

        let no_empty_limit = CrawlConfig {
            empty_page_limit: 0,
            ..Default::default()
        };
        assert!(matches!(no_empty_limit.validate(), Err(CrawlError::Config(_))));
    }

    #[test]
    fn sku_set_only_grows() {
        let mut seen = SkuSet::new();
        assert!(seen.insert("100"));
        assert!(!seen.insert("100"));
        assert!(seen.contains("100"));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn record_starts_with_sentinel_name_and_pending_url() {
        let mut r = ProductRecord::new("Produce", "42".into(), "https://x/product/42".into());
        assert_eq!(r.product_name, PRODUCT_NAME_NOT_FOUND);
        assert!(!r.is_final());
        r.finalize();
        assert!(r.is_final());
    }

    #[test]
    fn report_counts_per_category() {
        let records = vec![
            ProductRecord {
                category: "B".into(),
                description: "desc".into(),
                ..Default::default()
            },
            ProductRecord {
                category: "A".into(),
                ..Default::default()
            },
            ProductRecord {
                category: "B".into(),
                ..Default::default()
            },
        ];
        let report = CrawlReport::from_records(&records);
        assert_eq!(report.total, 3);
        assert_eq!(report.with_description, 1);
        assert_eq!(
            report.per_category.into_iter().collect::<Vec<_>>(),
            vec![("A".to_string(), 1), ("B".to_string(), 2)]
        );
    }
}
