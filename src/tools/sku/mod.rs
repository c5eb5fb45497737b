//! SKU Extraction


use once_cell::sync::Lazy;
use regex::Regex;

static SKU_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/product/(\d+)").expect("valid regex"));

/// Extract the numeric product id following a `/product/` path segment.
///
/// `None` is the normal "no SKU" signal, not an error.
///
/// # Examples
/// ```
/// use catalog_crawl::tools::sku::extract_sku;
///
/// assert_eq!(
///     extract_sku("https://shop.sysco.com/app/product-details/opco/056/product/4821730").as_deref(),
///     Some("4821730")
/// );
/// assert_eq!(extract_sku("https://shop.sysco.com/app/catalog"), None);
/// ```
pub fn extract_sku(url: &str) -> Option<String> {
    SKU_REGEX
        .captures(url)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}
