//! Image Validator
//!
//! Classifies a candidate image URL as a usable product photo or as a
//! placeholder/decoration. Pure and deterministic.


/// Shorter strings cannot be a usable image URL.
const MIN_URL_LEN: usize = 10;

/// Substrings that mark placeholders, spinners and broken images.
const BLOCKED_MARKERS: [&str; 6] = ["placeholder", "default", "blank", "loading", "error", "missing"];

/// Substrings that mark product media; trusted without an extension check.
const TRUSTED_MARKERS: [&str; 6] = ["mediacdn", "sysco", "/product/", "/item/", "/sku/", "rendition"];

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Check whether `url` looks like a real product photo.
///
/// # Examples
/// ```
/// use catalog_crawl::tools::image::is_valid;
///
/// assert!(is_valid("https://img.mediacdn.sysco.com/x.jpg"));
/// assert!(!is_valid("https://site/placeholder.png"));
/// assert!(!is_valid("ftp://x/y.jpg"));
/// ```
pub fn is_valid(url: &str) -> bool {
    if url.chars().count() < MIN_URL_LEN {
        return false;
    }

    let lower = url.to_lowercase();

    if BLOCKED_MARKERS.iter().any(|m| lower.contains(m)) {
        return false;
    }

    if TRUSTED_MARKERS.iter().any(|m| lower.contains(m)) {
        return true;
    }

    url.starts_with("https://") && IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}
