//! Shared Selectors
//!
//! Every list is a fallback order: earlier entries are tried first.

/// Product anchors scoped to an operating-company path.
pub const ANCHOR_PRIMARY: &str = r#"a[href*="/opco/"][href*="/product/"]"#;

/// Any product anchor; used when the primary selector finds nothing.
pub const ANCHOR_LOOSE: &str = r#"a[href*="/product/"]"#;

pub const NAME: &[&str] = &["h3", "h4", r#"[class*="title"]"#, r#"[class*="name"]"#];

pub const BRAND: &[&str] = &[
    r#"[class*="brand"]"#,
    r#"[class*="manufacturer"]"#,
    r#"button[data-id="product_brand_link"]"#,
];

pub const PACKAGING: &[&str] = &[
    r#"[class*="pack"]"#,
    r#"[class*="size"]"#,
    r#"[data-id*="pack"]"#,
    r#"[data-testid*="pack"]"#,
    ".product-size",
    ".pack-size",
];

pub const LISTING_IMAGE: &[&str] = &[
    "img",
    r#"img[data-testid*="product"]"#,
    r#"img[class*="product-image"]"#,
    r#"img[src*="mediacdn"]"#,
    r#"img[data-src*="mediacdn"]"#,
];

/// Lazy-load attribute first, then the standard one.
pub const IMAGE_SOURCE_ATTRS: &[&str] = &["data-src", "src"];

pub const DETAIL_DESCRIPTION: &str = r#"div[data-id="product_description_text"]"#;

pub const DETAIL_DESCRIPTION_FALLBACK: &[&str] = &[
    r#"div[class*="product-description"]"#,
    r#"[class*="description-text"]"#,
    r#"div[class*="description"] p"#,
    ".product-details-description",
    r#"[data-testid*="description"]"#,
];

pub const DETAIL_BRAND: &str = r#"button[data-id="product_brand_link"]"#;

pub const DETAIL_PACKAGING: &str = r#"div[data-id="pack_size"]"#;

pub const DETAIL_MAIN_IMAGE: &str = r#"img[data-id="main-product-img-v2"]"#;

pub const DETAIL_IMAGE: &[&str] = &[
    "img.product-image",
    r#"img[class*="main-image"]"#,
    r#"img[alt*="product"]"#,
    ".product-image-container img",
    ".image-gallery img",
    r#"img[src*="mediacdn"]"#,
    r#"img[data-src*="mediacdn"]"#,
];

/// Buttons on the landing page; the guest one is found by its label.
pub const BUTTON: &str = "button";
pub const GUEST_LABEL: &str = "Guest";

pub const ZIP_INPUT: &str = r#"input[data-id="initial_zipcode_modal_input"]"#;
