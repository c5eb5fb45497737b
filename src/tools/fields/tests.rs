#![cfg(test)]
mod tests {
    use crate::driver::{Element, PageDriver, StaticDriver};
    use crate::tools::fields::*;

    const URL: &str = "https://shop.test/app/catalog?page=1";

    fn load(html: &str) -> StaticDriver {
        let mut driver = StaticDriver::new().with_page(URL, html);
        driver.navigate(URL).unwrap();
        driver
    }

    fn card(driver: &StaticDriver) -> (Element, Element) {
        let anchor = driver.query_first("a").unwrap();
        let container = driver.query_first(".product-card").unwrap();
        (anchor, container)
    }

    #[test]
    fn test_name_prefers_anchor_text() {
        let driver = load(
            r#"<div class="product-card">
                 <a href="/product/1">Roma Tomatoes</a>
                 <h3>Other Heading Text</h3>
               </div>"#,
        );
        let (anchor, container) = card(&driver);
        assert_eq!(
            extract_name(&driver, anchor, container).as_deref(),
            Some("Roma Tomatoes")
        );
    }

    #[test]
    fn test_name_falls_back_to_card_title() {
        let driver = load(
            r#"<div class="product-card">
                 <a href="/product/1"><img src="x"></a>
                 <h3>Tiny</h3>
                 <h4>Imperial Butter Blend</h4>
               </div>"#,
        );
        let (anchor, container) = card(&driver);
        // the h3 is too short, so the h4 wins
        assert_eq!(
            extract_name(&driver, anchor, container).as_deref(),
            Some("Imperial Butter Blend")
        );
    }

    #[test]
    fn test_name_rejects_overlong_title() {
        let long = "x".repeat(250);
        let driver = load(&format!(
            r#"<div class="product-card">
                 <a href="/product/1">abc</a>
                 <div class="title">{long}</div>
                 <span class="item-name">Cage Free Eggs</span>
               </div>"#
        ));
        let (anchor, container) = card(&driver);
        assert_eq!(
            extract_name(&driver, anchor, container).as_deref(),
            Some("Cage Free Eggs")
        );
    }

    #[test]
    fn test_name_none_when_nothing_qualifies() {
        let driver = load(r#"<div class="product-card"><a href="/product/1">abc</a></div>"#);
        let (anchor, container) = card(&driver);
        assert_eq!(extract_name(&driver, anchor, container), None);
    }

    #[test]
    fn test_brand_short_text_only() {
        let driver = load(&format!(
            r#"<div class="product-card">
                 <a href="/product/1">Whole Milk Gallon</a>
                 <div class="brand-line">{}</div>
                 <div class="manufacturer">Sysco Classic</div>
               </div>"#,
            "B".repeat(60)
        ));
        let (_, container) = card(&driver);
        assert_eq!(extract_brand(&driver, container).as_deref(), Some("Sysco Classic"));
    }

    #[test]
    fn test_brand_missing_is_none() {
        let driver = load(r#"<div class="product-card"><a href="/product/1">Milk</a></div>"#);
        let (_, container) = card(&driver);
        assert_eq!(extract_brand(&driver, container), None);
    }

    #[test]
    fn test_packaging_from_pack_element() {
        let driver = load(
            r#"<div class="product-card">
                 <a href="/product/1">Whole Milk</a>
                 <div class="size-note">Refrigerate</div>
                 <span class="pack-size">4/1 GAL</span>
               </div>"#,
        );
        let (_, container) = card(&driver);
        // `[class*="pack"]` is tried first and carries a unit
        assert_eq!(extract_packaging(&driver, container).as_deref(), Some("4/1 GAL"));
    }

    #[test]
    fn test_packaging_falls_back_to_card_text() {
        let driver = load(
            r#"<div class="product-card">
                 <a href="/product/1">Gala Apples</a>
                 <div class="pack">Ask store</div>
                 <div>Washington grown</div>
                 <div>12 CT</div>
               </div>"#,
        );
        let (_, container) = card(&driver);
        assert_eq!(extract_packaging(&driver, container).as_deref(), Some("12 CT"));
    }

    #[test]
    fn test_packaging_text_preserves_case() {
        assert_eq!(packaging_from_text("Apples\n12 ct").as_deref(), Some("12 ct"));
        assert_eq!(packaging_from_text("12 CT").as_deref(), Some("12 CT"));
    }

    #[test]
    fn test_packaging_text_prefers_trailing_lines() {
        let text = "Case of 6 CT\nDescription line\nSecond line\n24 OZ";
        assert_eq!(packaging_from_text(text).as_deref(), Some("24 OZ"));
    }

    #[test]
    fn test_packaging_text_falls_back_to_first_match() {
        let text = "Pack 6 CT\nline a\nline b\nline c\nline d";
        assert_eq!(packaging_from_text(text).as_deref(), Some("6 CT"));
    }

    #[test]
    fn test_packaging_text_slash_pack() {
        assert_eq!(packaging_from_text("Eggs\n15/12 CT").as_deref(), Some("15/12 CT"));
    }

    #[test]
    fn test_packaging_text_without_quantities() {
        assert_eq!(packaging_from_text("Fresh and local\nBest seller"), None);
        assert_eq!(packaging_from_text(""), None);
    }

    #[test]
    fn test_listing_image_prefers_lazy_source() {
        let driver = load(
            r#"<div class="product-card">
                 <a href="/product/1">
                   <img src="https://cdn.test/loading.gif" data-src="https://img.mediacdn.sysco.com/p1.jpg">
                 </a>
               </div>"#,
        );
        let (anchor, container) = card(&driver);
        assert_eq!(
            extract_listing_image(&driver, anchor, container).as_deref(),
            Some("https://img.mediacdn.sysco.com/p1.jpg")
        );
    }

    #[test]
    fn test_listing_image_searches_container_after_anchor() {
        let driver = load(
            r#"<div class="product-card">
                 <a href="/product/1"><img src="/static/placeholder.png"></a>
                 <img class="product-image" src="/product/images/7.png">
               </div>"#,
        );
        let (anchor, container) = card(&driver);
        assert_eq!(
            extract_listing_image(&driver, anchor, container).as_deref(),
            Some("https://shop.test/product/images/7.png")
        );
    }

    #[test]
    fn test_listing_image_none_when_all_invalid() {
        let driver = load(
            r#"<div class="product-card">
                 <a href="/product/1">Item</a>
                 <img src="https://cdn.test/blank.png">
               </div>"#,
        );
        let (anchor, container) = card(&driver);
        assert_eq!(extract_listing_image(&driver, anchor, container), None);
    }

    #[test]
    fn test_detail_image_main_control_then_gallery() {
        let main = load(
            r#"<img data-id="main-product-img-v2" src="https://img.mediacdn.sysco.com/main.jpg">
               <img class="product-image" src="https://img.mediacdn.sysco.com/other.jpg">"#,
        );
        assert_eq!(
            extract_detail_image(&main).as_deref(),
            Some("https://img.mediacdn.sysco.com/main.jpg")
        );

        let gallery = load(
            r#"<img data-id="main-product-img-v2" src="https://cdn.test/default.jpg">
               <div class="image-gallery"><img src="https://img.mediacdn.sysco.com/g1.jpg"></div>"#,
        );
        assert_eq!(
            extract_detail_image(&gallery).as_deref(),
            Some("https://img.mediacdn.sysco.com/g1.jpg")
        );
    }

    #[test]
    fn test_detail_image_falls_back_to_listing_selectors() {
        // no main control and nothing the detail gallery list knows about
        let driver = load(
            r#"<img src="https://cdn.shop.test/placeholder.png">
               <img data-testid="product-photo" src="https://cdn.shop.test/photos/item-5.webp">"#,
        );
        assert_eq!(
            extract_detail_image(&driver).as_deref(),
            Some("https://cdn.shop.test/photos/item-5.webp")
        );
    }

    #[test]
    fn test_detail_brand_and_packaging_controls() {
        let driver = load(
            r#"<button data-id="product_brand_link"> Wholesome Farms </button>
               <div data-id="pack_size">6/32 OZ</div>"#,
        );
        assert_eq!(extract_detail_brand(&driver).as_deref(), Some("Wholesome Farms"));
        assert_eq!(extract_detail_packaging(&driver).as_deref(), Some("6/32 OZ"));

        let empty = load("<div>nothing</div>");
        assert_eq!(extract_detail_brand(&empty), None);
        assert_eq!(extract_detail_packaging(&empty), None);
    }
}
