#![cfg(test)]
mod tests {
    use crate::driver::StaticDriver;
    use crate::tools::paginate::*;
    use crate::types::{Category, CrawlConfig, ProductRecord, SkuSet, StopReason};

    fn produce() -> Category {
        Category::new("Produce", "produce")
    }

    fn config() -> CrawlConfig {
        CrawlConfig {
            base_url: "https://shop.test".into(),
            ..Default::default()
        }
    }

    fn page_url(page: u32) -> String {
        format!("https://shop.test/app/catalog?BUSINESS_CENTER_ID=produce&page={page}")
    }

    fn detail_url(sku: u32) -> String {
        format!("https://shop.test/app/product-details/opco/056/product/{sku}")
    }

    fn listing(skus: &[u32]) -> String {
        skus.iter()
            .map(|sku| {
                format!(
                    r#"<div class="product-tile"><a href="/app/product-details/opco/056/product/{sku}">Catalog item {sku}</a></div>"#
                )
            })
            .collect()
    }

    fn skus(records: &[ProductRecord]) -> Vec<&str> {
        records.iter().map(|r| r.sku.as_str()).collect()
    }

    #[test]
    fn test_three_empty_pages_end_the_category() {
        // page 4 renders without products, 5 and 6 fail to load
        let mut driver = StaticDriver::new()
            .with_page(page_url(1), listing(&[1, 2]))
            .with_page(page_url(2), listing(&[3]))
            .with_page(page_url(3), listing(&[4]))
            .with_page(page_url(4), "<p>No results</p>")
            .with_page(page_url(7), listing(&[5]));
        let mut seen = SkuSet::new();

        let outcome = paginate_category(&mut driver, &produce(), &config(), &mut seen);

        assert_eq!(outcome.stop, StopReason::EmptyStreak(3));
        assert_eq!(outcome.pages_visited, 6);
        assert_eq!(skus(&outcome.records), ["1", "2", "3", "4"]);
        assert!(!driver.visits().contains(&page_url(7)));
        assert_eq!(driver.visits().last(), Some(&page_url(6)));
    }

    #[test]
    fn test_empty_streak_resets_on_products() {
        let mut driver = StaticDriver::new()
            .with_page(page_url(1), listing(&[1]))
            .with_page(page_url(4), listing(&[2]));
        let config = CrawlConfig {
            empty_page_limit: 3,
            ..config()
        };

        let outcome = paginate_category(&mut driver, &produce(), &config, &mut SkuSet::new());

        // pages 2-3 empty, 4 resets the streak, 5-7 end it
        assert_eq!(outcome.pages_visited, 7);
        assert_eq!(skus(&outcome.records), ["1", "2"]);
    }

    #[test]
    fn test_page_ceiling() {
        let mut driver = StaticDriver::new()
            .with_page(page_url(1), listing(&[1]))
            .with_page(page_url(2), listing(&[2]))
            .with_page(page_url(3), listing(&[3]));
        let config = CrawlConfig {
            max_pages: 2,
            ..config()
        };

        let outcome = paginate_category(&mut driver, &produce(), &config, &mut SkuSet::new());

        assert_eq!(outcome.stop, StopReason::PageCeiling(2));
        assert_eq!(driver.visits(), [page_url(1), page_url(2)]);
    }

    #[test]
    fn test_repeated_products_do_not_count_as_new() {
        // a site that repeats page 1 forever looks empty from page 2 on
        let mut driver = StaticDriver::new();
        for page in 1..=5 {
            driver.add_page(page_url(page), listing(&[1, 2]));
        }
        let mut seen = SkuSet::new();

        let outcome = paginate_category(&mut driver, &produce(), &config(), &mut seen);

        assert_eq!(skus(&outcome.records), ["1", "2"]);
        assert_eq!(outcome.stop, StopReason::EmptyStreak(3));
        assert_eq!(outcome.pages_visited, 4);
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_session_loss_keeps_accepted_records() {
        let mut driver = StaticDriver::new()
            .with_page(page_url(1), listing(&[1, 2]))
            .with_session_loss(page_url(2));

        let outcome = paginate_category(&mut driver, &produce(), &config(), &mut SkuSet::new());

        assert!(matches!(outcome.stop, StopReason::Failed(_)));
        assert_eq!(skus(&outcome.records), ["1", "2"]);
        assert!(outcome.records.iter().all(ProductRecord::is_final));
    }

    #[test]
    fn test_session_loss_during_enrichment_keeps_page_records() {
        let mut driver = StaticDriver::new()
            .with_page(page_url(1), listing(&[1, 2]))
            .with_session_loss(detail_url(1));
        let config = CrawlConfig {
            fetch_descriptions: true,
            ..config()
        };

        let outcome = paginate_category(&mut driver, &produce(), &config, &mut SkuSet::new());

        assert!(matches!(outcome.stop, StopReason::Failed(_)));
        assert_eq!(skus(&outcome.records), ["1", "2"]);
        assert!(outcome.records.iter().all(ProductRecord::is_final));
    }

    #[test]
    fn test_enrichment_visits_detail_pages_per_listing_page() {
        let mut driver = StaticDriver::new()
            .with_page(page_url(1), listing(&[1, 2, 3, 4]))
            .with_page(
                detail_url(1),
                r#"<div data-id="product_description_text">Sweet seedless red grapes</div>"#,
            );
        let config = CrawlConfig {
            fetch_descriptions: true,
            ..config()
        };

        let outcome = paginate_category(&mut driver, &produce(), &config, &mut SkuSet::new());

        assert_eq!(outcome.records.len(), 4);
        assert_eq!(outcome.records[0].description, "Sweet seedless red grapes");
        let detail_visits: Vec<_> = driver
            .visits()
            .iter()
            .filter(|v| v.contains("product-details"))
            .collect();
        assert_eq!(detail_visits, [&detail_url(1), &detail_url(2), &detail_url(3)]);
        assert!(outcome.records.iter().all(ProductRecord::is_final));
    }

    #[test]
    fn test_no_enrichment_when_disabled() {
        let mut driver = StaticDriver::new().with_page(page_url(1), listing(&[1, 2]));

        let outcome = paginate_category(&mut driver, &produce(), &config(), &mut SkuSet::new());

        assert!(driver.visits().iter().all(|v| v.contains("/app/catalog")));
        assert!(outcome.records.iter().all(ProductRecord::is_final));
        assert!(outcome.records.iter().all(|r| r.description.is_empty()));
    }
}
