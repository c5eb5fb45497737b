use std::collections::{HashMap, HashSet};
use std::time::Duration;

use super::{Document, DriverError, DriverResult, Element, PageDriver};

/// In-memory driver over a fixed set of pages.
///
/// Unknown URLs fail navigation the way a 404 would. Pauses are no-ops, so
/// crawls over fixtures are deterministic and network-free.
#[derive(Default)]
pub struct StaticDriver {
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
    fatal: HashSet<String>,
    current: Option<Document>,
    visits: Vec<String>,
    interactions: Vec<String>,
}

impl StaticDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Navigating to `from` lands on `to`.
    pub fn with_redirect(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.redirects.insert(from.into(), to.into());
        self
    }

    /// Navigating to `url` reports a lost automation session.
    pub fn with_session_loss(mut self, url: impl Into<String>) -> Self {
        self.fatal.insert(url.into());
        self
    }

    pub fn add_page(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.insert(url.into(), html.into());
    }

    /// Every URL passed to `navigate`, in call order.
    pub fn visits(&self) -> &[String] {
        &self.visits
    }

    /// `click <tag>` / `fill <value>` entries, in call order.
    pub fn interactions(&self) -> &[String] {
        &self.interactions
    }

    fn page(&self) -> Option<&Document> {
        self.current.as_ref()
    }
}

impl PageDriver for StaticDriver {
    fn name(&self) -> &'static str {
        "static"
    }

    fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.visits.push(url.to_string());
        if self.fatal.contains(url) {
            self.current = None;
            return Err(DriverError::SessionLost(format!("fixture dropped at {url}")));
        }
        let target = self.redirects.get(url).map(String::as_str).unwrap_or(url);
        match self.pages.get(target) {
            Some(html) => {
                self.current = Some(Document::parse(target, html));
                Ok(())
            }
            None => {
                self.current = None;
                Err(DriverError::Navigation {
                    url: url.to_string(),
                    reason: "404 Not Found".into(),
                })
            }
        }
    }

    fn current_location(&self) -> String {
        self.page().map(|d| d.url().to_string()).unwrap_or_default()
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> DriverResult<Element> {
        self.query_first(selector).ok_or_else(|| DriverError::Timeout {
            selector: selector.to_string(),
            timeout,
        })
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        self.page()
            .map(|d| d.select_all(selector))
            .unwrap_or_default()
    }

    fn query_all_within(&self, scope: Element, selector: &str) -> Vec<Element> {
        self.page()
            .map(|d| d.select_within(scope, selector))
            .unwrap_or_default()
    }

    fn text(&self, element: Element) -> String {
        self.page().map(|d| d.text(element)).unwrap_or_default()
    }

    fn attribute(&self, element: Element, name: &str) -> Option<String> {
        self.page()?.attribute(element, name)
    }

    fn parent(&self, element: Element) -> Option<Element> {
        self.page()?.parent(element)
    }

    /// Clicking an anchor follows its `href`; anything else is recorded.
    fn click(&mut self, element: Element) -> DriverResult<()> {
        let page = self.page().ok_or(DriverError::Unsupported("click without a page"))?;
        let tag = page.tag_name(element).unwrap_or_default();
        let href = page.attribute(element, "href");
        let base = page.url().to_string();
        self.interactions.push(format!("click {tag}"));
        match href {
            Some(href) if tag == "a" => {
                let target = crate::tools::clean::absolutize(&base, &href);
                self.navigate(&target)
            }
            _ => Ok(()),
        }
    }

    fn fill(&mut self, _element: Element, value: &str) -> DriverResult<()> {
        self.interactions.push(format!("fill {value}"));
        Ok(())
    }

    fn pause(&mut self, _duration: Duration) {}
}
