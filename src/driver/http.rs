use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{redirect, Client};

use super::{Document, DriverError, DriverResult, Element, PageDriver};
use crate::runtime::block_on;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const REDIRECT_LIMIT: usize = 10;

const DESKTOP_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const DESKTOP_HEADERS: [(&str, &str); 6] = [
    ("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"),
    ("accept-language", "en-US,en;q=0.9"),
    ("upgrade-insecure-requests", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-ch-ua-platform", "\"macOS\""),
];

/// Driver that fetches pages over HTTP and queries the served markup.
///
/// No JavaScript runs: content a site renders client-side is invisible to
/// this driver. `click` follows anchors; form filling is unsupported.
pub struct HttpDriver {
    client: Client,
    current: Option<Document>,
}

impl HttpDriver {
    pub fn new() -> DriverResult<Self> {
        Self::with_timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn with_timeout(timeout: Duration) -> DriverResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .timeout(timeout)
            .default_headers(desktop_headers())
            .build()
            .map_err(|e| DriverError::SessionLost(format!("failed to build client: {e}")))?;
        Ok(Self {
            client,
            current: None,
        })
    }

    fn page(&self) -> Option<&Document> {
        self.current.as_ref()
    }

    async fn fetch(client: &Client, url: &str) -> DriverResult<(String, String)> {
        let navigation = |reason: String| DriverError::Navigation {
            url: url.to_string(),
            reason,
        };

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| navigation(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(navigation(format!("HTTP {status}")));
        }

        let landed = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| navigation(format!("failed to read response: {e}")))?;
        Ok((landed, body))
    }
}

fn desktop_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (k, v) in DESKTOP_HEADERS {
        if let (Ok(name), Ok(val)) = (HeaderName::from_lowercase(k.as_bytes()), HeaderValue::from_str(v)) {
            headers.insert(name, val);
        }
    }
    headers.insert(USER_AGENT, HeaderValue::from_static(DESKTOP_UA));
    headers
}

impl PageDriver for HttpDriver {
    fn name(&self) -> &'static str {
        "http"
    }

    fn navigate(&mut self, url: &str) -> DriverResult<()> {
        tracing::debug!("GET {url}");
        match block_on(Self::fetch(&self.client, url)) {
            Ok((landed, body)) => {
                self.current = Some(Document::parse(landed, &body));
                Ok(())
            }
            Err(e) => {
                self.current = None;
                Err(e)
            }
        }
    }

    fn current_location(&self) -> String {
        self.page().map(|d| d.url().to_string()).unwrap_or_default()
    }

    /// Served markup never changes after load, so one look is enough.
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

    fn click(&mut self, element: Element) -> DriverResult<()> {
        let page = self.page().ok_or(DriverError::Unsupported("click without a page"))?;
        match (page.tag_name(element).as_deref(), page.attribute(element, "href")) {
            (Some("a"), Some(href)) => {
                let target = crate::tools::clean::absolutize(page.url(), &href);
                self.navigate(&target)
            }
            _ => Err(DriverError::Unsupported("click on non-anchor elements")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_headers_carry_user_agent() {
        let headers = desktop_headers();
        assert_eq!(
            headers.get(USER_AGENT).and_then(|v| v.to_str().ok()),
            Some(DESKTOP_UA)
        );
        assert_eq!(headers.len(), DESKTOP_HEADERS.len() + 1);
    }

    #[test]
    fn queries_before_navigation_are_empty() {
        let driver = HttpDriver::new().unwrap();
        assert_eq!(driver.current_location(), "");
        assert!(driver.query_all("a").is_empty());
    }
}
