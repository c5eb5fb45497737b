//! Page Drivers
//!
//! The extraction core never talks to a browser or an HTTP client directly.
//! It drives a [`PageDriver`]: navigate, read the current location, wait for
//! or query elements, and read text, attributes and parents of the elements
//! it got back. Any backend exposing this contract is substitutable.

mod document;
mod fixture;
mod http;

pub use document::Document;
pub use fixture::StaticDriver;
pub use http::HttpDriver;

use std::time::Duration;
use thiserror::Error;

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Opaque handle to an element of the page currently loaded in a driver.
///
/// Handles are only meaningful until the next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element(pub(crate) usize);

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("timed out after {timeout:?} waiting for `{selector}`")]
    Timeout { selector: String, timeout: Duration },
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    #[error("{0} is not supported by this driver")]
    Unsupported(&'static str),
    #[error("automation session lost: {0}")]
    SessionLost(String),
}

impl DriverError {
    /// Whether the failure is systemic rather than local to one page or record.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DriverError::SessionLost(_))
    }
}

pub trait PageDriver {
    fn name(&self) -> &'static str;

    fn navigate(&mut self, url: &str) -> DriverResult<()>;

    /// Location after redirects, empty before the first navigation.
    fn current_location(&self) -> String;

    /// Bounded wait for the first element matching `selector`.
    fn wait_for(&mut self, selector: &str, timeout: Duration) -> DriverResult<Element>;

    /// All elements of the page matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Element>;

    /// Descendants of `scope` matching `selector`, in document order.
    fn query_all_within(&self, scope: Element, selector: &str) -> Vec<Element>;

    fn query_one(&self, scope: Element, selector: &str) -> Option<Element> {
        self.query_all_within(scope, selector).into_iter().next()
    }

    fn query_first(&self, selector: &str) -> Option<Element> {
        self.query_all(selector).into_iter().next()
    }

    /// Visible text, one line per block-level element.
    fn text(&self, element: Element) -> String;

    fn attribute(&self, element: Element, name: &str) -> Option<String>;

    fn parent(&self, element: Element) -> Option<Element>;

    fn click(&mut self, _element: Element) -> DriverResult<()> {
        Err(DriverError::Unsupported("click"))
    }

    fn fill(&mut self, _element: Element, _value: &str) -> DriverResult<()> {
        Err(DriverError::Unsupported("fill"))
    }

    /// Fixed settle delay after a navigation or interaction.
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
