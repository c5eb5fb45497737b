use std::cell::RefCell;
use std::collections::HashMap;

use ego_tree::iter::Edge;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node, Selector};

use super::Element;
use crate::tools::clean::clean_lines;

/// Elements whose content is never visible.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements rendered on their own line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "th", "thead", "tr",
    "ul",
];

#[derive(Default)]
struct Handles {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
}

/// A parsed page plus the handle table for elements handed out from it.
///
/// The same node always maps to the same [`Element`].
pub struct Document {
    url: String,
    html: Html,
    handles: RefCell<Handles>,
}

impl Document {
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(html),
            handles: RefCell::new(Handles::default()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn select_all(&self, selector: &str) -> Vec<Element> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .map(|el| self.handle(el))
            .collect()
    }

    /// Descendants only; the scope element never matches itself.
    pub fn select_within(&self, scope: Element, selector: &str) -> Vec<Element> {
        let (Some(scope), Some(selector)) = (self.resolve(scope), parse_selector(selector)) else {
            return Vec::new();
        };
        scope
            .select(&selector)
            .filter(|el| el.id() != scope.id())
            .map(|el| self.handle(el))
            .collect()
    }

    pub fn text(&self, element: Element) -> String {
        self.resolve(element).map(rendered_text).unwrap_or_default()
    }

    pub fn attribute(&self, element: Element, name: &str) -> Option<String> {
        self.resolve(element)?
            .value()
            .attr(name)
            .map(|v| v.to_string())
    }

    pub fn parent(&self, element: Element) -> Option<Element> {
        let el = self.resolve(element)?;
        let parent = el.parent().and_then(ElementRef::wrap)?;
        Some(self.handle(parent))
    }

    pub fn tag_name(&self, element: Element) -> Option<String> {
        self.resolve(element).map(|el| el.value().name().to_string())
    }

    fn handle(&self, el: ElementRef<'_>) -> Element {
        let mut handles = self.handles.borrow_mut();
        if let Some(&idx) = handles.index.get(&el.id()) {
            return Element(idx);
        }
        let idx = handles.ids.len();
        handles.ids.push(el.id());
        handles.index.insert(el.id(), idx);
        Element(idx)
    }

    fn resolve(&self, element: Element) -> Option<ElementRef<'_>> {
        let id = *self.handles.borrow().ids.get(element.0)?;
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::debug!("Ignoring unparsable selector `{selector}`: {e:?}");
            None
        }
    }
}

fn rendered_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    let mut hidden = 0usize;

    for edge in el.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(e) if HIDDEN_TAGS.contains(&e.name()) => hidden += 1,
                Node::Element(e) if hidden == 0 && e.name() == "br" => out.push('\n'),
                Node::Element(e) if hidden == 0 && BLOCK_TAGS.contains(&e.name()) => {
                    out.push('\n')
                }
                Node::Text(t) if hidden == 0 => out.push_str(t),
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(e) = node.value() {
                    if HIDDEN_TAGS.contains(&e.name()) {
                        hidden = hidden.saturating_sub(1);
                    } else if hidden == 0 && BLOCK_TAGS.contains(&e.name()) {
                        out.push('\n');
                    }
                }
            }
        }
    }

    clean_lines(&out)
}
