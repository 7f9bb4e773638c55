use std::time::Duration;

use ego_tree::{NodeId, NodeMut, NodeRef};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::navigation::{HistoryApi, NavigationError};

/// The parts of a host page the agent reads and writes.
///
/// The page is foreign: it may re-render at any time, so callers never hold
/// a `NodeId` across calls.
pub trait PageDom {
    /// Current document address.
    fn location(&self) -> String;

    /// First element matching `selector`, in document order.
    fn query_first(&self, selector: &Selector) -> Option<NodeId>;

    /// True if a descendant of `scope` matches `selector`.
    fn contains(&self, scope: NodeId, selector: &Selector) -> bool;

    /// Values of `attribute` on every element matching `selector`, in
    /// document order.
    fn attribute_values(&self, selector: &Selector, attribute: &str) -> Vec<String>;

    /// Builds an element from `markup` and inserts it right after the first
    /// element child of `parent`, or appends it if `parent` has none.
    fn insert_after_first_child(&mut self, parent: NodeId, markup: &str) -> Option<NodeId>;

    /// Replaces the text of every element matching `selector`. Returns the
    /// number of elements updated.
    fn set_text(&mut self, selector: &Selector, text: &str) -> usize;

    /// Shows a transient notification.
    fn notify(&mut self, message: &str, duration: Duration);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNotice {
    pub message: String,
    pub duration: Duration,
}

/// In-memory host page backed by a parsed HTML document.
///
/// Re-renders replace the whole document, which is what a single-page
/// application does to anything it did not create itself.
pub struct HtmlPage {
    document: Html,
    location: Url,
    back_stack: Vec<Url>,
    forward_stack: Vec<Url>,
    notices: Vec<PageNotice>,
}

impl HtmlPage {
    pub fn parse(html: &str, location: &str) -> Result<Self, NavigationError> {
        let location = Url::parse(location).map_err(|err| NavigationError::InvalidUrl {
            url: location.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            document: Html::parse_document(html),
            location,
            back_stack: Vec::new(),
            forward_stack: Vec::new(),
            notices: Vec::new(),
        })
    }

    /// Replaces the document, dropping anything injected into it.
    pub fn rerender(&mut self, html: &str) {
        self.document = Html::parse_document(html);
    }

    /// Detaches every element matching `selector`. Returns how many went.
    pub fn remove_all(&mut self, selector: &Selector) -> usize {
        let ids: Vec<NodeId> = self.elements(selector).map(|el| el.id()).collect();
        for id in &ids {
            if let Some(mut node) = self.document.tree.get_mut(*id) {
                node.detach();
            }
        }
        ids.len()
    }

    pub fn count(&self, selector: &Selector) -> usize {
        self.elements(selector).count()
    }

    /// Text content of the first element matching `selector`.
    pub fn text_of(&self, selector: &Selector) -> Option<String> {
        self.elements(selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }

    /// Text content of every element matching `selector`, in document order.
    pub fn texts(&self, selector: &Selector) -> Vec<String> {
        self.elements(selector)
            .map(|el| el.text().collect::<String>())
            .collect()
    }

    pub fn notices(&self) -> &[PageNotice] {
        &self.notices
    }

    /// Matching elements in document order. Detached nodes are skipped.
    fn elements<'a>(
        &'a self,
        selector: &'a Selector,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.document.root_element().select(selector)
    }

    fn resolve(&self, url: &str) -> Result<Url, NavigationError> {
        let next = self
            .location
            .join(url)
            .map_err(|err| NavigationError::InvalidUrl {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        if next.origin() != self.location.origin() {
            return Err(NavigationError::CrossOrigin {
                from: self.location.to_string(),
                to: next.to_string(),
            });
        }
        Ok(next)
    }
}

impl PageDom for HtmlPage {
    fn location(&self) -> String {
        self.location.to_string()
    }

    fn query_first(&self, selector: &Selector) -> Option<NodeId> {
        self.elements(selector).next().map(|el| el.id())
    }

    fn contains(&self, scope: NodeId, selector: &Selector) -> bool {
        self.document
            .tree
            .get(scope)
            .and_then(ElementRef::wrap)
            .is_some_and(|el| el.select(selector).next().is_some())
    }

    fn attribute_values(&self, selector: &Selector, attribute: &str) -> Vec<String> {
        self.elements(selector)
            .filter_map(|el| el.value().attr(attribute))
            .map(str::to_string)
            .collect()
    }

    fn insert_after_first_child(&mut self, parent: NodeId, markup: &str) -> Option<NodeId> {
        let fragment = Html::parse_fragment(markup);
        let source = fragment
            .root_element()
            .children()
            .find(|child| child.value().is_element())?;

        let anchor = self
            .document
            .tree
            .get(parent)?
            .children()
            .find(|child| child.value().is_element())
            .map(|child| child.id());

        let id = match anchor {
            Some(anchor) => {
                let mut anchor = self.document.tree.get_mut(anchor)?;
                let id = anchor.insert_after(source.value().clone()).id();
                id
            }
            None => {
                let mut parent = self.document.tree.get_mut(parent)?;
                let id = parent.append(source.value().clone()).id();
                id
            }
        };

        let mut inserted = self.document.tree.get_mut(id)?;
        graft(&mut inserted, source);
        Some(id)
    }

    fn set_text(&mut self, selector: &Selector, text: &str) -> usize {
        let targets: Vec<NodeId> = self
            .elements(selector)
            .filter_map(|el| {
                el.children()
                    .find(|child| child.value().is_text())
                    .map(|child| child.id())
            })
            .collect();

        for id in &targets {
            if let Some(mut node) = self.document.tree.get_mut(*id) {
                if let Node::Text(current) = node.value() {
                    current.text.clear();
                    current.text.push_slice(text);
                }
            }
        }
        targets.len()
    }

    fn notify(&mut self, message: &str, duration: Duration) {
        self.notices.push(PageNotice {
            message: message.to_string(),
            duration,
        });
    }
}

impl HistoryApi for HtmlPage {
    fn push_state(&mut self, url: &str) -> Result<(), NavigationError> {
        let next = self.resolve(url)?;
        let previous = std::mem::replace(&mut self.location, next);
        self.back_stack.push(previous);
        self.forward_stack.clear();
        Ok(())
    }

    fn replace_state(&mut self, url: &str) -> Result<(), NavigationError> {
        self.location = self.resolve(url)?;
        Ok(())
    }

    fn back(&mut self) -> bool {
        let Some(previous) = self.back_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.location, previous);
        self.forward_stack.push(current);
        true
    }

    fn forward(&mut self) -> bool {
        let Some(next) = self.forward_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.location, next);
        self.back_stack.push(current);
        true
    }
}

/// Copies the children of `source` (from another tree) under `dest`.
fn graft(dest: &mut NodeMut<'_, Node>, source: NodeRef<'_, Node>) {
    for child in source.children() {
        let mut copy = dest.append(child.value().clone());
        graft(&mut copy, child);
    }
}
