//! `scraper`-backed [`DomNode`] implementation and owned post snapshots

use super::{ChildNode, DomNode};
use scraper::{ElementRef, Html, Node, Selector};

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!(selector, error = %e, "Unparsable selector, matching nothing");
            None
        }
    }
}

impl<'a> DomNode for ElementRef<'a> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn child_nodes(&self) -> Vec<ChildNode<Self>> {
        self.children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(ChildNode::Text(text.to_string())),
                Node::Element(_) => ElementRef::wrap(child).map(ChildNode::Element),
                _ => None,
            })
            .collect()
    }

    fn select_all(&self, selector: &str) -> Vec<Self> {
        match parse_selector(selector) {
            Some(parsed) => self.select(&parsed).collect(),
            None => Vec::new(),
        }
    }

    fn closest(&self, selector: &str) -> Option<Self> {
        let parsed = parse_selector(selector)?;
        if parsed.matches(self) {
            return Some(*self);
        }
        self.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| parsed.matches(ancestor))
    }

    fn matches(&self, selector: &str) -> bool {
        parse_selector(selector).is_some_and(|parsed| parsed.matches(self))
    }
}

/// Owned copy of one post root, detached from the page it was rendered in
///
/// Extraction runs against a snapshot so the page can keep changing after
/// the capture was requested.
#[derive(Clone, Debug)]
pub struct PostSnapshot {
    html: Html,
}

impl PostSnapshot {
    /// Snapshot of serialized post markup
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_fragment(markup),
        }
    }

    /// Snapshot of an element in a live document
    pub fn from_element(element: ElementRef<'_>) -> Self {
        Self::parse(&element.html())
    }

    /// The post root element
    ///
    /// `None` only when the snapshot was built from markup without elements.
    pub fn root(&self) -> Option<ElementRef<'_>> {
        self.html
            .root_element()
            .children()
            .find_map(ElementRef::wrap)
    }

    /// Copy of this snapshot with `descendant` and its subtree removed
    ///
    /// `descendant` must come from this snapshot; an element of another
    /// document leaves the copy unchanged.
    pub fn without(&self, descendant: ElementRef<'_>) -> Self {
        let mut html = self.html.clone();
        if !std::ptr::eq(descendant.tree(), &self.html.tree) {
            tracing::warn!("Element to prune belongs to another document, nothing removed");
            return Self { html };
        }
        if let Some(mut node) = html.tree.get_mut(descendant.id()) {
            node.detach();
        }
        Self { html }
    }

    /// Serialized markup of the root
    pub fn markup(&self) -> String {
        self.root().map(|root| root.html()).unwrap_or_default()
    }
}
