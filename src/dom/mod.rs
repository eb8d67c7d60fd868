//! Structured-element capability interface
//!
//! Extraction only needs attribute, text and child lookups on an element,
//! so every extractor is generic over [`DomNode`]. The `scraper`-backed
//! implementation lives in [`html`]; the structural selectors for the X page
//! live in [`selectors`].

pub mod html;
pub mod selectors;

pub use html::PostSnapshot;

/// One child of an element, in document order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChildNode<E> {
    /// A text node
    Text(String),
    /// An element node
    Element(E),
}

/// Read-only access to an element of a rendered document
///
/// Selector arguments are CSS selectors. An unparsable selector matches
/// nothing.
pub trait DomNode: Clone {
    /// Lowercase tag name
    fn tag_name(&self) -> &str;

    /// Attribute value
    fn attr(&self, name: &str) -> Option<&str>;

    /// Concatenated text of all descendant text nodes
    fn text_content(&self) -> String;

    /// Direct children (text and elements) in document order
    fn child_nodes(&self) -> Vec<ChildNode<Self>>;

    /// Descendants (excluding `self`) matching `selector`, in document order
    fn select_all(&self, selector: &str) -> Vec<Self>;

    /// First descendant matching `selector`
    fn select_first(&self, selector: &str) -> Option<Self> {
        self.select_all(selector).into_iter().next()
    }

    /// `self` or the nearest ancestor matching `selector`
    fn closest(&self, selector: &str) -> Option<Self>;

    /// Whether `self` matches `selector`
    fn matches(&self, selector: &str) -> bool;

    /// Non-empty attribute value
    fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.is_empty())
    }
}
