//! Body text reconstruction
//!
//! The rendered text container interleaves text nodes, spans, links whose
//! visible label is a truncated URL, and emoji drawn as images, nested to
//! any depth. The text is rebuilt in document order with links replaced by
//! their resolved target and images by their alt text. Nothing is trimmed
//! or reordered.

use super::ExtractContext;
use crate::dom::{ChildNode, DomNode, selectors};

/// Rebuild the text of `container`
pub fn reconstruct<E: DomNode>(container: &E, ctx: &ExtractContext) -> String {
    let mut text = String::new();
    for child in container.child_nodes() {
        match child {
            ChildNode::Text(t) => text.push_str(&t),
            ChildNode::Element(element) => match element.tag_name() {
                "a" => match element.non_empty_attr("href").and_then(|h| ctx.absolute_url(h)) {
                    Some(url) => text.push_str(&url),
                    None => text.push_str(&element.text_content()),
                },
                "img" => text.push_str(element.attr("alt").unwrap_or_default()),
                _ => text.push_str(&reconstruct(&element, ctx)),
            },
        }
    }
    text
}

/// Body text of a post, `None` when it has no text container
pub fn extract_text<E: DomNode>(root: &E, ctx: &ExtractContext) -> Option<String> {
    match root.select_first(selectors::TEXT_CONTAINER) {
        Some(container) => Some(reconstruct(&container, ctx)),
        None => {
            tracing::debug!("No text container, text left empty");
            None
        }
    }
}
