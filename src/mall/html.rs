//! Plain-text extraction from the HTML fragments in ledger descriptions

use scraper::{Html, Node};

/// Elements whose text is code or styling, not content
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Parse `input` as an HTML fragment and join its trimmed text nodes
///
/// Entities are decoded by the parser; comments, scripts and styles are
/// dropped.
pub fn strip_html(input: &str) -> String {
    let fragment = Html::parse_fragment(input);

    fragment
        .root_element()
        .descendants()
        .filter(|node| {
            !node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .is_some_and(|element| RAW_TEXT_ELEMENTS.contains(&element.name()))
        })
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some(text.trim()),
            _ => None,
        })
        .filter(|piece| !piece.is_empty())
        .collect()
}
