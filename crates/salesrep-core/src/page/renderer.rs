//! Markup to plain-text rendering.

use scraper::{Html, Node};
use tracing::debug;

/// Elements whose text content is never visible.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Render HTML markup to text, one line per text node.
///
/// Contents of script and style elements are skipped so the embedded data
/// object only ever reaches the inline extractor.
pub fn render_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut lines = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .filter_map(|a| a.value().as_element())
            .any(|e| HIDDEN_ELEMENTS.contains(&e.name()));
        if hidden {
            continue;
        }

        let text: &str = text;
        if !text.trim().is_empty() {
            lines.push(text);
        }
    }

    debug!("Rendered {} text nodes from {} bytes of markup", lines.len(), markup.len());

    lines.join("\n")
}
