//! Report page input.

mod renderer;

pub use renderer::render_text;

/// A report page held in memory: the raw markup and its plain-text rendering.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Raw markup, searched for the embedded data object.
    pub markup: String,
    /// Plain-text rendering, searched for labels and sections.
    pub text: String,
}

impl Page {
    /// Create a page from markup and an already rendered text.
    pub fn new(markup: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            text: text.into(),
        }
    }

    /// Create a page from HTML markup, rendering its visible text.
    pub fn from_markup(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let text = render_text(&markup);
        Self::new(markup, text)
    }

    /// Create a page from plain text. The text doubles as the markup.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    /// Non-empty, trimmed lines of the text rendering.
    pub fn lines(&self) -> Vec<&str> {
        self.text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }
}
