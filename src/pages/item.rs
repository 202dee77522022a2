//! Browsable items and the card template's two input classes.
//!
//! Card rendering mixes two escaping policies: plain text that must be
//! HTML-escaped at fill time, and expressions the provider has already
//! serialized into a safe form (JSON strings, handler snippets) that go
//! into the template verbatim. [`PreformattedExpression`] marks the second
//! class at the type level so the two can never be conflated.

use std::path::PathBuf;

/// An expression already serialized into template-safe form.
///
/// Inserted into the card template without further escaping. Constructed
/// either from a JSON-encoded string ([`PreformattedExpression::json_str`])
/// or from a snippet the caller vouches for ([`PreformattedExpression::raw`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreformattedExpression(String);

impl PreformattedExpression {
    /// JSON-encode plain text into a safe string expression.
    pub fn json_str(text: &str) -> Self {
        // serializing a bare string cannot fail
        Self(serde_json::to_string(text).unwrap_or_default())
    }

    /// Wrap an already-safe snippet verbatim.
    pub fn raw(expression: String) -> Self {
        Self(expression)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One browsable asset, produced transiently by a page's listing
/// operation. Not persisted.
#[derive(Debug, Clone)]
pub struct Item {
    /// Display name. Pre-formed by the provider; inserted as-is.
    pub name: String,

    /// Thumbnail URL (already routed through `link_preview`), if a
    /// preview image exists on disk.
    pub preview: Option<String>,

    /// Optional free-text description, HTML-escaped at render time.
    pub description: Option<String>,

    /// Prompt expression a card click inserts. Already JSON-encoded.
    pub prompt: PreformattedExpression,

    /// Where a saved preview for this asset is written.
    pub local_preview: PathBuf,

    /// Relative-path search term for the client-side filter box.
    pub search_term: String,

    /// Full replacement for the card's onclick attribute value, when the
    /// provider needs non-default click behavior.
    pub onclick: Option<PreformattedExpression>,
}
