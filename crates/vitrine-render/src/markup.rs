//! Pre-escaped markup.

use std::fmt;

/// Rendered markup that must not be escaped again.
///
/// Everything the dispatcher returns is wrapped in this type. Embedding it in
/// another template through [`to_value`](Self::to_value) marks it safe, so
/// auto-escaping leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HtmlString(String);

impl HtmlString {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts to a template value that bypasses auto-escaping.
    pub fn to_value(&self) -> minijinja::Value {
        minijinja::Value::from_safe_string(self.0.clone())
    }

    /// Writes the markup verbatim.
    pub fn write_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str(&self.0)
    }
}

impl fmt::Display for HtmlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for HtmlString {
    fn from(markup: String) -> Self {
        Self(markup)
    }
}

impl From<HtmlString> for String {
    fn from(markup: HtmlString) -> Self {
        markup.0
    }
}
