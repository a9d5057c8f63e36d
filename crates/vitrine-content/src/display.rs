//! Display shapes and their execution.
//!
//! A [`DisplayManager`] turns a content item into a [`Displayable`]: usually a
//! [`Shape`] naming the template that should render it, plus more specific
//! alternates. [`DisplayHelper`] maps the shape to a template name and
//! renders it through the [`ShapeTemplateRenderer`].
//!
//! Shape types map to template names with two substitutions:
//!
//! | Shape type | Template name |
//! |------------|---------------|
//! | `Content` | `Content` |
//! | `Content_Summary` | `Content.Summary` |
//! | `Content__Article` | `Content-Article` |
//! | `Content_Summary__Article` | `Content.Summary-Article` |

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use vitrine_render::context::{ActionContext, RenderingEnvironment};
use vitrine_render::template::{DisplayContext, ShapeTemplateRenderer};
use vitrine_render::HtmlString;

use crate::error::{ContentError, Result};
use crate::item::ContentItem;

/// A renderable description of an item: a shape type, its alternates and
/// the model the template receives.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub shape_type: String,
    /// Alternate shape types, least specific first.
    pub alternates: Vec<String>,
    pub html_field_prefix: Option<String>,
    pub model: Value,
}

impl Shape {
    pub fn new(shape_type: impl Into<String>, model: Value) -> Self {
        Self {
            shape_type: shape_type.into(),
            alternates: Vec::new(),
            html_field_prefix: None,
            model,
        }
    }

    pub fn with_alternate(mut self, alternate: impl Into<String>) -> Self {
        self.alternates.push(alternate.into());
        self
    }

    pub fn with_field_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.html_field_prefix = Some(prefix.into());
        self
    }

    /// Candidate shape types, most specific first, ending with the shape type.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.alternates
            .iter()
            .rev()
            .map(String::as_str)
            .chain(std::iter::once(self.shape_type.as_str()))
    }
}

/// What a display manager produces for an item.
#[derive(Debug, Clone, PartialEq)]
pub enum Displayable {
    Shape(Shape),
    /// Plain text, escaped when written.
    Text(String),
}

/// Builds the display for a content item.
#[async_trait]
pub trait DisplayManager: Send + Sync {
    async fn build_display(&self, item: &ContentItem) -> Result<Displayable>;
}

/// A display manager building the standard `Content` shape.
///
/// For display type `Detail` and content type `Article` the alternates are
/// `Content_Detail`, `Content__Article` and `Content_Detail__Article`. The
/// model is the serialized item.
#[derive(Debug, Clone)]
pub struct ContentDisplayManager {
    display_type: String,
}

impl ContentDisplayManager {
    pub fn new(display_type: impl Into<String>) -> Self {
        Self {
            display_type: display_type.into(),
        }
    }

    pub fn display_type(&self) -> &str {
        &self.display_type
    }
}

impl Default for ContentDisplayManager {
    fn default() -> Self {
        Self::new("Detail")
    }
}

#[async_trait]
impl DisplayManager for ContentDisplayManager {
    async fn build_display(&self, item: &ContentItem) -> Result<Displayable> {
        let model = serde_json::to_value(item).map_err(|e| ContentError::display(e.to_string()))?;
        let display_type = &self.display_type;
        let content_type = &item.content_type;

        let mut shape = Shape::new("Content", model);
        if !display_type.is_empty() {
            shape = shape.with_alternate(format!("Content_{}", display_type));
        }
        if !content_type.is_empty() {
            shape = shape.with_alternate(format!("Content__{}", content_type));
            if !display_type.is_empty() {
                shape =
                    shape.with_alternate(format!("Content_{}__{}", display_type, content_type));
            }
        }
        Ok(Displayable::Shape(shape))
    }
}

/// The output of executing a displayable.
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlContent {
    Markup(HtmlString),
    Text(String),
}

impl HtmlContent {
    /// Writes markup verbatim and text HTML-escaped.
    pub fn write_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        match self {
            HtmlContent::Markup(markup) => markup.write_to(out),
            HtmlContent::Text(text) => out.write_str(&html_escape::encode_safe(text)),
        }
    }
}

impl fmt::Display for HtmlContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Maps a shape type to its template name.
pub fn shape_template_name(shape_type: &str) -> String {
    shape_type.replace("__", "-").replace('_', ".")
}

/// Executes displayables through a [`ShapeTemplateRenderer`].
#[derive(Debug, Clone)]
pub struct DisplayHelper {
    renderer: Arc<ShapeTemplateRenderer>,
}

impl DisplayHelper {
    pub fn new(renderer: Arc<ShapeTemplateRenderer>) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &ShapeTemplateRenderer {
        &self.renderer
    }

    /// Template path for a shape type, carrying the view extension.
    ///
    /// The extension is appended rather than substituted, so the dots that
    /// shape names map to survive normalization.
    pub fn template_path(&self, shape_type: &str) -> String {
        let name = shape_template_name(shape_type);
        let ext = self.renderer.options().view_extension.trim_start_matches('.');
        if ext.is_empty() {
            name
        } else {
            format!("{}.{}", name, ext)
        }
    }

    /// Picks the template for `shape`: the most specific candidate that
    /// exists, or the shape type's own template.
    pub fn resolve_template(&self, shape: &Shape) -> String {
        let action = ActionContext::synthetic();
        let locator = self.renderer.locator();
        shape
            .candidates()
            .map(|candidate| self.template_path(candidate))
            .find(|path| locator.exists(&action, &self.renderer.template_name(path)))
            .unwrap_or_else(|| self.template_path(&shape.shape_type))
    }

    /// Renders a displayable.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::UnknownShape`] for a shape without a type, and
    /// any render error unchanged.
    pub async fn shape_execute(
        &self,
        displayable: &Displayable,
        environment: RenderingEnvironment<'_>,
    ) -> Result<HtmlContent> {
        let shape = match displayable {
            Displayable::Text(text) => return Ok(HtmlContent::Text(text.clone())),
            Displayable::Shape(shape) => shape,
        };
        if shape.shape_type.is_empty() {
            return Err(ContentError::UnknownShape);
        }

        let template = self.resolve_template(shape);
        tracing::debug!(shape = %shape.shape_type, template = %template, "executing shape");

        let display = DisplayContext {
            value: shape.model.clone(),
            html_field_prefix: shape.html_field_prefix.clone(),
        };
        let markup = self.renderer.render(environment, &template, &display).await?;
        Ok(HtmlContent::Markup(markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_template_name() {
        assert_eq!(shape_template_name("Content"), "Content");
        assert_eq!(shape_template_name("Content_Summary"), "Content.Summary");
        assert_eq!(shape_template_name("Content__Article"), "Content-Article");
        assert_eq!(
            shape_template_name("Content_Summary__Article"),
            "Content.Summary-Article"
        );
    }

    #[test]
    fn test_candidates_most_specific_first() {
        let shape = Shape::new("Content", json!({}))
            .with_alternate("Content_Detail")
            .with_alternate("Content__Article");
        let candidates: Vec<&str> = shape.candidates().collect();
        assert_eq!(candidates, ["Content__Article", "Content_Detail", "Content"]);
    }

    #[test]
    fn test_text_is_escaped() {
        let content = HtmlContent::Text("<b>Tom & Jerry".to_string());
        assert_eq!(content.to_string(), "&lt;b&gt;Tom &amp; Jerry");
    }

    #[test]
    fn test_markup_is_verbatim() {
        let content = HtmlContent::Markup(HtmlString::new("<b>x</b>"));
        assert_eq!(content.to_string(), "<b>x</b>");
    }

    #[tokio::test]
    async fn test_content_display_manager_alternates() {
        let item = ContentItem::new("a1", "Article");
        let displayable = ContentDisplayManager::default()
            .build_display(&item)
            .await
            .unwrap();

        match displayable {
            Displayable::Shape(shape) => {
                assert_eq!(shape.shape_type, "Content");
                assert_eq!(
                    shape.alternates,
                    ["Content_Detail", "Content__Article", "Content_Detail__Article"]
                );
                assert_eq!(shape.model["contentItemId"], "a1");
            }
            other => panic!("expected shape, got {:?}", other),
        }
    }
}
