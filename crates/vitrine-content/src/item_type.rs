//! The content item type exposed to API clients.
//!
//! [`ContentItemType`] declares the fields a client can query on a content
//! item. Every field but `render` reads a stored value. `render` builds the
//! item's display shape, executes it, and returns the markup as a string.

use std::fmt::Write as _;
use std::sync::Arc;

use serde_json::{json, Value};
use vitrine_render::context::RenderingEnvironment;

use crate::display::{DisplayHelper, DisplayManager};
use crate::error::{ContentError, Result};
use crate::item::ContentItem;

/// The graph type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    String,
    Boolean,
    DateTime,
    /// Markup produced by rendering the item.
    Render,
}

/// A field declared on [`ContentItemType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, description: &'static str, kind: FieldKind) -> FieldDefinition {
    FieldDefinition {
        name,
        description,
        kind,
    }
}

/// The fields every content item type declares, in declaration order.
pub const CONTENT_ITEM_FIELDS: &[FieldDefinition] = &[
    field("contentItemId", "Content item id", FieldKind::Id),
    field("contentItemVersionId", "The content item version id", FieldKind::Id),
    field("contentType", "Type of content", FieldKind::String),
    field("displayText", "The display text of the content item", FieldKind::String),
    field("published", "Is the published version", FieldKind::Boolean),
    field("latest", "Is the latest version", FieldKind::Boolean),
    field("modifiedUtc", "The date and time of modification", FieldKind::DateTime),
    field("publishedUtc", "The date and time of publication", FieldKind::DateTime),
    field("createdUtc", "The date and time of creation", FieldKind::DateTime),
    field("owner", "The owner of the content item", FieldKind::String),
    field("author", "The author of the content item", FieldKind::String),
    field("render", "The rendered markup of the content item", FieldKind::Render),
];

/// The collaborators the `render` field needs.
#[derive(Clone)]
pub struct RenderServices {
    pub display_manager: Arc<dyn DisplayManager>,
    pub display_helper: DisplayHelper,
}

impl RenderServices {
    pub fn new(display_manager: Arc<dyn DisplayManager>, display_helper: DisplayHelper) -> Self {
        Self {
            display_manager,
            display_helper,
        }
    }
}

/// A content item graph type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItemType {
    name: String,
    fields: &'static [FieldDefinition],
}

impl Default for ContentItemType {
    fn default() -> Self {
        Self::new("ContentItemType")
    }
}

impl ContentItemType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: CONTENT_ITEM_FIELDS,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns true if `item` belongs to this type.
    pub fn is_type_of(&self, item: &ContentItem) -> bool {
        item.content_type == self.name
    }

    /// Reads a stored field as JSON. Timestamps are RFC 3339 strings or null.
    ///
    /// # Errors
    ///
    /// [`ContentError::UnknownField`] for undeclared fields and
    /// [`ContentError::NotScalar`] for `render`.
    pub fn resolve_scalar(&self, field: &str, item: &ContentItem) -> Result<Value> {
        let definition = self.field(field).ok_or_else(|| ContentError::UnknownField {
            type_name: self.name.clone(),
            field: field.to_string(),
        })?;

        let value = match definition.name {
            "contentItemId" => json!(item.content_item_id),
            "contentItemVersionId" => json!(item.content_item_version_id),
            "contentType" => json!(item.content_type),
            "displayText" => json!(item.display_text),
            "published" => json!(item.published),
            "latest" => json!(item.latest),
            "modifiedUtc" => json!(item.modified_utc),
            "publishedUtc" => json!(item.published_utc),
            "createdUtc" => json!(item.created_utc),
            "owner" => json!(item.owner),
            "author" => json!(item.author),
            other => return Err(ContentError::NotScalar(other.to_string())),
        };
        Ok(value)
    }

    /// Resolves the `render` field: builds the item's display, executes it,
    /// and writes the result to a string.
    pub async fn resolve_render(
        &self,
        item: &ContentItem,
        services: &RenderServices,
        environment: RenderingEnvironment<'_>,
    ) -> Result<String> {
        let displayable = services.display_manager.build_display(item).await?;
        let content = services
            .display_helper
            .shape_execute(&displayable, environment)
            .await?;

        let mut out = String::new();
        write!(out, "{}", content)
            .map_err(|_| ContentError::display("failed to write rendered content"))?;
        tracing::debug!(
            content_item_id = %item.content_item_id,
            bytes = out.len(),
            "content item rendered"
        );
        Ok(out)
    }
}
