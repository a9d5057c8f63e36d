//! # Vitrine Content - Content Item Types
//!
//! Exposes content items to API clients as a typed field table, including a
//! `render` field that returns the item's server-rendered markup.
//!
//! Rendering goes through [`vitrine_render`]: a [`DisplayManager`] builds the
//! item's [`Shape`], the [`DisplayHelper`] picks the most specific template
//! for it and the dispatcher renders it, inside an executing view or from
//! scratch.
//!
//! ```rust
//! use vitrine_content::{ContentItem, ContentItemType};
//!
//! let article = ContentItemType::new("Article");
//! let item = ContentItem::new("4qk8", "Article").with_display_text("Launch notes");
//!
//! assert!(article.is_type_of(&item));
//! assert_eq!(article.resolve_scalar("displayText", &item).unwrap(), "Launch notes");
//! ```

pub mod display;
mod error;
mod item;
mod item_type;

pub use display::{
    shape_template_name, ContentDisplayManager, DisplayHelper, DisplayManager, Displayable,
    HtmlContent, Shape,
};
pub use error::{ContentError, Result};
pub use item::ContentItem;
pub use item_type::{
    ContentItemType, FieldDefinition, FieldKind, RenderServices, CONTENT_ITEM_FIELDS,
};
