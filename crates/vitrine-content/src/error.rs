//! Error types for content item resolution.

use vitrine_render::RenderError;

/// Error type for content item fields.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Rendering the display shape failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The display manager could not build a shape for the item.
    #[error("failed to build display: {0}")]
    Display(String),

    /// A shape arrived without a shape type.
    #[error("shape has no shape type")]
    UnknownShape,

    /// The field is not declared on the item type.
    #[error("unknown field '{field}' on type '{type_name}'")]
    UnknownField { type_name: String, field: String },

    /// The field is computed and has no stored value.
    #[error("field '{0}' must be resolved by rendering")]
    NotScalar(String),
}

impl ContentError {
    pub fn display(msg: impl Into<String>) -> Self {
        Self::Display(msg.into())
    }
}

/// Result type for content item operations.
pub type Result<T> = std::result::Result<T, ContentError>;
