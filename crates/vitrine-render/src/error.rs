//! Error types for template resolution and rendering.
//!
//! This module provides [`RenderError`], the error type for every stage of the
//! pipeline: locating a view, building its context and executing it. The
//! dispatcher performs no recovery of its own, so callers always observe the
//! variant produced at the failing stage.

use crate::template::RegistryError;

/// Error type for template resolution and rendering operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No view engine is registered, so no template can ever be located.
    ///
    /// This is distinct from [`RenderError::TemplateNotFound`]: it means the
    /// renderer is misconfigured, not that one template is missing.
    #[error(
        "no view engines are configured; at least one view engine is required to locate a view for rendering"
    )]
    NoProvidersConfigured,

    /// No view engine could locate the template.
    ///
    /// `searched_locations` holds every location reported by every engine and
    /// strategy, in the order they were attempted.
    #[error("{}", not_found_message(.name, .searched_locations))]
    TemplateNotFound {
        /// The normalized template name that was requested.
        name: String,
        /// Every location searched, across all engines.
        searched_locations: Vec<String>,
    },

    /// The template engine failed to compile or execute a template.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A view failed while executing.
    #[error("execution error: {0}")]
    Execution(String),

    /// The model could not be converted for the template.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error (e.g., reading a template from disk).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The template store rejected its configuration.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl RenderError {
    /// Creates an execution error for views that are not backed by the
    /// template engine.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Returns the searched locations carried by a not-found error.
    pub fn searched_locations(&self) -> Option<&[String]> {
        match self {
            RenderError::TemplateNotFound {
                searched_locations, ..
            } => Some(searched_locations),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Serialization(err.to_string())
    }
}

fn not_found_message(name: &str, searched_locations: &[String]) -> String {
    let mut message = format!(
        "Unable to find view '{}'. The following locations were searched:",
        name
    );
    for location in searched_locations {
        message.push('\n');
        message.push_str(location);
    }
    message
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
