//! # Vitrine Render - Shape Template Resolution and Rendering
//!
//! `vitrine-render` turns a logical template name and a data model into
//! markup. It locates the template across an ordered set of view engines,
//! builds an isolated context for it, executes it and captures the output.
//!
//! Rendering works both inside an executing view (the ambient context is
//! copied and the host renders the partial) and from code with no view at
//! all, such as background jobs or API resolvers.
//!
//! ## Core Concepts
//!
//! - [`TemplateName`](template::TemplateName): a normalized, absolute template path
//! - [`ViewLocator`](template::ViewLocator): ordered search across view engines
//! - [`ViewContext`](context::ViewContext): the state a view executes against
//! - [`RenderingEnvironment`](context::RenderingEnvironment): ambient or standalone
//! - [`ShapeTemplateRenderer`](template::ShapeTemplateRenderer): the entry point
//! - [`HtmlString`]: markup that must not be escaped again
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use vitrine_render::template::{JinjaViewEngine, ShapeTemplateRenderer, TemplateStore};
//! use vitrine_render::ViewOptions;
//!
//! let options = ViewOptions::default();
//! let mut store = TemplateStore::new(options.template_file_extensions());
//! store.add_inline("views/shared/greeting.jinja", "Hello, {{ name }}!");
//!
//! let engine = JinjaViewEngine::new(store, &options);
//! let renderer = ShapeTemplateRenderer::with_engine(options, Arc::new(engine));
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let output = runtime
//!     .block_on(renderer.render_view_to_string("greeting", json!({"name": "World"})))
//!     .unwrap();
//! assert_eq!(output, "Hello, World!");
//! ```
//!
//! ## Configuration
//!
//! [`ViewOptions`] can be built in code or loaded from YAML with
//! [`ViewOptions::from_file`].

pub mod context;
mod error;
pub mod host;
mod markup;
pub mod options;
pub mod prelude;
pub mod template;

pub use error::{RenderError, Result};
pub use markup::HtmlString;
pub use options::{ConfigError, ViewOptions};
