//! Convenient imports for rendering.
//!
//! ```rust
//! use vitrine_render::prelude::*;
//!
//! let options = ViewOptions::default();
//! let store = TemplateStore::new(options.template_file_extensions());
//! let _renderer = ShapeTemplateRenderer::with_engine(
//!     options.clone(),
//!     std::sync::Arc::new(JinjaViewEngine::new(store, &options)),
//! );
//! ```

pub use crate::context::{RenderingEnvironment, ViewContext};
pub use crate::error::{RenderError, Result};
pub use crate::host::{ContextBindable, HtmlHelper, PartialRenderer, RenderHost};
pub use crate::markup::HtmlString;
pub use crate::options::ViewOptions;
pub use crate::template::{
    DisplayContext, JinjaViewEngine, ShapeTemplateRenderer, TemplateName, TemplateStore,
    ViewEngine, ViewLocator,
};
