//! Template resolution and execution.
//!
//! This module holds the rendering pipeline proper. A render call flows
//! through four stages:
//!
//! ```text
//! name ──► normalize ──► ViewLocator ──► ContextBuilder ──► TemplateRenderer ──► HtmlString
//!                            │
//!                            └── ViewEngine: get_view (direct), find_view (convention)
//! ```
//!
//! [`ShapeTemplateRenderer`] ties the stages together and decides, per call,
//! whether to bootstrap them or to hand the call to an executing view's host.
//!
//! ## Template Names
//!
//! Names are logical paths such as `widgets/card`. [`normalize`] makes them
//! absolute and applies the view extension: `/widgets/card.jinja`.
//!
//! ## Template Store
//!
//! [`JinjaViewEngine`] reads templates from a [`TemplateStore`], which merges
//! inline templates with files discovered by [`walk_template_dir`]. Inline
//! templates shadow files at the same path.
//!
//! ## Key Types
//!
//! - [`ViewLocator`]: searches engines in order, aggregating missed locations
//! - [`TemplateRenderer`]: executes a view and captures its output
//! - [`ShapeTemplateRenderer`]: the dual-mode dispatcher
//! - [`ViewEngine`] / [`View`]: the provider seam

mod dispatcher;
mod engine;
mod locator;
mod name;
pub mod registry;
mod renderer;

pub use dispatcher::{DisplayContext, ShapeTemplateRenderer};
pub use engine::{register_functions, JinjaViewEngine, View, ViewEngine, ViewResult};
pub use locator::ViewLocator;
pub use name::{normalize, TemplateName};
pub use registry::{
    walk_template_dir, RegistryError, ResolvedTemplate, TemplateFile, TemplateStore,
};
pub use renderer::{Execution, TemplateRenderer};
