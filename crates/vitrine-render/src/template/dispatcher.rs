//! Dual-mode render dispatch.
//!
//! [`ShapeTemplateRenderer`] is the entry point for rendering a named
//! template against a model. Each call picks one of two paths, once, from
//! its [`RenderingEnvironment`]:
//!
//! - **Ambient**: a view is already executing. The ambient context is copied
//!   with the requested field prefix and handed to the [`RenderHost`], which
//!   resolves the template with its own engines.
//! - **Standalone**: nothing is executing. A synthetic action is built, the
//!   template is located with the [`ViewLocator`], a fresh context is built
//!   and the view is executed by the [`TemplateRenderer`].
//!
//! Both paths return [`HtmlString`]. Failures from any stage surface
//! unchanged.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use vitrine_render::context::RenderingEnvironment;
//! use vitrine_render::template::{JinjaViewEngine, ShapeTemplateRenderer, TemplateStore};
//! use vitrine_render::ViewOptions;
//!
//! # tokio_test_block(async {
//! let options = ViewOptions::default();
//! let store = TemplateStore::from_embedded_entries(
//!     options.template_file_extensions(),
//!     &[("/widgets/card.jinja", "<h2>{{ title }}</h2>")],
//! );
//! let engine = JinjaViewEngine::new(store, &options);
//! let renderer = ShapeTemplateRenderer::with_engine(options, Arc::new(engine));
//!
//! let html = renderer
//!     .render_template(RenderingEnvironment::Standalone, "widgets/card", json!({"title": "Hi"}), None)
//!     .await
//!     .unwrap();
//! assert_eq!(html.as_str(), "<h2>Hi</h2>");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::engine::{JinjaViewEngine, ViewEngine};
use super::locator::ViewLocator;
use super::name::TemplateName;
use super::renderer::TemplateRenderer;
use crate::context::{ActionContext, ContextBuilder, RenderRequest, RenderingEnvironment};
use crate::error::Result;
use crate::host::{BindingHost, HtmlHelper, RenderHost};
use crate::markup::HtmlString;
use crate::options::ViewOptions;

/// The value and field prefix a shape is displayed with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayContext {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_field_prefix: Option<String>,
}

impl DisplayContext {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            html_field_prefix: None,
        }
    }

    pub fn with_field_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.html_field_prefix = Some(prefix.into());
        self
    }
}

/// Renders named templates against models, inside or outside an executing
/// view.
pub struct ShapeTemplateRenderer {
    options: ViewOptions,
    locator: ViewLocator,
    builder: ContextBuilder,
    renderer: TemplateRenderer,
    host: Arc<dyn RenderHost>,
}

impl ShapeTemplateRenderer {
    /// Assembles a renderer from its collaborators.
    pub fn new(
        options: ViewOptions,
        locator: ViewLocator,
        builder: ContextBuilder,
        renderer: TemplateRenderer,
        host: Arc<dyn RenderHost>,
    ) -> Self {
        Self {
            options,
            locator,
            builder,
            renderer,
            host,
        }
    }

    /// Builds a renderer whose locator and host share a single engine.
    pub fn with_engine(options: ViewOptions, engine: Arc<dyn ViewEngine>) -> Self {
        let locator = ViewLocator::new().with_engine(engine);
        let host = Arc::new(BindingHost::new(HtmlHelper::new(locator.clone())));
        Self::new(
            options,
            locator,
            ContextBuilder::new(),
            TemplateRenderer::new(),
            host,
        )
    }

    /// Builds a renderer over a [`JinjaViewEngine`] loaded from
    /// `options.template_dirs`.
    pub fn from_options(options: ViewOptions) -> Result<Self> {
        let engine = JinjaViewEngine::from_options(&options)?;
        Ok(Self::with_engine(options, Arc::new(engine)))
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn locator(&self) -> &ViewLocator {
        &self.locator
    }

    /// Recognized template file extensions, the view extension first.
    pub fn template_file_extensions(&self) -> Vec<String> {
        self.options.template_file_extensions()
    }

    /// Normalizes a relative template path with the view extension.
    pub fn template_name(&self, relative_path: &str) -> TemplateName {
        TemplateName::new(relative_path, &self.options.view_extension)
    }

    /// Renders the template at `relative_path` for a display context.
    pub async fn render(
        &self,
        environment: RenderingEnvironment<'_>,
        relative_path: &str,
        display: &DisplayContext,
    ) -> Result<HtmlString> {
        self.render_template(
            environment,
            relative_path,
            display.value.clone(),
            display.html_field_prefix.as_deref(),
        )
        .await
    }

    /// Renders the template called `name` with `model`.
    ///
    /// `field_prefix` namespaces form fields in the output; `None` renders
    /// without a prefix.
    pub async fn render_template(
        &self,
        environment: RenderingEnvironment<'_>,
        name: &str,
        model: Value,
        field_prefix: Option<&str>,
    ) -> Result<HtmlString> {
        let request = RenderRequest::new(
            self.template_name(name),
            model,
            field_prefix.map(str::to_string),
        );
        self.dispatch(environment, request).await
    }

    /// Dispatches a prepared request down the path its environment selects.
    pub async fn dispatch(
        &self,
        environment: RenderingEnvironment<'_>,
        request: RenderRequest,
    ) -> Result<HtmlString> {
        tracing::debug!(
            template = %request.name(),
            path = environment.label(),
            "dispatching render"
        );

        match environment.ambient() {
            Some(ambient) => {
                let context = self.builder.build(Some(ambient), &request);
                self.host
                    .render_partial(context, request.name(), request.model())
                    .await
            }
            None => {
                let action = ActionContext::synthetic();
                let view = self.locator.locate(&action, request.name())?;
                let mut context = self.builder.build(None, &request);
                context.action = action;
                let output = self.renderer.render(&mut context, view).await?;
                tracing::debug!(
                    template = %request.name(),
                    bytes = output.len(),
                    "standalone render complete"
                );
                Ok(HtmlString::new(output))
            }
        }
    }

    /// Renders `name` outside any executing view and returns the raw string.
    pub async fn render_view_to_string(&self, name: &str, model: Value) -> Result<String> {
        self.render_template(RenderingEnvironment::Standalone, name, model, None)
            .await
            .map(HtmlString::into_string)
    }
}

impl fmt::Debug for ShapeTemplateRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeTemplateRenderer")
            .field("options", &self.options)
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}
