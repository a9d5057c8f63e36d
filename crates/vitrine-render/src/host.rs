//! The outer rendering host.
//!
//! When a render call happens inside a view that is already executing, the
//! dispatcher hands the work to a [`RenderHost`] instead of bootstrapping a
//! new pipeline. Hosts usually come from a helper factory that must first be
//! bound to the current [`ViewContext`]:
//!
//! - [`ContextBindable`]: a factory producing a context-bound helper
//! - [`PartialRenderer`]: the bound helper, able to render partials
//! - [`BindingHost`]: adapts any bindable factory into a [`RenderHost`]
//!
//! [`HtmlHelper`] is the stock factory. Its bound form resolves partials
//! through its own view engines, so the roots it searches may differ from
//! the dispatcher's locator.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::context::ViewContext;
use crate::error::Result;
use crate::markup::HtmlString;
use crate::template::{TemplateName, TemplateRenderer, ViewLocator};

/// Renders partials on behalf of an executing view.
#[async_trait]
pub trait RenderHost: Send + Sync {
    /// Renders `name` with `model` inside `context`.
    ///
    /// `context` is already a copy of the ambient context; the host owns it.
    async fn render_partial(
        &self,
        context: ViewContext,
        name: &TemplateName,
        model: &Value,
    ) -> Result<HtmlString>;
}

/// A helper factory that must be bound to a context before use.
pub trait ContextBindable: Send + Sync {
    type Bound: PartialRenderer;

    fn bind(&self, context: ViewContext) -> Self::Bound;
}

/// A context-bound helper that renders partials.
#[async_trait]
pub trait PartialRenderer: Send + Sync {
    async fn partial(&self, name: &TemplateName, model: &Value) -> Result<HtmlString>;
}

/// Adapts a [`ContextBindable`] factory into a [`RenderHost`].
///
/// Each call binds a fresh helper to the supplied context.
#[derive(Debug, Clone)]
pub struct BindingHost<B> {
    factory: B,
}

impl<B: ContextBindable> BindingHost<B> {
    pub fn new(factory: B) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &B {
        &self.factory
    }
}

#[async_trait]
impl<B: ContextBindable> RenderHost for BindingHost<B> {
    async fn render_partial(
        &self,
        context: ViewContext,
        name: &TemplateName,
        model: &Value,
    ) -> Result<HtmlString> {
        let helper = self.factory.bind(context);
        helper.partial(name, model).await
    }
}

/// The stock helper factory.
#[derive(Debug, Clone, Default)]
pub struct HtmlHelper {
    locator: ViewLocator,
    renderer: TemplateRenderer,
}

impl HtmlHelper {
    pub fn new(locator: ViewLocator) -> Self {
        Self {
            locator,
            renderer: TemplateRenderer::new(),
        }
    }

    pub fn locator(&self) -> &ViewLocator {
        &self.locator
    }
}

impl ContextBindable for HtmlHelper {
    type Bound = BoundHtmlHelper;

    fn bind(&self, context: ViewContext) -> BoundHtmlHelper {
        BoundHtmlHelper {
            context,
            locator: self.locator.clone(),
            renderer: self.renderer,
        }
    }
}

/// An [`HtmlHelper`] bound to a view context.
pub struct BoundHtmlHelper {
    context: ViewContext,
    locator: ViewLocator,
    renderer: TemplateRenderer,
}

impl BoundHtmlHelper {
    pub fn context(&self) -> &ViewContext {
        &self.context
    }
}

#[async_trait]
impl PartialRenderer for BoundHtmlHelper {
    /// Resolves `name` with the helper's own engines and renders it into a
    /// child of the bound context.
    ///
    /// The child inherits the field prefix, route values and view data, and
    /// carries `model`.
    async fn partial(&self, name: &TemplateName, model: &Value) -> Result<HtmlString> {
        let view = self.locator.locate(&self.context.action, name)?;

        let mut child = self
            .context
            .with_field_prefix(self.context.html_field_prefix().to_string());
        child.view_data.model = model.clone();

        let output = self.renderer.render(&mut child, view).await?;
        tracing::debug!(template = %name, bytes = output.len(), "partial rendered");
        Ok(HtmlString::new(output))
    }
}

impl fmt::Debug for BoundHtmlHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundHtmlHelper")
            .field("context", &self.context)
            .field("locator", &self.locator)
            .finish()
    }
}
