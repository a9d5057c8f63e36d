//! View contexts and the render context builder.
//!
//! A [`ViewContext`] is the state a view executes against: the model, the
//! field prefix, route values, validation state, scratch data, and the output
//! buffer the view writes into. Every render owns its context exclusively.
//!
//! # Ambient and standalone rendering
//!
//! When a render call happens inside an outer rendering pipeline, that
//! pipeline's context is the *ambient* context. It belongs to the caller; the
//! renderer may read and clone it but never mutate it. Outside of any pipeline
//! (background jobs, API resolvers) there is no ambient context and a fresh
//! one is synthesized.
//!
//! [`RenderingEnvironment`] records which case applies, once, at call entry:
//!
//! ```rust
//! use vitrine_render::context::{RenderingEnvironment, ViewContext, ActionContext};
//!
//! let detached = ViewContext::standalone(ActionContext::synthetic(), serde_json::Value::Null);
//!
//! // A context with no executing view is not a rendering pipeline.
//! assert!(RenderingEnvironment::detect(Some(&detached)).is_standalone());
//! assert!(RenderingEnvironment::detect(None).is_standalone());
//! ```
//!
//! [`ContextBuilder`] turns an environment and a [`RenderRequest`] into the
//! context a single render will own.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use serde_json::Value;

use crate::template::{TemplateName, View};

/// Route values of the request being served, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteData {
    pub values: BTreeMap<String, String>,
}

impl RouteData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route value.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Where an action is executing.
///
/// A synthetic action context has no request behind it; it is what the
/// standalone render path creates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionContext {
    pub route_data: RouteData,
    /// Path of the request being served; `None` for synthetic contexts.
    pub request_path: Option<String>,
}

impl ActionContext {
    /// Creates an action context with no request and empty route data.
    pub fn synthetic() -> Self {
        Self::default()
    }

    /// Creates an action context for a request.
    pub fn for_request(path: impl Into<String>, route_data: RouteData) -> Self {
        Self {
            route_data,
            request_path: Some(path.into()),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.request_path.is_none()
    }
}

/// Validation state: error messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelState {
    errors: BTreeMap<String, Vec<String>>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }
}

/// Metadata about the template being rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateInfo {
    /// Prefix applied to form field names rendered by the template.
    pub html_field_prefix: String,
}

impl TemplateInfo {
    /// Returns the fully qualified field name for `name` under this prefix.
    pub fn full_field_name(&self, name: &str) -> String {
        full_field_name(&self.html_field_prefix, name)
    }
}

/// Joins a field prefix and a field name.
///
/// ```rust
/// use vitrine_render::context::full_field_name;
///
/// assert_eq!(full_field_name("", "Title"), "Title");
/// assert_eq!(full_field_name("Part", ""), "Part");
/// assert_eq!(full_field_name("Part", "Title"), "Part.Title");
/// assert_eq!(full_field_name("Part.", "Title"), "Part.Title");
/// assert_eq!(full_field_name("Items", "[0]"), "Items[0]");
/// ```
pub fn full_field_name(prefix: &str, name: &str) -> String {
    if name.is_empty() {
        return prefix.to_string();
    }
    if prefix.is_empty() {
        return name.to_string();
    }
    if name.starts_with('[') || prefix.ends_with('.') {
        format!("{}{}", prefix, name)
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// The model and view-scoped state handed to a template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewData {
    /// The model being rendered. Its structure is template-specific.
    pub model: Value,
    pub template_info: TemplateInfo,
    pub model_state: ModelState,
    /// Additional values shared with the template.
    pub values: BTreeMap<String, Value>,
}

impl ViewData {
    /// Creates view data for a model with empty state.
    pub fn new(model: Value) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }
}

/// Data that survives a single request, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TempData {
    pub values: BTreeMap<String, Value>,
}

/// Write-only buffer a view renders into.
///
/// Implements both [`io::Write`] (for the template engine) and
/// [`fmt::Write`].
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Appends a string.
    pub fn push_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Takes the buffered output, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        let bytes = std::mem::take(&mut self.bytes);
        match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

impl io::Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Write for OutputBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

/// The state a view executes against.
#[derive(Clone)]
pub struct ViewContext {
    pub action: ActionContext,
    /// The view currently executing in this context, if any.
    pub view: Option<Arc<dyn View>>,
    pub view_data: ViewData,
    pub temp_data: TempData,
    pub output: OutputBuffer,
}

impl ViewContext {
    /// Synthesizes a context from scratch: empty route values, empty
    /// validation state, no executing view, fresh output.
    pub fn standalone(action: ActionContext, model: Value) -> Self {
        Self {
            action,
            view: None,
            view_data: ViewData::new(model),
            temp_data: TempData::default(),
            output: OutputBuffer::new(),
        }
    }

    /// Returns the current field prefix.
    pub fn html_field_prefix(&self) -> &str {
        &self.view_data.template_info.html_field_prefix
    }

    /// Returns a copy of this context carrying a different field prefix.
    ///
    /// The copy shares the executing view and copies route values and view
    /// data; it starts with an empty output buffer. `self` is not modified.
    pub fn with_field_prefix(&self, prefix: impl Into<String>) -> Self {
        let mut copy = Self {
            action: self.action.clone(),
            view: self.view.clone(),
            view_data: self.view_data.clone(),
            temp_data: self.temp_data.clone(),
            output: OutputBuffer::new(),
        };
        copy.view_data.template_info.html_field_prefix = prefix.into();
        copy
    }

    /// Path of the executing view, if any.
    pub fn view_path(&self) -> Option<&str> {
        self.view.as_ref().map(|v| v.path())
    }

    /// Builds the variables exposed to a template.
    ///
    /// Top-level fields of an object model are exposed directly and take
    /// precedence over the reserved names `model`, `route_values` and
    /// `view_data`. `html_field_prefix` always holds the context's prefix.
    pub fn template_globals(&self) -> BTreeMap<String, minijinja::Value> {
        let mut globals = BTreeMap::new();
        globals.insert(
            "model".to_string(),
            minijinja::Value::from_serialize(&self.view_data.model),
        );
        globals.insert(
            "route_values".to_string(),
            minijinja::Value::from_serialize(&self.action.route_data.values),
        );
        globals.insert(
            "view_data".to_string(),
            minijinja::Value::from_serialize(&self.view_data.values),
        );

        if let Value::Object(map) = &self.view_data.model {
            for (key, value) in map {
                globals.insert(key.clone(), minijinja::Value::from_serialize(value));
            }
        }
        // `field_name` reads this; a model key must not redirect it.
        globals.insert(
            "html_field_prefix".to_string(),
            minijinja::Value::from(self.html_field_prefix()),
        );
        globals
    }
}

impl fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewContext")
            .field("action", &self.action)
            .field("view", &self.view_path())
            .field("view_data", &self.view_data)
            .field("temp_data", &self.temp_data)
            .field("output_len", &self.output.len())
            .finish()
    }
}

/// Where a render call is happening, decided once at call entry.
#[derive(Debug, Clone, Copy)]
pub enum RenderingEnvironment<'a> {
    /// An outer rendering pipeline is active; its context is borrowed, never
    /// mutated.
    Ambient(&'a ViewContext),
    /// No pipeline is active; a context must be synthesized.
    Standalone,
}

impl<'a> RenderingEnvironment<'a> {
    /// Selects the environment for an optional current context.
    ///
    /// A context only counts as ambient while a view is executing in it.
    pub fn detect(current: Option<&'a ViewContext>) -> Self {
        match current {
            Some(context) if context.view.is_some() => RenderingEnvironment::Ambient(context),
            _ => RenderingEnvironment::Standalone,
        }
    }

    pub fn ambient(&self) -> Option<&'a ViewContext> {
        match self {
            RenderingEnvironment::Ambient(context) => Some(context),
            RenderingEnvironment::Standalone => None,
        }
    }

    pub fn is_standalone(&self) -> bool {
        matches!(self, RenderingEnvironment::Standalone)
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            RenderingEnvironment::Ambient(_) => "ambient",
            RenderingEnvironment::Standalone => "standalone",
        }
    }
}

/// A single render call's inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    name: TemplateName,
    model: Value,
    field_prefix: Option<String>,
}

impl RenderRequest {
    pub fn new(name: TemplateName, model: Value, field_prefix: Option<String>) -> Self {
        Self {
            name,
            model,
            field_prefix,
        }
    }

    pub fn name(&self) -> &TemplateName {
        &self.name
    }

    pub fn model(&self) -> &Value {
        &self.model
    }

    pub fn field_prefix(&self) -> Option<&str> {
        self.field_prefix.as_deref()
    }
}

/// Builds the context a single render owns.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextBuilder;

impl ContextBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds a render context.
    ///
    /// With an ambient context, returns a copy of it whose field prefix is the
    /// request's (empty when the request has none); the ambient context is
    /// left untouched. Without one, synthesizes a context for the request's
    /// model with the request's field prefix and nothing else.
    pub fn build(&self, ambient: Option<&ViewContext>, request: &RenderRequest) -> ViewContext {
        let prefix = request.field_prefix().unwrap_or_default();
        match ambient {
            Some(context) => context.with_field_prefix(prefix),
            None => {
                let mut context =
                    ViewContext::standalone(ActionContext::synthetic(), request.model().clone());
                context.view_data.template_info.html_field_prefix = prefix.to_string();
                context
            }
        }
    }
}
