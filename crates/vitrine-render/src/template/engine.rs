//! View and view engine abstractions.
//!
//! A [`View`] is a located, executable template. A [`ViewEngine`] is a
//! template provider: it answers lookups with a [`ViewResult`], which carries
//! either the view or the locations that were searched without success.
//!
//! Every engine offers two lookup strategies:
//!
//! - [`get_view`](ViewEngine::get_view): the name is already a full path
//! - [`find_view`](ViewEngine::find_view): search the engine's own
//!   convention roots
//!
//! The default implementation is [`JinjaViewEngine`], which executes
//! MiniJinja templates held in a [`TemplateStore`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use minijinja::{AutoEscape, Environment, ErrorKind, State};

use super::registry::TemplateStore;
use crate::context::{full_field_name, ActionContext, ViewContext};
use crate::error::Result;
use crate::options::ViewOptions;

/// A located template, ready to execute.
#[async_trait]
pub trait View: Send + Sync {
    /// The path this view was located at.
    fn path(&self) -> &str;

    /// Executes the view, writing markup into `context.output`.
    ///
    /// Output written before a failure stays in the buffer.
    async fn render(&self, context: &mut ViewContext) -> Result<()>;
}

impl fmt::Debug for dyn View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View").field("path", &self.path()).finish()
    }
}

/// The outcome of a single view lookup.
#[derive(Clone)]
pub struct ViewResult {
    view: Option<Arc<dyn View>>,
    searched_locations: Vec<String>,
}

impl ViewResult {
    pub fn found(view: Arc<dyn View>) -> Self {
        Self {
            view: Some(view),
            searched_locations: Vec::new(),
        }
    }

    pub fn not_found<I, S>(searched_locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            view: None,
            searched_locations: searched_locations.into_iter().map(Into::into).collect(),
        }
    }

    pub fn success(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&Arc<dyn View>> {
        self.view.as_ref()
    }

    pub fn into_view(self) -> Option<Arc<dyn View>> {
        self.view
    }

    /// Locations searched without success, in search order.
    pub fn searched_locations(&self) -> &[String] {
        &self.searched_locations
    }

    pub(crate) fn into_searched_locations(self) -> Vec<String> {
        self.searched_locations
    }
}

impl fmt::Debug for ViewResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewResult")
            .field("view", &self.view.as_ref().map(|v| v.path()))
            .field("searched_locations", &self.searched_locations)
            .finish()
    }
}

/// A template provider.
pub trait ViewEngine: Send + Sync {
    /// A short name used in diagnostics.
    fn name(&self) -> &str;

    /// Looks up `path` as a fully qualified location.
    fn get_view(&self, path: &str) -> ViewResult;

    /// Searches the engine's convention roots for `name`.
    fn find_view(&self, action: &ActionContext, name: &str) -> ViewResult;
}

/// A view engine executing MiniJinja templates from a [`TemplateStore`].
///
/// Direct lookups accept rooted paths only. Convention lookups try
/// `<location>/<name>` for each configured view location in order.
///
/// # Example
///
/// ```rust
/// use vitrine_render::template::{JinjaViewEngine, TemplateStore, ViewEngine};
/// use vitrine_render::context::ActionContext;
/// use vitrine_render::ViewOptions;
///
/// let options = ViewOptions::default();
/// let mut store = TemplateStore::new(options.template_file_extensions());
/// store.add_inline("views/shared/card.jinja", "<div>{{ title }}</div>");
///
/// let engine = JinjaViewEngine::new(store, &options);
///
/// let direct = engine.get_view("/card.jinja");
/// assert!(!direct.success());
/// assert_eq!(direct.searched_locations(), ["/card.jinja"]);
///
/// let found = engine.find_view(&ActionContext::synthetic(), "/card.jinja");
/// assert!(found.success());
/// ```
pub struct JinjaViewEngine {
    name: String,
    env: Arc<Environment<'static>>,
    store: Arc<TemplateStore>,
    view_locations: Vec<String>,
}

impl JinjaViewEngine {
    /// Creates an engine over `store` with the roots and escaping from `options`.
    pub fn new(store: TemplateStore, options: &ViewOptions) -> Self {
        let store = Arc::new(store);
        let env = build_environment(Arc::clone(&store), options.auto_escape);
        Self {
            name: "jinja".to_string(),
            env: Arc::new(env),
            store,
            view_locations: options.view_locations.clone(),
        }
    }

    /// Creates an engine whose store is loaded from `options.template_dirs`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Registry`] if a directory is missing or two
    /// directories contain the same template path.
    pub fn from_options(options: &ViewOptions) -> Result<Self> {
        let mut store = TemplateStore::new(options.template_file_extensions());
        for dir in &options.template_dirs {
            store.add_template_dir(dir)?;
        }
        tracing::debug!(
            templates = store.len(),
            dirs = options.template_dirs.len(),
            "loaded template store"
        );
        Ok(Self::new(store, options))
    }

    /// Sets the name reported in diagnostics.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Recognized template file extensions, the view extension first.
    pub fn template_file_extensions(&self) -> &[String] {
        self.store.extensions()
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn view_locations(&self) -> &[String] {
        &self.view_locations
    }

    fn view_at(&self, path: &str) -> Arc<dyn View> {
        Arc::new(JinjaView {
            path: path.to_string(),
            env: Arc::clone(&self.env),
        })
    }
}

impl ViewEngine for JinjaViewEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_view(&self, path: &str) -> ViewResult {
        if !path.starts_with('/') {
            return ViewResult::not_found(Vec::<String>::new());
        }
        if self.store.contains(path) {
            ViewResult::found(self.view_at(path))
        } else {
            ViewResult::not_found([path])
        }
    }

    fn find_view(&self, _action: &ActionContext, name: &str) -> ViewResult {
        let relative = name.trim_start_matches('/');
        let mut searched = Vec::with_capacity(self.view_locations.len());

        for location in &self.view_locations {
            let candidate = format!("{}/{}", location.trim_end_matches('/'), relative);
            if self.store.contains(&candidate) {
                return ViewResult::found(self.view_at(&candidate));
            }
            searched.push(candidate);
        }
        ViewResult::not_found(searched)
    }
}

impl fmt::Debug for JinjaViewEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JinjaViewEngine")
            .field("name", &self.name)
            .field("templates", &self.store.len())
            .field("view_locations", &self.view_locations)
            .finish()
    }
}

/// A template held by a [`JinjaViewEngine`].
struct JinjaView {
    path: String,
    env: Arc<Environment<'static>>,
}

#[async_trait]
impl View for JinjaView {
    fn path(&self) -> &str {
        &self.path
    }

    async fn render(&self, context: &mut ViewContext) -> Result<()> {
        let template = self.env.get_template(&self.path)?;
        let globals = context.template_globals();
        template.render_captured_to(globals, &mut context.output)?;
        Ok(())
    }
}

/// Builds the environment shared by every view of one engine.
fn build_environment(store: Arc<TemplateStore>, auto_escape: bool) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_loader(move |name| {
        store.load(name).map_err(|e| {
            minijinja::Error::new(ErrorKind::InvalidOperation, "failed to load template")
                .with_source(e)
        })
    });
    env.set_auto_escape_callback(move |_| {
        if auto_escape {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });
    register_functions(&mut env);
    env
}

/// Registers the template functions available to every view.
///
/// - `field_name(name)`: `name` qualified with the current field prefix
pub fn register_functions(env: &mut Environment<'static>) {
    env.add_function("field_name", |state: &State, name: String| -> String {
        let prefix = state
            .lookup("html_field_prefix")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        full_field_name(&prefix, &name)
    });
}
