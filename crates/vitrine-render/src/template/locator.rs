//! View location across registered template providers.
//!
//! The locator walks its engines in registration order. For each engine it
//! first tries the name as a direct path, then the engine's convention roots.
//! The first hit wins. When every engine misses, the searched locations of
//! all attempts are concatenated in the order they were tried.

use std::fmt;
use std::sync::Arc;

use super::engine::{View, ViewEngine, ViewResult};
use super::name::TemplateName;
use crate::context::ActionContext;
use crate::error::{RenderError, Result};

/// Resolves normalized template names to executable views.
#[derive(Clone, Default)]
pub struct ViewLocator {
    engines: Vec<Arc<dyn ViewEngine>>,
}

impl ViewLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an engine, returning the locator for chaining.
    pub fn with_engine(mut self, engine: Arc<dyn ViewEngine>) -> Self {
        self.engines.push(engine);
        self
    }

    pub fn add_engine(&mut self, engine: Arc<dyn ViewEngine>) {
        self.engines.push(engine);
    }

    pub fn engines(&self) -> &[Arc<dyn ViewEngine>] {
        &self.engines
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Searches every engine for `name`.
    ///
    /// Returns the first successful lookup, or a miss carrying every
    /// location searched.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoProvidersConfigured`] if no engine is
    /// registered.
    pub fn search(&self, action: &ActionContext, name: &TemplateName) -> Result<ViewResult> {
        if self.engines.is_empty() {
            return Err(RenderError::NoProvidersConfigured);
        }

        let mut searched = Vec::new();
        for engine in &self.engines {
            let direct = engine.get_view(name.as_str());
            if direct.success() {
                tracing::debug!(template = %name, engine = engine.name(), "view found by path");
                return Ok(direct);
            }
            searched.extend(direct.into_searched_locations());

            let convention = engine.find_view(action, name.as_str());
            if convention.success() {
                tracing::debug!(
                    template = %name,
                    engine = engine.name(),
                    path = convention.view().map(|v| v.path()).unwrap_or_default(),
                    "view found by convention"
                );
                return Ok(convention);
            }
            searched.extend(convention.into_searched_locations());
        }

        tracing::debug!(template = %name, searched = searched.len(), "view not found");
        Ok(ViewResult::not_found(searched))
    }

    /// Locates `name`, turning a miss into [`RenderError::TemplateNotFound`].
    pub fn locate(&self, action: &ActionContext, name: &TemplateName) -> Result<Arc<dyn View>> {
        let result = self.search(action, name)?;
        if let Some(view) = result.view() {
            return Ok(Arc::clone(view));
        }
        Err(RenderError::TemplateNotFound {
            name: name.to_string(),
            searched_locations: result.into_searched_locations(),
        })
    }

    /// Returns true if some engine can resolve `name`.
    pub fn exists(&self, action: &ActionContext, name: &TemplateName) -> bool {
        self.search(action, name)
            .map(|result| result.success())
            .unwrap_or(false)
    }
}

impl fmt::Debug for ViewLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.engines.iter().map(|e| e.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ViewContext;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubView(String);

    #[async_trait]
    impl View for StubView {
        fn path(&self) -> &str {
            &self.0
        }

        async fn render(&self, context: &mut ViewContext) -> Result<()> {
            context.output.push_str(&self.0);
            Ok(())
        }
    }

    /// An engine with a fixed set of paths and one convention root.
    struct StubEngine {
        name: &'static str,
        root: &'static str,
        paths: HashSet<String>,
        calls: AtomicUsize,
    }

    impl StubEngine {
        fn new(name: &'static str, root: &'static str, paths: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                name,
                root,
                paths: paths.iter().map(|p| p.to_string()).collect(),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ViewEngine for StubEngine {
        fn name(&self) -> &str {
            self.name
        }

        fn get_view(&self, path: &str) -> ViewResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.paths.contains(path) {
                ViewResult::found(Arc::new(StubView(path.to_string())))
            } else {
                ViewResult::not_found([format!("{}:{}", self.name, path)])
            }
        }

        fn find_view(&self, _action: &ActionContext, name: &str) -> ViewResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let candidate = format!("{}{}", self.root, name);
            if self.paths.contains(&candidate) {
                ViewResult::found(Arc::new(StubView(candidate)))
            } else {
                ViewResult::not_found([format!("{}:{}", self.name, candidate)])
            }
        }
    }

    fn name(s: &str) -> TemplateName {
        TemplateName::new(s, ".jinja")
    }

    #[test]
    fn test_no_engines() {
        let locator = ViewLocator::new();
        let result = locator.search(&ActionContext::synthetic(), &name("card"));
        assert!(matches!(result, Err(RenderError::NoProvidersConfigured)));
    }

    #[test]
    fn test_direct_hit_skips_convention() {
        let engine = StubEngine::new("a", "/views", &["/card.jinja", "/views/card.jinja"]);
        let locator = ViewLocator::new().with_engine(engine.clone());

        let view = locator.locate(&ActionContext::synthetic(), &name("card")).unwrap();
        assert_eq!(view.path(), "/card.jinja");
        assert_eq!(engine.calls(), 1);
    }

    #[test]
    fn test_convention_hit() {
        let engine = StubEngine::new("a", "/views", &["/views/card.jinja"]);
        let locator = ViewLocator::new().with_engine(engine);

        let view = locator.locate(&ActionContext::synthetic(), &name("card")).unwrap();
        assert_eq!(view.path(), "/views/card.jinja");
    }

    #[test]
    fn test_first_engine_wins() {
        let first = StubEngine::new("first", "/a", &["/a/card.jinja"]);
        let second = StubEngine::new("second", "/b", &["/card.jinja"]);
        let locator = ViewLocator::new()
            .with_engine(first)
            .with_engine(second.clone());

        let view = locator.locate(&ActionContext::synthetic(), &name("card")).unwrap();
        assert_eq!(view.path(), "/a/card.jinja");
        assert_eq!(second.calls(), 0);
    }

    #[test]
    fn test_later_engine_consulted_after_miss() {
        let first = StubEngine::new("first", "/a", &[]);
        let second = StubEngine::new("second", "/b", &["/b/card.jinja"]);
        let locator = ViewLocator::new().with_engine(first).with_engine(second);

        let view = locator.locate(&ActionContext::synthetic(), &name("card")).unwrap();
        assert_eq!(view.path(), "/b/card.jinja");
    }

    #[test]
    fn test_miss_lists_locations_in_search_order() {
        let locator = ViewLocator::new()
            .with_engine(StubEngine::new("first", "/a", &[]))
            .with_engine(StubEngine::new("second", "/b", &[]));

        let err = locator
            .locate(&ActionContext::synthetic(), &name("card"))
            .unwrap_err();

        assert_eq!(
            err.searched_locations().unwrap(),
            [
                "first:/card.jinja",
                "first:/a/card.jinja",
                "second:/card.jinja",
                "second:/b/card.jinja",
            ]
        );
        let message = err.to_string();
        assert!(message.starts_with(
            "Unable to find view '/card.jinja'. The following locations were searched:"
        ));
        assert!(message.ends_with("first:/card.jinja\nfirst:/a/card.jinja\nsecond:/card.jinja\nsecond:/b/card.jinja"));
    }

    #[test]
    fn test_exists() {
        let locator =
            ViewLocator::new().with_engine(StubEngine::new("a", "/views", &["/views/card.jinja"]));
        assert!(locator.exists(&ActionContext::synthetic(), &name("card")));
        assert!(!locator.exists(&ActionContext::synthetic(), &name("row")));
        assert!(!ViewLocator::new().exists(&ActionContext::synthetic(), &name("card")));
    }

    #[test]
    fn test_debug_lists_engine_names() {
        let locator = ViewLocator::new()
            .with_engine(StubEngine::new("jinja", "/", &[]))
            .with_engine(StubEngine::new("theme", "/", &[]));
        assert_eq!(format!("{:?}", locator), r#"["jinja", "theme"]"#);
    }
}
