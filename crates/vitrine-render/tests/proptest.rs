//! Property-based tests for template name normalization and location.

use std::sync::Arc;

use proptest::prelude::*;
use vitrine_render::context::ActionContext;
use vitrine_render::template::{normalize, TemplateName, ViewEngine, ViewLocator, ViewResult};
use vitrine_render::RenderError;

// ============================================================================
// Test helpers
// ============================================================================

/// An engine that never finds anything and reports `count` locations per
/// strategy.
struct EmptyEngine {
    id: usize,
    count: usize,
}

impl ViewEngine for EmptyEngine {
    fn name(&self) -> &str {
        "empty"
    }

    fn get_view(&self, path: &str) -> ViewResult {
        ViewResult::not_found((0..self.count).map(|i| format!("{}:direct:{}:{}", self.id, i, path)))
    }

    fn find_view(&self, _action: &ActionContext, name: &str) -> ViewResult {
        ViewResult::not_found((0..self.count).map(|i| format!("{}:convention:{}:{}", self.id, i, name)))
    }
}

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{0,8}"
}

fn rooted_name() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..5).prop_map(|segments| format!("/{}", segments.join("/")))
}

fn extension() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(".jinja".to_string()),
        Just("tpl".to_string()),
        "\\.[a-z]{1,5}",
    ]
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Normalizing a rooted name twice gives the same result as once.
    #[test]
    fn normalization_is_idempotent(name in rooted_name(), ext in extension()) {
        let once = normalize(&name, &ext);
        prop_assert_eq!(normalize(&once, &ext), once);
    }

    /// Normalized names always start with a separator.
    #[test]
    fn normalized_names_are_rooted(name in "[a-z/\\\\.]{0,20}", ext in extension()) {
        prop_assert!(normalize(&name, &ext).starts_with('/'));
    }

    /// Without engines, every name fails with the configuration error.
    #[test]
    fn no_engines_is_always_a_configuration_error(name in rooted_name()) {
        let locator = ViewLocator::new();
        let result = locator.locate(&ActionContext::synthetic(), &TemplateName::new(&name, ".jinja"));
        prop_assert!(matches!(result, Err(RenderError::NoProvidersConfigured)));
    }

    /// A miss reports every engine's locations, in registration order.
    #[test]
    fn misses_concatenate_locations_in_order(counts in prop::collection::vec(0usize..4, 1..5)) {
        let mut locator = ViewLocator::new();
        for (id, count) in counts.iter().enumerate() {
            locator.add_engine(Arc::new(EmptyEngine { id, count: *count }));
        }
        let name = TemplateName::new("widgets/card", ".jinja");

        let err = locator.locate(&ActionContext::synthetic(), &name).unwrap_err();
        let searched = err.searched_locations().unwrap();

        let mut expected = Vec::new();
        for (id, count) in counts.iter().enumerate() {
            expected.extend((0..*count).map(|i| format!("{}:direct:{}:{}", id, i, name)));
            expected.extend((0..*count).map(|i| format!("{}:convention:{}:{}", id, i, name)));
        }
        prop_assert_eq!(searched, expected.as_slice());
    }
}
