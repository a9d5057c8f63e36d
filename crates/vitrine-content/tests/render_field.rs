//! Tests for the `render` field across both rendering paths.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use vitrine_content::{
    ContentDisplayManager, ContentError, ContentItem, ContentItemType, DisplayHelper,
    DisplayManager, Displayable, RenderServices, Shape,
};
use vitrine_render::context::{ActionContext, RenderingEnvironment, ViewContext};
use vitrine_render::template::{JinjaViewEngine, ShapeTemplateRenderer, TemplateStore, View};
use vitrine_render::{RenderError, ViewOptions};

// ============================================================================
// Test helpers
// ============================================================================

fn helper(entries: &[(&str, &str)]) -> DisplayHelper {
    let options = ViewOptions::default();
    let store = TemplateStore::from_embedded_entries(options.template_file_extensions(), entries);
    let engine = JinjaViewEngine::new(store, &options);
    DisplayHelper::new(Arc::new(ShapeTemplateRenderer::with_engine(
        options,
        Arc::new(engine),
    )))
}

fn services(entries: &[(&str, &str)]) -> RenderServices {
    RenderServices::new(Arc::new(ContentDisplayManager::default()), helper(entries))
}

/// Returns a fixed displayable for every item.
struct FixedDisplay(Displayable);

#[async_trait]
impl DisplayManager for FixedDisplay {
    async fn build_display(&self, _item: &ContentItem) -> vitrine_content::Result<Displayable> {
        Ok(self.0.clone())
    }
}

struct FailingDisplay;

#[async_trait]
impl DisplayManager for FailingDisplay {
    async fn build_display(&self, _item: &ContentItem) -> vitrine_content::Result<Displayable> {
        Err(ContentError::display("no driver for item"))
    }
}

struct LayoutView;

#[async_trait]
impl View for LayoutView {
    fn path(&self) -> &str {
        "/views/layout.jinja"
    }

    async fn render(&self, _context: &mut ViewContext) -> vitrine_render::Result<()> {
        Ok(())
    }
}

// ============================================================================
// Render field
// ============================================================================

#[tokio::test]
async fn render_uses_most_specific_template() {
    let services = services(&[
        ("/views/Content.jinja", "generic {{ displayText }}"),
        ("/views/Content-Article.jinja", "<article>{{ displayText }}</article>"),
    ]);
    let item = ContentItem::new("a1", "Article").with_display_text("Tom & Jerry");

    let html = ContentItemType::new("Article")
        .resolve_render(&item, &services, RenderingEnvironment::Standalone)
        .await
        .unwrap();

    assert_eq!(html, "<article>Tom &amp; Jerry</article>");
}

#[tokio::test]
async fn render_prefers_display_type_and_content_type() {
    let services = services(&[
        ("/views/Content.Detail.jinja", "detail"),
        ("/views/Content-Article.jinja", "article"),
        ("/views/Content.Detail-Article.jinja", "detail article"),
    ]);
    let item = ContentItem::new("a1", "Article");

    let html = ContentItemType::new("Article")
        .resolve_render(&item, &services, RenderingEnvironment::Standalone)
        .await
        .unwrap();

    assert_eq!(html, "detail article");
}

#[tokio::test]
async fn render_falls_back_to_shape_type() {
    let services = services(&[("/views/shared/Content.jinja", "{{ contentType }}")]);
    let item = ContentItem::new("p1", "Page");

    let html = ContentItemType::new("Page")
        .resolve_render(&item, &services, RenderingEnvironment::Standalone)
        .await
        .unwrap();

    assert_eq!(html, "Page");
}

#[tokio::test]
async fn render_without_template_reports_locations() {
    let services = services(&[]);
    let item = ContentItem::new("p1", "Page");

    let err = ContentItemType::new("Page")
        .resolve_render(&item, &services, RenderingEnvironment::Standalone)
        .await
        .unwrap_err();

    match err {
        ContentError::Render(RenderError::TemplateNotFound { name, searched_locations }) => {
            assert_eq!(name, "/Content.jinja");
            assert_eq!(
                searched_locations,
                ["/Content.jinja", "/views/Content.jinja", "/views/shared/Content.jinja"]
            );
        }
        other => panic!("expected template not found, got {:?}", other),
    }
}

#[tokio::test]
async fn render_escapes_text_displayables() {
    let services = RenderServices::new(
        Arc::new(FixedDisplay(Displayable::Text("<script>".to_string()))),
        helper(&[]),
    );

    let html = ContentItemType::new("Page")
        .resolve_render(&ContentItem::new("p1", "Page"), &services, RenderingEnvironment::Standalone)
        .await
        .unwrap();

    assert_eq!(html, "&lt;script&gt;");
}

#[tokio::test]
async fn render_rejects_untyped_shape() {
    let services = RenderServices::new(
        Arc::new(FixedDisplay(Displayable::Shape(Shape::new("", json!({}))))),
        helper(&[]),
    );

    let err = ContentItemType::new("Page")
        .resolve_render(&ContentItem::new("p1", "Page"), &services, RenderingEnvironment::Standalone)
        .await
        .unwrap_err();

    assert!(matches!(err, ContentError::UnknownShape));
}

#[tokio::test]
async fn render_surfaces_display_errors() {
    let services = RenderServices::new(Arc::new(FailingDisplay), helper(&[]));

    let err = ContentItemType::new("Page")
        .resolve_render(&ContentItem::new("p1", "Page"), &services, RenderingEnvironment::Standalone)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "failed to build display: no driver for item");
}

#[tokio::test]
async fn render_inside_executing_view_uses_shape_prefix() {
    let shape = Shape::new("Field", json!({"value": 3})).with_field_prefix("Article.Count");
    let services = RenderServices::new(
        Arc::new(FixedDisplay(Displayable::Shape(shape))),
        helper(&[("/views/Field.jinja", "{{ field_name('Value') }}={{ value }}")]),
    );

    let mut outer = ViewContext::standalone(ActionContext::synthetic(), json!({}));
    outer.view = Some(Arc::new(LayoutView));
    outer.view_data.template_info.html_field_prefix = "Article".to_string();

    let html = ContentItemType::new("Page")
        .resolve_render(
            &ContentItem::new("p1", "Page"),
            &services,
            RenderingEnvironment::detect(Some(&outer)),
        )
        .await
        .unwrap();

    assert_eq!(html, "Article.Count.Value=3");
    assert_eq!(outer.html_field_prefix(), "Article");
}
