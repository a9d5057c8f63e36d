//! Content items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A versioned piece of content.
///
/// Serializes with camelCase keys, timestamps as RFC 3339.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentItem {
    pub content_item_id: String,
    pub content_item_version_id: String,
    pub content_type: String,
    pub display_text: String,
    pub published: bool,
    pub latest: bool,
    pub modified_utc: Option<DateTime<Utc>>,
    pub published_utc: Option<DateTime<Utc>>,
    pub created_utc: Option<DateTime<Utc>>,
    pub owner: String,
    pub author: String,
    /// Parts and fields attached to the item, keyed by part name.
    pub content: Map<String, Value>,
}

impl ContentItem {
    pub fn new(content_item_id: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            content_item_id: content_item_id.into(),
            content_type: content_type.into(),
            ..Self::default()
        }
    }

    pub fn with_display_text(mut self, text: impl Into<String>) -> Self {
        self.display_text = text.into();
        self
    }

    pub fn with_part(mut self, name: impl Into<String>, value: Value) -> Self {
        self.content.insert(name.into(), value);
        self
    }

    /// Marks the item as the published and latest version at `at`.
    pub fn published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published = true;
        self.latest = true;
        self.published_utc = Some(at);
        self.modified_utc = Some(at);
        if self.created_utc.is_none() {
            self.created_utc = Some(at);
        }
        self
    }

    pub fn part(&self, name: &str) -> Option<&Value> {
        self.content.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let item = ContentItem::new("4x2", "Article")
            .with_display_text("Hello")
            .published_at(at);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["contentItemId"], "4x2");
        assert_eq!(value["contentType"], "Article");
        assert_eq!(value["publishedUtc"], "2024-03-01T12:00:00Z");
        assert_eq!(value["published"], true);
    }

    #[test]
    fn test_deserializes_with_missing_fields() {
        let item: ContentItem = serde_json::from_value(json!({
            "contentItemId": "a1",
            "contentType": "Page",
            "content": {"TitlePart": {"Title": "Home"}}
        }))
        .unwrap();

        assert_eq!(item.content_type, "Page");
        assert!(!item.published);
        assert!(item.created_utc.is_none());
        assert_eq!(item.part("TitlePart").unwrap()["Title"], "Home");
    }

    #[test]
    fn test_published_at_keeps_created() {
        let created = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let published = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut item = ContentItem::new("a", "Page");
        item.created_utc = Some(created);

        let item = item.published_at(published);
        assert_eq!(item.created_utc, Some(created));
        assert_eq!(item.published_utc, Some(published));
    }
}
