use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single video surfaced by the search provider.
///
/// Videos are transient: they are rebuilt from the provider on every
/// cache-miss fan-out and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: String,
    pub channel: String,
    pub topic: String,
    pub title: String,
    pub description: String,
    /// Broadcast time, unix epoch seconds
    pub timestamp: i64,
    /// Video length in seconds
    pub duration: i64,
    pub url_video: String,
    pub url_website: String,
}

impl Video {
    /// Maps one raw search result into a `Video`.
    ///
    /// Mapping is strict: a result missing any required field is dropped
    /// rather than emitted half-populated.
    pub fn from_search_result(item: &Value) -> Option<Self> {
        Some(Self {
            id: string_field(item, "id")?,
            channel: string_field(item, "channel")?,
            topic: string_field(item, "topic")?,
            title: string_field(item, "title")?,
            description: string_field(item, "description")?,
            timestamp: numeric_field(item, "timestamp")?,
            duration: numeric_field(item, "duration")?,
            url_video: string_field(item, "url_video_hd")?,
            url_website: string_field(item, "url_website")?,
        })
    }
}

fn string_field(item: &Value, field: &str) -> Option<String> {
    item.get(field)?.as_str().map(str::to_owned)
}

/// The provider is loose with numeric types; integers, floats and numeric
/// strings all occur in real payloads.
fn numeric_field(item: &Value, field: &str) -> Option<i64> {
    match item.get(field)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}
