use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One ranked hit as returned by the search service.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    /// Opaque service identifier; never read by the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub content: String,

    /// Relevance distance, lower is better. `None` means no badge.
    #[serde(default, deserialize_with = "lenient_number")]
    pub score: Option<f64>,

    #[serde(default, deserialize_with = "lenient_metadata")]
    pub metadata: Option<ResultMetadata>,
}

impl SearchResult {
    pub fn new(content: impl Into<String>) -> SearchResult {
        SearchResult {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_score(mut self, score: f64) -> SearchResult {
        self.score = Some(score);
        self
    }

    pub fn with_metadata(mut self, metadata: ResultMetadata) -> SearchResult {
        self.metadata = Some(metadata);
        self
    }
}

/// Where a result sits inside its source document.
///
/// Services attach arbitrary metadata; only these four keys are read, the
/// rest is ignored on decode. A key holding anything but a string reads as
/// absent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ResultMetadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub h1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub h2: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub h3: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source_path: Option<String>,
}

impl ResultMetadata {
    /// Headings in h1, h2, h3 order with absent and empty ones skipped.
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        [&self.h1, &self.h2, &self.h3]
            .into_iter()
            .filter_map(|h| non_empty(h.as_deref()))
    }

    pub fn source_path(&self) -> Option<&str> {
        non_empty(self.source_path.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// One odd field must not cost the whole result set, so these never fail on a
// type mismatch.

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn lenient_metadata<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ResultMetadata>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}
