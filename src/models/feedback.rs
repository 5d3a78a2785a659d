use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single anonymous submission as returned by the data API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Feedback {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Fields this service does not interpret, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feedback {
    /// `createdAt` formatted for display, or the raw value if it is not RFC 3339.
    pub fn created_at_display(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?;
        Some(match chrono::DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => ts.format("%b %-d, %Y %-I:%M %p").to_string(),
            Err(_) => raw.to_string(),
        })
    }
}

/// Result of decoding `GET /api/get-feedbacks`.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackList {
    Present(Vec<Feedback>),
    /// `feedback` was absent or not an array.
    Missing,
}

impl FeedbackList {
    pub fn decode(mut body: Value) -> Self {
        let field = match body.get_mut("feedback") {
            Some(field) => field.take(),
            None => {
                log::warn!("⚠️  Feedback list response has no `feedback` field");
                return FeedbackList::Missing;
            }
        };

        let Value::Array(raw) = field else {
            log::warn!("⚠️  Feedback list response `feedback` is not an array");
            return FeedbackList::Missing;
        };

        // Items without a usable `_id` cannot be shown or deleted; drop them one by one.
        let items = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<Feedback>(item) {
                Ok(feedback) => Some(feedback),
                Err(e) => {
                    log::warn!("⚠️  Skipping malformed feedback item #{}: {}", index, e);
                    None
                }
            })
            .collect();

        FeedbackList::Present(items)
    }

    pub fn into_vec(self) -> Vec<Feedback> {
        match self {
            FeedbackList::Present(items) => items,
            FeedbackList::Missing => Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct AcceptingFeedbackResponse {
    #[serde(rename = "isAcceptingFeedback")]
    pub is_accepting_feedback: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct AcceptFeedbackRequest {
    pub acceptfeedbacks: bool,
}

/// `{ feedback: string }` status body used for both success and error answers.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StatusMessage {
    pub feedback: String,
}

impl StatusMessage {
    /// Extracts the message from an error body, if it has the expected shape.
    pub fn from_error_body(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<Value>(body)
            .ok()?
            .get("feedback")?
            .as_str()
            .map(str::to_string)
    }
}
