use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Photo attached to an order (`orders/{id}/images`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderImage {
    pub id: String,
    #[serde(default)]
    pub order_id: String,
    pub url: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackType {
    #[default]
    Note,
    MaterialUsage,
    Issue,
}

impl FeedbackType {
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackType::Note => "Note",
            FeedbackType::MaterialUsage => "Material usage",
            FeedbackType::Issue => "Issue",
        }
    }
}

/// Field report attached to an order (`orders/{id}/feedbacks`).
///
/// `body` is free text on the wire; for `MaterialUsage` it carries a JSON
/// record, see `feedback_body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFeedback {
    pub id: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub feedback_type: FeedbackType,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackDto {
    pub feedback_type: FeedbackType,
    pub body: String,
}
