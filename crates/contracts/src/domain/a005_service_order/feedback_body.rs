//! Boundary codec for the structured payloads carried in a feedback `body`.
//!
//! The backend stores feedback bodies as plain strings. A material-usage
//! feedback smuggles a JSON record through that string; every encode and
//! decode of that record goes through `encode_body` / `decode_body` so the
//! schema is checked in exactly one place.

use super::feedback::FeedbackType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsedMaterial {
    pub material_id: String,
    #[serde(default)]
    pub material_name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialUsageRecord {
    /// Location the material was taken from
    #[serde(default)]
    pub location_id: Option<String>,
    pub items: Vec<UsedMaterial>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackBody {
    Text(String),
    MaterialUsage(MaterialUsageRecord),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackBodyError {
    #[error("material usage body is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("material usage body is not a JSON object")]
    NotAnObject,
    #[error("material usage record has no items")]
    EmptyItems,
    #[error("material usage line {index} has an invalid quantity")]
    InvalidQuantity { index: usize },
    #[error("material usage line {index} has no material id")]
    MissingMaterial { index: usize },
}

impl MaterialUsageRecord {
    pub fn validate(&self) -> Result<(), FeedbackBodyError> {
        if self.items.is_empty() {
            return Err(FeedbackBodyError::EmptyItems);
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.material_id.trim().is_empty() {
                return Err(FeedbackBodyError::MissingMaterial { index });
            }
            if !item.quantity.is_finite() || item.quantity <= 0.0 {
                return Err(FeedbackBodyError::InvalidQuantity { index });
            }
        }
        Ok(())
    }

    pub fn total_quantity(&self) -> f64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

impl FeedbackBody {
    pub fn feedback_type(&self) -> FeedbackType {
        match self {
            FeedbackBody::Text(_) => FeedbackType::Note,
            FeedbackBody::MaterialUsage(_) => FeedbackType::MaterialUsage,
        }
    }
}

/// Encode a body for the wire.
pub fn encode_body(body: &FeedbackBody) -> Result<String, FeedbackBodyError> {
    match body {
        FeedbackBody::Text(text) => Ok(text.clone()),
        FeedbackBody::MaterialUsage(record) => {
            record.validate()?;
            serde_json::to_string(record).map_err(|e| FeedbackBodyError::MalformedJson(e.to_string()))
        }
    }
}

/// Decode a body received from the backend.
///
/// Notes and issues are returned verbatim; material usage must parse and pass
/// schema validation.
pub fn decode_body(feedback_type: FeedbackType, body: &str) -> Result<FeedbackBody, FeedbackBodyError> {
    match feedback_type {
        FeedbackType::Note | FeedbackType::Issue => Ok(FeedbackBody::Text(body.to_string())),
        FeedbackType::MaterialUsage => {
            let value: serde_json::Value = serde_json::from_str(body)
                .map_err(|e| FeedbackBodyError::MalformedJson(e.to_string()))?;
            if !value.is_object() {
                return Err(FeedbackBodyError::NotAnObject);
            }
            let record: MaterialUsageRecord = serde_json::from_value(value)
                .map_err(|e| FeedbackBodyError::MalformedJson(e.to_string()))?;
            record.validate()?;
            Ok(FeedbackBody::MaterialUsage(record))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(qty: f64) -> MaterialUsageRecord {
        MaterialUsageRecord {
            location_id: Some("l1".into()),
            items: vec![UsedMaterial {
                material_id: "m1".into(),
                material_name: "Cable".into(),
                quantity: qty,
                unit: "m".into(),
            }],
        }
    }

    #[test]
    fn test_material_usage_survives_the_wire() {
        let body = FeedbackBody::MaterialUsage(usage(3.5));
        let wire = encode_body(&body).unwrap();
        assert!(wire.contains("\"materialId\":\"m1\""));
        assert_eq!(decode_body(FeedbackType::MaterialUsage, &wire).unwrap(), body);
    }

    #[test]
    fn test_text_passes_through() {
        let decoded = decode_body(FeedbackType::Note, "{not json").unwrap();
        assert_eq!(decoded, FeedbackBody::Text("{not json".into()));
        assert_eq!(decoded.feedback_type(), FeedbackType::Note);
    }

    #[test]
    fn test_malformed_usage_is_an_error_kind() {
        assert!(matches!(
            decode_body(FeedbackType::MaterialUsage, "used 3m of cable"),
            Err(FeedbackBodyError::MalformedJson(_))
        ));
        assert_eq!(
            decode_body(FeedbackType::MaterialUsage, "[1,2]"),
            Err(FeedbackBodyError::NotAnObject)
        );
        assert_eq!(
            decode_body(FeedbackType::MaterialUsage, r#"{"items":[]}"#),
            Err(FeedbackBodyError::EmptyItems)
        );
        assert_eq!(
            decode_body(
                FeedbackType::MaterialUsage,
                r#"{"items":[{"materialId":"m1","quantity":-1}]}"#
            ),
            Err(FeedbackBodyError::InvalidQuantity { index: 0 })
        );
        assert_eq!(
            decode_body(
                FeedbackType::MaterialUsage,
                r#"{"items":[{"materialId":" ","quantity":1}]}"#
            ),
            Err(FeedbackBodyError::MissingMaterial { index: 0 })
        );
    }

    #[test]
    fn test_encode_refuses_invalid_record() {
        assert_eq!(
            encode_body(&FeedbackBody::MaterialUsage(usage(0.0))),
            Err(FeedbackBodyError::InvalidQuantity { index: 0 })
        );
    }
}
