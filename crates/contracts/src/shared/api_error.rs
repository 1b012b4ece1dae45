//! Error taxonomy for every call made against the REST API.
//!
//! A non-2xx response becomes an `ApiError` carrying a human readable message
//! (the JSON body's `message` field when the server sent one, a route-specific
//! default otherwise) together with the HTTP status, so callers can branch on
//! e.g. 409 without parsing text.

use serde::Deserialize;
use thiserror::Error;

pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_CONFLICT: u16 = 409;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// `None` when the request never produced an HTTP response.
    pub status: Option<u16>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// Build the error for a failed HTTP response.
    ///
    /// `body` is the raw response text; it may be empty, non-JSON, or JSON
    /// without a `message` field, in which case `default_message` is used.
    pub fn from_response(status: u16, body: &str, default_message: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| default_message.to_string());

        Self::new(message, Some(status))
    }

    pub fn network(details: impl std::fmt::Display) -> Self {
        Self::new(format!("Network error: {}", details), None)
    }

    pub fn decode(details: impl std::fmt::Display) -> Self {
        Self::new(format!("Unexpected response format: {}", details), None)
    }

    pub fn not_authenticated() -> Self {
        Self::new("Not authenticated", Some(STATUS_UNAUTHORIZED))
    }

    pub fn is_conflict(&self) -> bool {
        self.status == Some(STATUS_CONFLICT)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(STATUS_NOT_FOUND)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(STATUS_UNAUTHORIZED)
    }
}

impl From<ApiError> for String {
    fn from(e: ApiError) -> Self {
        e.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_taken_from_body() {
        let err = ApiError::from_response(409, r#"{"message":"Location already exists"}"#, "Save failed");
        assert_eq!(err.message, "Location already exists");
        assert_eq!(err.status, Some(409));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_default_message_when_body_has_none() {
        let err = ApiError::from_response(500, r#"{"error":"boom"}"#, "Could not load crews");
        assert_eq!(err.message, "Could not load crews");
        assert!(!err.is_conflict());

        let err = ApiError::from_response(502, "<html>Bad gateway</html>", "Could not load crews");
        assert_eq!(err.message, "Could not load crews");

        let err = ApiError::from_response(400, r#"{"message":"   "}"#, "Invalid request");
        assert_eq!(err.message, "Invalid request");
    }

    #[test]
    fn test_status_helpers() {
        assert!(ApiError::from_response(404, "", "x").is_not_found());
        assert!(ApiError::not_authenticated().is_unauthorized());
        assert_eq!(ApiError::network("timeout").status, None);
    }

    #[test]
    fn test_display_is_message() {
        let err = ApiError::new("Crew not found", Some(404));
        assert_eq!(err.to_string(), "Crew not found");
        let s: String = err.into();
        assert_eq!(s, "Crew not found");
    }
}
