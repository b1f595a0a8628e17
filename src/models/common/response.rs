use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

/// Enveloppe commune de toutes les réponses JSON.
///
/// En cas d'échec, `error` porte le message à afficher tel quel à l'utilisateur.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success.as_i32(),
            message: message.into(),
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code.as_i32(),
            error: Some(message.clone()),
            message,
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success.as_i32(),
            message: message.into(),
            data: None,
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code.as_i32(),
            error: Some(message.clone()),
            message,
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_carries_error_string() {
        let resp = ApiResponse::error_empty(ErrorCode::QuizClosed, "Le quiz est clôturé");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["code"], 5002);
        assert_eq!(json["error"], "Le quiz est clôturé");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_envelope_has_no_error() {
        let resp = ApiResponse::success(3_i64, "ok");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["code"], 0);
        assert_eq!(json["data"], 3);
        assert!(json.get("error").is_none());
    }
}
