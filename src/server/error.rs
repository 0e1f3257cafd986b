//! Maps crate errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::utils::error::{ErrorCategory, StrengthError};

impl IntoResponse for StrengthError {
    fn into_response(self) -> Response {
        let (status, message) = match self.category() {
            ErrorCategory::Input => {
                tracing::warn!(detail = %self, "Validation error");
                (StatusCode::BAD_REQUEST, self.user_friendly_message())
            }
            ErrorCategory::Model => {
                tracing::error!(detail = %self, "Prediction error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed".to_string())
            }
            _ => {
                tracing::error!(detail = %self, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let response = StrengthError::validation("age", "Missing required field: age").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = StrengthError::feature("aggregate_cement_ratio", "cement is zero").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = StrengthError::inference("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
