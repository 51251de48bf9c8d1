use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Error body returned by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Technical description, for logs and API clients
    pub error: String,
    /// Stable code for programmatic handling (e.g. "CITY_NOT_FOUND")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Localized text that can be shown to the user as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            message: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Errors that know how to present themselves over HTTP
pub trait HttpError: std::error::Error {
    fn status_code(&self) -> StatusCode;

    fn error_code(&self) -> Option<&'static str> {
        None
    }

    /// Localized message for the end user
    fn user_message(&self) -> Option<String> {
        None
    }
}

pub fn into_response<E: HttpError>(err: E) -> Response {
    let status = err.status_code();
    let code = err.error_code();
    let message = err.to_string();

    if status.is_server_error() {
        tracing::error!(error = %message, status = %status, code = ?code, "API error");
    } else {
        tracing::warn!(error = %message, status = %status, code = ?code, "API error");
    }

    let mut body = ErrorResponse::new(message);
    if let Some(code) = code {
        body = body.with_code(code);
    }
    if let Some(user_message) = err.user_message() {
        body = body.with_message(user_message);
    }

    (status, Json(body)).into_response()
}

/// Implement `IntoResponse` for an `HttpError` type
#[macro_export]
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                $crate::error::into_response(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("upstream gone")]
    struct Gone;

    impl HttpError for Gone {
        fn status_code(&self) -> StatusCode {
            StatusCode::BAD_GATEWAY
        }

        fn error_code(&self) -> Option<&'static str> {
            Some("GONE")
        }

        fn user_message(&self) -> Option<String> {
            Some("Не удалось загрузить данные.".to_string())
        }
    }

    #[tokio::test]
    async fn test_into_response_renders_all_fields() {
        let response = into_response(Gone);
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("valid json");
        assert_eq!(body["error"], "upstream gone");
        assert_eq!(body["code"], "GONE");
        assert_eq!(body["message"], "Не удалось загрузить данные.");
    }

    #[test]
    fn test_error_response_skips_empty_fields() {
        let json = serde_json::to_value(ErrorResponse::new("boom")).expect("serializable");
        assert_eq!(json, serde_json::json!({ "error": "boom" }));
    }
}
