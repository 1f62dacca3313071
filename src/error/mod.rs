// Error types for the SparkPath gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Advisor service returned {status}: {message}")]
    Advisor { status: u16, message: String },

    #[error("Advisor service unreachable: {0}")]
    AdvisorUnavailable(String),

    #[error("Cache store error: {0}")]
    CacheStore(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Message surfaced to API callers. Advisor errors expose the upstream
    /// message rather than the wrapped display string.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Advisor { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Error response with an endpoint-specific JSON body.
///
/// The advisory endpoints each have their own historical error shape, so
/// handlers pick the constructor matching the endpoint instead of relying on
/// a single envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiError {
    /// `{success: false, message, error?}`
    pub fn envelope(status: StatusCode, message: &str, error: Option<String>) -> Self {
        let mut body = json!({
            "success": false,
            "message": message,
        });
        if let Some(error) = error {
            body["error"] = Value::String(error);
        }
        Self { status, body }
    }

    /// `{error}`
    pub fn plain(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": error.into() }),
        }
    }

    /// `{error, details}`
    pub fn detailed(status: StatusCode, error: &str, details: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({
                "error": error,
                "details": details.into(),
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self.body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
