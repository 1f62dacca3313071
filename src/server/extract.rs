// Request body extraction

use crate::error::ApiError;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// JSON body extractor that tolerates a missing `Content-Type` and treats
/// an empty body, or any top-level value that is not an object, as `{}`.
/// Absent fields then reach the handler's own validation instead of being
/// rejected by the framework.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::plain(e.status(), e.body_text()))?;

        let value: Value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(&bytes).map_err(invalid_body)?
        };

        // Arrays and scalars would otherwise fill struct fields by position.
        let object = match value {
            Value::Object(_) => value,
            _ => Value::Object(Map::new()),
        };

        serde_json::from_value(object)
            .map(JsonBody)
            .map_err(invalid_body)
    }
}

fn invalid_body(e: serde_json::Error) -> ApiError {
    tracing::debug!("Rejected request body: {}", e);
    ApiError::plain(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e))
}
