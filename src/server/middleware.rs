// HTTP middleware

use crate::config::CorsConfig;
use crate::error::{GatewayError, Result};
use crate::metrics;
use axum::extract::{MatchedPath, Request};
use axum::http::{header, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Create request ID layers for the application
pub fn request_id_layers() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    (
        SetRequestIdLayer::x_request_id(MakeRequestUuid),
        PropagateRequestIdLayer::x_request_id(),
    )
}

/// Cross-origin policy: only the configured frontend may call the API.
/// Without a configured frontend every origin is allowed.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match config.frontend_base_url.as_deref().map(str::trim) {
        Some(origin) if !origin.is_empty() => {
            let origin = HeaderValue::from_str(origin.trim_end_matches('/')).map_err(|e| {
                GatewayError::Config(format!("Invalid frontend origin {:?}: {}", origin, e))
            })?;
            Ok(layer.allow_origin(origin))
        }
        _ => Ok(layer.allow_origin(Any)),
    }
}

/// Record request count and latency per matched route.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = req.method().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    metrics::record_request(
        &method,
        &endpoint,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}
