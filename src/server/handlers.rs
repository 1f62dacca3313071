// HTTP request handlers for the advisory endpoints

use super::extract::JsonBody;
use super::routes::AppState;
use crate::advisor::models::is_present;
use crate::advisor::{
    ChecklistDetailsRequest, FailurePredictionRequest, LegalProfile, SwotRequest,
    TaskGuidanceRequest,
};
use crate::cache::{CacheKey, CacheOutcome, Operation};
use crate::error::{ApiError, GatewayError};
use crate::metrics::gather_metrics;
use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, warn};

/// Response header reporting how the cache-aside lookup was resolved.
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

const ADVISOR_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// JSON response tagged with the cache outcome.
fn cached_json(body: Value, outcome: CacheOutcome) -> Response {
    ([(CACHE_STATUS_HEADER, outcome.as_str())], Json(body)).into_response()
}

pub async fn root_handler() -> &'static str {
    "SparkPath Server Started"
}

/// Handler for /api/generate-roadmap. Any JSON object is accepted as the
/// founder's form.
pub async fn generate_roadmap_handler(
    State(state): State<AppState>,
    JsonBody(form_data): JsonBody<Value>,
) -> Result<Response, ApiError> {
    let failure = |e: GatewayError| {
        error!("Roadmap generation failed: {}", e);
        ApiError::envelope(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate roadmap",
            Some(e.public_message()),
        )
    };

    let key = CacheKey::new(Operation::Roadmap, &form_data).map_err(failure)?;
    let producer = async { state.advisor.roadmap(&form_data).await };
    let cached = state
        .cache
        .get_or_compute(&key, state.ttl(Operation::Roadmap), || producer)
        .await
        .map_err(failure)?;

    Ok(cached_json(
        json!({ "success": true, "roadmap": cached.value }),
        cached.outcome,
    ))
}

pub async fn task_guidance_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TaskGuidanceRequest>,
) -> Result<Response, ApiError> {
    if !is_present(&request.task_title) || !is_present(&request.form_data) {
        return Err(ApiError::envelope(
            StatusCode::BAD_REQUEST,
            "Task title and form data are required.",
            None,
        ));
    }

    let failure = |e: GatewayError| {
        error!("Task guidance failed: {}", e);
        ApiError::envelope(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate task guidance",
            Some(e.public_message()),
        )
    };

    let key = CacheKey::new(Operation::TaskGuidance, &request).map_err(failure)?;
    let producer = async { state.advisor.task_guidance(&request).await };
    let cached = state
        .cache
        .get_or_compute(&key, state.ttl(Operation::TaskGuidance), || producer)
        .await
        .map_err(failure)?;

    Ok(cached_json(
        json!({ "success": true, "data": cached.value }),
        cached.outcome,
    ))
}

/// Handler for /api/failure-prediction. Inputs are forwarded as given; the
/// advisor decides what it can do with missing fields.
pub async fn failure_prediction_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<FailurePredictionRequest>,
) -> Result<Response, ApiError> {
    let failure = |e: GatewayError| {
        error!("Failure prediction failed: {}", e);
        ApiError::envelope(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server error",
            Some(e.public_message()),
        )
    };

    let key = CacheKey::new(Operation::FailurePrediction, &request).map_err(failure)?;
    let producer = async { state.advisor.failure_prediction(&request).await };
    let cached = state
        .cache
        .get_or_compute(&key, state.ttl(Operation::FailurePrediction), || producer)
        .await
        .map_err(failure)?;

    Ok(cached_json(cached.value, cached.outcome))
}

pub async fn swot_analysis_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SwotRequest>,
) -> Result<Response, ApiError> {
    if !is_present(&request.startup_data) {
        return Err(ApiError::plain(
            StatusCode::BAD_REQUEST,
            "Startup profile data is required",
        ));
    }

    let failure = |e: GatewayError| {
        error!("SWOT analysis failed: {}", e);
        ApiError::detailed(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred while generating the analysis",
            e.public_message(),
        )
    };

    let key = CacheKey::new(Operation::SwotAnalysis, &request).map_err(failure)?;
    let producer = async { state.advisor.swot_analysis(&request).await };
    let cached = state
        .cache
        .get_or_compute(&key, state.ttl(Operation::SwotAnalysis), || producer)
        .await
        .map_err(failure)?;

    Ok(cached_json(cached.value, cached.outcome))
}

fn jurisdiction_required() -> ApiError {
    ApiError::plain(StatusCode::BAD_REQUEST, "Country and region are required")
}

fn checklist_failure(e: GatewayError) -> ApiError {
    error!("Checklist generation failed: {}", e);
    ApiError::plain(StatusCode::INTERNAL_SERVER_ERROR, e.public_message())
}

/// Handler for /api/checklist: legal and compliance items for a jurisdiction.
pub async fn checklist_handler(
    State(state): State<AppState>,
    JsonBody(profile): JsonBody<LegalProfile>,
) -> Result<Response, ApiError> {
    if !profile.has_jurisdiction() {
        return Err(jurisdiction_required());
    }

    let key = CacheKey::new(Operation::Checklist, &profile).map_err(checklist_failure)?;
    let producer = async { state.advisor.checklist(&profile).await };
    let cached = state
        .cache
        .get_or_compute(&key, state.ttl(Operation::Checklist), || producer)
        .await
        .map_err(checklist_failure)?;

    Ok(cached_json(cached.value, cached.outcome))
}

/// Handler for /api/checklist/:item_id/details.
pub async fn checklist_details_handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    JsonBody(profile): JsonBody<LegalProfile>,
) -> Result<Response, ApiError> {
    if !profile.has_jurisdiction() {
        return Err(jurisdiction_required());
    }

    let request = ChecklistDetailsRequest { item_id, profile };
    let key = CacheKey::new(Operation::ChecklistDetails, &request).map_err(checklist_failure)?;
    let producer = async { state.advisor.checklist_details(&request).await };
    let cached = state
        .cache
        .get_or_compute(&key, state.ttl(Operation::ChecklistDetails), || producer)
        .await
        .map_err(checklist_failure)?;

    Ok(cached_json(cached.value, cached.outcome))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

impl HealthCheck {
    fn ok(message: String) -> Self {
        Self {
            status: "ok".to_string(),
            message,
        }
    }

    fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
        }
    }
}

/// Handler for /health. The gateway keeps serving while the advisor or the
/// cache store is down, so failures there degrade rather than fail health.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    let advisor_check = match tokio::time::timeout(ADVISOR_PROBE_TIMEOUT, state.advisor.ping()).await
    {
        Ok(Ok(())) => HealthCheck::ok("Advisor service reachable".to_string()),
        Ok(Err(e)) => {
            overall_status = HealthStatus::Degraded;
            HealthCheck::error(e.to_string())
        }
        Err(_) => {
            overall_status = HealthStatus::Degraded;
            HealthCheck::error(format!(
                "No answer within {}s",
                ADVISOR_PROBE_TIMEOUT.as_secs()
            ))
        }
    };
    checks.insert("advisor".to_string(), advisor_check);

    let cache_check = if !state.cache.is_enabled() {
        HealthCheck::ok("Caching disabled".to_string())
    } else {
        let stats = state.cache.stats();
        match state.cache.ping().await {
            Ok(()) => HealthCheck::ok(format!(
                "{} store: {} hits, {} misses, {} bypasses",
                state.cache.backend(),
                stats.hits,
                stats.misses,
                stats.bypasses
            )),
            Err(e) => {
                overall_status = HealthStatus::Degraded;
                HealthCheck::error(format!("{} store: {}", state.cache.backend(), e))
            }
        }
    };
    checks.insert("cache".to_string(), cache_check);

    checks.insert(
        "conversations".to_string(),
        HealthCheck::ok(format!(
            "{} sessions in memory",
            state.conversations.session_count()
        )),
    );

    if overall_status != HealthStatus::Healthy {
        warn!("Health check degraded");
    }

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for /metrics (Prometheus text exposition format).
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}
