// HTTP routes configuration

use super::handlers::{
    checklist_details_handler, checklist_handler, failure_prediction_handler,
    generate_roadmap_handler, health_handler, metrics_handler, root_handler,
    swot_analysis_handler, task_guidance_handler,
};
use super::mentor::{mentor_ask_handler, mentor_reset_handler, suggested_questions_handler};
use super::middleware::{cors_layer, request_id_layers, track_metrics};
use crate::advisor::Advisor;
use crate::cache::{CacheAside, Operation};
use crate::config::AppConfig;
use crate::conversation::ConversationRegistry;
use crate::error::Result;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub advisor: Arc<dyn Advisor>,
    pub cache: CacheAside,
    pub conversations: ConversationRegistry,
}

impl AppState {
    pub fn new(config: AppConfig, advisor: Arc<dyn Advisor>, cache: CacheAside) -> Self {
        let conversations = ConversationRegistry::new(config.conversation.max_turns);
        Self {
            config: Arc::new(config),
            advisor,
            cache,
            conversations,
        }
    }

    /// Configured lifetime of cached results for `operation`.
    pub fn ttl(&self, operation: Operation) -> Duration {
        let ttl = &self.config.cache.ttl;
        let seconds = match operation {
            Operation::Roadmap => ttl.roadmap,
            Operation::TaskGuidance => ttl.task_guidance,
            Operation::FailurePrediction => ttl.failure_prediction,
            Operation::SwotAnalysis => ttl.swot_analysis,
            Operation::Checklist => ttl.checklist,
            Operation::ChecklistDetails => ttl.checklist_details,
        };
        Duration::from_secs(seconds)
    }
}

pub fn create_router(state: AppState) -> Result<Router> {
    let (set_request_id, propagate_request_id) = request_id_layers();
    let cors = cors_layer(&state.config.cors)?;
    let body_limit = state.config.server.body_limit_bytes;

    let app = Router::new()
        .route("/api", get(root_handler))
        .route("/api/generate-roadmap", post(generate_roadmap_handler))
        .route("/api/task-guidance", post(task_guidance_handler))
        .route("/api/failure-prediction", post(failure_prediction_handler))
        .route("/api/swot-analysis", post(swot_analysis_handler))
        .route("/api/checklist", post(checklist_handler))
        .route("/api/checklist/:item_id/details", post(checklist_details_handler))
        .route("/api/mentor/ask", post(mentor_ask_handler))
        .route(
            "/api/mentor/suggested-questions",
            get(suggested_questions_handler),
        )
        .route("/api/mentor/reset", post(mentor_reset_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
