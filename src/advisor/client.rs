// HTTP client for the advisor service

use super::models::{
    ChecklistDetailsRequest, FailurePredictionRequest, LegalProfile, MentorRequest, SwotRequest,
    TaskGuidanceRequest,
};
use super::Advisor;
use crate::config::AdvisorConfig;
use crate::error::{GatewayError, Result};
use crate::metrics;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// reqwest-based [`Advisor`] talking JSON over HTTP.
///
/// Requests are not retried; timeouts come from [`AdvisorConfig`].
pub struct AdvisorClient {
    http_client: Client,
    base_url: String,
}

impl AdvisorClient {
    pub fn new(config: &AdvisorConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize + ?Sized + Sync>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let url = self.url(path);
        debug!("Calling advisor {} at {}", operation, url);
        let started = Instant::now();

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                metrics::record_advisor_call(operation, 0, started.elapsed().as_secs_f64());
                error!("Advisor {} request failed: {}", operation, e);
                transport_error(e)
            })?;

        let status = response.status();
        metrics::record_advisor_call(operation, status.as_u16(), started.elapsed().as_secs_f64());
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = extract_error_message(&text).unwrap_or_else(|| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text.clone()
                }
            });
            error!("Advisor {} returned {}: {}", operation, status, message);
            return Err(GatewayError::Advisor {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| GatewayError::Advisor {
            status: status.as_u16(),
            message: format!("Invalid response from advisor: {}", e),
        })
    }
}

/// Connection failures and timeouts mean the advisor is unavailable; anything
/// else reqwest reports is passed through.
fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() || e.is_connect() {
        GatewayError::AdvisorUnavailable(e.to_string())
    } else {
        GatewayError::Http(e)
    }
}

/// Pull a human-readable message out of an upstream error body.
///
/// Understands `{"error": "..."}`, `{"error": {"message": "..."}}`,
/// `{"message": "..."}` and `{"detail": "..."}`.
fn extract_error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let paths: [&[&str]; 4] = [&["error"], &["error", "message"], &["message"], &["detail"]];
    let message = paths.iter().find_map(|path| {
        path.iter()
            .try_fold(&parsed, |node, field| node.get(*field))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    message
}

#[async_trait]
impl Advisor for AdvisorClient {
    async fn roadmap(&self, form_data: &Value) -> Result<Value> {
        self.post_json("roadmap", "/api/roadmap", form_data).await
    }

    async fn task_guidance(&self, request: &TaskGuidanceRequest) -> Result<Value> {
        self.post_json("task_guidance", "/api/task-guidance", request)
            .await
    }

    async fn failure_prediction(&self, request: &FailurePredictionRequest) -> Result<Value> {
        self.post_json("failure_prediction", "/api/failure-prediction", request)
            .await
    }

    async fn swot_analysis(&self, request: &SwotRequest) -> Result<Value> {
        self.post_json("swot_analysis", "/api/swot-analysis", request)
            .await
    }

    async fn checklist(&self, profile: &LegalProfile) -> Result<Value> {
        self.post_json("checklist", "/api/checklist", profile).await
    }

    async fn checklist_details(&self, request: &ChecklistDetailsRequest) -> Result<Value> {
        self.post_json("checklist_details", "/api/checklist/details", request)
            .await
    }

    async fn mentor(&self, request: &MentorRequest) -> Result<Value> {
        self.post_json("mentor", "/api/mentor", request).await
    }

    async fn ping(&self) -> Result<()> {
        let response = self
            .http_client
            .get(self.url("/api"))
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(GatewayError::Advisor {
                status: status.as_u16(),
                message: format!("liveness probe returned {}", status),
            })
        }
    }
}
