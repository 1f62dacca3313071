// Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::{json, Value};
use sparkpath_gateway::advisor::{
    Advisor, ChecklistDetailsRequest, FailurePredictionRequest, LegalProfile, MentorRequest,
    SwotRequest, TaskGuidanceRequest,
};
use sparkpath_gateway::cache::{CacheAside, CacheStore, MemoryStore};
use sparkpath_gateway::config::AppConfig;
use sparkpath_gateway::error::{GatewayError, Result};
use sparkpath_gateway::server::{create_router, AppState};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Advisor stand-in. Every answer carries a call counter, so two responses
/// are only equal when the second one came from the cache.
#[derive(Default)]
pub struct StubAdvisor {
    calls: AtomicUsize,
    failing: AtomicBool,
    pub mentor_requests: Mutex<Vec<MentorRequest>>,
}

impl StubAdvisor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn respond(&self, operation: &str, input: Value) -> Result<Value> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError::Advisor {
                status: 503,
                message: "advisor overloaded".to_string(),
            });
        }
        Ok(json!({ "operation": operation, "input": input, "call": call }))
    }
}

#[async_trait]
impl Advisor for StubAdvisor {
    async fn roadmap(&self, form_data: &Value) -> Result<Value> {
        self.respond("roadmap", form_data.clone())
    }

    async fn task_guidance(&self, request: &TaskGuidanceRequest) -> Result<Value> {
        self.respond("task_guidance", serde_json::to_value(request)?)
    }

    async fn failure_prediction(&self, request: &FailurePredictionRequest) -> Result<Value> {
        self.respond("failure_prediction", serde_json::to_value(request)?)
    }

    async fn swot_analysis(&self, request: &SwotRequest) -> Result<Value> {
        self.respond("swot_analysis", serde_json::to_value(request)?)
    }

    async fn checklist(&self, profile: &LegalProfile) -> Result<Value> {
        self.respond("checklist", serde_json::to_value(profile)?)
    }

    async fn checklist_details(&self, request: &ChecklistDetailsRequest) -> Result<Value> {
        self.respond("checklist_details", serde_json::to_value(request)?)
    }

    async fn mentor(&self, request: &MentorRequest) -> Result<Value> {
        self.mentor_requests.lock().push(request.clone());
        let answer = self.respond("mentor", json!(request.message))?;
        Ok(json!({
            "response": format!("Answer #{} to: {}", answer["call"], request.message),
            "historyLength": request.history.len(),
        }))
    }

    async fn ping(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(GatewayError::AdvisorUnavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Cache store that is never reachable.
pub struct DownStore;

#[async_trait]
impl CacheStore for DownStore {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(GatewayError::CacheStore("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
        Err(GatewayError::CacheStore("connection refused".to_string()))
    }

    async fn delete_prefix(&self, _prefix: &str) -> Result<u64> {
        Err(GatewayError::CacheStore("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<()> {
        Err(GatewayError::CacheStore("connection refused".to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub advisor: Arc<StubAdvisor>,
}

pub fn test_app() -> TestApp {
    test_app_with(AppConfig::default(), Arc::new(MemoryStore::new()))
}

pub fn test_app_with(config: AppConfig, store: Arc<dyn CacheStore>) -> TestApp {
    let advisor = Arc::new(StubAdvisor::default());
    let cache = CacheAside::new(store, &config.cache);
    let state = AppState::new(config, advisor.clone(), cache);
    let router = create_router(state.clone()).expect("router");
    TestApp {
        router,
        state,
        advisor,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("UTF-8 body")
    }

    pub fn cache_status(&self) -> Option<&str> {
        self.headers.get("x-cache").and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body")
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: impl Into<Body>) -> TestResponse {
        self.request(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
    }
}
