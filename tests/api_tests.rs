// HTTP surface tests against a stub advisor

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{test_app, test_app_with, DownStore};
use serde_json::json;
use sparkpath_gateway::cache::{CacheStore, MemoryStore};
use sparkpath_gateway::config::AppConfig;
use sparkpath_gateway::server::SUGGESTED_QUESTIONS;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_root_liveness_text() {
    let app = test_app();
    let response = app.get("/api").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "SparkPath Server Started");
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_task_guidance_requires_title_and_form() {
    let app = test_app();

    let response = app.post("/api/task-guidance", json!({})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!({"success": false, "message": "Task title and form data are required."})
    );

    let response = app
        .post("/api/task-guidance", json!({"taskTitle": "", "formData": {"industry": "ai"}}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.advisor.calls(), 0);
}

#[tokio::test]
async fn test_task_guidance_wraps_advisor_payload() {
    let app = test_app();
    let response = app
        .post(
            "/api/task-guidance",
            json!({"taskTitle": "Register the company", "formData": {"country": "India"}}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["operation"], json!("task_guidance"));
    assert_eq!(body["data"]["input"]["taskTitle"], json!("Register the company"));
}

#[tokio::test]
async fn test_empty_body_without_content_type_reaches_validation() {
    let app = test_app();
    let response = app
        .request(
            Request::builder()
                .method(Method::POST)
                .uri("/api/task-guidance")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["message"],
        json!("Task title and form data are required.")
    );
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = test_app();
    let response = app.post_raw("/api/generate-roadmap", "{\"industry\":").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));
    assert_eq!(app.advisor.calls(), 0);
}

#[tokio::test]
async fn test_checklist_requires_country_and_region() {
    let app = test_app();

    let response = app.post("/api/checklist", json!({"industry": "fintech"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({"error": "Country and region are required"}));

    let response = app
        .post("/api/checklist/business-registration/details", json!({"country": "US"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({"error": "Country and region are required"}));
}

#[tokio::test]
async fn test_array_bodies_do_not_fill_fields() {
    let app = test_app();

    let guidance = app
        .post(
            "/api/task-guidance",
            json!(["Register company", {"country": "India"}]),
        )
        .await;
    assert_eq!(guidance.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        guidance.json(),
        json!({"success": false, "message": "Task title and form data are required."})
    );

    let checklist = app.post("/api/checklist", json!(["US", "CA"])).await;
    assert_eq!(checklist.status, StatusCode::BAD_REQUEST);
    assert_eq!(checklist.json(), json!({"error": "Country and region are required"}));

    let mentor = app.post("/api/mentor/ask", json!(["s1", "Hello"])).await;
    assert_eq!(mentor.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.advisor.calls(), 0);
}

#[tokio::test]
async fn test_checklist_details_forwards_item_id() {
    let app = test_app();
    let response = app
        .post(
            "/api/checklist/gst-registration/details",
            json!({"country": "India", "region": "Karnataka", "industry": "saas"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let input = &response.json()["input"];
    assert_eq!(input["itemId"], json!("gst-registration"));
    assert_eq!(input["region"], json!("Karnataka"));
}

#[tokio::test]
async fn test_checklist_details_keyed_by_item() {
    let app = test_app();
    let profile = json!({"country": "US", "region": "CA"});

    app.post("/api/checklist/ein/details", profile.clone()).await;
    let other = app.post("/api/checklist/trademark/details", profile).await;

    assert_eq!(other.cache_status(), Some("miss"));
    assert_eq!(app.advisor.calls(), 2);
}

#[tokio::test]
async fn test_swot_requires_startup_data() {
    let app = test_app();
    let response = app.post("/api/swot-analysis", json!({"startupData": null})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({"error": "Startup profile data is required"}));
}

#[tokio::test]
async fn test_failure_prediction_returns_advisor_payload_as_is() {
    let app = test_app();
    let response = app
        .post(
            "/api/failure-prediction",
            json!({"industry": "edtech", "budget": 20000, "teamSize": 3, "marketSize": "small", "country": "Kenya"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["operation"], json!("failure_prediction"));
    assert_eq!(body["input"]["teamSize"], json!(3));
}

#[tokio::test]
async fn test_suggested_questions_stable() {
    let app = test_app();
    let first = app.get("/api/mentor/suggested-questions").await;
    let second = app.get("/api/mentor/suggested-questions").await;

    assert_eq!(first.status, StatusCode::OK);
    let questions = first.json()["questions"].as_array().unwrap().clone();
    assert_eq!(questions.len(), 10);
    assert_eq!(questions[0], json!("How do I find my first customers?"));
    assert_eq!(questions, SUGGESTED_QUESTIONS.map(|q| json!(q)).to_vec());
    assert_eq!(first.json(), second.json());
}

#[tokio::test]
async fn test_identical_roadmap_requests_hit_cache() {
    let app = test_app();
    let body = json!({"industry": "fintech", "budget": 50000, "teamSize": 4});

    let first = app.post("/api/generate-roadmap", body.clone()).await;
    let second = app.post("/api/generate-roadmap", body).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.cache_status(), Some("miss"));
    assert_eq!(second.cache_status(), Some("hit"));
    assert_eq!(first.json(), second.json());
    assert_eq!(first.json()["success"], json!(true));
    assert_eq!(app.advisor.calls(), 1);
}

#[tokio::test]
async fn test_reordered_fields_share_cache_entry() {
    let app = test_app();
    app.post_raw("/api/generate-roadmap", r#"{"industry":"fintech","budget":5}"#)
        .await;
    let second = app
        .post_raw("/api/generate-roadmap", r#"{"budget":5,"industry":"fintech"}"#)
        .await;

    assert_eq!(second.cache_status(), Some("hit"));
    assert_eq!(app.advisor.calls(), 1);
}

#[tokio::test]
async fn test_different_inputs_do_not_share_entries() {
    let app = test_app();
    let first = app.post("/api/generate-roadmap", json!({"industry": "fintech"})).await;
    let second = app.post("/api/generate-roadmap", json!({"industry": "health"})).await;

    assert_eq!(second.cache_status(), Some("miss"));
    assert_ne!(first.json(), second.json());
    assert_eq!(app.advisor.calls(), 2);
}

#[tokio::test]
async fn test_unreachable_cache_store_still_serves() {
    let app = test_app_with(AppConfig::default(), Arc::new(DownStore));
    let body = json!({"country": "US", "region": "NY"});

    let first = app.post("/api/checklist", body.clone()).await;
    let second = app.post("/api/checklist", body).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(first.cache_status(), Some("bypass"));
    assert_eq!(first.json()["operation"], json!("checklist"));
    assert_eq!(app.advisor.calls(), 2);
}

#[tokio::test]
async fn test_disabled_cache_always_calls_advisor() {
    let mut config = AppConfig::default();
    config.cache.enabled = false;
    let app = test_app_with(config, Arc::new(MemoryStore::new()));

    app.post("/api/swot-analysis", json!({"startupData": {"name": "Acme"}}))
        .await;
    let second = app
        .post("/api/swot-analysis", json!({"startupData": {"name": "Acme"}}))
        .await;

    assert_eq!(second.cache_status(), Some("disabled"));
    assert_eq!(app.advisor.calls(), 2);
}

#[tokio::test]
async fn test_advisor_failure_shapes() {
    let app = test_app();
    app.advisor.set_failing(true);

    let roadmap = app.post("/api/generate-roadmap", json!({"industry": "ai"})).await;
    assert_eq!(roadmap.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        roadmap.json(),
        json!({"success": false, "message": "Failed to generate roadmap", "error": "advisor overloaded"})
    );

    let guidance = app
        .post("/api/task-guidance", json!({"taskTitle": "Hire", "formData": {"a": 1}}))
        .await;
    assert_eq!(guidance.json()["message"], json!("Failed to generate task guidance"));

    let prediction = app.post("/api/failure-prediction", json!({})).await;
    assert_eq!(prediction.json()["message"], json!("Server error"));

    let swot = app
        .post("/api/swot-analysis", json!({"startupData": {"name": "Acme"}}))
        .await;
    assert_eq!(swot.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        swot.json(),
        json!({"error": "An error occurred while generating the analysis", "details": "advisor overloaded"})
    );

    let checklist = app
        .post("/api/checklist", json!({"country": "US", "region": "TX"}))
        .await;
    assert_eq!(checklist.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(checklist.json(), json!({"error": "advisor overloaded"}));

    let mentor = app
        .post("/api/mentor/ask", json!({"sessionId": "s1", "message": "Hi"}))
        .await;
    assert_eq!(mentor.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        mentor.json(),
        json!({"error": "An error occurred while processing your question", "details": "advisor overloaded"})
    );
    assert!(app.state.conversations.read("s1").is_empty());
}

#[tokio::test]
async fn test_advisor_failure_is_not_cached() {
    let app = test_app();
    let body = json!({"industry": "ai"});

    app.advisor.set_failing(true);
    let failed = app.post("/api/generate-roadmap", body.clone()).await;
    assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);

    app.advisor.set_failing(false);
    let recovered = app.post("/api/generate-roadmap", body).await;
    assert_eq!(recovered.status, StatusCode::OK);
    assert_eq!(recovered.cache_status(), Some("miss"));
}

#[tokio::test]
async fn test_mentor_ask_requires_session_and_message() {
    let app = test_app();
    let response = app.post("/api/mentor/ask", json!({"message": "Hello"})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({"error": "Session ID and message are required"}));
}

#[tokio::test]
async fn test_mentor_conversation_accumulates_history() {
    let app = test_app();
    let ask = |message: &'static str| {
        json!({"sessionId": "founder-1", "message": message, "formData": {"industry": "ai"}})
    };

    let first = app.post("/api/mentor/ask", ask("How do I price my product?")).await;
    let second = app.post("/api/mentor/ask", ask("How do I price my product?")).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.json()["historyLength"], json!(0));
    assert_eq!(second.json()["historyLength"], json!(2));
    assert_ne!(first.json(), second.json());
    assert_eq!(app.advisor.calls(), 2);

    let sent = app.advisor.mentor_requests.lock();
    assert!(sent[0].history.is_empty());
    assert_eq!(sent[1].history.len(), 2);
    assert_eq!(sent[1].session_id, "founder-1");
    drop(sent);

    let history = app.state.conversations.read("founder-1");
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].content, "How do I price my product?");
    assert_eq!(history[0].form_data, Some(json!({"industry": "ai"})));
    assert_eq!(history[1].content, "Answer #1 to: How do I price my product?");
}

#[tokio::test]
async fn test_mentor_reset() {
    let app = test_app();

    let missing = app.post("/api/mentor/reset", json!({})).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.json(), json!({"error": "Session ID is required"}));

    for _ in 0..3 {
        app.post("/api/mentor/ask", json!({"sessionId": "s9", "message": "Next step?"}))
            .await;
    }
    assert_eq!(app.state.conversations.read("s9").len(), 6);

    let reset = app.post("/api/mentor/reset", json!({"sessionId": "s9"})).await;
    assert_eq!(reset.status, StatusCode::OK);
    assert_eq!(
        reset.json(),
        json!({"success": true, "message": "Conversation reset successfully"})
    );
    assert!(app.state.conversations.read("s9").is_empty());

    let after = app
        .post("/api/mentor/ask", json!({"sessionId": "s9", "message": "Start over"}))
        .await;
    assert_eq!(after.json()["historyLength"], json!(0));
}

async fn seed_conversation_keys(store: &MemoryStore) {
    let ttl = Duration::from_secs(600);
    store
        .set("sparkpath:conversation:s7:summary", "\"old\"", ttl)
        .await
        .unwrap();
    store
        .set("sparkpath:conversation:s70:summary", "\"other\"", ttl)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_clears_conversation_keys_when_enabled() {
    let mut config = AppConfig::default();
    config.conversation.clear_cache_on_reset = true;
    let store = Arc::new(MemoryStore::new());
    seed_conversation_keys(&store).await;
    let app = test_app_with(config, store.clone());

    let reset = app.post("/api/mentor/reset", json!({"sessionId": "s7"})).await;
    assert_eq!(reset.status, StatusCode::OK);

    for _ in 0..100 {
        if store.len() == 1 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(store
        .get("sparkpath:conversation:s7:summary")
        .await
        .unwrap()
        .is_none());
    assert!(store
        .get("sparkpath:conversation:s70:summary")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_reset_leaves_cache_alone_by_default() {
    let store = Arc::new(MemoryStore::new());
    seed_conversation_keys(&store).await;
    let app = test_app_with(AppConfig::default(), store.clone());

    let reset = app.post("/api/mentor/reset", json!({"sessionId": "s7"})).await;
    assert_eq!(reset.status, StatusCode::OK);

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_cors_restricted_to_frontend() {
    let mut config = AppConfig::default();
    config.cors.frontend_base_url = Some("https://app.sparkpath.dev/".to_string());
    let app = test_app_with(config, Arc::new(MemoryStore::new()));

    let allowed = app
        .request(
            Request::builder()
                .uri("/api")
                .header("origin", "https://app.sparkpath.dev")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(
        allowed.headers.get("access-control-allow-origin").unwrap(),
        "https://app.sparkpath.dev"
    );

    let other = app
        .request(
            Request::builder()
                .uri("/api")
                .header("origin", "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert!(other.headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_health_reports_components() {
    let app = test_app();
    let healthy = app.get("/health").await;
    assert_eq!(healthy.status, StatusCode::OK);
    let body = healthy.json();
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["checks"]["cache"]["status"], json!("ok"));

    app.advisor.set_failing(true);
    let degraded = app.get("/health").await.json();
    assert_eq!(degraded["status"], json!("degraded"));
    assert_eq!(degraded["checks"]["advisor"]["status"], json!("error"));
}

#[tokio::test]
async fn test_metrics_exposed() {
    let app = test_app();
    app.get("/api").await;

    let response = app.get("/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("requests_total"));
}
