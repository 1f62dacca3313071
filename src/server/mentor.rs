// Mentor chat handlers
//
// Mentor answers depend on the conversation so far and are never cached.

use super::extract::JsonBody;
use super::routes::AppState;
use crate::advisor::models::{is_present, reply_text};
use crate::advisor::{MentorQuestion, MentorRequest};
use crate::cache::CacheKey;
use crate::conversation::Turn;
use crate::error::ApiError;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

/// Starter questions offered before the founder asks anything.
pub const SUGGESTED_QUESTIONS: [&str; 10] = [
    "How do I find my first customers?",
    "When should I hire my first employee?",
    "How much equity should I give to co-founders?",
    "What metrics should I focus on in my first year?",
    "How do I create an effective pitch deck?",
    "What's the best way to approach investors?",
    "How do I know if my startup idea is viable?",
    "What legal structure is best for my startup?",
    "How should I price my product or service?",
    "What are the most common mistakes first-time founders make?",
];

/// Session ids and messages are normally strings, but a numeric id is
/// accepted and used in its JSON spelling.
fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn present_text(value: &Option<Value>) -> Option<String> {
    value.as_ref().filter(|_| is_present(value)).map(as_text)
}

/// Handler for /api/mentor/ask.
///
/// The advisor sees the full prior history. Only a successful exchange is
/// recorded: the question and the answer are appended together afterwards.
pub async fn mentor_ask_handler(
    State(state): State<AppState>,
    JsonBody(question): JsonBody<MentorQuestion>,
) -> Result<Json<Value>, ApiError> {
    let (Some(session_id), Some(message)) = (
        present_text(&question.session_id),
        present_text(&question.message),
    ) else {
        return Err(ApiError::plain(
            StatusCode::BAD_REQUEST,
            "Session ID and message are required",
        ));
    };

    let request = MentorRequest {
        history: state.conversations.read(&session_id),
        session_id,
        message,
        form_data: question.form_data.filter(|v| !v.is_null()),
    };

    let reply = state.advisor.mentor(&request).await.map_err(|e| {
        error!("Mentor question failed for session {}: {}", request.session_id, e);
        ApiError::detailed(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred while processing your question",
            e.public_message(),
        )
    })?;

    state.conversations.append_exchange(
        &request.session_id,
        Turn::user(request.message.clone(), request.form_data.clone()),
        Turn::assistant(reply_text(&reply)),
    );

    Ok(Json(reply))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestedQuestions {
    pub questions: Vec<String>,
}

pub async fn suggested_questions_handler() -> Json<SuggestedQuestions> {
    Json(SuggestedQuestions {
        questions: SUGGESTED_QUESTIONS.iter().map(|q| q.to_string()).collect(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    #[serde(default)]
    pub session_id: Option<Value>,
}

/// Handler for /api/mentor/reset.
///
/// The gateway itself never writes `conversation:<id>:` keys. When
/// `conversation.clear_cache_on_reset` is set, keys of that shape left in a
/// shared Redis by earlier deployments are cleared in the background
/// without holding up the response.
pub async fn mentor_reset_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ResetRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(session_id) = present_text(&request.session_id) else {
        return Err(ApiError::plain(
            StatusCode::BAD_REQUEST,
            "Session ID is required",
        ));
    };

    state.conversations.reset(&session_id);
    if state.config.conversation.clear_cache_on_reset {
        state
            .cache
            .spawn_invalidate_prefix(CacheKey::scoped("conversation", &session_id));
    }
    info!("Conversation {} reset", session_id);

    Ok(Json(json!({
        "success": true,
        "message": "Conversation reset successfully",
    })))
}
