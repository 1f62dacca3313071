//! Request payloads exchanged with the advisor service.
//!
//! The same types are deserialized from gateway request bodies and hashed
//! into cache keys. Fields the client left out, or sent as `null`, are
//! omitted when serialized so both spellings share a cache entry.

use crate::conversation::Turn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JavaScript-style truthiness: missing, `null`, `false`, `0` and `""` are absent.
pub fn is_present(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Guidance for a single roadmap task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGuidanceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<Value>,
}

/// Inputs to the failure-probability estimate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailurePredictionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_size: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwotRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_data: Option<Value>,
}

/// Founder profile used to derive legal and compliance requirements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_market: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_statement: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_customer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_value_proposition: Option<Value>,
}

impl LegalProfile {
    pub fn has_jurisdiction(&self) -> bool {
        is_present(&self.country) && is_present(&self.region)
    }
}

/// Details for one checklist item under a given profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDetailsRequest {
    pub item_id: String,
    #[serde(flatten)]
    pub profile: LegalProfile,
}

/// Body of a mentor question as sent by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorQuestion {
    #[serde(default)]
    pub session_id: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub form_data: Option<Value>,
}

/// A mentor question forwarded to the advisor with the prior history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorRequest {
    pub session_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data: Option<Value>,
    pub history: Vec<Turn>,
}

/// Text of the mentor's answer, for recording in the conversation history.
///
/// The advisor's payload shape is not fixed; the first string found under a
/// well-known field wins, otherwise the whole payload is recorded.
pub fn reply_text(payload: &Value) -> String {
    const FIELDS: &[&str] = &["response", "reply", "answer", "message"];
    if let Value::String(text) = payload {
        return text.clone();
    }
    FIELDS
        .iter()
        .find_map(|field| payload.get(field).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| payload.to_string())
}
