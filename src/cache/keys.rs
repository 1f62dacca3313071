// Cache key construction

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// Memoized advisory operations. The name is the first component of every
/// key so two operations never share an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Roadmap,
    TaskGuidance,
    FailurePrediction,
    SwotAnalysis,
    Checklist,
    ChecklistDetails,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Roadmap => "roadmap",
            Operation::TaskGuidance => "task-guidance",
            Operation::FailurePrediction => "failure-prediction",
            Operation::SwotAnalysis => "swot-analysis",
            Operation::Checklist => "checklist",
            Operation::ChecklistDetails => "checklist-details",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deterministic cache key: `<operation>:<sha256 of canonical JSON>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for `operation` applied to `input`.
    pub fn new<T: Serialize + ?Sized>(operation: Operation, input: &T) -> Result<Self> {
        let value = serde_json::to_value(input)?;
        Ok(Self::from_value(operation, &value))
    }

    pub fn from_value(operation: Operation, input: &Value) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(canonical_json(input).as_bytes());
        Self(format!("{}:{:x}", operation, hasher.finalize()))
    }

    /// Key under a free-form namespace, e.g. `conversation:<session>:`.
    pub fn scoped(namespace: &str, scope: &str) -> Self {
        Self(format!("{}:{}:", namespace, scope))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize `value` with object keys sorted at every depth and no
/// insignificant whitespace, so field order on the wire never affects keys.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
