// Session id -> ordered turn history

use super::models::Turn;
use crate::metrics;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Process-wide store of mentor conversations keyed by session id.
///
/// Sessions are created on first append and never expire. Concurrent appends
/// to the same session are each applied whole, in whatever order they reach
/// the lock.
#[derive(Debug, Clone, Default)]
pub struct ConversationRegistry {
    sessions: Arc<RwLock<HashMap<String, Vec<Turn>>>>,
    /// `0` means unbounded.
    max_turns: usize,
}

impl ConversationRegistry {
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_turns,
        }
    }

    /// Add a turn to the end of the session's history.
    pub fn append(&self, session_id: &str, turn: Turn) {
        self.append_all(session_id, [turn]);
    }

    /// Add a question and its answer as one adjacent pair. Concurrent
    /// exchanges on the same session never interleave.
    pub fn append_exchange(&self, session_id: &str, question: Turn, answer: Turn) {
        self.append_all(session_id, [question, answer]);
    }

    fn append_all<const N: usize>(&self, session_id: &str, turns: [Turn; N]) {
        let mut sessions = self.sessions.write();
        let history = sessions.entry(session_id.to_string()).or_default();
        history.extend(turns);

        if self.max_turns > 0 && history.len() > self.max_turns {
            let excess = history.len() - self.max_turns;
            history.drain(..excess);
            debug!("Trimmed {} old turns from session {}", excess, session_id);
        }

        metrics::update_conversation_sessions(sessions.len());
    }

    /// Full ordered history; empty for unknown sessions.
    pub fn read(&self, session_id: &str) -> Vec<Turn> {
        self.sessions
            .read()
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the session's history with an empty one.
    pub fn reset(&self, session_id: &str) {
        let mut sessions = self.sessions.write();
        sessions.insert(session_id.to_string(), Vec::new());
        debug!("Reset conversation {}", session_id);
        metrics::update_conversation_sessions(sessions.len());
    }

    /// Number of sessions seen since startup, including reset ones.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}
