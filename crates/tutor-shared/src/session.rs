//! Conversation-scoped continuity record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::context::AnalysisContext;

/// Default number of analysis contexts kept per session
pub const DEFAULT_HISTORY_CAP: usize = 20;

/// A student's session. History is most-recent-last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub history: VecDeque<AnalysisContext>,
}

impl Session {
    pub fn new(session_id: impl Into<String>, user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            created_at: now,
            last_active_at: now,
            history: VecDeque::new(),
        }
    }

    /// Synthesized id for requests that carry none: `{user_id}_{unix_seconds}`
    pub fn synthesize_id(user_id: &str, now: DateTime<Utc>) -> String {
        format!("{}_{}", user_id, now.timestamp())
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_active_at {
            self.last_active_at = now;
        }
    }

    /// Append a context, dropping the oldest entries beyond `cap`
    pub fn push_history(&mut self, context: AnalysisContext, cap: usize) {
        self.history.push_back(context);
        let cap = cap.max(1);
        while self.history.len() > cap {
            self.history.pop_front();
        }
    }

    pub fn last_context(&self) -> Option<&AnalysisContext> {
        self.history.back()
    }
}
