//! Conversation scope context.

use serde::{Deserialize, Serialize};

/// Identifies the conversation scope a tool invocation runs in.
///
/// Resolved by the host runtime per request and injected into the tool. When
/// no active scope exists the tool receives `None` and operations that need a
/// billing context fail softly with an actionable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeContext {
    /// Conversation/thread id the state document is keyed by.
    pub scope_id: String,
    /// Account charged for metered operations.
    pub owner_id: String,
}

impl ScopeContext {
    #[must_use]
    pub fn new(scope_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            scope_id: scope_id.into(),
            owner_id: owner_id.into(),
        }
    }
}
