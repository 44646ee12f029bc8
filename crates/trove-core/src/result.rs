//! Result envelope for agent-invocable tool operations.
//!
//! Tool operations never raise to the agent runtime. Every operation resolves
//! to either a success payload (arbitrary JSON) or a failure carrying a short
//! human-readable message.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of one tool operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ToolResult {
    Success { output: serde_json::Value },
    Failure { message: String },
}

impl ToolResult {
    /// Build a success result from any serializable payload.
    ///
    /// Serialization failures degrade to a failure result rather than
    /// panicking; tool operations must never raise.
    pub fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(output) => Self::Success { output },
            Err(e) => Self::fail(format!("Failed to serialize tool output: {e}")),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The success payload, if any.
    #[must_use]
    pub const fn output(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Success { output } => Some(output),
            Self::Failure { .. } => None,
        }
    }

    /// The failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message } => Some(message),
        }
    }
}
