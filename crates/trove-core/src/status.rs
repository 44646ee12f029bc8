//! Resource status enum and provider status normalization.
//!
//! Provider status values may arrive as JSON strings, nested objects, or be
//! absent entirely. Everything is coerced to a plain string before crossing a
//! serialization boundary (local storage, API response, tool output).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a provider-managed resource.
///
/// Websets report `pending | running | idle | cancelled`; sub-operations
/// (searches, enrichments) additionally report `completed`. Anything the
/// provider invents beyond these survives as a raw string through
/// [`normalize_status`] instead of being forced into this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    Pending,
    Running,
    Idle,
    Completed,
    Cancelled,
    Error,
}

impl ResourceStatus {
    /// Return the string representation used in storage and API payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Idle => "idle",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Error => "error",
        }
    }

    /// Parse a normalized status string. Returns `None` for anything outside
    /// the known set.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "idle" => Some(Self::Idle),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Whether this status means the resource is still doing work.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coerce a raw provider status value to a plain string.
///
/// - `None` maps to `None`.
/// - A JSON string passes through unchanged.
/// - Anything else (object, number, ...) is stringified via its canonical
///   JSON text.
///
/// Idempotent: normalizing an already-normalized value returns it unchanged.
#[must_use]
pub fn normalize_status(raw: Option<&serde_json::Value>) -> Option<String> {
    match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Convenience for values already known to be optional strings.
#[must_use]
pub fn is_active_status(status: Option<&str>) -> bool {
    status
        .and_then(ResourceStatus::parse)
        .is_some_and(ResourceStatus::is_active)
}
