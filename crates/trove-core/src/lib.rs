//! # trove-core
//!
//! Core types shared across all Trove crates:
//! - Resource status enum and provider status normalization
//! - Tracked resource records and the per-scope state document
//! - Tool result envelope returned by agent-invocable operations
//! - Conversation scope context

pub mod result;
pub mod scope;
pub mod status;
pub mod tracked;

pub use result::ToolResult;
pub use scope::ScopeContext;
pub use status::{ResourceStatus, is_active_status, normalize_status};
pub use tracked::{TrackedMonitor, TrackedWebset, WebsetsState};
