//! # trove-agents
//!
//! Default-agent provisioning for the platform, plus the thin SDK client it
//! runs on. Provisioning is idempotent per account and safe under
//! concurrency; agent behavior is always read from central configuration at
//! run time, so installs never need syncing.

mod error;
mod platform;
mod service;
mod tracker;

pub use error::PlatformError;
pub use platform::{
    Account, AgentMetadata, AgentRecord, CreateAgentRequest, PlatformClient, ThreadRecord,
};
pub use service::{
    AgentPlatform, AgentStats, DefaultAgentConfig, DefaultAgentService, EnsureOutcome,
    InstallReport,
};
pub use tracker::{BeginOutcome, InstallState, InstallTracker};
