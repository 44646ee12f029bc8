//! # trove-websets
//!
//! The agent-invocable websets tool: credit-metered, idempotent creation of
//! provider-managed research collections, plus the full operation surface
//! over searches, items, enrichments, and monitors.
//!
//! Workflow seams (creation-with-dedup, metered charging) are free functions
//! generic over small traits so their retry bounds and rollback paths are
//! testable without a network; the tool itself wires them to the concrete
//! provider client, credit ledger, and scope state store.

mod backend;
mod dedup;
mod error;
mod format;
mod metered;
mod ops;
mod progress;
mod tool;

pub use backend::WebsetBackend;
pub use dedup::{CreationOutcome, MAX_CREATE_ATTEMPTS, create_with_dedup};
pub use error::WebsetsError;
pub use format::{FormattedItem, format_item};
pub use metered::{ChargeOutcome, charge, charge_for_creation};
pub use ops::{
    CancelSearchArgs, CreateEnrichmentArgs, CreateMonitorArgs, CreateSearchArgs, CreateWebsetArgs,
    GetWebsetArgs, ListItemsArgs, ListWebsetsArgs, PreviewWebsetArgs, UpdateMonitorArgs,
};
pub use progress::ProgressFlags;
pub use tool::WebsetsTool;
