//! Agent-invocable operations, split by sub-resource.

mod enrichments;
mod items;
mod monitors;
mod searches;
mod websets;

pub use enrichments::CreateEnrichmentArgs;
pub use items::ListItemsArgs;
pub use monitors::{CreateMonitorArgs, UpdateMonitorArgs};
pub use searches::{CancelSearchArgs, CreateSearchArgs};
pub use websets::{CreateWebsetArgs, GetWebsetArgs, ListWebsetsArgs, PreviewWebsetArgs};
