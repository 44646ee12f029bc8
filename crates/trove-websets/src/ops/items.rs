//! Item sub-resource operations: list with cursor pagination, get.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use trove_core::ToolResult;

use crate::error::WebsetsError;
use crate::format::format_item;
use crate::tool::WebsetsTool;

fn default_limit() -> u64 {
    50
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListItemsArgs {
    pub webset_id: String,
    /// Items per page.
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// `next_cursor` from a previous page.
    #[serde(default)]
    pub cursor: Option<String>,
}

impl WebsetsTool {
    /// Page through a webset's items, formatted by entity type.
    pub async fn list_items(&self, args: ListItemsArgs) -> ToolResult {
        match self.list_items_inner(&args).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("list items", &e),
        }
    }

    async fn list_items_inner(&self, args: &ListItemsArgs) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        let page = client
            .list_items(&args.webset_id, args.limit, args.cursor.as_deref())
            .await?;

        let items: Vec<_> = page.data.iter().map(format_item).collect();
        tracing::info!(webset_id = %args.webset_id, count = items.len(), "retrieved items");

        Ok(json!({
            "webset_id": args.webset_id,
            "items": items,
            "total": items.len(),
            "limit": args.limit,
            "has_more": page.has_more,
            "next_cursor": page.next_cursor,
        }))
    }

    /// Full details for one item.
    pub async fn get_item(&self, webset_id: &str, item_id: &str) -> ToolResult {
        match self.get_item_inner(webset_id, item_id).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("get item", &e),
        }
    }

    async fn get_item_inner(
        &self,
        webset_id: &str,
        item_id: &str,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        let item = client.get_item(webset_id, item_id).await?;

        Ok(json!({
            "webset_id": webset_id,
            "item": format_item(&item),
        }))
    }
}
