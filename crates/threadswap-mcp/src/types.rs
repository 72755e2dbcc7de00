// Rust guideline compliant 2026-10-19

//! MCP tool input and output types for Threadswap.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use threadswap_app::Page;
use threadswap_core::{Finding, Item, LedgerSummary, PointTransaction};

/// Empty input for tools without parameters.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct EmptyInput {}

/// Input for tools that only need the acting user.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ActorInput {
    /// Username or user ID of the acting user.
    pub actor: String,
}

/// Input parameters for the `browse_items` tool.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct BrowseInput {
    /// Acting user; their own items are hidden when set.
    pub actor: Option<String>,
    /// Filter by category (tops, bottoms, outerwear, shoes, accessories, dresses, activewear).
    pub category: Option<String>,
    /// Filter by size label.
    pub size: Option<String>,
    /// Filter by condition (excellent, good, fair, worn).
    pub condition: Option<String>,
    /// Text matched against title, description, tags and brand.
    pub search: Option<String>,
    /// Page number (1-based).
    pub page: Option<usize>,
    /// Results per page.
    pub page_size: Option<usize>,
}

/// Input parameters for the `show_item` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ShowItemInput {
    /// Item ID (full or partial).
    pub id: String,
}

/// Input parameters for the `submit_item` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SubmitItemInput {
    /// Username or user ID of the owner.
    pub actor: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Garment type such as "jeans".
    pub item_type: String,
    pub size: String,
    pub condition: String,
    pub color: String,
    pub brand: Option<String>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Image references, at least one.
    pub images: Vec<String>,
}

/// Input for tools acting on a single item.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ItemActionInput {
    /// Username or user ID of the acting user.
    pub actor: String,
    /// Item ID (full or partial).
    pub id: String,
}

/// Input parameters for the `reject_item` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RejectItemInput {
    /// Username or user ID of the moderating administrator.
    pub actor: String,
    /// Item ID (full or partial).
    pub id: String,
    /// Reason shown to the owner.
    pub reason: String,
}

/// Output payload for the `toggle_favorite` tool.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteResult {
    pub item_id: String,
    /// Whether the item is now a favorite.
    pub favorited: bool,
}

/// Input parameters for the `create_swap` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CreateSwapInput {
    /// Username or user ID of the requester.
    pub actor: String,
    /// The requester's item (full or partial ID).
    pub offered: String,
    /// The wanted item (full or partial ID).
    pub requested: String,
    pub message: Option<String>,
}

/// Input parameters for the `respond_swap` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RespondSwapInput {
    /// Username or user ID of the requested item's owner.
    pub actor: String,
    /// Swap ID (full or partial).
    pub id: String,
    /// `accepted` or `rejected`.
    pub decision: String,
    pub message: Option<String>,
}

/// Input for tools acting on a single swap.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SwapActionInput {
    /// Username or user ID of the acting user.
    pub actor: String,
    /// Swap ID (full or partial).
    pub id: String,
}

/// Input parameters for the `list_swaps` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ListSwapsInput {
    /// Username or user ID of the acting user.
    pub actor: String,
    /// List requests for the actor's items instead of their own requests.
    pub received: Option<bool>,
    /// Filter by swap status.
    pub status: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// Input parameters for the `pending_items` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PendingInput {
    /// Username or user ID of an administrator.
    pub actor: String,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// Input parameters for the `ledger` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct LedgerInput {
    /// Username or user ID of the acting user.
    pub actor: String,
    /// Whose ledger to read; administrators only for other users.
    pub user: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// Output payload for the `ledger` tool.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerResult {
    pub user_id: String,
    pub balance: i64,
    pub summary: LedgerSummary,
    pub entries: Page<PointTransaction>,
}

/// Input parameters for the `grant_points` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GrantPointsInput {
    /// Username or user ID of an administrator.
    pub actor: String,
    /// Recipient username or user ID.
    pub user: String,
    pub amount: i64,
    pub description: Option<String>,
}

/// Input parameters for the `refund_transaction` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RefundInput {
    /// Username or user ID of an administrator.
    pub actor: String,
    /// Transaction ID (full or partial).
    pub transaction: String,
    pub reason: Option<String>,
}

/// Output payload for the `audit` tool.
#[derive(Debug, Clone, Serialize)]
pub struct AuditResult {
    pub findings: Vec<Finding>,
    pub errors: usize,
    pub warnings: usize,
}

/// Payload of the `threadswap://available` resource.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableResource {
    pub items: Vec<Item>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
