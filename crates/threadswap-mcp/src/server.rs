// Rust guideline compliant 2026-10-19

//! MCP server runtime for Threadswap.

use crate::types::{
    ActorInput, AuditResult, AvailableResource, BrowseInput, CreateSwapInput, EmptyInput,
    FavoriteResult, GrantPointsInput, ItemActionInput, LedgerInput, LedgerResult, ListSwapsInput,
    PendingInput, RefundInput, RejectItemInput, RespondSwapInput, ShowItemInput, SubmitItemInput,
    SwapActionInput,
};
use rmcp::handler::server::{router::tool::ToolRouter, wrapper::Parameters};
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, ErrorData, Implementation, ListResourceTemplatesResult,
    ListResourcesResult, PaginatedRequestParams, ProtocolVersion, RawResource,
    RawResourceTemplate, ReadResourceRequestParams, ReadResourceResult, ResourceContents,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{tool, tool_handler, tool_router, RoleServer, ServiceExt};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::PathBuf;
use thiserror::Error;
use threadswap_app::{
    browse_items, parse_category, parse_condition, parse_size, parse_swap_status, resolve_item_id,
    resolve_swap_id, resolve_transaction_id, resolve_user, user_ledger, user_stats, user_swaps,
    AppError, Approval, BrowseOptions, Engine, ErrorCode, ErrorEnvelope, Page, PlatformStats,
    Redemption, RepoContext, SuccessEnvelope, SwapDecision, SwapDirection, SwapOutcome, UserStats,
};
use threadswap_core::{
    ledger, Actor, Config, Error as CoreError, FileStore, Item, ItemDraft, PointTransaction,
    Severity, SwapRequest,
};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;

/// Runtime options for the MCP server.
#[derive(Debug, Clone)]
pub struct McpOptions {
    /// Optional workspace root to pin to.
    pub repo: Option<PathBuf>,
    /// Whether mutating tools are disabled.
    pub read_only: bool,
    /// Logging level.
    pub log_level: String,
    /// Optional log file path.
    pub log_file: Option<PathBuf>,
}

impl Default for McpOptions {
    fn default() -> Self {
        Self {
            repo: None,
            read_only: false,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// MCP server errors.
#[derive(Debug, Error)]
pub enum McpServerError {
    /// IO errors during runtime setup.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid log level provided.
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
    /// Transport or server errors.
    #[error("MCP server error: {0}")]
    Transport(String),
}

/// Runs the MCP server on stdio.
///
/// # Arguments
///
/// * `options` - MCP runtime options
///
/// # Errors
///
/// Returns an error if the runtime cannot be initialized or the server fails.
pub fn run(options: McpOptions) -> Result<(), McpServerError> {
    let _guard = init_tracing(&options)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        tracing::info!(read_only = options.read_only, "starting MCP server");
        let server = ThreadswapMcp::new(options);
        let service = server
            .serve(stdio())
            .await
            .map_err(|err| McpServerError::Transport(err.to_string()))?;
        service
            .waiting()
            .await
            .map_err(|err| McpServerError::Transport(err.to_string()))?;
        Ok(())
    })
}

fn init_tracing(options: &McpOptions) -> Result<Option<WorkerGuard>, McpServerError> {
    let level = parse_log_level(&options.log_level)?;

    if let Some(path) = &options.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        let subscriber = fmt()
            .with_max_level(level)
            .with_target(false)
            .json()
            .with_writer(writer)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
        return Ok(Some(guard));
    }

    // Stdout carries the protocol, so logs go to stderr.
    let subscriber = fmt()
        .with_max_level(level)
        .with_target(false)
        .json()
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(None)
}

fn parse_log_level(level: &str) -> Result<Level, McpServerError> {
    match level.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        other => Err(McpServerError::InvalidLogLevel(other.to_string())),
    }
}

fn parse_decision(value: &str) -> Result<SwapDecision, AppError> {
    match value.trim().to_lowercase().as_str() {
        "accept" | "accepted" => Ok(SwapDecision::Accepted),
        "reject" | "rejected" => Ok(SwapDecision::Rejected),
        other => Err(AppError::InvalidInput(format!(
            "Invalid decision: {} (expected accepted or rejected)",
            other
        ))),
    }
}

#[derive(Clone)]
struct ThreadswapMcp {
    tool_router: ToolRouter<Self>,
    options: McpOptions,
}

/// An opened data directory for the duration of one tool call.
struct Workspace {
    config: Config,
    engine: Engine<FileStore>,
}

impl Workspace {
    fn actor(&self, reference: &str) -> Result<Actor, AppError> {
        let snapshot = self.engine.snapshot()?;
        let user_id = resolve_user(reference, &snapshot)?;
        let account = snapshot.user(&user_id)?;
        Ok(Actor {
            user_id: account.id.clone(),
            role: account.role,
        })
    }

    fn page_size(&self, requested: Option<usize>) -> usize {
        self.config
            .clamp_page_size(requested, self.config.default_page_size)
    }

    fn admin_page_size(&self, requested: Option<usize>) -> usize {
        self.config
            .clamp_page_size(requested, self.config.admin_page_size)
    }

    fn item_id(&self, partial: &str) -> Result<String, AppError> {
        resolve_item_id(partial, &self.engine.snapshot()?)
    }

    fn swap_id(&self, partial: &str) -> Result<String, AppError> {
        resolve_swap_id(partial, &self.engine.snapshot()?)
    }
}

impl ThreadswapMcp {
    fn new(options: McpOptions) -> Self {
        Self {
            tool_router: Self::tool_router(),
            options,
        }
    }

    fn open(&self) -> Result<Workspace, AppError> {
        let repo = RepoContext::discover(self.options.repo.as_deref())?;
        Ok(Workspace {
            config: repo.load_config()?,
            engine: Engine::new(repo.open_store()?),
        })
    }

    fn ensure_writable(&self) -> Result<(), AppError> {
        if self.options.read_only {
            return Err(AppError::InvalidInput(
                "Server is running in read-only mode".to_string(),
            ));
        }
        Ok(())
    }

    fn browse_tool(&self, input: BrowseInput) -> Result<Page<Item>, AppError> {
        let workspace = self.open()?;
        let exclude_owner = match input.actor.as_deref() {
            Some(reference) => Some(workspace.actor(reference)?.user_id),
            None => None,
        };
        let options = BrowseOptions {
            category: input.category.as_deref().map(parse_category).transpose()?,
            size: input.size.as_deref().map(parse_size).transpose()?,
            condition: input.condition.as_deref().map(parse_condition).transpose()?,
            search: input.search,
            exclude_owner,
        };
        let snapshot = workspace.engine.snapshot()?;
        Ok(browse_items(
            &snapshot,
            &options,
            input.page.unwrap_or(1),
            workspace.page_size(input.page_size),
        ))
    }

    fn show_item_tool(&self, input: ShowItemInput) -> Result<Item, AppError> {
        let workspace = self.open()?;
        let item_id = workspace.item_id(&input.id)?;
        if self.options.read_only {
            return Ok(workspace.engine.snapshot()?.item(&item_id)?.clone());
        }
        workspace.engine.view_item(&item_id)
    }

    fn submit_item_tool(&self, input: SubmitItemInput) -> Result<Item, AppError> {
        self.ensure_writable()?;
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let draft = ItemDraft {
            title: input.title,
            description: input.description,
            category: parse_category(&input.category)?,
            item_type: input.item_type,
            size: parse_size(&input.size)?,
            condition: parse_condition(&input.condition)?,
            color: input.color,
            brand: input.brand,
            location: input.location,
            tags: input.tags.unwrap_or_default(),
        };
        workspace.engine.submit_item(&actor, draft, input.images)
    }

    fn approve_item_tool(&self, input: ItemActionInput) -> Result<Approval, AppError> {
        self.ensure_writable()?;
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let item_id = workspace.item_id(&input.id)?;
        workspace.engine.approve_item(&actor, &item_id)
    }

    fn reject_item_tool(&self, input: RejectItemInput) -> Result<Item, AppError> {
        self.ensure_writable()?;
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let item_id = workspace.item_id(&input.id)?;
        workspace.engine.reject_item(&actor, &item_id, &input.reason)
    }

    fn toggle_favorite_tool(&self, input: ItemActionInput) -> Result<FavoriteResult, AppError> {
        self.ensure_writable()?;
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let item_id = workspace.item_id(&input.id)?;
        let favorited = workspace.engine.toggle_favorite(&actor, &item_id)?;
        Ok(FavoriteResult { item_id, favorited })
    }

    fn redeem_item_tool(&self, input: ItemActionInput) -> Result<Redemption, AppError> {
        self.ensure_writable()?;
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let item_id = workspace.item_id(&input.id)?;
        workspace.engine.redeem_item(&actor, &item_id)
    }

    fn pending_items_tool(&self, input: PendingInput) -> Result<Page<Item>, AppError> {
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        workspace.engine.pending_items(
            &actor,
            input.page.unwrap_or(1),
            workspace.admin_page_size(input.page_size),
        )
    }

    fn create_swap_tool(&self, input: CreateSwapInput) -> Result<SwapRequest, AppError> {
        self.ensure_writable()?;
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let offered = workspace.item_id(&input.offered)?;
        let requested = workspace.item_id(&input.requested)?;
        workspace.engine.create_swap_request(
            &actor,
            &offered,
            &requested,
            input.message.as_deref(),
        )
    }

    fn respond_swap_tool(&self, input: RespondSwapInput) -> Result<SwapOutcome, AppError> {
        self.ensure_writable()?;
        let decision = parse_decision(&input.decision)?;
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let swap_id = workspace.swap_id(&input.id)?;
        workspace
            .engine
            .respond_to_swap(&actor, &swap_id, decision, input.message.as_deref())
    }

    fn complete_swap_tool(&self, input: SwapActionInput) -> Result<SwapOutcome, AppError> {
        self.ensure_writable()?;
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let swap_id = workspace.swap_id(&input.id)?;
        workspace.engine.complete_swap(&actor, &swap_id)
    }

    fn cancel_swap_tool(&self, input: SwapActionInput) -> Result<SwapOutcome, AppError> {
        self.ensure_writable()?;
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let swap_id = workspace.swap_id(&input.id)?;
        workspace.engine.cancel_swap(&actor, &swap_id)
    }

    fn list_swaps_tool(&self, input: ListSwapsInput) -> Result<Page<SwapRequest>, AppError> {
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let direction = if input.received.unwrap_or(false) {
            SwapDirection::Received
        } else {
            SwapDirection::Sent
        };
        let status = input.status.as_deref().map(parse_swap_status).transpose()?;
        let snapshot = workspace.engine.snapshot()?;
        Ok(user_swaps(
            &snapshot,
            &actor.user_id,
            direction,
            status,
            input.page.unwrap_or(1),
            workspace.page_size(input.page_size),
        ))
    }

    fn ledger_tool(&self, input: LedgerInput) -> Result<LedgerResult, AppError> {
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let snapshot = workspace.engine.snapshot()?;
        let user_id = match input.user.as_deref() {
            Some(reference) => resolve_user(reference, &snapshot)?,
            None => actor.user_id.clone(),
        };
        if user_id != actor.user_id && !actor.is_admin() {
            return Err(AppError::from(CoreError::Forbidden(
                "only administrators may read another user's ledger".to_string(),
            )));
        }

        Ok(LedgerResult {
            balance: snapshot.user(&user_id)?.points,
            summary: ledger::summarize(&snapshot, &user_id),
            entries: user_ledger(
                &snapshot,
                &user_id,
                input.page.unwrap_or(1),
                workspace.admin_page_size(input.page_size),
            ),
            user_id,
        })
    }

    fn grant_points_tool(&self, input: GrantPointsInput) -> Result<PointTransaction, AppError> {
        self.ensure_writable()?;
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let user_id = resolve_user(&input.user, &workspace.engine.snapshot()?)?;
        workspace.engine.grant_points(
            &actor,
            &user_id,
            input.amount,
            input.description.as_deref(),
        )
    }

    fn refund_tool(&self, input: RefundInput) -> Result<PointTransaction, AppError> {
        self.ensure_writable()?;
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        let transaction_id =
            resolve_transaction_id(&input.transaction, &workspace.engine.snapshot()?)?;
        workspace
            .engine
            .refund_transaction(&actor, &transaction_id, input.reason.as_deref())
    }

    fn user_stats_tool(&self, input: ActorInput) -> Result<UserStats, AppError> {
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        user_stats(&workspace.engine.snapshot()?, &actor.user_id)
    }

    fn platform_stats_tool(&self, input: ActorInput) -> Result<PlatformStats, AppError> {
        let workspace = self.open()?;
        let actor = workspace.actor(&input.actor)?;
        workspace.engine.platform_stats(&actor)
    }

    fn audit_tool(&self, _input: EmptyInput) -> Result<AuditResult, AppError> {
        let findings = self.open()?.engine.audit()?;
        let errors = findings
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
            .count();
        Ok(AuditResult {
            warnings: findings.len() - errors,
            errors,
            findings,
        })
    }

    fn available_resource(&self) -> Result<AvailableResource, AppError> {
        let workspace = self.open()?;
        let snapshot = workspace.engine.snapshot()?;
        let page = browse_items(
            &snapshot,
            &BrowseOptions::default(),
            1,
            workspace.config.max_page_size,
        );
        let message = (page.total == 0).then(|| "No items available".to_string());
        Ok(AvailableResource {
            total: page.total,
            items: page.items,
            message,
        })
    }
}

fn tool_success<T: Serialize>(result: T) -> Result<CallToolResult, ErrorData> {
    let payload = serde_json::to_string(&SuccessEnvelope::new(result)).map_err(|err| {
        ErrorData::internal_error("Failed to serialize response", Some(err.to_string().into()))
    })?;
    Ok(CallToolResult::success(vec![Content::text(payload)]))
}

#[tool_router(router = tool_router)]
impl ThreadswapMcp {
    /// Browses available items.
    #[tool(description = "Browse available items with optional filters.")]
    async fn browse_items(
        &self,
        params: Parameters<BrowseInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.browse_tool(params.0).map_err(map_app_error)?)
    }

    /// Shows an item and counts the view.
    #[tool(description = "Show an item by ID.")]
    async fn show_item(
        &self,
        params: Parameters<ShowItemInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.show_item_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Submit an item for moderation.")]
    async fn submit_item(
        &self,
        params: Parameters<SubmitItemInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.submit_item_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Approve a pending item and credit its owner (admin only).")]
    async fn approve_item(
        &self,
        params: Parameters<ItemActionInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.approve_item_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Reject a pending item with a reason (admin only).")]
    async fn reject_item(
        &self,
        params: Parameters<RejectItemInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.reject_item_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Add or remove an item from the actor's favorites.")]
    async fn toggle_favorite(
        &self,
        params: Parameters<ItemActionInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.toggle_favorite_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Redeem an available item with points.")]
    async fn redeem_item(
        &self,
        params: Parameters<ItemActionInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.redeem_item_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "List items awaiting moderation, oldest first (admin only).")]
    async fn pending_items(
        &self,
        params: Parameters<PendingInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.pending_items_tool(params.0).map_err(map_app_error)?)
    }

    /// Offers one item in exchange for another.
    #[tool(description = "Request a swap of the actor's item for another user's item.")]
    async fn create_swap(
        &self,
        params: Parameters<CreateSwapInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.create_swap_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Accept or reject a pending swap request.")]
    async fn respond_swap(
        &self,
        params: Parameters<RespondSwapInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.respond_swap_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Mark an accepted swap as completed.")]
    async fn complete_swap(
        &self,
        params: Parameters<SwapActionInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.complete_swap_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Cancel a swap request the actor made.")]
    async fn cancel_swap(
        &self,
        params: Parameters<SwapActionInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.cancel_swap_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "List swap requests sent or received by the actor.")]
    async fn list_swaps(
        &self,
        params: Parameters<ListSwapsInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.list_swaps_tool(params.0).map_err(map_app_error)?)
    }

    /// Reads a points ledger with its summary.
    #[tool(description = "Show a points ledger, newest first.")]
    async fn ledger(
        &self,
        params: Parameters<LedgerInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.ledger_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Grant bonus points to a user (admin only).")]
    async fn grant_points(
        &self,
        params: Parameters<GrantPointsInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.grant_points_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Refund a spent ledger entry (admin only).")]
    async fn refund_transaction(
        &self,
        params: Parameters<RefundInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.refund_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Show the actor's balance, listings and pending swaps.")]
    async fn user_stats(
        &self,
        params: Parameters<ActorInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.user_stats_tool(params.0).map_err(map_app_error)?)
    }

    #[tool(description = "Show platform-wide totals (admin only).")]
    async fn platform_stats(
        &self,
        params: Parameters<ActorInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.platform_stats_tool(params.0).map_err(map_app_error)?)
    }

    /// Checks ledger, item and swap invariants.
    #[tool(description = "Audit ledger, item and swap invariants.")]
    async fn audit(
        &self,
        params: Parameters<EmptyInput>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_success(self.audit_tool(params.0).map_err(map_app_error)?)
    }
}

#[tool_handler(router = self.tool_router)]
impl rmcp::ServerHandler for ThreadswapMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "threadswap".to_string(),
                title: Some("Threadswap MCP".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        let available = RawResource {
            uri: "threadswap://available".to_string(),
            name: "available".to_string(),
            title: Some("Available items".to_string()),
            description: Some("Items open for redemption or swap, newest first".to_string()),
            mime_type: Some("application/json".to_string()),
            size: None,
            icons: None,
            meta: None,
        }
        .no_annotation();

        Ok(ListResourcesResult::with_all_items(vec![available]))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, ErrorData> {
        let template = RawResourceTemplate {
            uri_template: "threadswap://itm-{id}".to_string(),
            name: "item".to_string(),
            title: Some("Item".to_string()),
            description: Some("Read an item by ID".to_string()),
            mime_type: Some("application/json".to_string()),
            icons: None,
        }
        .no_annotation();

        Ok(ListResourceTemplatesResult::with_all_items(vec![template]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.read_resource_by_uri(request.uri.as_str())
    }
}

impl ThreadswapMcp {
    fn read_resource_by_uri(&self, uri: &str) -> Result<ReadResourceResult, ErrorData> {
        let payload = if uri == "threadswap://available" {
            let available = self.available_resource().map_err(map_app_error)?;
            serde_json::to_string(&available)
        } else if let Some(id) = uri
            .strip_prefix("threadswap://")
            .filter(|id| id.starts_with("itm-"))
        {
            let workspace = self.open().map_err(map_app_error)?;
            let snapshot = workspace.engine.snapshot().map_err(map_app_error)?;
            let item_id = resolve_item_id(id, &snapshot).map_err(map_app_error)?;
            let item = snapshot
                .item(&item_id)
                .map_err(|err| map_app_error(err.into()))?;
            serde_json::to_string(item)
        } else {
            return Err(ErrorData::resource_not_found(
                "Resource not found",
                Some(serde_json::json!({ "uri": uri })),
            ));
        };

        let text = payload.map_err(|err| {
            ErrorData::internal_error("Failed to serialize resource", Some(err.to_string().into()))
        })?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: Some("application/json".to_string()),
                text,
                meta: None,
            }],
        })
    }
}

fn map_app_error(error: AppError) -> ErrorData {
    let envelope = ErrorEnvelope::from_error(&error);
    let data = serde_json::to_value(&envelope).ok();
    match envelope.code {
        ErrorCode::NotFound => ErrorData::resource_not_found(envelope.message, data),
        ErrorCode::AmbiguousId
        | ErrorCode::InvalidArgument
        | ErrorCode::InvalidInput
        | ErrorCode::RepoNotInitialized => ErrorData::invalid_params(envelope.message, data),
        ErrorCode::InvalidState
        | ErrorCode::Forbidden
        | ErrorCode::InsufficientFunds
        | ErrorCode::Conflict => ErrorData::invalid_request(envelope.message, data),
        ErrorCode::IoError
        | ErrorCode::JsonError
        | ErrorCode::StorageError
        | ErrorCode::Unknown => ErrorData::internal_error(envelope.message, data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use threadswap_core::{ItemStatus, Role, SwapStatus};

    fn init_repo() -> TempDir {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let repo = RepoContext::init(temp.path()).expect("Failed to init data dir");
        std::fs::File::create(repo.store_path()).expect("Failed to create store");
        let engine = Engine::new(repo.open_store().expect("Failed to open store"));
        let moderator = engine
            .register_user(None, "moderator", Role::Admin, 0)
            .expect("register admin");
        let moderator = Actor::admin(moderator.id);
        engine
            .register_user(None, "alice", Role::User, 0)
            .expect("register alice");
        engine
            .register_user(Some(&moderator), "bob", Role::User, 100)
            .expect("register bob");
        temp
    }

    fn server_for(temp: &TempDir, read_only: bool) -> ThreadswapMcp {
        ThreadswapMcp::new(McpOptions {
            repo: Some(temp.path().to_path_buf()),
            read_only,
            log_level: "info".to_string(),
            log_file: None,
        })
    }

    fn submit(server: &ThreadswapMcp, actor: &str, title: &str, condition: &str) -> Item {
        server
            .submit_item_tool(SubmitItemInput {
                actor: actor.to_string(),
                title: title.to_string(),
                description: "Gently worn, washed and folded".to_string(),
                category: "outerwear".to_string(),
                item_type: "jacket".to_string(),
                size: "L".to_string(),
                condition: condition.to_string(),
                color: "navy".to_string(),
                brand: None,
                location: Some("Leeds".to_string()),
                tags: Some(vec!["winter".to_string()]),
                images: vec!["jacket.jpg".to_string()],
            })
            .expect("submit failed")
    }

    fn approve(server: &ThreadswapMcp, id: &str) -> Approval {
        server
            .approve_item_tool(ItemActionInput {
                actor: "moderator".to_string(),
                id: id.to_string(),
            })
            .expect("approve failed")
    }

    #[test]
    fn test_submit_approve_redeem() {
        let temp = init_repo();
        let server = server_for(&temp, false);

        let item = submit(&server, "alice", "Wool coat", "excellent");
        assert_eq!(item.status, ItemStatus::PendingApproval);

        let pending = server
            .pending_items_tool(PendingInput {
                actor: "moderator".to_string(),
                page: None,
                page_size: None,
            })
            .expect("pending failed");
        assert_eq!(pending.total, 1);

        let approval = approve(&server, &item.id[..7]);
        assert_eq!(approval.owner_balance, 100);

        let browse = server
            .browse_tool(BrowseInput {
                actor: Some("bob".to_string()),
                search: Some("WOOL".to_string()),
                ..BrowseInput::default()
            })
            .expect("browse failed");
        assert_eq!(browse.total, 1);

        let redemption = server
            .redeem_item_tool(ItemActionInput {
                actor: "bob".to_string(),
                id: item.id.clone(),
            })
            .expect("redeem failed");
        assert_eq!(redemption.item.status, ItemStatus::Swapped);
        assert_eq!(redemption.balance, 0);

        let ledger = server
            .ledger_tool(LedgerInput {
                actor: "bob".to_string(),
                user: None,
                page: None,
                page_size: None,
            })
            .expect("ledger failed");
        assert_eq!(ledger.balance, 0);
        assert_eq!(ledger.summary.total_spent, 100);

        let audit = server.audit_tool(EmptyInput {}).expect("audit failed");
        assert_eq!(audit.errors, 0);
    }

    #[test]
    fn test_swap_lifecycle() {
        let temp = init_repo();
        let server = server_for(&temp, false);

        let coat = submit(&server, "alice", "Rain coat", "good");
        let parka = submit(&server, "bob", "Parka", "fair");
        approve(&server, &coat.id);
        approve(&server, &parka.id);

        let swap = server
            .create_swap_tool(CreateSwapInput {
                actor: "alice".to_string(),
                offered: coat.id.clone(),
                requested: parka.id.clone(),
                message: Some("Fancy a trade?".to_string()),
            })
            .expect("create swap failed");
        assert_eq!(swap.status, SwapStatus::Pending);

        let received = server
            .list_swaps_tool(ListSwapsInput {
                actor: "bob".to_string(),
                received: Some(true),
                status: Some("pending".to_string()),
                page: None,
                page_size: None,
            })
            .expect("list swaps failed");
        assert_eq!(received.total, 1);

        let accepted = server
            .respond_swap_tool(RespondSwapInput {
                actor: "bob".to_string(),
                id: swap.id.clone(),
                decision: "accepted".to_string(),
                message: None,
            })
            .expect("respond failed");
        assert_eq!(accepted.item_offered.status, ItemStatus::Reserved);
        assert_eq!(accepted.item_requested.status, ItemStatus::Reserved);

        let completed = server
            .complete_swap_tool(SwapActionInput {
                actor: "bob".to_string(),
                id: swap.id,
            })
            .expect("complete failed");
        assert_eq!(completed.swap.status, SwapStatus::Completed);
        assert_eq!(completed.item_requested.status, ItemStatus::Swapped);
    }

    #[test]
    fn test_invalid_decision_is_rejected() {
        let temp = init_repo();
        let server = server_for(&temp, false);

        let err = server
            .respond_swap_tool(RespondSwapInput {
                actor: "bob".to_string(),
                id: "swp-missing".to_string(),
                decision: "maybe".to_string(),
                message: None,
            })
            .expect_err("expected invalid decision");
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn test_non_admin_cannot_read_other_ledger() {
        let temp = init_repo();
        let server = server_for(&temp, false);

        let err = server
            .ledger_tool(LedgerInput {
                actor: "alice".to_string(),
                user: Some("bob".to_string()),
                page: None,
                page_size: None,
            })
            .expect_err("expected forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);

        let stats = server
            .platform_stats_tool(ActorInput {
                actor: "alice".to_string(),
            })
            .expect_err("expected forbidden");
        assert_eq!(stats.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn test_read_only_blocks_mutations() {
        let temp = init_repo();
        let writer = server_for(&temp, false);
        let item = submit(&writer, "alice", "Denim jacket", "worn");
        approve(&writer, &item.id);

        let server = server_for(&temp, true);
        let err = server
            .toggle_favorite_tool(ItemActionInput {
                actor: "bob".to_string(),
                id: item.id.clone(),
            })
            .expect_err("expected read-only error");
        assert!(matches!(err, AppError::InvalidInput(_)));

        let shown = server
            .show_item_tool(ShowItemInput {
                id: item.id.clone(),
            })
            .expect("show failed");
        assert_eq!(shown.views, 0);

        let stats = server
            .user_stats_tool(ActorInput {
                actor: "alice".to_string(),
            })
            .expect("stats failed");
        assert_eq!(stats.points, 25);
    }

    #[test]
    fn test_read_available_resource() {
        let temp = init_repo();
        let server = server_for(&temp, false);

        let empty = server.available_resource().expect("resource failed");
        assert_eq!(empty.total, 0);
        assert!(empty.message.is_some());

        let item = submit(&server, "alice", "Fleece", "good");
        approve(&server, &item.id);

        let result = server
            .read_resource_by_uri(&format!("threadswap://{}", item.id))
            .expect("read failed");
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => {
                assert!(text.contains("Fleece"));
            }
            ResourceContents::BlobResourceContents { .. } => {
                panic!("Unexpected blob resource contents")
            }
        }

        let missing = server.read_resource_by_uri("threadswap://nothing");
        assert!(missing.is_err());
    }
}
