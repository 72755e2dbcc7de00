// Rust guideline compliant 2026-10-19

//! Shared application services for Threadswap.
//!
//! This crate hosts the lifecycle engine together with reusable,
//! non-CLI-specific helpers for data directory discovery, ID resolution,
//! listing and statistics, and standardized response envelopes.

pub mod engine;
pub mod error;
pub mod ids;
pub mod list;
pub mod repo;
pub mod response;

pub use engine::{Approval, Clock, Engine, Redemption, SwapDecision, SwapOutcome};
pub use error::{AppError, ErrorCode, Result};
pub use ids::{resolve_item_id, resolve_swap_id, resolve_transaction_id, resolve_user};
pub use list::{
    browse_items, favorite_items, parse_category, parse_condition, parse_item_status,
    parse_size, parse_swap_status, platform_stats, user_items, user_ledger, user_stats,
    user_swaps, BrowseOptions, Page, PlatformStats, SwapDirection, UserStats,
};
pub use repo::RepoContext;
pub use response::{ErrorEnvelope, SuccessEnvelope};
