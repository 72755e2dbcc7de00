// Rust guideline compliant 2026-10-19

//! Threadswap Core Library
//!
//! This crate provides the foundational components for the Threadswap exchange:
//! - Data models (Item, UserAccount, PointTransaction, SwapRequest)
//! - Item and swap status state machines
//! - Storage collaborator (in-memory and JSONL file stores)
//! - Ledger summaries and consistency audit
//! - Hash ID generation and resolution
//! - Error types and result handling

pub mod config;
pub mod error;
pub mod fsm;
pub mod identity;
pub mod ledger;
pub mod models;
pub mod storage;

pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use identity::IdKind;
pub use ledger::{Finding, LedgerSummary, Severity};
pub use models::{
    unix_now, Actor, Category, Condition, Item, ItemDraft, ItemProfileUpdate, ItemStatus,
    PointTransaction, Role, Size, SwapRequest, SwapStatus, TransactionKind, UserAccount,
};
pub use storage::{FileStore, MemoryStore, Posting, Snapshot, Store, Transaction};
