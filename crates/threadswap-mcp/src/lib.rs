// Rust guideline compliant 2026-10-19

//! Model Context Protocol server exposing Threadswap operations as tools.

pub mod server;
pub mod types;

pub use server::{run, McpOptions, McpServerError};
