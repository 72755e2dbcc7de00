// Rust guideline compliant 2026-10-19

//! Implementation of the `tsw serve` command.
//!
//! Runs the MCP server on stdio until the client disconnects.

use anyhow::Result;
use std::path::PathBuf;
use threadswap_mcp::McpOptions;

/// Starts the MCP server.
///
/// # Arguments
///
/// * `repo` - Workspace root to pin the server to
/// * `read_only` - Refuse every mutating tool
/// * `log_level` - error, warn, info or debug
/// * `log_file` - Append JSON logs here instead of stderr
///
/// # Errors
///
/// Returns an error if the log level is invalid, the log file cannot be
/// opened, or the transport fails.
pub fn execute(
    repo: Option<PathBuf>,
    read_only: bool,
    log_level: String,
    log_file: Option<PathBuf>,
) -> Result<()> {
    threadswap_mcp::run(McpOptions {
        repo,
        read_only,
        log_level,
        log_file,
    })?;
    Ok(())
}
