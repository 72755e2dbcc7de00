// Rust guideline compliant 2026-10-19

//! Implementation of the `tsw doctor` command.
//!
//! Validates JSONL syntax of the store, then audits balances against the
//! ledger together with the item and swap invariants.

use crate::commands::Session;
use crate::output::OutputFormatter;
use anyhow::Result;
use std::path::Path;
use threadswap_core::{Finding, FileStore, Severity};

/// Executes the doctor command.
///
/// # Returns
///
/// Ok if no error-level finding was reported.
///
/// # Errors
///
/// Returns an error if:
/// - The repository is not initialized
/// - The store cannot be read
/// - The audit reports at least one error
pub fn execute(session: &Session, formatter: &dyn OutputFormatter) -> Result<()> {
    let store_path = session.data_dir().join(FileStore::FILE_NAME);
    let mut findings = syntax_findings(&store_path)?;
    findings.extend(session.engine().audit()?);

    println!("{}", formatter.format_findings(&findings));

    let errors = findings
        .iter()
        .filter(|finding| finding.severity == Severity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("Doctor found {} error(s).", errors);
    }

    Ok(())
}

/// Reports store lines that are not valid JSON.
///
/// The store skips such lines on load, so they never reach the audit.
pub fn syntax_findings(store_path: &Path) -> Result<Vec<Finding>> {
    if !store_path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(store_path)?;
    let findings = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| {
            serde_json::from_str::<serde_json::Value>(line)
                .err()
                .map(|err| Finding {
                    severity: Severity::Error,
                    subject: format!("line {}", idx + 1),
                    message: format!("Invalid JSON ({})", err),
                })
        })
        .collect();
    Ok(findings)
}
