// Rust guideline compliant 2026-10-19

//! Implementation of the `tsw init` command.
//!
//! Creates the `.threadswap` directory with an empty store and a default
//! configuration, and optionally bootstraps the first administrator.

use crate::output::{OutputFormatter, Report};
use crate::terminal::print_warning;
use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::Path;
use threadswap_app::{Engine, RepoContext};
use threadswap_core::Role;

/// Initializes a Threadswap data directory under `root`.
///
/// Existing files are left untouched, so running it twice is harmless.
///
/// # Arguments
///
/// * `root` - Directory that will contain `.threadswap/`
/// * `admin` - Username of an administrator to create if absent
/// * `formatter` - The output formatter to use
///
/// # Errors
///
/// Returns an error if:
/// - The directory, store or configuration cannot be written
/// - The administrator username is invalid
pub fn execute(root: &Path, admin: Option<String>, formatter: &dyn OutputFormatter) -> Result<()> {
    let repo = RepoContext::init(root)?;

    if !repo.store_path().exists() {
        fs::File::create(repo.store_path())?;
    }

    let engine = Engine::new(repo.open_store()?);
    let mut created_admin = None;
    if let Some(username) = admin {
        let snapshot = engine.snapshot()?;
        if snapshot.user_by_username(username.trim()).is_none() {
            created_admin = Some(engine.register_user(None, &username, Role::Admin, 0)?);
        } else {
            print_warning(&format!("User {} already exists; not created", username.trim()));
        }
    }

    let mut report = Report::new(
        format!("Threadswap initialized at {}", repo.data_dir().display()),
        &json!({
            "data_dir": repo.data_dir(),
            "store": repo.store_path(),
            "config": repo.config_path(),
            "admin": created_admin,
        }),
    )
    .field("Store", repo.store_path().display())
    .field("Config", repo.config_path().display());
    if let Some(admin) = &created_admin {
        report = report.field("Admin", format!("{} ({})", admin.username, admin.id));
    }

    println!("{}", formatter.format_report(&report));
    Ok(())
}
