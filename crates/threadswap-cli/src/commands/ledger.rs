// Rust guideline compliant 2026-10-19

//! Implementation of the `tsw ledger` commands.

use crate::commands::Session;
use crate::output::{OutputFormatter, Report};
use anyhow::Result;
use threadswap_app::{resolve_transaction_id, user_ledger, AppError};
use threadswap_core::{ledger, Error as CoreError};

/// Ledger actions.
#[derive(Debug, clap::Subcommand)]
pub enum LedgerAction {
    /// Show a points ledger, newest first
    Show {
        /// Username or user ID (admins only; defaults to yourself)
        user: Option<String>,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Results per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Refund a spent entry (admin only)
    Refund {
        /// Transaction ID (full or partial)
        transaction: String,

        /// Ledger description for the refund
        #[arg(long)]
        reason: Option<String>,
    },
}

/// Executes a ledger action.
///
/// # Errors
///
/// Returns an error if a reference does not resolve, a non-admin asks for
/// someone else's ledger, or the engine refuses the refund.
pub fn execute(session: &Session, action: LedgerAction, formatter: &dyn OutputFormatter) -> Result<()> {
    match action {
        LedgerAction::Show {
            user,
            page,
            page_size,
        } => {
            let actor = session.actor()?;
            let account = match user {
                Some(reference) => session.user(&reference)?,
                None => session.user(&actor.user_id)?,
            };
            if account.id != actor.user_id && !actor.is_admin() {
                return Err(AppError::from(CoreError::Forbidden(
                    "only administrators may read another user's ledger".to_string(),
                ))
                .into());
            }

            let snapshot = session.engine().snapshot()?;
            let summary = ledger::summarize(&snapshot, &account.id);
            let entries = user_ledger(
                &snapshot,
                &account.id,
                page,
                session.admin_page_size(page_size),
            );
            println!("{}", formatter.format_ledger(&entries, &summary));
        }
        LedgerAction::Refund {
            transaction,
            reason,
        } => {
            let actor = session.actor()?;
            let snapshot = session.engine().snapshot()?;
            let transaction_id = resolve_transaction_id(&transaction, &snapshot)?;
            let refund =
                session
                    .engine()
                    .refund_transaction(&actor, &transaction_id, reason.as_deref())?;
            let balance = session.user(&refund.user)?.points;
            let report = Report::new(format!("Refunded {}", transaction_id), &refund)
                .field("Entry", &refund.id)
                .field("Amount", refund.amount)
                .field("Balance", balance);
            println!("{}", formatter.format_report(&report));
        }
    }

    Ok(())
}
