// Rust guideline compliant 2026-10-19

//! Implementation of the `tsw user` commands.

use crate::commands::Session;
use crate::output::{OutputFormatter, Report};
use anyhow::Result;
use threadswap_app::user_stats;
use threadswap_core::{Role, UserAccount};

/// Account management actions.
#[derive(Debug, clap::Subcommand)]
pub enum UserAction {
    /// Register a new account
    Register {
        /// Username (3-30 letters, digits, '_' or '-')
        username: String,

        /// Create an administrator (requires an acting admin once one exists)
        #[arg(long)]
        admin: bool,

        /// Opening balance granted to the account (admin only)
        #[arg(long, default_value_t = 0)]
        points: i64,
    },

    /// List all accounts
    List,

    /// Show an account with its statistics
    Show {
        /// Username or user ID (defaults to the acting user)
        user: Option<String>,
    },

    /// Reactivate an account (admin only)
    Activate {
        /// Username or user ID
        user: String,
    },

    /// Deactivate an account (admin only)
    Deactivate {
        /// Username or user ID
        user: String,
    },

    /// Credit bonus points to an account (admin only)
    Grant {
        /// Username or user ID
        user: String,

        /// Points to credit
        amount: i64,

        /// Ledger description
        #[arg(long)]
        description: Option<String>,
    },
}

/// Executes a user action.
///
/// # Errors
///
/// Returns an error if the data directory is missing, a reference does not
/// resolve, or the engine refuses the operation.
pub fn execute(session: &Session, action: UserAction, formatter: &dyn OutputFormatter) -> Result<()> {
    match action {
        UserAction::Register {
            username,
            admin,
            points,
        } => register(session, &username, admin, points, formatter),
        UserAction::List => {
            let snapshot = session.engine().snapshot()?;
            let mut users: Vec<UserAccount> = snapshot.users().cloned().collect();
            users.sort_by(|a, b| a.username.cmp(&b.username));
            println!("{}", formatter.format_users(&users));
            Ok(())
        }
        UserAction::Show { user } => show(session, user, formatter),
        UserAction::Activate { user } => set_active(session, &user, true, formatter),
        UserAction::Deactivate { user } => set_active(session, &user, false, formatter),
        UserAction::Grant {
            user,
            amount,
            description,
        } => {
            let actor = session.actor()?;
            let target = session.user(&user)?;
            let entry =
                session
                    .engine()
                    .grant_points(&actor, &target.id, amount, description.as_deref())?;
            let balance = session.user(&target.id)?.points;
            let report = Report::new(
                format!("Granted {} points to {}", entry.amount, target.username),
                &entry,
            )
            .field("Entry", &entry.id)
            .field("Balance", balance);
            println!("{}", formatter.format_report(&report));
            Ok(())
        }
    }
}

fn register(
    session: &Session,
    username: &str,
    admin: bool,
    points: i64,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let actor = session.optional_actor()?;
    let role = if admin { Role::Admin } else { Role::User };
    let user = session
        .engine()
        .register_user(actor.as_ref(), username, role, points)?;
    let report = Report::new(format!("Registered {}", user.username), &user)
        .field("ID", &user.id)
        .field("Role", user.role.as_str())
        .field("Points", user.points);
    println!("{}", formatter.format_report(&report));
    Ok(())
}

fn show(session: &Session, user: Option<String>, formatter: &dyn OutputFormatter) -> Result<()> {
    let account = match user {
        Some(reference) => session.user(&reference)?,
        None => {
            let actor = session.actor()?;
            session.user(&actor.user_id)?
        }
    };
    let snapshot = session.engine().snapshot()?;
    let stats = user_stats(&snapshot, &account.id)?;

    let mut report = Report::new(account.username.clone(), &serde_json::json!({
        "account": account,
        "stats": stats,
    }))
    .field("ID", &account.id)
    .field("Role", account.role.as_str())
    .field("Active", if account.active { "yes" } else { "no" })
    .field("Points", account.points)
    .field("Earned", stats.total_earned)
    .field("Spent", stats.total_spent)
    .field("Items", stats.total_items)
    .field(
        "Swaps",
        format!(
            "{} pending sent, {} pending received",
            stats.pending_swaps_sent, stats.pending_swaps_received
        ),
    );
    for (status, count) in &stats.items_by_status {
        report = report.field("Listings", format!("{} {}", count, status));
    }
    println!("{}", formatter.format_report(&report));
    Ok(())
}

fn set_active(
    session: &Session,
    reference: &str,
    active: bool,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let actor = session.actor()?;
    let target = session.user(reference)?;
    let user = session
        .engine()
        .set_user_active(&actor, &target.id, active)?;
    let verb = if active { "Activated" } else { "Deactivated" };
    let report = Report::new(format!("{} {}", verb, user.username), &user).field("ID", &user.id);
    println!("{}", formatter.format_report(&report));
    Ok(())
}
