// Rust guideline compliant 2026-10-19

//! Implementation of the `tsw stats` command.

use crate::commands::Session;
use crate::output::{OutputFormatter, Report};
use anyhow::Result;
use threadswap_app::user_stats;

/// Shows the acting user's statistics, or the platform totals.
///
/// # Arguments
///
/// * `session` - The opened data directory
/// * `platform` - Show platform-wide totals (admin only)
/// * `formatter` - The output formatter to use
///
/// # Errors
///
/// Returns an error if the acting user does not resolve, or is not an
/// administrator when `platform` is set.
pub fn execute(session: &Session, platform: bool, formatter: &dyn OutputFormatter) -> Result<()> {
    let actor = session.actor()?;

    let report = if platform {
        let stats = session.engine().platform_stats(&actor)?;
        let mut report = Report::new("Platform statistics", &stats)
            .field("Users", format!("{} ({} active)", stats.total_users, stats.active_users))
            .field("Items", stats.total_items)
            .field("Ledger entries", stats.ledger_entries)
            .field("Points held", stats.points_outstanding);
        for (status, count) in &stats.items_by_status {
            report = report.field("Items", format!("{} {}", count, status));
        }
        for (status, count) in &stats.swaps_by_status {
            report = report.field("Swaps", format!("{} {}", count, status));
        }
        report
    } else {
        let snapshot = session.engine().snapshot()?;
        let stats = user_stats(&snapshot, &actor.user_id)?;
        let mut report = Report::new(format!("Statistics for {}", stats.username), &stats)
            .field("Points", stats.points)
            .field("Earned", stats.total_earned)
            .field("Spent", stats.total_spent)
            .field("Items", stats.total_items)
            .field("Pending sent", stats.pending_swaps_sent)
            .field("Pending received", stats.pending_swaps_received);
        for (status, count) in &stats.items_by_status {
            report = report.field("Items", format!("{} {}", count, status));
        }
        report
    };

    println!("{}", formatter.format_report(&report));
    Ok(())
}
