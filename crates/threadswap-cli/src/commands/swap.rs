// Rust guideline compliant 2026-10-19

//! Implementation of the `tsw swap` commands.

use crate::commands::Session;
use crate::output::{OutputFormatter, Report};
use anyhow::Result;
use threadswap_app::{
    parse_swap_status, resolve_item_id, resolve_swap_id, user_swaps, SwapDecision, SwapDirection,
    SwapOutcome,
};

/// Answer given to `tsw swap respond`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DecisionArg {
    Accept,
    Reject,
}

impl From<DecisionArg> for SwapDecision {
    fn from(value: DecisionArg) -> Self {
        match value {
            DecisionArg::Accept => SwapDecision::Accepted,
            DecisionArg::Reject => SwapDecision::Rejected,
        }
    }
}

/// Swap request actions.
#[derive(Debug, clap::Subcommand)]
pub enum SwapAction {
    /// Offer one of your items for someone else's
    Create {
        /// Your item to give (full or partial ID)
        offered: String,

        /// The item you want (full or partial ID)
        requested: String,

        /// Message to the owner
        #[arg(long)]
        message: Option<String>,
    },

    /// Accept or reject a request for one of your items
    Respond {
        /// Swap ID (full or partial)
        id: String,

        /// accept or reject
        #[arg(value_enum)]
        decision: DecisionArg,

        /// Message to the requester
        #[arg(long)]
        message: Option<String>,
    },

    /// Mark an accepted swap as exchanged
    Complete {
        /// Swap ID (full or partial)
        id: String,
    },

    /// Withdraw a request you made
    Cancel {
        /// Swap ID (full or partial)
        id: String,
    },

    /// Show a swap request
    Show {
        /// Swap ID (full or partial)
        id: String,
    },

    /// List requests you sent, or received with --received
    List {
        /// List requests for your items instead of your own requests
        #[arg(long)]
        received: bool,

        /// Filter by status
        #[arg(long)]
        status: Option<String>,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Results per page
        #[arg(long)]
        page_size: Option<usize>,
    },
}

/// Executes a swap action.
///
/// # Errors
///
/// Returns an error if an ID does not resolve or the engine refuses the
/// transition.
pub fn execute(session: &Session, action: SwapAction, formatter: &dyn OutputFormatter) -> Result<()> {
    match action {
        SwapAction::Create {
            offered,
            requested,
            message,
        } => {
            let actor = session.actor()?;
            let snapshot = session.engine().snapshot()?;
            let offered = resolve_item_id(&offered, &snapshot)?;
            let requested = resolve_item_id(&requested, &snapshot)?;
            let swap = session.engine().create_swap_request(
                &actor,
                &offered,
                &requested,
                message.as_deref(),
            )?;
            let report = Report::new(format!("Requested swap: {}", swap.id), &swap)
                .field("Status", swap.status.as_str())
                .field("Offered", &swap.item_offered)
                .field("Requested", &swap.item_requested);
            println!("{}", formatter.format_report(&report));
        }
        SwapAction::Respond {
            id,
            decision,
            message,
        } => {
            let actor = session.actor()?;
            let swap_id = resolve(session, &id)?;
            let outcome = session.engine().respond_to_swap(
                &actor,
                &swap_id,
                decision.into(),
                message.as_deref(),
            )?;
            print_outcome(&outcome, "Responded to swap", formatter);
        }
        SwapAction::Complete { id } => {
            let actor = session.actor()?;
            let swap_id = resolve(session, &id)?;
            let outcome = session.engine().complete_swap(&actor, &swap_id)?;
            print_outcome(&outcome, "Completed swap", formatter);
        }
        SwapAction::Cancel { id } => {
            let actor = session.actor()?;
            let swap_id = resolve(session, &id)?;
            let outcome = session.engine().cancel_swap(&actor, &swap_id)?;
            print_outcome(&outcome, "Cancelled swap", formatter);
        }
        SwapAction::Show { id } => {
            let snapshot = session.engine().snapshot()?;
            let swap_id = resolve_swap_id(&id, &snapshot)?;
            let swap = snapshot.swap(&swap_id)?;
            let mut report = Report::new(swap.id.clone(), swap)
                .field("Status", swap.status.as_str())
                .field("Requester", &swap.requester)
                .field("Offered", &swap.item_offered)
                .field("Requested", &swap.item_requested);
            if let Some(message) = &swap.message {
                report = report.field("Message", message);
            }
            if let Some(response) = &swap.response_message {
                report = report.field("Response", response);
            }
            println!("{}", formatter.format_report(&report));
        }
        SwapAction::List {
            received,
            status,
            page,
            page_size,
        } => {
            let actor = session.actor()?;
            let direction = if received {
                SwapDirection::Received
            } else {
                SwapDirection::Sent
            };
            let status = status.as_deref().map(parse_swap_status).transpose()?;
            let snapshot = session.engine().snapshot()?;
            let results = user_swaps(
                &snapshot,
                &actor.user_id,
                direction,
                status,
                page,
                session.page_size(page_size),
            );
            println!("{}", formatter.format_swaps(&results));
        }
    }

    Ok(())
}

fn resolve(session: &Session, partial: &str) -> Result<String> {
    let snapshot = session.engine().snapshot()?;
    Ok(resolve_swap_id(partial, &snapshot)?)
}

fn print_outcome(outcome: &SwapOutcome, verb: &str, formatter: &dyn OutputFormatter) {
    let report = Report::new(format!("{}: {}", verb, outcome.swap.id), outcome)
        .field("Status", outcome.swap.status.as_str())
        .field(
            "Offered",
            format!(
                "{} ({})",
                outcome.item_offered.id,
                outcome.item_offered.status.as_str()
            ),
        )
        .field(
            "Requested",
            format!(
                "{} ({})",
                outcome.item_requested.id,
                outcome.item_requested.status.as_str()
            ),
        );
    println!("{}", formatter.format_report(&report));
}
