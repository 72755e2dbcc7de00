// Rust guideline compliant 2026-10-19

//! Implementation of the `tsw item` commands.
//!
//! Covers submission and moderation, favorites, redemption, the owner's
//! profile edits and the read-only listings.

use crate::commands::Session;
use crate::output::{OutputFormatter, Report};
use anyhow::Result;
use threadswap_app::{
    browse_items, favorite_items, parse_category, parse_condition, parse_item_status, parse_size,
    resolve_item_id, user_items, BrowseOptions,
};
use threadswap_core::{ItemDraft, ItemProfileUpdate};

/// Item actions.
#[derive(Debug, clap::Subcommand)]
pub enum ItemAction {
    /// Submit a new listing for moderation
    Submit {
        /// Title of the listing
        title: String,

        /// Description (10-1000 characters)
        #[arg(long)]
        description: String,

        /// Category (tops, bottoms, outerwear, shoes, accessories, dresses, activewear)
        #[arg(long)]
        category: String,

        /// Garment type, e.g. "jacket"
        #[arg(long = "type")]
        item_type: String,

        /// Size (XS-XXL or waist 28-42)
        #[arg(long)]
        size: String,

        /// Condition (excellent, good, fair, worn)
        #[arg(long)]
        condition: String,

        /// Color
        #[arg(long)]
        color: String,

        /// Brand
        #[arg(long)]
        brand: Option<String>,

        /// Pickup location
        #[arg(long)]
        location: Option<String>,

        /// Tags
        #[arg(long, value_delimiter = ',')]
        tag: Vec<String>,

        /// Image references (1-5)
        #[arg(long, value_delimiter = ',', required = true)]
        image: Vec<String>,
    },

    /// Approve a pending listing and credit its owner (admin only)
    Approve {
        /// Item ID (full or partial)
        id: String,
    },

    /// Reject a pending listing (admin only)
    Reject {
        /// Item ID (full or partial)
        id: String,

        /// Reason shown to the owner
        #[arg(long)]
        reason: String,
    },

    /// Show an item and count the view
    Show {
        /// Item ID (full or partial)
        id: String,
    },

    /// Edit the title, description, location or tags of your item
    Update {
        /// Item ID (full or partial)
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New location
        #[arg(long)]
        location: Option<String>,

        /// Replacement tag list
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },

    /// Add or remove an item from your favorites
    Favorite {
        /// Item ID (full or partial)
        id: String,
    },

    /// Spend points to take an available item
    Redeem {
        /// Item ID (full or partial)
        id: String,
    },

    /// Browse available items
    Browse {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by size
        #[arg(long)]
        size: Option<String>,

        /// Filter by condition
        #[arg(long)]
        condition: Option<String>,

        /// Search title, description, tags and brand
        #[arg(long)]
        search: Option<String>,

        /// Include your own listings
        #[arg(long)]
        include_own: bool,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Results per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show the moderation queue, oldest first (admin only)
    Pending {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Results per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// List your own items
    Mine {
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

    /// List your favorited items that are still available
    Favorites {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Results per page
        #[arg(long)]
        page_size: Option<usize>,
    },
}

/// Executes an item action.
///
/// # Errors
///
/// Returns an error if an argument does not parse, an ID does not resolve,
/// or the engine refuses the operation.
pub fn execute(session: &Session, action: ItemAction, formatter: &dyn OutputFormatter) -> Result<()> {
    match action {
        ItemAction::Submit {
            title,
            description,
            category,
            item_type,
            size,
            condition,
            color,
            brand,
            location,
            tag,
            image,
        } => {
            let actor = session.actor()?;
            let draft = ItemDraft {
                title,
                description,
                category: parse_category(&category)?,
                item_type,
                size: parse_size(&size)?,
                condition: parse_condition(&condition)?,
                color,
                brand,
                location,
                tags: tag,
            };
            let item = session.engine().submit_item(&actor, draft, image)?;
            let report = Report::new(format!("Submitted item: {}", item.id), &item)
                .field("Title", &item.title)
                .field("Status", item.status.as_str())
                .field("Points", item.point_value);
            println!("{}", formatter.format_report(&report));
        }
        ItemAction::Approve { id } => {
            let actor = session.actor()?;
            let item_id = resolve(session, &id)?;
            let approval = session.engine().approve_item(&actor, &item_id)?;
            let report = Report::new(format!("Approved item: {}", approval.item.id), &approval)
                .field("Status", approval.item.status.as_str())
                .field("Credited", format!("{} to {}", approval.transaction.amount, approval.item.owner))
                .field("Owner balance", approval.owner_balance);
            println!("{}", formatter.format_report(&report));
        }
        ItemAction::Reject { id, reason } => {
            let actor = session.actor()?;
            let item_id = resolve(session, &id)?;
            let item = session.engine().reject_item(&actor, &item_id, &reason)?;
            let report = Report::new(format!("Rejected item: {}", item.id), &item)
                .field("Status", item.status.as_str())
                .field("Reason", reason);
            println!("{}", formatter.format_report(&report));
        }
        ItemAction::Show { id } => {
            let item_id = resolve(session, &id)?;
            let item = session.engine().view_item(&item_id)?;
            println!("{}", formatter.format_item(&item));
        }
        ItemAction::Update {
            id,
            title,
            description,
            location,
            tags,
        } => {
            let actor = session.actor()?;
            let item_id = resolve(session, &id)?;
            let update = ItemProfileUpdate {
                title,
                description,
                location,
                tags,
            };
            let item = session
                .engine()
                .update_item_profile(&actor, &item_id, update)?;
            let report = Report::new(format!("Updated item: {}", item.id), &item)
                .field("Title", &item.title);
            println!("{}", formatter.format_report(&report));
        }
        ItemAction::Favorite { id } => {
            let actor = session.actor()?;
            let item_id = resolve(session, &id)?;
            let favorited = session.engine().toggle_favorite(&actor, &item_id)?;
            let headline = if favorited {
                format!("Added {} to favorites", item_id)
            } else {
                format!("Removed {} from favorites", item_id)
            };
            let report = Report::new(
                headline,
                &serde_json::json!({ "item": item_id, "favorited": favorited }),
            );
            println!("{}", formatter.format_report(&report));
        }
        ItemAction::Redeem { id } => {
            let actor = session.actor()?;
            let item_id = resolve(session, &id)?;
            let redemption = session.engine().redeem_item(&actor, &item_id)?;
            let report = Report::new(format!("Redeemed item: {}", redemption.item.id), &redemption)
                .field("Title", &redemption.item.title)
                .field("Spent", redemption.transaction.amount.abs())
                .field("Balance", redemption.balance);
            println!("{}", formatter.format_report(&report));
        }
        ItemAction::Browse {
            category,
            size,
            condition,
            search,
            include_own,
            page,
            page_size,
        } => {
            let exclude_owner = match session.optional_actor()? {
                Some(actor) if !include_own => Some(actor.user_id),
                _ => None,
            };
            let options = BrowseOptions {
                category: category.as_deref().map(parse_category).transpose()?,
                size: size.as_deref().map(parse_size).transpose()?,
                condition: condition.as_deref().map(parse_condition).transpose()?,
                search,
                exclude_owner,
            };
            let snapshot = session.engine().snapshot()?;
            let results = browse_items(&snapshot, &options, page, session.page_size(page_size));
            println!("{}", formatter.format_items(&results));
        }
        ItemAction::Pending { page, page_size } => {
            let actor = session.actor()?;
            let results =
                session
                    .engine()
                    .pending_items(&actor, page, session.admin_page_size(page_size))?;
            println!("{}", formatter.format_items(&results));
        }
        ItemAction::Mine {
            status,
            page,
            page_size,
        } => {
            let actor = session.actor()?;
            let status = status.as_deref().map(parse_item_status).transpose()?;
            let snapshot = session.engine().snapshot()?;
            let results = user_items(
                &snapshot,
                &actor.user_id,
                status,
                page,
                session.page_size(page_size),
            );
            println!("{}", formatter.format_items(&results));
        }
        ItemAction::Favorites { page, page_size } => {
            let actor = session.actor()?;
            let snapshot = session.engine().snapshot()?;
            let results =
                favorite_items(&snapshot, &actor.user_id, page, session.page_size(page_size));
            println!("{}", formatter.format_items(&results));
        }
    }

    Ok(())
}

fn resolve(session: &Session, partial: &str) -> Result<String> {
    let snapshot = session.engine().snapshot()?;
    Ok(resolve_item_id(partial, &snapshot)?)
}
