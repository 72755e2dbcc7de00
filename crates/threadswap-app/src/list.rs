// Rust guideline compliant 2026-10-19

//! Read-only listing and statistics helpers for Threadswap.
//!
//! Every function here works on a [`Snapshot`] and never mutates the store.

use crate::error::{AppError, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use threadswap_core::{
    ledger, Category, Condition, Item, ItemStatus, PointTransaction, Size, Snapshot, SwapRequest,
    SwapStatus,
};

const PARALLEL_THRESHOLD: usize = 1_000;

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// One-based page number.
    pub page: usize,
    pub page_size: usize,
    /// Number of matches across all pages.
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Cuts page `page` (one-based) of `page_size` entries out of `all`.
    #[must_use]
    pub fn paginate(all: Vec<T>, page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total = all.len();
        let total_pages = total.div_ceil(page_size);
        let items = all
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();
        Self {
            items,
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

/// Filters for browsing available items.
#[derive(Debug, Clone, Default)]
pub struct BrowseOptions {
    pub category: Option<Category>,
    pub size: Option<Size>,
    pub condition: Option<Condition>,
    /// Case-insensitive text matched against title, description, tags and brand.
    pub search: Option<String>,
    /// Hide items owned by this user.
    pub exclude_owner: Option<String>,
}

/// Parses a category name.
///
/// # Errors
///
/// Returns an error if the category is unknown.
pub fn parse_category(value: &str) -> Result<Category> {
    let value = value.trim().to_lowercase();
    Category::ALL
        .into_iter()
        .find(|category| category.as_str() == value)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid category: {}", value)))
}

/// Parses a size label such as `XL` or `32`.
///
/// # Errors
///
/// Returns an error if the size is unknown.
pub fn parse_size(value: &str) -> Result<Size> {
    let value = value.trim().to_uppercase();
    Size::ALL
        .into_iter()
        .find(|size| size.as_str() == value)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid size: {}", value)))
}

/// Parses a condition name.
///
/// # Errors
///
/// Returns an error if the condition is unknown.
pub fn parse_condition(value: &str) -> Result<Condition> {
    let value = value.trim().to_lowercase();
    Condition::ALL
        .into_iter()
        .find(|condition| condition.as_str() == value)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid condition: {}", value)))
}

/// Parses an item status filter.
///
/// # Errors
///
/// Returns an error if the status is unknown.
pub fn parse_item_status(value: &str) -> Result<ItemStatus> {
    let value = value.trim().to_lowercase().replace('-', "_");
    match value.as_str() {
        "pending" => Ok(ItemStatus::PendingApproval),
        _ => ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid item status: {}", value))),
    }
}

/// Parses a swap status filter.
///
/// # Errors
///
/// Returns an error if the status is unknown.
pub fn parse_swap_status(value: &str) -> Result<SwapStatus> {
    let value = value.trim().to_lowercase();
    match value.as_str() {
        "canceled" => Ok(SwapStatus::Cancelled),
        _ => SwapStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid swap status: {}", value))),
    }
}

/// Lists available items matching `options`, newest first.
pub fn browse_items(
    snapshot: &Snapshot,
    options: &BrowseOptions,
    page: usize,
    page_size: usize,
) -> Page<Item> {
    let needle = options
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let predicate = |item: &Item| {
        if item.status != ItemStatus::Available {
            return false;
        }
        if options.category.is_some_and(|c| item.category != c) {
            return false;
        }
        if options.size.is_some_and(|s| item.size != s) {
            return false;
        }
        if options.condition.is_some_and(|c| item.condition != c) {
            return false;
        }
        if options.exclude_owner.as_deref() == Some(item.owner.as_str()) {
            return false;
        }
        if let Some(needle) = &needle {
            return matches_search(item, needle);
        }
        true
    };

    let items: Vec<Item> = snapshot.items().cloned().collect();
    let mut matches: Vec<Item> = if items.len() >= PARALLEL_THRESHOLD {
        items.into_par_iter().filter(|item| predicate(item)).collect()
    } else {
        items.into_iter().filter(|item| predicate(item)).collect()
    };
    sort_newest_first(&mut matches);
    Page::paginate(matches, page, page_size)
}

fn matches_search(item: &Item, needle: &str) -> bool {
    item.title.to_lowercase().contains(needle)
        || item.description.to_lowercase().contains(needle)
        || item
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
        || item
            .brand
            .as_deref()
            .is_some_and(|brand| brand.to_lowercase().contains(needle))
}

fn sort_newest_first(items: &mut [Item]) {
    items.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Lists items awaiting moderation, oldest first.
pub fn pending_items(snapshot: &Snapshot, page: usize, page_size: usize) -> Page<Item> {
    let mut items: Vec<Item> = snapshot
        .items()
        .filter(|item| item.status == ItemStatus::PendingApproval)
        .cloned()
        .collect();
    items.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    Page::paginate(items, page, page_size)
}

/// Lists the items owned by `user_id`, newest first.
pub fn user_items(
    snapshot: &Snapshot,
    user_id: &str,
    status: Option<ItemStatus>,
    page: usize,
    page_size: usize,
) -> Page<Item> {
    let mut items: Vec<Item> = snapshot
        .items()
        .filter(|item| item.owner == user_id)
        .filter(|item| status.map_or(true, |s| item.status == s))
        .cloned()
        .collect();
    sort_newest_first(&mut items);
    Page::paginate(items, page, page_size)
}

/// Lists the available items `user_id` favorited, newest first.
pub fn favorite_items(
    snapshot: &Snapshot,
    user_id: &str,
    page: usize,
    page_size: usize,
) -> Page<Item> {
    let mut items: Vec<Item> = snapshot
        .items()
        .filter(|item| item.status == ItemStatus::Available && item.is_favorited_by(user_id))
        .cloned()
        .collect();
    sort_newest_first(&mut items);
    Page::paginate(items, page, page_size)
}

/// Lists the ledger of `user_id`, newest first.
pub fn user_ledger(
    snapshot: &Snapshot,
    user_id: &str,
    page: usize,
    page_size: usize,
) -> Page<PointTransaction> {
    // Append order breaks ties between entries of the same second.
    let mut entries: Vec<PointTransaction> = snapshot
        .transactions_for(user_id)
        .cloned()
        .collect();
    entries.reverse();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Page::paginate(entries, page, page_size)
}

/// Which side of a swap request to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    /// Requests the user made.
    Sent,
    /// Requests for items the user owns.
    Received,
}

/// Lists swap requests sent or received by `user_id`, newest first.
pub fn user_swaps(
    snapshot: &Snapshot,
    user_id: &str,
    direction: SwapDirection,
    status: Option<SwapStatus>,
    page: usize,
    page_size: usize,
) -> Page<SwapRequest> {
    let mut swaps: Vec<SwapRequest> = snapshot
        .swaps()
        .filter(|swap| match direction {
            SwapDirection::Sent => swap.requester == user_id,
            SwapDirection::Received => snapshot
                .item(&swap.item_requested)
                .is_ok_and(|item| item.owner == user_id),
        })
        .filter(|swap| status.map_or(true, |s| swap.status == s))
        .cloned()
        .collect();
    swaps.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    Page::paginate(swaps, page, page_size)
}

/// Per-user dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_id: String,
    pub username: String,
    pub points: i64,
    /// Item counts keyed by status wire name.
    pub items_by_status: BTreeMap<String, usize>,
    pub total_items: usize,
    /// Sum of earned and bonus entries.
    pub total_earned: i64,
    /// Absolute sum of spent entries.
    pub total_spent: i64,
    pub pending_swaps_sent: usize,
    pub pending_swaps_received: usize,
}

/// Computes dashboard figures for `user_id`.
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist.
pub fn user_stats(snapshot: &Snapshot, user_id: &str) -> Result<UserStats> {
    let user = snapshot.user(user_id)?;
    let owned: Vec<&Item> = snapshot
        .items()
        .filter(|item| item.owner == user_id)
        .collect();
    let summary = ledger::summarize(snapshot, user_id);

    let pending_sent = snapshot
        .swaps()
        .filter(|swap| swap.status == SwapStatus::Pending && swap.requester == user_id)
        .count();
    let pending_received = snapshot
        .swaps()
        .filter(|swap| swap.status == SwapStatus::Pending)
        .filter(|swap| {
            snapshot
                .item(&swap.item_requested)
                .is_ok_and(|item| item.owner == user_id)
        })
        .count();

    Ok(UserStats {
        user_id: user.id.clone(),
        username: user.username.clone(),
        points: user.points,
        items_by_status: count_by_status(owned.iter().copied()),
        total_items: owned.len(),
        total_earned: summary.total_earned,
        total_spent: summary.total_spent,
        pending_swaps_sent: pending_sent,
        pending_swaps_received: pending_received,
    })
}

/// Platform-wide figures for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformStats {
    pub total_users: usize,
    pub active_users: usize,
    pub total_items: usize,
    pub items_by_status: BTreeMap<String, usize>,
    pub swaps_by_status: BTreeMap<String, usize>,
    pub ledger_entries: usize,
    /// Sum of every balance.
    pub points_outstanding: i64,
}

/// Computes platform-wide figures.
#[must_use]
pub fn platform_stats(snapshot: &Snapshot) -> PlatformStats {
    let mut swaps_by_status = BTreeMap::new();
    for swap in snapshot.swaps() {
        *swaps_by_status
            .entry(swap.status.as_str().to_string())
            .or_insert(0) += 1;
    }

    PlatformStats {
        total_users: snapshot.users().count(),
        active_users: snapshot.users().filter(|user| user.active).count(),
        total_items: snapshot.items().count(),
        items_by_status: count_by_status(snapshot.items()),
        swaps_by_status,
        ledger_entries: snapshot.transactions().len(),
        points_outstanding: snapshot
            .users()
            .fold(0i64, |total, user| total.saturating_add(user.points)),
    }
}

fn count_by_status<'a, I>(items: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.status.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Engine, SwapDecision};
    use threadswap_core::{Actor, ItemDraft, MemoryStore, Role};

    #[test]
    fn test_paginate_bounds() {
        let page = Page::paginate((1..=25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);

        let empty = Page::paginate((1..=5).collect::<Vec<_>>(), 4, 10);
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 1);

        let clamped = Page::paginate(vec![1, 2], 0, 0);
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.items, vec![1]);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_category("Shoes").unwrap(), Category::Shoes);
        assert_eq!(parse_size("xl").unwrap(), Size::Xl);
        assert_eq!(parse_size("34").unwrap(), Size::W34);
        assert_eq!(parse_condition("WORN").unwrap(), Condition::Worn);
        assert_eq!(
            parse_item_status("pending").unwrap(),
            ItemStatus::PendingApproval
        );
        assert_eq!(
            parse_item_status("pending-approval").unwrap(),
            ItemStatus::PendingApproval
        );
        assert_eq!(parse_swap_status("canceled").unwrap(), SwapStatus::Cancelled);
        assert!(parse_category("hats").is_err());
        assert!(parse_size("XXXL").is_err());
    }

    struct Fixture {
        engine: Engine<MemoryStore>,
        admin: Actor,
        alice: Actor,
        bob: Actor,
    }

    fn fixture() -> Fixture {
        let engine = Engine::new(MemoryStore::new());
        let admin = engine.register_user(None, "admin", Role::Admin, 0).unwrap();
        let alice = engine.register_user(None, "alice", Role::User, 0).unwrap();
        let bob = engine.register_user(None, "bob", Role::User, 0).unwrap();
        Fixture {
            engine,
            admin: Actor::admin(admin.id),
            alice: Actor::user(alice.id),
            bob: Actor::user(bob.id),
        }
    }

    fn list(f: &Fixture, owner: &Actor, title: &str, category: Category, brand: Option<&str>) -> Item {
        let draft = ItemDraft {
            title: title.to_string(),
            description: format!("{} with plenty of wear left", title),
            category,
            item_type: "misc".to_string(),
            size: Size::S,
            condition: Condition::Good,
            color: "black".to_string(),
            brand: brand.map(str::to_string),
            location: None,
            tags: vec!["vintage".to_string()],
        };
        let item = f
            .engine
            .submit_item(owner, draft, vec!["a.jpg".to_string()])
            .unwrap();
        f.engine.approve_item(&f.admin, &item.id).unwrap().item
    }

    #[test]
    fn test_browse_filters_and_search() {
        let f = fixture();
        list(&f, &f.alice, "Canvas sneakers", Category::Shoes, Some("Acme"));
        list(&f, &f.alice, "Silk scarf", Category::Accessories, None);
        let boots = list(&f, &f.bob, "Hiking boots", Category::Shoes, None);
        f.engine
            .submit_item(
                &f.bob,
                ItemDraft {
                    title: "Unreviewed loafers".to_string(),
                    description: "Waiting for a moderator".to_string(),
                    category: Category::Shoes,
                    item_type: "loafer".to_string(),
                    size: Size::M,
                    condition: Condition::Fair,
                    color: "tan".to_string(),
                    brand: None,
                    location: None,
                    tags: vec![],
                },
                vec!["b.jpg".to_string()],
            )
            .unwrap();
        let snapshot = f.engine.snapshot().unwrap();

        let all = browse_items(&snapshot, &BrowseOptions::default(), 1, 10);
        assert_eq!(all.total, 3);

        let shoes = BrowseOptions {
            category: Some(Category::Shoes),
            ..BrowseOptions::default()
        };
        assert_eq!(browse_items(&snapshot, &shoes, 1, 10).total, 2);

        let not_mine = BrowseOptions {
            category: Some(Category::Shoes),
            exclude_owner: Some(f.alice.user_id.clone()),
            ..BrowseOptions::default()
        };
        let page = browse_items(&snapshot, &not_mine, 1, 10);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, boots.id);

        let by_brand = BrowseOptions {
            search: Some("  acme ".to_string()),
            ..BrowseOptions::default()
        };
        assert_eq!(browse_items(&snapshot, &by_brand, 1, 10).total, 1);

        let by_tag = BrowseOptions {
            search: Some("VINTAGE".to_string()),
            ..BrowseOptions::default()
        };
        assert_eq!(browse_items(&snapshot, &by_tag, 1, 10).total, 3);
    }

    #[test]
    fn test_favorites_only_list_available_items() {
        let f = fixture();
        let scarf = list(&f, &f.alice, "Silk scarf", Category::Accessories, None);
        let hat = list(&f, &f.alice, "Wool hat", Category::Accessories, None);
        f.engine.toggle_favorite(&f.bob, &scarf.id).unwrap();
        f.engine.toggle_favorite(&f.bob, &hat.id).unwrap();
        f.engine.grant_points(&f.admin, &f.bob.user_id, 75, None).unwrap();
        f.engine.redeem_item(&f.bob, &hat.id).unwrap();

        let snapshot = f.engine.snapshot().unwrap();
        let favorites = favorite_items(&snapshot, &f.bob.user_id, 1, 10);
        assert_eq!(favorites.total, 1);
        assert_eq!(favorites.items[0].id, scarf.id);
    }

    #[test]
    fn test_swap_listings_and_stats() {
        let f = fixture();
        let tee = list(&f, &f.alice, "Band tee", Category::Tops, None);
        let jeans = list(&f, &f.bob, "Straight jeans", Category::Bottoms, None);
        let belt = list(&f, &f.bob, "Leather belt", Category::Accessories, None);
        let first = f
            .engine
            .create_swap_request(&f.alice, &tee.id, &jeans.id, None)
            .unwrap();
        f.engine
            .create_swap_request(&f.alice, &tee.id, &belt.id, None)
            .unwrap();
        f.engine
            .respond_to_swap(&f.bob, &first.id, SwapDecision::Rejected, Some("No thanks"))
            .unwrap();

        let snapshot = f.engine.snapshot().unwrap();
        let sent = user_swaps(&snapshot, &f.alice.user_id, SwapDirection::Sent, None, 1, 10);
        assert_eq!(sent.total, 2);
        let received = user_swaps(
            &snapshot,
            &f.bob.user_id,
            SwapDirection::Received,
            Some(SwapStatus::Pending),
            1,
            10,
        );
        assert_eq!(received.total, 1);
        assert!(user_swaps(&snapshot, &f.bob.user_id, SwapDirection::Sent, None, 1, 10)
            .items
            .is_empty());

        let alice = user_stats(&snapshot, &f.alice.user_id).unwrap();
        assert_eq!(alice.points, 75);
        assert_eq!(alice.total_earned, 75);
        assert_eq!(alice.total_items, 1);
        assert_eq!(alice.pending_swaps_sent, 1);
        assert_eq!(alice.items_by_status.get("available"), Some(&1));

        let bob = user_stats(&snapshot, &f.bob.user_id).unwrap();
        assert_eq!(bob.pending_swaps_received, 1);
        assert_eq!(bob.points, 150);

        let platform = platform_stats(&snapshot);
        assert_eq!(platform.total_users, 3);
        assert_eq!(platform.total_items, 3);
        assert_eq!(platform.ledger_entries, 3);
        assert_eq!(platform.points_outstanding, 225);
        assert_eq!(platform.swaps_by_status.get("rejected"), Some(&1));
        assert_eq!(platform.swaps_by_status.get("pending"), Some(&1));
    }
}
