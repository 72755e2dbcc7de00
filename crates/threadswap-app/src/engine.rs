// Rust guideline compliant 2026-10-19

//! Lifecycle engine for items, points and swaps.
//!
//! Every operation runs its read-check-write sequence inside one
//! [`Store::transact`], so concurrent callers are serialized and a failed
//! precondition leaves the store untouched. Preconditions are checked in a
//! fixed order and each failure carries its own error kind.

use crate::error::{AppError, Result};
use crate::list::{self, Page, PlatformStats};
use serde::{Deserialize, Serialize};
use threadswap_core::identity::IdKind;
use threadswap_core::models::{check_len, MAX_MESSAGE_LEN};
use threadswap_core::{
    ledger, unix_now, Actor, Error as CoreError, Finding, Item, ItemDraft, ItemProfileUpdate,
    ItemStatus, PointTransaction, Posting, Role, Snapshot, Store, SwapRequest, SwapStatus,
    Transaction, TransactionKind, UserAccount,
};

type CoreResult<T> = threadswap_core::Result<T>;

/// Source of the current Unix timestamp.
pub type Clock = fn() -> i64;

/// Owner's answer to a pending swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDecision {
    Accepted,
    Rejected,
}

impl SwapDecision {
    fn target(self) -> SwapStatus {
        match self {
            SwapDecision::Accepted => SwapStatus::Accepted,
            SwapDecision::Rejected => SwapStatus::Rejected,
        }
    }
}

/// Outcome of an approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Approval {
    pub item: Item,
    /// The `earned` entry credited to the owner.
    pub transaction: PointTransaction,
    /// Owner balance after the credit.
    pub owner_balance: i64,
}

/// Outcome of a redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redemption {
    pub item: Item,
    /// The `spent` entry debited from the buyer.
    pub transaction: PointTransaction,
    /// Buyer balance after the debit.
    pub balance: i64,
}

/// Outcome of a swap transition that may touch both items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapOutcome {
    pub swap: SwapRequest,
    pub item_offered: Item,
    pub item_requested: Item,
}

/// The lifecycle engine over a store handle.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
    clock: Clock,
}

impl<S: Store> Engine<S> {
    /// Creates an engine using the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, unix_now)
    }

    /// Creates an engine with an explicit clock.
    pub fn with_clock(store: S, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Returns a consistent read-only view of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(self.store.snapshot()?)
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    fn run<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction) -> CoreResult<T>,
    {
        self.store.transact(f).map_err(|err| {
            if err.is_precondition() {
                tracing::debug!(op = op, error = %err, "operation refused");
            } else {
                tracing::warn!(op = op, error = %err, "operation failed");
            }
            AppError::from(err)
        })
    }

    /// Creates a user account.
    ///
    /// The opening balance is recorded on the account without a ledger entry.
    /// Once an administrator exists, only an administrator may create another
    /// one or grant a non-zero opening balance. Before that, anyone may.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The username is malformed or the balance negative (`InvalidArgument`)
    /// - The username is taken (`Conflict`)
    /// - An admin role or opening balance is requested without an active
    ///   administrator as `actor` (`Forbidden`)
    pub fn register_user(
        &self,
        actor: Option<&Actor>,
        username: &str,
        role: Role,
        opening_balance: i64,
    ) -> Result<UserAccount> {
        let now = self.now();
        let username = username.trim().to_string();
        let user = self.run("register_user", |tx| {
            let privileged = role == Role::Admin || opening_balance != 0;
            let has_admin = tx.snapshot().users().any(|user| user.role == Role::Admin);
            if privileged && has_admin {
                let actor = actor.ok_or_else(|| {
                    CoreError::Forbidden(
                        "Only administrators may create admins or grant an opening balance"
                            .to_string(),
                    )
                })?;
                require_admin(tx.snapshot(), actor)?;
            }

            let user = UserAccount {
                id: tx.new_id(IdKind::User, &[username.as_str()], now),
                username,
                role,
                points: opening_balance,
                opening_balance,
                active: true,
                created_at: now,
            };
            tx.insert_user(user.clone())?;
            Ok(user)
        })?;
        tracing::info!(user = %user.id, username = %user.username, role = user.role.as_str(), "user registered");
        Ok(user)
    }

    /// Submits a new listing in `pending_approval`.
    ///
    /// The point value is derived from the draft's condition. No points move.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is unknown (`NotFound`) or deactivated (`Forbidden`)
    /// - A field is out of bounds or the image count is not 1-5 (`InvalidArgument`)
    pub fn submit_item(&self, actor: &Actor, draft: ItemDraft, images: Vec<String>) -> Result<Item> {
        let now = self.now();
        let item = self.run("submit_item", |tx| {
            require_active(tx.snapshot(), actor)?;
            let id = tx.new_id(
                IdKind::Item,
                &[actor.user_id.as_str(), draft.title.as_str()],
                now,
            );
            let item = Item::from_draft(id, actor.user_id.clone(), draft, images, now)?;
            tx.put_item(item.clone())?;
            Ok(item)
        })?;
        tracing::info!(item = %item.id, owner = %item.owner, point_value = item.point_value, "item submitted");
        Ok(item)
    }

    /// Approves a pending item and credits its owner.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not an active administrator (`Forbidden`)
    /// - The item does not exist (`NotFound`)
    /// - The item is not `pending_approval` (`InvalidState`)
    pub fn approve_item(&self, actor: &Actor, item_id: &str) -> Result<Approval> {
        let now = self.now();
        let approval = self.run("approve_item", |tx| {
            require_admin(tx.snapshot(), actor)?;
            let mut item = tx.item(item_id)?;
            require_pending(&item)?;
            item.status.can_transition_to(ItemStatus::Available)?;

            item.status = ItemStatus::Available;
            item.approved_at = Some(now);
            item.approved_by = Some(actor.user_id.clone());
            item.updated_at = now;
            tx.put_item(item.clone())?;

            let transaction = tx.post_points(
                Posting::new(
                    item.owner.clone(),
                    TransactionKind::Earned,
                    item.point_value,
                    format!("Item approved: {}", item.title),
                )
                .with_item(item.id.clone()),
                now,
            )?;
            let owner_balance = tx.user(&item.owner)?.points;
            Ok(Approval {
                item,
                transaction,
                owner_balance,
            })
        })?;
        tracing::info!(
            item = %approval.item.id,
            owner = %approval.item.owner,
            amount = approval.transaction.amount,
            "item approved"
        );
        Ok(approval)
    }

    /// Rejects a pending item. No points move.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not an active administrator (`Forbidden`)
    /// - The reason is empty or longer than 500 characters (`InvalidArgument`)
    /// - The item does not exist (`NotFound`)
    /// - The item is not `pending_approval` (`InvalidState`)
    pub fn reject_item(&self, actor: &Actor, item_id: &str, reason: &str) -> Result<Item> {
        let now = self.now();
        let reason = reason.trim().to_string();
        let item = self.run("reject_item", |tx| {
            require_admin(tx.snapshot(), actor)?;
            check_len("Rejection reason", &reason, 1, MAX_MESSAGE_LEN)?;
            let mut item = tx.item(item_id)?;
            require_pending(&item)?;
            item.status.can_transition_to(ItemStatus::Rejected)?;

            item.status = ItemStatus::Rejected;
            item.rejection_reason = Some(reason);
            item.updated_at = now;
            tx.put_item(item.clone())?;
            Ok(item)
        })?;
        tracing::info!(item = %item.id, "item rejected");
        Ok(item)
    }

    /// Toggles the caller's favorite on an item.
    ///
    /// # Returns
    ///
    /// Whether the item is now favorited by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is inactive or the item does not exist.
    pub fn toggle_favorite(&self, actor: &Actor, item_id: &str) -> Result<bool> {
        let favorited = self.run("toggle_favorite", |tx| {
            require_active(tx.snapshot(), actor)?;
            let mut item = tx.item(item_id)?;
            let favorited = item.toggle_favorite(&actor.user_id);
            tx.put_item(item)?;
            Ok(favorited)
        })?;
        tracing::debug!(item = %item_id, user = %actor.user_id, favorited, "favorite toggled");
        Ok(favorited)
    }

    /// Redeems an available item with points.
    ///
    /// Only the buyer is debited; the owner was credited at approval.
    ///
    /// # Errors
    ///
    /// Returns an error, checked in this order, if:
    /// - The item does not exist (`NotFound`)
    /// - The item is not `available` (`InvalidState`)
    /// - The buyer owns the item (`Forbidden`)
    /// - The buyer's balance is below the point value (`InsufficientFunds`)
    pub fn redeem_item(&self, actor: &Actor, item_id: &str) -> Result<Redemption> {
        let now = self.now();
        let redemption = self.run("redeem_item", |tx| {
            let buyer = require_active(tx.snapshot(), actor)?;
            let mut item = tx.item(item_id)?;
            if item.status != ItemStatus::Available {
                return Err(CoreError::InvalidState(format!(
                    "Item {} is {}, not available",
                    item.id,
                    item.status.as_str()
                )));
            }
            if item.owner == buyer.id {
                return Err(CoreError::Forbidden(
                    "Cannot redeem your own item".to_string(),
                ));
            }
            if buyer.points < item.point_value {
                return Err(CoreError::InsufficientFunds {
                    required: item.point_value,
                    available: buyer.points,
                });
            }
            item.status.can_transition_to(ItemStatus::Swapped)?;

            item.status = ItemStatus::Swapped;
            item.updated_at = now;
            tx.put_item(item.clone())?;

            let transaction = tx.post_points(
                Posting::new(
                    buyer.id.clone(),
                    TransactionKind::Spent,
                    -item.point_value,
                    format!("Redeemed: {}", item.title),
                )
                .with_item(item.id.clone()),
                now,
            )?;
            let balance = tx.user(&buyer.id)?.points;
            Ok(Redemption {
                item,
                transaction,
                balance,
            })
        })?;
        tracing::info!(
            item = %redemption.item.id,
            buyer = %actor.user_id,
            amount = redemption.transaction.amount,
            balance = redemption.balance,
            "item redeemed"
        );
        Ok(redemption)
    }

    /// Proposes exchanging the caller's item for another user's item.
    ///
    /// Neither item is reserved until the request is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error, checked in this order, if:
    /// - Either item does not exist (`NotFound`)
    /// - The caller does not own the offered item (`Forbidden`)
    /// - The caller owns the requested item (`InvalidArgument`)
    /// - Either item is not `available` (`InvalidState`)
    /// - An identical request is already pending (`Conflict`)
    pub fn create_swap_request(
        &self,
        actor: &Actor,
        item_offered: &str,
        item_requested: &str,
        message: Option<&str>,
    ) -> Result<SwapRequest> {
        let now = self.now();
        let message = normalize_message(message);
        let swap = self.run("create_swap_request", |tx| {
            require_active(tx.snapshot(), actor)?;
            let offered = tx.item(item_offered)?;
            let requested = tx.item(item_requested)?;
            if offered.owner != actor.user_id {
                return Err(CoreError::Forbidden(
                    "You can only offer your own items".to_string(),
                ));
            }
            if requested.owner == actor.user_id {
                return Err(CoreError::InvalidArgument(
                    "Cannot request your own item".to_string(),
                ));
            }
            for item in [&offered, &requested] {
                if item.status != ItemStatus::Available {
                    return Err(CoreError::InvalidState(format!(
                        "Item {} is {}, not available",
                        item.id,
                        item.status.as_str()
                    )));
                }
            }
            let duplicate = tx.snapshot().swaps().any(|swap| {
                swap.status == SwapStatus::Pending
                    && swap.requester == actor.user_id
                    && swap.item_offered == offered.id
                    && swap.item_requested == requested.id
            });
            if duplicate {
                return Err(CoreError::Conflict(
                    "A pending request for these items already exists".to_string(),
                ));
            }
            if let Some(message) = &message {
                check_len("Message", message, 0, MAX_MESSAGE_LEN)?;
            }

            let swap = SwapRequest {
                id: tx.new_id(
                    IdKind::Swap,
                    &[
                        actor.user_id.as_str(),
                        offered.id.as_str(),
                        requested.id.as_str(),
                    ],
                    now,
                ),
                requester: actor.user_id.clone(),
                item_offered: offered.id,
                item_requested: requested.id,
                status: SwapStatus::Pending,
                message,
                response_message: None,
                completed_at: None,
                created_at: now,
                updated_at: now,
            };
            tx.put_swap(swap.clone())?;
            Ok(swap)
        })?;
        tracing::info!(
            swap = %swap.id,
            requester = %swap.requester,
            offered = %swap.item_offered,
            requested = %swap.item_requested,
            "swap requested"
        );
        Ok(swap)
    }

    /// Accepts or rejects a pending swap request.
    ///
    /// Accepting re-checks that both items are still `available` and
    /// reserves them together with the request update.
    ///
    /// # Errors
    ///
    /// Returns an error, checked in this order, if:
    /// - The request does not exist (`NotFound`)
    /// - The request is not `pending` (`InvalidState`)
    /// - The caller does not own the requested item (`Forbidden`)
    /// - Accepting and either item is no longer `available` (`InvalidState`)
    pub fn respond_to_swap(
        &self,
        actor: &Actor,
        swap_id: &str,
        decision: SwapDecision,
        response_message: Option<&str>,
    ) -> Result<SwapOutcome> {
        let now = self.now();
        let response_message = normalize_message(response_message);
        let outcome = self.run("respond_to_swap", |tx| {
            require_active(tx.snapshot(), actor)?;
            let mut swap = tx.swap(swap_id)?;
            if swap.status != SwapStatus::Pending {
                return Err(CoreError::InvalidState(format!(
                    "Swap request is already {}",
                    swap.status.as_str()
                )));
            }
            let mut requested = tx.item(&swap.item_requested)?;
            if requested.owner != actor.user_id {
                return Err(CoreError::Forbidden(
                    "Only the owner of the requested item can respond".to_string(),
                ));
            }
            if let Some(message) = &response_message {
                check_len("Response message", message, 0, MAX_MESSAGE_LEN)?;
            }
            let mut offered = tx.item(&swap.item_offered)?;

            let target = decision.target();
            swap.status.can_transition_to(target)?;
            if target == SwapStatus::Accepted {
                for item in [&mut offered, &mut requested] {
                    if item.status != ItemStatus::Available {
                        return Err(CoreError::InvalidState(format!(
                            "Item {} is {}, not available",
                            item.id,
                            item.status.as_str()
                        )));
                    }
                    item.status.can_transition_to(ItemStatus::Reserved)?;
                    item.status = ItemStatus::Reserved;
                    item.updated_at = now;
                    tx.put_item(item.clone())?;
                }
            }

            swap.status = target;
            swap.response_message = response_message;
            swap.updated_at = now;
            tx.put_swap(swap.clone())?;
            Ok(SwapOutcome {
                swap,
                item_offered: offered,
                item_requested: requested,
            })
        })?;
        tracing::info!(
            swap = %outcome.swap.id,
            status = outcome.swap.status.as_str(),
            "swap answered"
        );
        Ok(outcome)
    }

    /// Completes an accepted swap; both items become `swapped`.
    ///
    /// No points move on a swap.
    ///
    /// # Errors
    ///
    /// Returns an error, checked in this order, if:
    /// - The request does not exist (`NotFound`)
    /// - The request is not `accepted` (`InvalidState`)
    /// - The caller is neither the requester nor the requested item's owner (`Forbidden`)
    pub fn complete_swap(&self, actor: &Actor, swap_id: &str) -> Result<SwapOutcome> {
        let now = self.now();
        let outcome = self.run("complete_swap", |tx| {
            require_active(tx.snapshot(), actor)?;
            let mut swap = tx.swap(swap_id)?;
            swap.status.can_transition_to(SwapStatus::Completed)?;
            let mut requested = tx.item(&swap.item_requested)?;
            if !swap.is_requester(&actor.user_id) && requested.owner != actor.user_id {
                return Err(CoreError::Forbidden(
                    "Only the parties to the swap can complete it".to_string(),
                ));
            }
            let mut offered = tx.item(&swap.item_offered)?;

            for item in [&mut offered, &mut requested] {
                item.status.can_transition_to(ItemStatus::Swapped)?;
                item.status = ItemStatus::Swapped;
                item.updated_at = now;
                tx.put_item(item.clone())?;
            }

            swap.status = SwapStatus::Completed;
            swap.completed_at = Some(now);
            swap.updated_at = now;
            tx.put_swap(swap.clone())?;
            Ok(SwapOutcome {
                swap,
                item_offered: offered,
                item_requested: requested,
            })
        })?;
        tracing::info!(swap = %outcome.swap.id, by = %actor.user_id, "swap completed");
        Ok(outcome)
    }

    /// Withdraws a pending or accepted swap request.
    ///
    /// Items held by an accepted request return to `available`.
    ///
    /// # Errors
    ///
    /// Returns an error, checked in this order, if:
    /// - The request does not exist (`NotFound`)
    /// - The caller is not the requester (`Forbidden`)
    /// - The request is already rejected, completed or cancelled (`InvalidState`)
    pub fn cancel_swap(&self, actor: &Actor, swap_id: &str) -> Result<SwapOutcome> {
        let now = self.now();
        let outcome = self.run("cancel_swap", |tx| {
            require_active(tx.snapshot(), actor)?;
            let mut swap = tx.swap(swap_id)?;
            if !swap.is_requester(&actor.user_id) {
                return Err(CoreError::Forbidden(
                    "Only the requester can cancel a swap request".to_string(),
                ));
            }
            swap.status.can_transition_to(SwapStatus::Cancelled)?;

            let mut offered = tx.item(&swap.item_offered)?;
            let mut requested = tx.item(&swap.item_requested)?;
            if swap.status.holds_items() {
                for item in [&mut offered, &mut requested] {
                    if item.status == ItemStatus::Reserved {
                        item.status.can_transition_to(ItemStatus::Available)?;
                        item.status = ItemStatus::Available;
                        item.updated_at = now;
                        tx.put_item(item.clone())?;
                    }
                }
            }

            swap.status = SwapStatus::Cancelled;
            swap.updated_at = now;
            tx.put_swap(swap.clone())?;
            Ok(SwapOutcome {
                swap,
                item_offered: offered,
                item_requested: requested,
            })
        })?;
        tracing::info!(swap = %outcome.swap.id, "swap cancelled");
        Ok(outcome)
    }

    /// Credits bonus points to a user.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not an active administrator (`Forbidden`)
    /// - The amount is not positive or the balance would overflow (`InvalidArgument`)
    /// - The user does not exist (`NotFound`)
    pub fn grant_points(
        &self,
        actor: &Actor,
        user_id: &str,
        amount: i64,
        description: Option<&str>,
    ) -> Result<PointTransaction> {
        let now = self.now();
        let description = normalize_message(description).unwrap_or_else(|| "Bonus points".to_string());
        let entry = self.run("grant_points", |tx| {
            require_admin(tx.snapshot(), actor)?;
            if amount <= 0 {
                return Err(CoreError::InvalidArgument(
                    "Bonus amount must be positive".to_string(),
                ));
            }
            check_len("Description", &description, 1, MAX_MESSAGE_LEN)?;
            tx.post_points(
                Posting::new(user_id, TransactionKind::Bonus, amount, description),
                now,
            )
        })?;
        tracing::info!(user = %entry.user, amount = entry.amount, "points granted");
        Ok(entry)
    }

    /// Reverses a `spent` entry with a linked `refund` credit.
    ///
    /// Item statuses are not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not an active administrator (`Forbidden`)
    /// - The entry does not exist (`NotFound`)
    /// - The entry is not a `spent` entry (`InvalidArgument`)
    /// - The entry was already refunded (`Conflict`)
    pub fn refund_transaction(
        &self,
        actor: &Actor,
        transaction_id: &str,
        reason: Option<&str>,
    ) -> Result<PointTransaction> {
        let now = self.now();
        let reason = normalize_message(reason);
        let entry = self.run("refund_transaction", |tx| {
            require_admin(tx.snapshot(), actor)?;
            let original = tx.point_transaction(transaction_id)?;
            if original.kind != TransactionKind::Spent {
                return Err(CoreError::InvalidArgument(format!(
                    "Only spent entries can be refunded, {} is {}",
                    original.id,
                    original.kind.as_str()
                )));
            }
            if let Some(existing) = ledger::refund_of(tx.snapshot(), &original.id) {
                return Err(CoreError::Conflict(format!(
                    "{} was already refunded by {}",
                    original.id, existing.id
                )));
            }
            let description = reason.unwrap_or_else(|| format!("Refund of {}", original.id));
            check_len("Description", &description, 1, MAX_MESSAGE_LEN)?;

            let mut posting = Posting::new(
                original.user.clone(),
                TransactionKind::Refund,
                original.amount.saturating_abs(),
                description,
            )
            .with_related(original.id.clone());
            if let Some(item) = &original.item {
                posting = posting.with_item(item.clone());
            }
            tx.post_points(posting, now)
        })?;
        tracing::info!(
            user = %entry.user,
            amount = entry.amount,
            related = ?entry.related_transaction,
            "points refunded"
        );
        Ok(entry)
    }

    /// Activates or deactivates a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not an active administrator (`Forbidden`)
    /// - The user does not exist (`NotFound`)
    /// - The target is an administrator (`Forbidden`)
    pub fn set_user_active(&self, actor: &Actor, user_id: &str, active: bool) -> Result<UserAccount> {
        let user = self.run("set_user_active", |tx| {
            require_admin(tx.snapshot(), actor)?;
            let target = tx.user(user_id)?;
            if target.role == Role::Admin {
                return Err(CoreError::Forbidden(
                    "Cannot modify administrator accounts".to_string(),
                ));
            }
            tx.set_user_active(user_id, active)
        })?;
        tracing::info!(user = %user.id, active = user.active, "user activation changed");
        Ok(user)
    }

    /// Updates owner-editable fields of an item.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The item does not exist (`NotFound`)
    /// - The caller is not the owner (`Forbidden`)
    /// - The update is empty or a field is out of bounds (`InvalidArgument`)
    pub fn update_item_profile(
        &self,
        actor: &Actor,
        item_id: &str,
        update: ItemProfileUpdate,
    ) -> Result<Item> {
        let now = self.now();
        let item = self.run("update_item_profile", |tx| {
            require_active(tx.snapshot(), actor)?;
            let mut item = tx.item(item_id)?;
            if item.owner != actor.user_id {
                return Err(CoreError::Forbidden(
                    "Only the owner can edit an item".to_string(),
                ));
            }
            if update.is_empty() {
                return Err(CoreError::InvalidArgument(
                    "No fields to update".to_string(),
                ));
            }
            item.apply_profile(update, now)?;
            tx.put_item(item.clone())?;
            Ok(item)
        })?;
        tracing::info!(item = %item.id, "item profile updated");
        Ok(item)
    }

    /// Returns an item and counts the view.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item does not exist.
    pub fn view_item(&self, item_id: &str) -> Result<Item> {
        self.run("view_item", |tx| {
            let mut item = tx.item(item_id)?;
            item.views = item.views.saturating_add(1);
            tx.put_item(item.clone())?;
            Ok(item)
        })
    }

    /// Lists items awaiting moderation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the caller is an active administrator.
    pub fn pending_items(&self, actor: &Actor, page: usize, page_size: usize) -> Result<Page<Item>> {
        let snapshot = self.snapshot()?;
        require_admin(&snapshot, actor)?;
        Ok(list::pending_items(&snapshot, page, page_size))
    }

    /// Computes platform-wide figures.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the caller is an active administrator.
    pub fn platform_stats(&self, actor: &Actor) -> Result<PlatformStats> {
        let snapshot = self.snapshot()?;
        require_admin(&snapshot, actor)?;
        Ok(list::platform_stats(&snapshot))
    }

    /// Audits ledger, item and swap invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn audit(&self) -> Result<Vec<Finding>> {
        Ok(ledger::audit(&self.snapshot()?))
    }
}

/// Returns the caller's account if it exists and is active.
fn require_active(snapshot: &Snapshot, actor: &Actor) -> CoreResult<UserAccount> {
    let account = snapshot.user(&actor.user_id)?;
    if !account.active {
        return Err(CoreError::Forbidden(format!(
            "Account {} is deactivated",
            account.username
        )));
    }
    Ok(account.clone())
}

fn require_admin(snapshot: &Snapshot, actor: &Actor) -> CoreResult<UserAccount> {
    let account = require_active(snapshot, actor)?;
    if !actor.is_admin() {
        return Err(CoreError::Forbidden(
            "Administrator role required".to_string(),
        ));
    }
    Ok(account)
}

fn require_pending(item: &Item) -> CoreResult<()> {
    if item.status != ItemStatus::PendingApproval {
        return Err(CoreError::InvalidState(format!(
            "Item {} is {}, not pending_approval",
            item.id,
            item.status.as_str()
        )));
    }
    Ok(())
}

fn normalize_message(message: Option<&str>) -> Option<String> {
    message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
