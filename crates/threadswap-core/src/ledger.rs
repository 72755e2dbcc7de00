// Rust guideline compliant 2026-10-19

//! Ledger summaries and consistency audit.
//!
//! The audit re-derives every balance from the append-only ledger and checks
//! it against the stored account, together with the item and swap invariants
//! that the lifecycle engine maintains.

use crate::{Item, ItemStatus, PointTransaction, Snapshot, SwapStatus, TransactionKind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Severity of an audit finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// An invariant is broken.
    Error,
    /// Suspicious but not contradictory.
    Warning,
}

/// A single audit result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// Id of the record the finding is about.
    pub subject: String,
    pub message: String,
}

impl Finding {
    fn error(subject: &str, message: String) -> Self {
        Self {
            severity: Severity::Error,
            subject: subject.to_string(),
            message,
        }
    }

    fn warning(subject: &str, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            subject: subject.to_string(),
            message,
        }
    }
}

/// Per-user ledger totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    /// Sum of `earned` and `bonus` entries.
    pub total_earned: i64,
    /// Absolute sum of `spent` entries.
    pub total_spent: i64,
    /// Sum of `refund` entries.
    pub total_refunded: i64,
    /// Signed sum of every entry.
    pub net: i64,
    pub entries: usize,
}

impl LedgerSummary {
    /// Folds ledger entries into totals.
    ///
    /// Totals saturate at the `i64` bounds.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a PointTransaction>,
    {
        let mut summary = Self::default();
        for entry in entries {
            match entry.kind {
                TransactionKind::Earned | TransactionKind::Bonus => {
                    summary.total_earned = summary.total_earned.saturating_add(entry.amount);
                }
                TransactionKind::Spent => {
                    summary.total_spent =
                        summary.total_spent.saturating_add(entry.amount.saturating_abs());
                }
                TransactionKind::Refund => {
                    summary.total_refunded = summary.total_refunded.saturating_add(entry.amount);
                }
            }
            summary.net = summary.net.saturating_add(entry.amount);
            summary.entries += 1;
        }
        summary
    }
}

/// Summarizes the ledger of one user.
#[must_use]
pub fn summarize(snapshot: &Snapshot, user_id: &str) -> LedgerSummary {
    LedgerSummary::from_entries(snapshot.transactions_for(user_id))
}

/// Returns the refund entry that reverses `transaction_id`, if any.
#[must_use]
pub fn refund_of<'a>(snapshot: &'a Snapshot, transaction_id: &str) -> Option<&'a PointTransaction> {
    snapshot.transactions().iter().find(|entry| {
        entry.kind == TransactionKind::Refund
            && entry.related_transaction.as_deref() == Some(transaction_id)
    })
}

/// Checks every ledger, item and swap invariant in `snapshot`.
///
/// Findings are ordered errors first, then by subject id.
#[must_use]
pub fn audit(snapshot: &Snapshot) -> Vec<Finding> {
    let mut findings = Vec::new();

    audit_records(snapshot, &mut findings);
    audit_balances(snapshot, &mut findings);
    audit_entries(snapshot, &mut findings);
    audit_items(snapshot, &mut findings);
    audit_swaps(snapshot, &mut findings);

    findings.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.subject.cmp(&b.subject))
    });
    findings
}

fn audit_records(snapshot: &Snapshot, findings: &mut Vec<Finding>) {
    for user in snapshot.users() {
        if let Err(err) = user.validate() {
            findings.push(Finding::error(&user.id, err.to_string()));
        }
    }
    for item in snapshot.items() {
        // Point value mismatches get their own finding below.
        if item.point_value == item.condition.point_value() {
            if let Err(err) = item.validate() {
                findings.push(Finding::error(&item.id, err.to_string()));
            }
        }
    }
    for swap in snapshot.swaps() {
        if let Err(err) = swap.validate() {
            findings.push(Finding::error(&swap.id, err.to_string()));
        }
    }
}

fn audit_balances(snapshot: &Snapshot, findings: &mut Vec<Finding>) {
    // `None` marks a ledger whose running sum left the i64 range.
    let mut sums: BTreeMap<&str, Option<i64>> = BTreeMap::new();
    for entry in snapshot.transactions() {
        let sum = sums.entry(entry.user.as_str()).or_insert(Some(0));
        *sum = sum.and_then(|total| total.checked_add(entry.amount));
    }

    for user in snapshot.users() {
        let Some(ledger_sum) = sums.remove(user.id.as_str()).unwrap_or(Some(0)) else {
            findings.push(Finding::error(
                &user.id,
                format!("Ledger of {} overflows the point range", user.username),
            ));
            continue;
        };
        let expected = user.points.checked_sub(user.opening_balance);
        if expected != Some(ledger_sum) {
            findings.push(Finding::error(
                &user.id,
                format!(
                    "Balance of {} is {} with opening balance {}, but the ledger sums to {}",
                    user.username, user.points, user.opening_balance, ledger_sum
                ),
            ));
        }
    }

    for user_id in sums.keys() {
        findings.push(Finding::error(
            user_id,
            "Ledger entries reference an unknown user".to_string(),
        ));
    }
}

fn audit_entries(snapshot: &Snapshot, findings: &mut Vec<Finding>) {
    let mut seen = BTreeSet::new();
    let mut refunded = BTreeSet::new();

    for entry in snapshot.transactions() {
        if !seen.insert(entry.id.as_str()) {
            findings.push(Finding::error(
                &entry.id,
                "Duplicate ledger entry id".to_string(),
            ));
        }
        if let Err(err) = entry.kind.check_amount(entry.amount) {
            findings.push(Finding::error(&entry.id, err.to_string()));
        }
        if let Some(item_id) = &entry.item {
            if snapshot.item(item_id).is_err() {
                findings.push(Finding::warning(
                    &entry.id,
                    format!("Ledger entry references missing item {}", item_id),
                ));
            }
        }

        if entry.kind != TransactionKind::Refund {
            continue;
        }
        let Some(related) = entry.related_transaction.as_deref() else {
            findings.push(Finding::warning(
                &entry.id,
                "Refund is not linked to a spent entry".to_string(),
            ));
            continue;
        };
        match snapshot.point_transaction(related) {
            Ok(original) if original.kind == TransactionKind::Spent => {
                if entry.amount != original.amount.saturating_abs() {
                    findings.push(Finding::error(
                        &entry.id,
                        format!(
                            "Refund of {} does not match spent amount {} of {}",
                            entry.amount, original.amount, related
                        ),
                    ));
                }
                if !refunded.insert(related) {
                    findings.push(Finding::error(
                        &entry.id,
                        format!("Spent entry {} refunded more than once", related),
                    ));
                }
            }
            Ok(_) => findings.push(Finding::error(
                &entry.id,
                format!("Refund is linked to {}, which is not a spent entry", related),
            )),
            Err(_) => findings.push(Finding::error(
                &entry.id,
                format!("Refund is linked to missing entry {}", related),
            )),
        }
    }
}

fn audit_items(snapshot: &Snapshot, findings: &mut Vec<Finding>) {
    let holders: BTreeSet<&str> = snapshot
        .swaps()
        .filter(|swap| swap.status.holds_items())
        .flat_map(|swap| [swap.item_offered.as_str(), swap.item_requested.as_str()])
        .collect();

    for item in snapshot.items() {
        if item.point_value != item.condition.point_value() {
            findings.push(Finding::error(
                &item.id,
                format!(
                    "Point value {} does not match condition {} ({})",
                    item.point_value,
                    item.condition.as_str(),
                    item.condition.point_value()
                ),
            ));
        }
        if item.status == ItemStatus::Reserved && !holders.contains(item.id.as_str()) {
            findings.push(Finding::error(
                &item.id,
                "Item is reserved but no accepted swap holds it".to_string(),
            ));
        }
        if snapshot.user(&item.owner).is_err() {
            findings.push(Finding::warning(
                &item.id,
                format!("Item owner {} does not exist", item.owner),
            ));
        }
        if was_approved(item) && earned_entries(snapshot, &item.id) != 1 {
            findings.push(Finding::error(
                &item.id,
                format!(
                    "Approved item has {} earned entries, expected exactly one",
                    earned_entries(snapshot, &item.id)
                ),
            ));
        }
    }
}

fn audit_swaps(snapshot: &Snapshot, findings: &mut Vec<Finding>) {
    let mut pending = BTreeSet::new();

    for swap in snapshot.swaps() {
        if swap.status == SwapStatus::Pending
            && !pending.insert((
                swap.requester.as_str(),
                swap.item_offered.as_str(),
                swap.item_requested.as_str(),
            ))
        {
            findings.push(Finding::error(
                &swap.id,
                "Duplicate pending request for the same pair of items".to_string(),
            ));
        }

        for item_id in [&swap.item_offered, &swap.item_requested] {
            match snapshot.item(item_id) {
                Ok(item) => {
                    if swap.status.holds_items() && item.status != ItemStatus::Reserved {
                        findings.push(Finding::error(
                            &swap.id,
                            format!(
                                "Accepted swap holds {}, which is {}",
                                item_id,
                                item.status.as_str()
                            ),
                        ));
                    }
                }
                Err(_) => findings.push(Finding::warning(
                    &swap.id,
                    format!("Swap references missing item {}", item_id),
                )),
            }
        }
    }
}

fn was_approved(item: &Item) -> bool {
    item.approved_at.is_some()
}

fn earned_entries(snapshot: &Snapshot, item_id: &str) -> usize {
    snapshot
        .transactions()
        .iter()
        .filter(|entry| {
            entry.kind == TransactionKind::Earned && entry.item.as_deref() == Some(item_id)
        })
        .count()
}
