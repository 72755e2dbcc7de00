// Rust guideline compliant 2026-10-19

//! Property-based tests for ledger invariants under arbitrary operation
//! sequences.

use proptest::prelude::*;
use threadswap_app::{Engine, SwapDecision};
use threadswap_core::{
    ledger, Actor, Category, Condition, ItemDraft, MemoryStore, Role, Size, TransactionKind,
};

fn fixed_clock() -> i64 {
    1_700_000_000
}

#[derive(Debug, Clone)]
enum Op {
    Submit { user: usize, condition: usize },
    Approve { item: usize },
    Reject { item: usize },
    Redeem { user: usize, item: usize },
    Grant { user: usize, amount: i64 },
    Swap { user: usize, offered: usize, requested: usize },
    Respond { swap: usize, accept: bool },
    Complete { user: usize, swap: usize },
    Cancel { user: usize, swap: usize },
    Refund { entry: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, 0..4usize).prop_map(|(user, condition)| Op::Submit { user, condition }),
        (0..8usize).prop_map(|item| Op::Approve { item }),
        (0..8usize).prop_map(|item| Op::Reject { item }),
        (0..3usize, 0..8usize).prop_map(|(user, item)| Op::Redeem { user, item }),
        (0..3usize, 1..200i64).prop_map(|(user, amount)| Op::Grant { user, amount }),
        (0..3usize, 0..8usize, 0..8usize).prop_map(|(user, offered, requested)| Op::Swap {
            user,
            offered,
            requested
        }),
        (0..4usize, any::<bool>()).prop_map(|(swap, accept)| Op::Respond { swap, accept }),
        (0..3usize, 0..4usize).prop_map(|(user, swap)| Op::Complete { user, swap }),
        (0..3usize, 0..4usize).prop_map(|(user, swap)| Op::Cancel { user, swap }),
        (0..8usize).prop_map(|entry| Op::Refund { entry }),
    ]
}

fn draft(n: usize, condition: Condition) -> ItemDraft {
    ItemDraft {
        title: format!("Item {}", n),
        description: "Generated garment listing".to_string(),
        category: Category::Bottoms,
        item_type: "jeans".to_string(),
        size: Size::W32,
        condition,
        color: "indigo".to_string(),
        brand: None,
        location: None,
        tags: vec![],
    }
}

fn pick<T: Clone>(values: &[T], idx: usize) -> Option<T> {
    if values.is_empty() {
        None
    } else {
        Some(values[idx % values.len()].clone())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever succeeds or fails, balances always match the ledger, no
    /// balance goes negative and every approved item is credited once.
    #[test]
    fn prop_ledger_stays_consistent(ops in prop::collection::vec(arb_op(), 1..40)) {
        let engine = Engine::with_clock(MemoryStore::new(), fixed_clock);
        let admin = Actor::admin(engine.register_user(None, "admin", Role::Admin, 0).unwrap().id);
        let users: Vec<Actor> = ["ann", "ben", "cat"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Actor::user(engine.register_user(Some(&admin), name, Role::User, (i as i64) * 40).unwrap().id)
            })
            .collect();

        let mut items: Vec<String> = Vec::new();
        let mut swaps: Vec<String> = Vec::new();

        for (n, op) in ops.into_iter().enumerate() {
            match op {
                Op::Submit { user, condition } => {
                    if let Ok(item) = engine.submit_item(
                        &users[user],
                        draft(n, Condition::ALL[condition]),
                        vec!["img.jpg".to_string()],
                    ) {
                        items.push(item.id);
                    }
                }
                Op::Approve { item } => {
                    if let Some(id) = pick(&items, item) {
                        let _ = engine.approve_item(&admin, &id);
                    }
                }
                Op::Reject { item } => {
                    if let Some(id) = pick(&items, item) {
                        let _ = engine.reject_item(&admin, &id, "Not suitable");
                    }
                }
                Op::Redeem { user, item } => {
                    if let Some(id) = pick(&items, item) {
                        let _ = engine.redeem_item(&users[user], &id);
                    }
                }
                Op::Grant { user, amount } => {
                    let _ = engine.grant_points(&admin, &users[user].user_id, amount, None);
                }
                Op::Swap { user, offered, requested } => {
                    if let (Some(a), Some(b)) = (pick(&items, offered), pick(&items, requested)) {
                        if let Ok(swap) = engine.create_swap_request(&users[user], &a, &b, None) {
                            swaps.push(swap.id);
                        }
                    }
                }
                Op::Respond { swap, accept } => {
                    if let Some(id) = pick(&swaps, swap) {
                        let snapshot = engine.snapshot().unwrap();
                        let request = snapshot.swap(&id).unwrap();
                        let owner = snapshot.item(&request.item_requested).unwrap().owner.clone();
                        let decision = if accept { SwapDecision::Accepted } else { SwapDecision::Rejected };
                        let _ = engine.respond_to_swap(&Actor::user(owner), &id, decision, None);
                    }
                }
                Op::Complete { user, swap } => {
                    if let Some(id) = pick(&swaps, swap) {
                        let _ = engine.complete_swap(&users[user], &id);
                    }
                }
                Op::Cancel { user, swap } => {
                    if let Some(id) = pick(&swaps, swap) {
                        let _ = engine.cancel_swap(&users[user], &id);
                    }
                }
                Op::Refund { entry } => {
                    let snapshot = engine.snapshot().unwrap();
                    let spent: Vec<String> = snapshot
                        .transactions()
                        .iter()
                        .filter(|t| t.kind == TransactionKind::Spent)
                        .map(|t| t.id.clone())
                        .collect();
                    if let Some(id) = pick(&spent, entry) {
                        let _ = engine.refund_transaction(&admin, &id, None);
                    }
                }
            }
        }

        let snapshot = engine.snapshot().unwrap();
        let findings = ledger::audit(&snapshot);
        prop_assert!(findings.is_empty(), "Audit findings: {:?}", findings);
        for user in snapshot.users() {
            prop_assert!(user.points >= 0);
        }
        for item in snapshot.items() {
            prop_assert_eq!(item.point_value, item.condition.point_value());
        }
    }
}
