// Rust guideline compliant 2026-10-19

//! Property-based tests for the item and swap state machines.

use proptest::prelude::*;
use threadswap_core::{ItemStatus, SwapStatus};

fn arb_item_status() -> impl Strategy<Value = ItemStatus> {
    prop_oneof![
        Just(ItemStatus::PendingApproval),
        Just(ItemStatus::Available),
        Just(ItemStatus::Reserved),
        Just(ItemStatus::Swapped),
        Just(ItemStatus::Rejected),
    ]
}

fn arb_swap_status() -> impl Strategy<Value = SwapStatus> {
    prop_oneof![
        Just(SwapStatus::Pending),
        Just(SwapStatus::Accepted),
        Just(SwapStatus::Rejected),
        Just(SwapStatus::Completed),
        Just(SwapStatus::Cancelled),
    ]
}

proptest! {
    /// A transition succeeds exactly when it is listed in `valid_transitions`.
    #[test]
    fn prop_item_transition_matches_table(
        current in arb_item_status(),
        target in arb_item_status(),
    ) {
        let listed = current.valid_transitions().contains(&target);
        prop_assert_eq!(current.can_transition_to(target).is_ok(), listed);
    }

    /// No item status transitions to itself.
    #[test]
    fn prop_item_no_self_transition(current in arb_item_status()) {
        prop_assert!(current.can_transition_to(current).is_err());
    }

    /// Nothing ever leads back to moderation.
    #[test]
    fn prop_pending_approval_unreachable(current in arb_item_status()) {
        prop_assert!(current.can_transition_to(ItemStatus::PendingApproval).is_err());
    }

    /// A transition succeeds exactly when it is listed in `valid_transitions`.
    #[test]
    fn prop_swap_transition_matches_table(
        current in arb_swap_status(),
        target in arb_swap_status(),
    ) {
        let listed = current.valid_transitions().contains(&target);
        prop_assert_eq!(current.can_transition_to(target).is_ok(), listed);
    }

    /// Terminal swaps refuse every transition.
    #[test]
    fn prop_terminal_swaps_are_immutable(
        current in arb_swap_status(),
        target in arb_swap_status(),
    ) {
        if current.is_terminal() {
            prop_assert!(current.can_transition_to(target).is_err());
        }
    }

    /// Walking any sequence of requested transitions never leaves the table.
    #[test]
    fn prop_item_walk_stays_consistent(
        targets in prop::collection::vec(arb_item_status(), 0..12),
    ) {
        let mut status = ItemStatus::PendingApproval;
        for target in targets {
            if status.can_transition_to(target).is_ok() {
                status = target;
            }
        }
        prop_assert!(ItemStatus::ALL.contains(&status));
        if status.is_terminal() {
            prop_assert!(status.valid_transitions().is_empty());
        }
    }
}
