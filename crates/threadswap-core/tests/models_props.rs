// Rust guideline compliant 2026-10-19

//! Property-based tests for item and ledger models.

use proptest::prelude::*;
use threadswap_core::{
    Category, Condition, Item, ItemDraft, ItemProfileUpdate, Size, TransactionKind,
};

fn arb_condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        Just(Condition::Excellent),
        Just(Condition::Good),
        Just(Condition::Fair),
        Just(Condition::Worn),
    ]
}

fn arb_category() -> impl Strategy<Value = Category> {
    (0..Category::ALL.len()).prop_map(|idx| Category::ALL[idx])
}

fn arb_size() -> impl Strategy<Value = Size> {
    (0..Size::ALL.len()).prop_map(|idx| Size::ALL[idx])
}

fn arb_draft() -> impl Strategy<Value = ItemDraft> {
    (
        "[A-Za-z][A-Za-z ]{0,40}",
        "[a-z]{10,80}",
        arb_category(),
        arb_size(),
        arb_condition(),
        prop::collection::vec("[a-z]{1,10}", 0..5),
    )
        .prop_map(
            |(title, description, category, size, condition, tags)| ItemDraft {
                title,
                description: format!("Garment {}", description),
                category,
                item_type: "shirt".to_string(),
                size,
                condition,
                color: "green".to_string(),
                brand: None,
                location: None,
                tags,
            },
        )
}

proptest! {
    /// The point value of a new item always follows its condition.
    #[test]
    fn prop_point_value_follows_condition(draft in arb_draft()) {
        let condition = draft.condition;
        let item = Item::from_draft(
            "itm-0000abcd".to_string(),
            "usr-00000001".to_string(),
            draft,
            vec!["a.jpg".to_string()],
            100,
        ).unwrap();
        prop_assert_eq!(item.point_value, condition.point_value());
        prop_assert_eq!(item.status, threadswap_core::ItemStatus::PendingApproval);
    }

    /// Profile updates never touch condition, status or point value.
    #[test]
    fn prop_profile_update_keeps_points(
        draft in arb_draft(),
        title in "[A-Za-z]{1,50}",
        tags in prop::collection::vec("[a-z]{1,10}", 0..5),
    ) {
        let mut item = Item::from_draft(
            "itm-0000abcd".to_string(),
            "usr-00000001".to_string(),
            draft,
            vec!["a.jpg".to_string()],
            100,
        ).unwrap();
        let before = item.clone();
        item.apply_profile(ItemProfileUpdate {
            title: Some(title.clone()),
            tags: Some(tags),
            ..Default::default()
        }, 200).unwrap();

        prop_assert_eq!(item.title, title);
        prop_assert_eq!(item.point_value, before.point_value);
        prop_assert_eq!(item.condition, before.condition);
        prop_assert_eq!(item.status, before.status);
        prop_assert_eq!(item.updated_at, 200);
    }

    /// Toggling a favorite twice restores the original membership.
    #[test]
    fn prop_toggle_favorite_twice_is_identity(
        draft in arb_draft(),
        user in "usr-[0-9a-f]{8}",
        prefavorited in any::<bool>(),
    ) {
        let mut item = Item::from_draft(
            "itm-0000abcd".to_string(),
            "usr-00000001".to_string(),
            draft,
            vec!["a.jpg".to_string()],
            100,
        ).unwrap();
        if prefavorited {
            item.favorites.insert(user.clone());
        }
        let original = item.favorites.clone();

        let first = item.toggle_favorite(&user);
        let second = item.toggle_favorite(&user);

        prop_assert_eq!(first, !prefavorited);
        prop_assert_eq!(second, prefavorited);
        prop_assert_eq!(item.favorites, original);
    }

    /// Debits are never positive and credits never negative.
    #[test]
    fn prop_transaction_sign_rules(amount in -1000i64..1000) {
        prop_assert_eq!(TransactionKind::Spent.check_amount(amount).is_ok(), amount <= 0);
        for kind in [TransactionKind::Earned, TransactionKind::Bonus, TransactionKind::Refund] {
            prop_assert_eq!(kind.check_amount(amount).is_ok(), amount >= 0);
        }
    }
}

#[test]
fn test_point_value_mapping() {
    assert_eq!(Condition::Excellent.point_value(), 100);
    assert_eq!(Condition::Good.point_value(), 75);
    assert_eq!(Condition::Fair.point_value(), 50);
    assert_eq!(Condition::Worn.point_value(), 25);
}

#[test]
fn test_from_draft_rejects_bad_images() {
    let draft = ItemDraft {
        title: "Wool scarf".to_string(),
        description: "Warm grey wool scarf".to_string(),
        category: Category::Accessories,
        item_type: "scarf".to_string(),
        size: Size::S,
        condition: Condition::Fair,
        color: "grey".to_string(),
        brand: None,
        location: None,
        tags: vec![],
    };
    let none = Item::from_draft(
        "itm-0000abcd".to_string(),
        "usr-00000001".to_string(),
        draft.clone(),
        vec![],
        100,
    );
    assert!(none.is_err(), "At least one image is required");

    let six = Item::from_draft(
        "itm-0000abcd".to_string(),
        "usr-00000001".to_string(),
        draft,
        (0..6).map(|i| format!("{}.jpg", i)).collect(),
        100,
    );
    assert!(six.is_err(), "At most five images are allowed");
}

#[test]
fn test_size_wire_names() {
    assert_eq!(serde_json::to_string(&Size::Xxl).unwrap(), "\"XXL\"");
    assert_eq!(serde_json::from_str::<Size>("\"32\"").unwrap(), Size::W32);
}

#[test]
fn test_tags_are_trimmed_and_deduplicated() {
    let draft = ItemDraft {
        title: "Running tights".to_string(),
        description: "Black running tights".to_string(),
        category: Category::Activewear,
        item_type: "tights".to_string(),
        size: Size::M,
        condition: Condition::Excellent,
        color: "black".to_string(),
        brand: Some("  ".to_string()),
        location: None,
        tags: vec![" Sport".to_string(), "sport".to_string(), "".to_string()],
    };
    let item = Item::from_draft(
        "itm-0000abcd".to_string(),
        "usr-00000001".to_string(),
        draft,
        vec!["a.jpg".to_string()],
        100,
    )
    .unwrap();
    assert_eq!(item.tags, vec!["Sport".to_string()]);
    assert_eq!(item.brand, None);
}
