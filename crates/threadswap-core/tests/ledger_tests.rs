// Rust guideline compliant 2026-10-19

//! Tests for ledger summaries and the consistency audit.

use std::fs;
use tempfile::TempDir;
use threadswap_core::ledger::{self, Severity};
use threadswap_core::{
    Category, Condition, FileStore, Item, ItemDraft, ItemStatus, MemoryStore, Posting, Role, Size,
    Store, TransactionKind, UserAccount,
};

fn user(id: &str, username: &str, opening: i64) -> UserAccount {
    UserAccount {
        id: id.to_string(),
        username: username.to_string(),
        role: Role::User,
        points: opening,
        opening_balance: opening,
        active: true,
        created_at: 1000,
    }
}

fn item(id: &str, owner: &str, condition: Condition) -> Item {
    let draft = ItemDraft {
        title: "Linen shirt".to_string(),
        description: "Loose fit linen shirt".to_string(),
        category: Category::Tops,
        item_type: "shirt".to_string(),
        size: Size::L,
        condition,
        color: "white".to_string(),
        brand: Some("Acme".to_string()),
        location: Some("Lisbon".to_string()),
        tags: vec!["summer".to_string()],
    };
    Item::from_draft(
        id.to_string(),
        owner.to_string(),
        draft,
        vec!["shirt.jpg".to_string()],
        1000,
    )
    .expect("valid item")
}

fn consistent_store<S: Store>(store: &S) -> String {
    store
        .transact(|tx| {
            tx.insert_user(user("usr-00000001", "alice", 0))?;
            tx.insert_user(user("usr-00000002", "bob", 30))?;

            let mut listed = item("itm-00000001", "usr-00000001", Condition::Fair);
            listed.status = ItemStatus::Available;
            listed.approved_at = Some(1100);
            tx.put_item(listed)?;
            tx.post_points(
                Posting::new("usr-00000001", TransactionKind::Earned, 50, "Approved")
                    .with_item("itm-00000001"),
                1100,
            )?;
            tx.post_points(
                Posting::new("usr-00000002", TransactionKind::Bonus, 30, "Top up"),
                1200,
            )?;
            let spent = tx.post_points(
                Posting::new("usr-00000002", TransactionKind::Spent, -50, "Redeemed")
                    .with_item("itm-00000001"),
                1300,
            )?;
            Ok(spent.id)
        })
        .expect("seed")
}

#[test]
fn test_consistent_store_has_no_findings() {
    let store = MemoryStore::new();
    consistent_store(&store);
    let findings = ledger::audit(&store.snapshot().unwrap());
    assert!(findings.is_empty(), "Unexpected findings: {:?}", findings);
}

#[test]
fn test_summary_totals() {
    let store = MemoryStore::new();
    let spent_id = consistent_store(&store);
    store
        .transact(|tx| {
            tx.post_points(
                Posting::new("usr-00000002", TransactionKind::Refund, 50, "Refund")
                    .with_related(spent_id.clone()),
                1400,
            )
        })
        .unwrap();

    let snapshot = store.snapshot().unwrap();
    let summary = ledger::summarize(&snapshot, "usr-00000002");
    assert_eq!(summary.total_earned, 30);
    assert_eq!(summary.total_spent, 50);
    assert_eq!(summary.total_refunded, 50);
    assert_eq!(summary.net, 30);
    assert_eq!(summary.entries, 3);

    assert!(ledger::refund_of(&snapshot, &spent_id).is_some());
    assert!(ledger::audit(&snapshot).is_empty());
}

#[test]
fn test_double_refund_is_reported() {
    let store = MemoryStore::new();
    let spent_id = consistent_store(&store);
    store
        .transact(|tx| {
            for ts in [1400, 1500] {
                tx.post_points(
                    Posting::new("usr-00000002", TransactionKind::Refund, 50, "Refund")
                        .with_related(spent_id.clone()),
                    ts,
                )?;
            }
            Ok(())
        })
        .unwrap();

    let findings = ledger::audit(&store.snapshot().unwrap());
    assert!(findings
        .iter()
        .any(|f| f.message.contains("refunded more than once")));
}

#[test]
fn test_orphan_reservation_is_reported() {
    let store = MemoryStore::new();
    store
        .transact(|tx| {
            tx.insert_user(user("usr-00000001", "alice", 0))?;
            let mut held = item("itm-00000002", "usr-00000001", Condition::Worn);
            held.status = ItemStatus::Reserved;
            tx.put_item(held)
        })
        .unwrap();

    let findings = ledger::audit(&store.snapshot().unwrap());
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Error);
    assert_eq!(findings[0].subject, "itm-00000002");
    assert!(findings[0].message.contains("reserved"));
}

#[test]
fn test_tampered_file_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileStore::in_dir(temp_dir.path()).expect("Failed to create store");
    consistent_store(&store);

    let content = fs::read_to_string(store.path()).unwrap();
    let tampered = content
        .replace("\"point_value\":50", "\"point_value\":90")
        .replace("\"points\":10,", "\"points\":500,");
    fs::write(store.path(), tampered).unwrap();

    let findings = ledger::audit(&store.snapshot().unwrap());
    assert!(findings
        .iter()
        .any(|f| f.subject == "itm-00000001" && f.message.contains("does not match condition")));
    assert!(findings
        .iter()
        .any(|f| f.subject == "usr-00000002" && f.message.contains("ledger sums to")));
}

#[test]
fn test_approved_item_without_earned_entry() {
    let store = MemoryStore::new();
    store
        .transact(|tx| {
            tx.insert_user(user("usr-00000001", "alice", 0))?;
            let mut listed = item("itm-00000003", "usr-00000001", Condition::Good);
            listed.status = ItemStatus::Available;
            listed.approved_at = Some(1100);
            tx.put_item(listed)
        })
        .unwrap();

    let findings = ledger::audit(&store.snapshot().unwrap());
    assert!(findings
        .iter()
        .any(|f| f.message.contains("0 earned entries")));
}

#[test]
fn test_overflowing_ledger_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileStore::in_dir(temp_dir.path()).expect("Failed to create store");
    consistent_store(&store);
    store
        .transact(|tx| {
            tx.post_points(
                Posting::new("usr-00000001", TransactionKind::Bonus, i64::MAX - 50, "Jackpot"),
                1400,
            )
        })
        .unwrap();

    let content = fs::read_to_string(store.path()).unwrap();
    assert!(content.contains("\"amount\":50,"));
    fs::write(
        store.path(),
        content.replace("\"amount\":50,", "\"amount\":100,"),
    )
    .unwrap();

    let snapshot = store.snapshot().unwrap();
    let summary = ledger::summarize(&snapshot, "usr-00000001");
    assert_eq!(summary.total_earned, i64::MAX);
    assert_eq!(summary.net, i64::MAX);

    let findings = ledger::audit(&snapshot);
    assert!(findings.iter().any(|f| f.subject == "usr-00000001"
        && f.severity == Severity::Error
        && f.message.contains("overflows")));
}
