// Rust guideline compliant 2026-10-19

//! Concurrent callers racing on the same entities.

use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use threadswap_app::{Engine, ErrorCode, SwapDecision};
use threadswap_core::{
    ledger, Actor, Category, Condition, FileStore, ItemDraft, ItemStatus, MemoryStore, Role,
    Size, Store, TransactionKind,
};

const RACERS: usize = 8;

fn draft() -> ItemDraft {
    ItemDraft {
        title: "Contested coat".to_string(),
        description: "Everybody wants this coat".to_string(),
        category: Category::Outerwear,
        item_type: "coat".to_string(),
        size: Size::L,
        condition: Condition::Excellent,
        color: "camel".to_string(),
        brand: None,
        location: None,
        tags: vec![],
    }
}

fn race_redeem<S: Store + 'static>(engine: Engine<S>) {
    let engine = Arc::new(engine);
    let admin = Actor::admin(engine.register_user(None, "admin", Role::Admin, 0).unwrap().id);
    let owner = Actor::user(engine.register_user(None, "owner", Role::User, 0).unwrap().id);
    let item = engine
        .submit_item(&owner, draft(), vec!["coat.jpg".to_string()])
        .unwrap();
    engine.approve_item(&admin, &item.id).unwrap();

    let buyers: Vec<Actor> = (0..RACERS)
        .map(|i| {
            Actor::user(
                engine
                    .register_user(Some(&admin), &format!("buyer{}", i), Role::User, 100)
                    .unwrap()
                    .id,
            )
        })
        .collect();

    let handles: Vec<_> = buyers
        .into_iter()
        .map(|buyer| {
            let engine = Arc::clone(&engine);
            let item_id = item.id.clone();
            thread::spawn(move || engine.redeem_item(&buyer, &item_id).map_err(|e| e.code()))
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("racer panicked"))
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "Exactly one redemption wins: {:?}", results);
    for result in results.iter().filter(|r| r.is_err()) {
        assert_eq!(result.as_ref().unwrap_err(), &ErrorCode::InvalidState);
    }

    let snapshot = engine.snapshot().unwrap();
    assert_eq!(snapshot.item(&item.id).unwrap().status, ItemStatus::Swapped);
    let spent = snapshot
        .transactions()
        .iter()
        .filter(|t| t.kind == TransactionKind::Spent)
        .count();
    assert_eq!(spent, 1, "Exactly one spent entry");
    assert!(ledger::audit(&snapshot).is_empty());
}

#[test]
fn test_concurrent_redeem_memory_store() {
    race_redeem(Engine::new(MemoryStore::new()));
}

#[test]
fn test_concurrent_redeem_file_store() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileStore::in_dir(temp_dir.path()).expect("Failed to create store");
    race_redeem(Engine::new(store));
}

#[test]
fn test_concurrent_approve_credits_once() {
    let engine = Arc::new(Engine::new(MemoryStore::new()));
    let admin = Actor::admin(engine.register_user(None, "admin", Role::Admin, 0).unwrap().id);
    let owner = Actor::user(engine.register_user(None, "owner", Role::User, 0).unwrap().id);
    let item = engine
        .submit_item(&owner, draft(), vec!["coat.jpg".to_string()])
        .unwrap();

    let handles: Vec<_> = (0..RACERS)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let admin = admin.clone();
            let item_id = item.id.clone();
            thread::spawn(move || {
                if i % 2 == 0 {
                    engine.approve_item(&admin, &item_id).map(|_| ())
                } else {
                    engine.reject_item(&admin, &item_id, "Duplicate").map(|_| ())
                }
            })
        })
        .collect();

    let wins = handles
        .into_iter()
        .map(|handle| handle.join().expect("racer panicked"))
        .filter(Result::is_ok)
        .count();
    assert_eq!(wins, 1);

    let snapshot = engine.snapshot().unwrap();
    let status = snapshot.item(&item.id).unwrap().status;
    let earned = snapshot.transactions().len();
    match status {
        ItemStatus::Available => assert_eq!(earned, 1),
        ItemStatus::Rejected => assert_eq!(earned, 0),
        other => panic!("Unexpected status {:?}", other),
    }
}

#[test]
fn test_concurrent_respond_and_cancel() {
    let engine = Arc::new(Engine::new(MemoryStore::new()));
    let admin = Actor::admin(engine.register_user(None, "admin", Role::Admin, 0).unwrap().id);
    let alice = Actor::user(engine.register_user(None, "alice", Role::User, 0).unwrap().id);
    let bob = Actor::user(engine.register_user(None, "bob", Role::User, 0).unwrap().id);

    let mut ids = Vec::new();
    for owner in [&alice, &bob] {
        let item = engine
            .submit_item(owner, draft(), vec!["coat.jpg".to_string()])
            .unwrap();
        engine.approve_item(&admin, &item.id).unwrap();
        ids.push(item.id);
    }
    let swap = engine
        .create_swap_request(&alice, &ids[0], &ids[1], None)
        .unwrap();

    let responder = {
        let engine = Arc::clone(&engine);
        let swap_id = swap.id.clone();
        thread::spawn(move || engine.respond_to_swap(&bob, &swap_id, SwapDecision::Accepted, None))
    };
    let canceller = {
        let engine = Arc::clone(&engine);
        let swap_id = swap.id.clone();
        thread::spawn(move || engine.cancel_swap(&alice, &swap_id))
    };
    responder.join().expect("responder panicked").ok();
    canceller.join().expect("canceller panicked").ok();

    let snapshot = engine.snapshot().unwrap();
    assert!(
        ledger::audit(&snapshot).is_empty(),
        "Items and swap must agree whatever the interleaving"
    );
}
