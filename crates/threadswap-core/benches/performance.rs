// Rust guideline compliant 2026-10-19

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::TempDir;
use threadswap_core::{
    ledger, Category, Condition, FileStore, IdKind, Item, ItemDraft, ItemStatus, MemoryStore,
    Posting, Role, Size, Store, TransactionKind, UserAccount,
};

fn build_draft(i: usize) -> ItemDraft {
    ItemDraft {
        title: format!("Item {}", i),
        description: "Benchmark garment description".to_string(),
        category: Category::ALL[i % Category::ALL.len()],
        item_type: "shirt".to_string(),
        size: Size::ALL[i % Size::ALL.len()],
        condition: Condition::ALL[i % Condition::ALL.len()],
        color: "red".to_string(),
        brand: None,
        location: None,
        tags: vec!["bench".to_string()],
    }
}

fn populate<S: Store>(store: &S, count: usize) {
    store
        .transact(|tx| {
            let owner = UserAccount {
                id: "usr-00000001".to_string(),
                username: "bench".to_string(),
                role: Role::User,
                points: 0,
                opening_balance: 0,
                active: true,
                created_at: 0,
            };
            tx.insert_user(owner)?;
            for i in 0..count {
                let title = format!("Item {}", i);
                let id = tx.new_id(IdKind::Item, &[title.as_str()], i as i64);
                let mut item = Item::from_draft(
                    id.clone(),
                    "usr-00000001".to_string(),
                    build_draft(i),
                    vec!["bench.jpg".to_string()],
                    i as i64,
                )?;
                item.status = ItemStatus::Available;
                item.approved_at = Some(i as i64);
                let points = item.point_value;
                tx.put_item(item)?;
                tx.post_points(
                    Posting::new("usr-00000001", TransactionKind::Earned, points, "Approved")
                        .with_item(id),
                    i as i64,
                )?;
            }
            Ok(())
        })
        .expect("Failed to populate store");
}

fn bench_file_snapshot(c: &mut Criterion) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = FileStore::in_dir(temp_dir.path()).expect("Failed to create store");
    populate(&store, 1000);
    c.bench_function("file_snapshot_1000", |b| {
        b.iter(|| black_box(store.snapshot()))
    });
}

fn bench_file_transact(c: &mut Criterion) {
    c.bench_function("file_transact_bonus_100", |b| {
        b.iter_batched(
            || {
                let temp_dir = TempDir::new().expect("Failed to create temp dir");
                let store = FileStore::in_dir(temp_dir.path()).expect("Failed to create store");
                populate(&store, 100);
                (temp_dir, store)
            },
            |(_temp_dir, store)| {
                black_box(store.transact(|tx| {
                    tx.post_points(
                        Posting::new("usr-00000001", TransactionKind::Bonus, 10, "Bench"),
                        1,
                    )
                }))
                .expect("Failed to post bonus");
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_audit(c: &mut Criterion) {
    let store = MemoryStore::new();
    populate(&store, 1000);
    let snapshot = store.snapshot().expect("Failed to snapshot");
    c.bench_function("ledger_audit_1000", |b| {
        b.iter(|| black_box(ledger::audit(&snapshot)))
    });
}

criterion_group!(
    benches,
    bench_file_snapshot,
    bench_file_transact,
    bench_audit
);
criterion_main!(benches);
