// Rust guideline compliant 2026-10-19

//! Storage module for Threadswap records.
//!
//! A [`Store`] hands out consistent [`Snapshot`]s for reading and runs
//! read-check-write sequences through [`Store::transact`]. Writes staged on a
//! [`Transaction`] become visible only if the closure returns `Ok`; an error
//! discards all of them.
//!
//! Two stores are provided: [`MemoryStore`] for tests and embedding, and
//! [`FileStore`], a single JSONL file with an exclusive lock file and atomic
//! rewrites.

use crate::identity::{self, IdKind};
use crate::{Error, Item, PointTransaction, Result, SwapRequest, TransactionKind, UserAccount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Consistent read-only view of every collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    items: BTreeMap<String, Item>,
    users: BTreeMap<String, UserAccount>,
    swaps: BTreeMap<String, SwapRequest>,
    /// Ledger in append order.
    transactions: Vec<PointTransaction>,
}

impl Snapshot {
    /// Returns the item with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no item has that id.
    pub fn item(&self, id: &str) -> Result<&Item> {
        self.items
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("item {}", id)))
    }

    /// Returns the user account with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no account has that id.
    pub fn user(&self, id: &str) -> Result<&UserAccount> {
        self.users
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }

    /// Returns the swap request with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no request has that id.
    pub fn swap(&self, id: &str) -> Result<&SwapRequest> {
        self.swaps
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("swap request {}", id)))
    }

    /// Returns the ledger entry with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no entry has that id.
    pub fn point_transaction(&self, id: &str) -> Result<&PointTransaction> {
        self.transactions
            .iter()
            .find(|txn| txn.id == id)
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))
    }

    /// Looks up an account by username.
    #[must_use]
    pub fn user_by_username(&self, username: &str) -> Option<&UserAccount> {
        self.users.values().find(|user| user.username == username)
    }

    /// Iterates over all items.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Iterates over all user accounts.
    pub fn users(&self) -> impl Iterator<Item = &UserAccount> {
        self.users.values()
    }

    /// Iterates over all swap requests.
    pub fn swaps(&self) -> impl Iterator<Item = &SwapRequest> {
        self.swaps.values()
    }

    /// Returns the full ledger in append order.
    #[must_use]
    pub fn transactions(&self) -> &[PointTransaction] {
        &self.transactions
    }

    /// Iterates over the ledger entries of one user in append order.
    pub fn transactions_for<'a>(
        &'a self,
        user_id: &'a str,
    ) -> impl Iterator<Item = &'a PointTransaction> + 'a {
        self.transactions.iter().filter(move |txn| txn.user == user_id)
    }

    /// Returns true if the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.users.is_empty()
            && self.swaps.is_empty()
            && self.transactions.is_empty()
    }

    fn contains_id(&self, id: &str) -> bool {
        self.items.contains_key(id)
            || self.users.contains_key(id)
            || self.swaps.contains_key(id)
            || self.transactions.iter().any(|txn| txn.id == id)
    }
}

/// Staged writes against a working copy of the store.
///
/// Reads observe earlier writes of the same transaction. Ledger entries can
/// only be appended through [`Transaction::post_points`], which also moves
/// the matching balance.
#[derive(Debug)]
pub struct Transaction {
    state: Snapshot,
    dirty: bool,
}

impl Transaction {
    fn new(state: Snapshot) -> Self {
        Self {
            state,
            dirty: false,
        }
    }

    /// Returns the working copy for queries.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    /// Returns a copy of the item with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no item has that id.
    pub fn item(&self, id: &str) -> Result<Item> {
        self.state.item(id).cloned()
    }

    /// Returns a copy of the user account with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no account has that id.
    pub fn user(&self, id: &str) -> Result<UserAccount> {
        self.state.user(id).cloned()
    }

    /// Returns a copy of the swap request with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no request has that id.
    pub fn swap(&self, id: &str) -> Result<SwapRequest> {
        self.state.swap(id).cloned()
    }

    /// Returns a copy of the ledger entry with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no entry has that id.
    pub fn point_transaction(&self, id: &str) -> Result<PointTransaction> {
        self.state.point_transaction(id).cloned()
    }

    /// Returns an unused identifier of `kind`.
    pub fn new_id(&self, kind: IdKind, seed: &[&str], timestamp: i64) -> String {
        identity::generate_unique_id(kind, seed, timestamp, |id| self.state.contains_id(id))
    }

    /// Inserts or replaces an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the item fails validation.
    pub fn put_item(&mut self, item: Item) -> Result<()> {
        item.validate()?;
        self.state.items.insert(item.id.clone(), item);
        self.dirty = true;
        Ok(())
    }

    /// Inserts or replaces a swap request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails validation.
    pub fn put_swap(&mut self, swap: SwapRequest) -> Result<()> {
        swap.validate()?;
        self.state.swaps.insert(swap.id.clone(), swap);
        self.dirty = true;
        Ok(())
    }

    /// Inserts a new user account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account fails validation
    /// - The id or username is already taken (`Conflict`)
    pub fn insert_user(&mut self, user: UserAccount) -> Result<()> {
        user.validate()?;
        if self.state.users.contains_key(&user.id) {
            return Err(Error::Conflict(format!("user {} already exists", user.id)));
        }
        if self.state.user_by_username(&user.username).is_some() {
            return Err(Error::Conflict(format!(
                "username '{}' is taken",
                user.username
            )));
        }
        self.state.users.insert(user.id.clone(), user);
        self.dirty = true;
        Ok(())
    }

    /// Sets the `active` flag of an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no account has that id.
    pub fn set_user_active(&mut self, user_id: &str, active: bool) -> Result<UserAccount> {
        let user = self
            .state
            .users
            .get_mut(user_id)
            .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))?;
        user.active = active;
        self.dirty = true;
        Ok(user.clone())
    }

    /// Changes a balance and appends the paired ledger entry.
    ///
    /// # Arguments
    ///
    /// * `posting` - Who, how much, and why
    /// * `timestamp` - Creation time of the entry
    ///
    /// # Returns
    ///
    /// The appended entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user does not exist (`NotFound`)
    /// - The amount has the wrong sign for its kind (`InvalidArgument`)
    /// - The balance would overflow (`InvalidArgument`)
    /// - The balance would drop below zero (`InsufficientFunds`)
    pub fn post_points(&mut self, posting: Posting, timestamp: i64) -> Result<PointTransaction> {
        posting.kind.check_amount(posting.amount)?;

        let balance = self.state.user(&posting.user)?.points;
        let new_balance = balance.checked_add(posting.amount).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "Balance of {} would overflow when adding {}",
                balance, posting.amount
            ))
        })?;
        if new_balance < 0 {
            return Err(Error::InsufficientFunds {
                required: posting.amount.saturating_neg(),
                available: balance,
            });
        }

        let id = self.new_id(
            IdKind::Transaction,
            &[
                posting.user.as_str(),
                posting.kind.as_str(),
                posting.amount.to_string().as_str(),
                posting.description.as_str(),
            ],
            timestamp,
        );
        let entry = PointTransaction {
            id,
            user: posting.user,
            item: posting.item,
            kind: posting.kind,
            amount: posting.amount,
            description: posting.description,
            related_transaction: posting.related_transaction,
            created_at: timestamp,
        };
        entry.validate()?;

        if let Some(user) = self.state.users.get_mut(&entry.user) {
            user.points = new_balance;
        }
        self.state.transactions.push(entry.clone());
        self.dirty = true;
        Ok(entry)
    }

    /// Returns true if any write was staged.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn into_state(self) -> Snapshot {
        self.state
    }
}

/// A balance change to post to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// User whose balance changes.
    pub user: String,
    pub kind: TransactionKind,
    /// Signed amount; debits are negative.
    pub amount: i64,
    pub item: Option<String>,
    pub description: String,
    pub related_transaction: Option<String>,
}

impl Posting {
    /// Creates a posting without item or related entry.
    pub fn new(
        user: impl Into<String>,
        kind: TransactionKind,
        amount: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            kind,
            amount,
            item: None,
            description: description.into(),
            related_transaction: None,
        }
    }

    /// Attaches the item the entry refers to.
    #[must_use]
    pub fn with_item(mut self, item_id: impl Into<String>) -> Self {
        self.item = Some(item_id.into());
        self
    }

    /// Links the entry to the one it reverses.
    #[must_use]
    pub fn with_related(mut self, transaction_id: impl Into<String>) -> Self {
        self.related_transaction = Some(transaction_id.into());
        self
    }
}

/// Record store shared by all callers of the lifecycle engine.
pub trait Store: Send + Sync {
    /// Returns a consistent copy of every collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn snapshot(&self) -> Result<Snapshot>;

    /// Runs `f` with exclusive access and commits its writes if it succeeds.
    ///
    /// Concurrent transactions are serialized; a transaction that returns an
    /// error leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a storage error if the commit fails.
    fn transact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction) -> Result<T>;
}

/// In-process store guarded by a mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Snapshot>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn snapshot(&self) -> Result<Snapshot> {
        let guard = self
            .state
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn transact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction) -> Result<T>,
    {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        let mut tx = Transaction::new(guard.clone());
        let output = f(&mut tx)?;
        if tx.is_dirty() {
            *guard = tx.into_state();
        }
        Ok(output)
    }
}

/// One line of the JSONL store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum Record {
    User(UserAccount),
    Item(Item),
    Swap(SwapRequest),
    Transaction(PointTransaction),
}

impl Record {
    fn validate(&self) -> Result<()> {
        match self {
            Record::User(user) => user.validate(),
            Record::Item(item) => item.validate(),
            Record::Swap(swap) => swap.validate(),
            Record::Transaction(txn) => txn.validate(),
        }
    }

    fn insert_into(self, state: &mut Snapshot) {
        match self {
            Record::User(user) => {
                state.users.insert(user.id.clone(), user);
            }
            Record::Item(item) => {
                state.items.insert(item.id.clone(), item);
            }
            Record::Swap(swap) => {
                state.swaps.insert(swap.id.clone(), swap);
            }
            Record::Transaction(txn) => state.transactions.push(txn),
        }
    }
}

/// JSONL file store.
///
/// Every collection lives in one file so a commit is a single atomic rename.
/// Transactions hold an exclusive lock on a sibling `.lock` file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// File name used inside a data directory.
    pub const FILE_NAME: &'static str = "store.jsonl";

    /// Creates a store backed by the JSONL file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty.
    pub fn new(path: PathBuf) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path cannot be empty",
            )));
        }
        Ok(Self { path })
    }

    /// Creates a store for `store.jsonl` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid.
    pub fn in_dir(dir: &Path) -> Result<Self> {
        Self::new(dir.join(Self::FILE_NAME))
    }

    /// Returns the JSONL file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Snapshot> {
        use std::fs::File;
        use std::io::{BufRead, BufReader};

        let mut state = Snapshot::default();
        if !self.path.exists() {
            return Ok(state);
        }

        let reader = BufReader::new(File::open(&self.path)?);
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Record>(&line) {
                Ok(record) => {
                    // Kept so the audit can report it. Writes to it keep
                    // failing validation until the line is repaired.
                    if let Err(e) = record.validate() {
                        tracing::warn!(
                            path = %self.path.display(),
                            line = idx + 1,
                            error = %e,
                            "record fails validation"
                        );
                    }
                    record.insert_into(&mut state);
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = idx + 1,
                        error = %e,
                        "skipping malformed record"
                    );
                }
            }
        }

        Ok(state)
    }

    fn save(&self, state: &Snapshot) -> Result<()> {
        use std::fs::File;
        use std::io::{BufWriter, Write};

        let temp_path = self.path.with_extension("jsonl.tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);

            let records = state
                .users
                .values()
                .cloned()
                .map(Record::User)
                .chain(state.items.values().cloned().map(Record::Item))
                .chain(state.swaps.values().cloned().map(Record::Swap))
                .chain(state.transactions.iter().cloned().map(Record::Transaction));

            for record in records {
                serde_json::to_writer(&mut writer, &record)?;
                writer.write_all(b"\n")?;
            }

            writer.flush()?;
            writer.get_ref().sync_all()?;
        }

        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn snapshot(&self) -> Result<Snapshot> {
        self.load()
    }

    fn transact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction) -> Result<T>,
    {
        use fs2::FileExt;
        use std::fs::OpenOptions;

        let lock_path = self.path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        lock_file
            .lock_exclusive()
            .map_err(|e| Error::Storage(format!("Failed to acquire lock: {}", e)))?;

        let result = self.load().and_then(|state| {
            let mut tx = Transaction::new(state);
            let output = f(&mut tx)?;
            if tx.is_dirty() {
                self.save(&tx.into_state())?;
            }
            Ok(output)
        });

        let _ = lock_file.unlock();

        result
    }
}
