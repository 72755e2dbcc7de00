// Rust guideline compliant 2026-10-19

//! Command implementations for the Threadswap CLI.

pub mod doctor;
pub mod init;
pub mod item;
pub mod ledger;
pub mod serve;
pub mod stats;
pub mod swap;
pub mod user;

use std::path::{Path, PathBuf};
use threadswap_app::{resolve_user, AppError, Engine, RepoContext};
use threadswap_core::{Actor, Config, FileStore, UserAccount};

/// Environment variable naming the acting user when `--as` is absent.
pub const ACTING_USER_ENV: &str = "THREADSWAP_USER";

/// An opened data directory plus the identity commands act as.
pub struct Session {
    repo: RepoContext,
    config: Config,
    engine: Engine<FileStore>,
    acting_as: Option<String>,
}

impl Session {
    /// Discovers `.threadswap` under `root` (or the current directory) and
    /// opens its store and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data directory is missing (`RepoNotInitialized`)
    /// - The configuration is invalid
    /// - The store cannot be opened
    pub fn open(root: Option<&Path>, acting_as: Option<String>) -> Result<Self, AppError> {
        let repo = RepoContext::discover(root)?;
        let config = repo.load_config()?;
        let engine = Engine::new(repo.open_store()?);
        tracing::debug!(data_dir = %repo.data_dir().display(), "opened data directory");
        Ok(Self {
            repo,
            config,
            engine,
            acting_as: acting_as.or_else(|| std::env::var(ACTING_USER_ENV).ok()),
        })
    }

    pub fn engine(&self) -> &Engine<FileStore> {
        &self.engine
    }

    pub fn data_dir(&self) -> PathBuf {
        self.repo.data_dir().to_path_buf()
    }

    /// Resolves the acting user into an [`Actor`] carrying its stored role.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no acting user was given and `NotFound`
    /// when it does not resolve.
    pub fn actor(&self) -> Result<Actor, AppError> {
        let reference = self.acting_as.as_deref().ok_or_else(|| {
            AppError::InvalidInput(format!(
                "No acting user. Pass --as <username> or set {}.",
                ACTING_USER_ENV
            ))
        })?;
        let account = self.user(reference)?;
        Ok(Actor {
            user_id: account.id,
            role: account.role,
        })
    }

    /// Returns the actor if one was given, without failing otherwise.
    pub fn optional_actor(&self) -> Result<Option<Actor>, AppError> {
        match self.acting_as {
            Some(_) => self.actor().map(Some),
            None => Ok(None),
        }
    }

    /// Looks up an account by username or id prefix.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `AmbiguousId` when the reference does not
    /// identify exactly one account.
    pub fn user(&self, reference: &str) -> Result<UserAccount, AppError> {
        let snapshot = self.engine.snapshot()?;
        let user_id = resolve_user(reference, &snapshot)?;
        Ok(snapshot.user(&user_id)?.clone())
    }

    /// Page size for browse and personal listings.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        self.config
            .clamp_page_size(requested, self.config.default_page_size)
    }

    /// Page size for moderation queues and ledgers.
    pub fn admin_page_size(&self, requested: Option<usize>) -> usize {
        self.config
            .clamp_page_size(requested, self.config.admin_page_size)
    }
}
