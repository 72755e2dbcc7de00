// Rust guideline compliant 2026-10-19

//! Data directory discovery and path management utilities.

use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};
use threadswap_core::{Config, FileStore};

/// Name of the data directory inside a workspace root.
pub const DATA_DIR: &str = ".threadswap";

/// Path metadata for a Threadswap data directory.
#[derive(Debug, Clone)]
pub struct RepoContext {
    root: PathBuf,
    data_dir: PathBuf,
    store_path: PathBuf,
    config_path: PathBuf,
}

impl RepoContext {
    /// Discovers a Threadswap data directory starting from an optional root.
    ///
    /// # Arguments
    ///
    /// * `repo_root` - Optional root to pin discovery; defaults to the
    ///   current directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The current directory cannot be resolved
    /// - The `.threadswap` directory is missing
    pub fn discover(repo_root: Option<&Path>) -> Result<Self> {
        let root = match repo_root {
            Some(root) => root.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let data_dir = root.join(DATA_DIR);
        if !data_dir.exists() {
            return Err(AppError::RepoNotInitialized { path: data_dir });
        }
        Ok(Self::from_parts(root, data_dir))
    }

    /// Creates the data directory and a default configuration under `root`.
    ///
    /// Existing files are left in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or configuration cannot be written.
    pub fn init(root: &Path) -> Result<Self> {
        let data_dir = root.join(DATA_DIR);
        std::fs::create_dir_all(&data_dir)?;
        let context = Self::from_parts(root.to_path_buf(), data_dir);
        if !context.config_path.exists() {
            Config::default().save(&context.data_dir)?;
        }
        Ok(context)
    }

    fn from_parts(root: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            root,
            store_path: data_dir.join(FileStore::FILE_NAME),
            config_path: data_dir.join(Config::FILE_NAME),
            data_dir,
        }
    }

    /// Returns the workspace root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Returns the `.threadswap` directory path.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_path()
    }

    /// Returns the JSONL store path.
    #[must_use]
    pub fn store_path(&self) -> &Path {
        self.store_path.as_path()
    }

    /// Returns the config TOML path.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        self.config_path.as_path()
    }

    /// Opens the file store for this directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be initialized.
    pub fn open_store(&self) -> Result<FileStore> {
        Ok(FileStore::new(self.store_path.clone())?)
    }

    /// Loads configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load(self.data_dir())?)
    }
}
