//! Store factory handing out per-type repositories under one root.
//!
//! # Responsibility
//! - Create/validate the root directory once.
//! - Compose `root/name` paths and open engines bound to them.
//!
//! # Invariants
//! - No storage logic lives here; everything beyond path composition and
//!   bootstrap belongs to the engine.
//! - All repositories opened through one store share its diagnostics sink.

use crate::repo::file_repo::{JsonFileRepository, RepoError, RepoResult};
use crate::repo::paths::{is_valid_component, repository_dir};
use crate::repo::record::Record;
use crate::repo::sink::{ErrorSink, LogSink};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Root of a record store; one subdirectory per record type.
pub struct FileStore {
    root: PathBuf,
    sink: Arc<dyn ErrorSink>,
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory if absent.
    ///
    /// # Errors
    /// - `RepoError::Bootstrap` when the root cannot be created.
    pub fn try_new(root: impl Into<PathBuf>) -> RepoResult<Self> {
        Self::try_new_with_sink(root, Arc::new(LogSink))
    }

    /// Opens a store with an injected diagnostics sink, shared by every
    /// repository it hands out.
    pub fn try_new_with_sink(root: impl Into<PathBuf>, sink: Arc<dyn ErrorSink>) -> RepoResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| RepoError::Bootstrap {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root, sink })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Opens the repository for `T` under its default directory name.
    pub fn repository<T: Record>(&self) -> RepoResult<JsonFileRepository<T>> {
        self.repository_named(T::TYPE_NAME)
    }

    /// Opens a repository for `T` under an explicit directory name.
    ///
    /// # Errors
    /// - `RepoError::InvalidName` when `name` is not a single path
    ///   component.
    /// - `RepoError::Bootstrap` when the directory cannot be created.
    pub fn repository_named<T: Record>(&self, name: &str) -> RepoResult<JsonFileRepository<T>> {
        if !is_valid_component(name) {
            return Err(RepoError::InvalidName(name.to_string()));
        }
        JsonFileRepository::try_new_with_sink(
            repository_dir(&self.root, name),
            Arc::clone(&self.sink),
        )
    }
}
