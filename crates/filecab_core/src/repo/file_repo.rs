//! Record repository contract and the file-backed engine.
//!
//! # Responsibility
//! - Provide durable CRUD over one directory of JSON record files.
//! - Implement the bounded, ordered, timestamp-keyed range scan.
//!
//! # Invariants
//! - The set of `*.json` files in the directory is exactly the live
//!   record set; there is no manifest and no versioning.
//! - Per-file read/decode failures in bulk reads are isolated: reported
//!   to the sink, the file skipped, the aggregate never aborted.
//! - Point lookups reject invalid persisted state instead of masking it.
//! - Writes are unconditional full rewrites; no locking, no atomic
//!   rename. Concurrent writers to one id race and the last flush wins.

use crate::codec::{self, CodecError};
use crate::repo::paths::{is_valid_component, record_path, RECORD_FILE_EXTENSION};
use crate::repo::record::Record;
use crate::repo::sink::{ErrorSink, LogSink};
use crate::repo::timestamp::{clamp_to_floor, sortable_timestamp};
use chrono::{DateTime, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default `max_count` for range queries built with `RangeQuery::new`.
pub const RANGE_DEFAULT_LIMIT: u32 = 100;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from repository construction, writes and point lookups.
#[derive(Debug)]
pub enum RepoError {
    /// Repository directory could not be created; the engine is unusable.
    Bootstrap { path: PathBuf, source: io::Error },
    /// Record id failed the single-component rule.
    InvalidId(String),
    /// Repository name failed the single-component rule.
    InvalidName(String),
    /// File read/write/delete failure outside bulk-read isolation.
    Io { path: PathBuf, source: io::Error },
    /// Payload failure on encode, or on decode during a point lookup.
    Codec(CodecError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bootstrap { path, source } => {
                write!(
                    f,
                    "failed to create repository directory `{}`: {source}",
                    path.display()
                )
            }
            Self::InvalidId(id) => write!(f, "invalid record id `{id}`"),
            Self::InvalidName(name) => write!(f, "invalid repository name `{name}`"),
            Self::Io { path, source } => write!(f, "io failure at `{}`: {source}", path.display()),
            Self::Codec(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bootstrap { source, .. } => Some(source),
            Self::InvalidId(_) => None,
            Self::InvalidName(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<CodecError> for RepoError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

/// Bounds and shape of a timestamp-keyed range scan.
///
/// `from`/`to` are inclusive once rendered in the sortable filename format;
/// both clamp to the year-2000 floor independently. Meaningful results
/// require record ids in that format (see `create_timestamped`).
#[derive(Debug, Clone)]
pub struct RangeQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Maximum records returned. Selection is truncated before decoding,
    /// so per-file decode failures can shrink the result below this.
    pub max_count: u32,
    /// Descending filename order when set; ascending otherwise.
    pub most_recent_first: bool,
}

impl RangeQuery {
    /// Creates an ascending query over `[from, to]` with the default limit.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            max_count: RANGE_DEFAULT_LIMIT,
            most_recent_first: false,
        }
    }
}

/// Repository interface for record CRUD and range scans.
pub trait RecordRepository<T: Record> {
    /// Writes `record` under `id`, creating or overwriting unconditionally.
    fn create(&self, record: &T, id: &str) -> RepoResult<()>;
    /// Same write path as `create`; the distinction is caller intent.
    fn update(&self, record: &T, id: &str) -> RepoResult<()>;
    /// Removes the record file; deleting an absent id is a no-op.
    fn delete(&self, id: &str) -> RepoResult<()>;
    /// Gets one record, `None` when no file backs `id`.
    fn get_by_id(&self, id: &str) -> RepoResult<Option<T>>;
    /// Returns every decodable record in directory enumeration order.
    fn get_all(&self) -> RepoResult<Vec<T>>;
    /// Returns up to `max_count` records whose ids fall inside the query
    /// bounds, ordered by filename.
    fn get_range(&self, query: &RangeQuery) -> RepoResult<Vec<T>>;
}

/// File-backed repository storing one JSON document per record.
pub struct JsonFileRepository<T> {
    dir: PathBuf,
    sink: Arc<dyn ErrorSink>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileRepository<T> {
    /// Opens a repository over `dir`, creating the directory if absent.
    ///
    /// Diagnostics for skipped files go to the `log` facade; use
    /// `try_new_with_sink` to capture them elsewhere.
    ///
    /// # Errors
    /// - `RepoError::Bootstrap` when the directory cannot be created.
    pub fn try_new(dir: impl Into<PathBuf>) -> RepoResult<Self> {
        Self::try_new_with_sink(dir, Arc::new(LogSink))
    }

    /// Opens a repository over `dir` with an injected diagnostics sink.
    pub fn try_new_with_sink(
        dir: impl Into<PathBuf>,
        sink: Arc<dyn ErrorSink>,
    ) -> RepoResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| RepoError::Bootstrap {
            path: dir.clone(),
            source,
        })?;
        info!(
            "event=repository_open module=repo status=ok dir={}",
            dir.display()
        );
        Ok(Self {
            dir,
            sink,
            _record: PhantomData,
        })
    }

    /// Directory holding this repository's record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `record` under an engine-generated sortable timestamp id.
    ///
    /// This is the id scheme `get_range` is built around; repositories
    /// populated through this method are range-queryable by construction.
    /// Callers writing several records within one millisecond must
    /// disambiguate ids themselves.
    pub fn create_timestamped(&self, record: &T, at: DateTime<Utc>) -> RepoResult<String> {
        let id = sortable_timestamp(at);
        self.write_record(record, &id)?;
        Ok(id)
    }

    /// Gets one record, falling back to the type's default when absent.
    ///
    /// Compatibility helper: the return value cannot distinguish "absent"
    /// from "stored and equal to the default"; prefer `get_by_id`.
    pub fn get_or_default(&self, id: &str) -> RepoResult<T>
    where
        T: Default,
    {
        Ok(self.get_by_id(id)?.unwrap_or_default())
    }

    fn checked_record_path(&self, id: &str) -> RepoResult<PathBuf> {
        if !is_valid_component(id) {
            return Err(RepoError::InvalidId(id.to_string()));
        }
        Ok(record_path(&self.dir, id))
    }

    fn write_record(&self, record: &T, id: &str) -> RepoResult<()> {
        let path = self.checked_record_path(id)?;
        let payload = codec::encode(record)?;
        fs::write(&path, payload).map_err(|source| RepoError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(())
    }

    fn record_files(&self) -> RepoResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| RepoError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.sink.log_error(&format!(
                        "event=record_enumeration_failed module=repo dir={} error={err}",
                        self.dir.display()
                    ));
                    continue;
                }
            };
            let is_file = entry.file_type().map(|kind| kind.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(RECORD_FILE_EXTENSION) {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Reads and decodes one file under bulk-read isolation: any failure
    /// is reported to the sink and yields `None`.
    fn read_isolated(&self, path: &Path) -> Option<T> {
        let payload = match fs::read_to_string(path) {
            Ok(payload) => payload,
            Err(err) => {
                self.sink.log_error(&format!(
                    "event=record_read_failed module=repo path={} error={err}",
                    path.display()
                ));
                return None;
            }
        };
        match codec::decode(&payload) {
            Ok(record) => Some(record),
            Err(err) => {
                self.sink.log_error(&format!(
                    "event=record_decode_failed module=repo path={} error={err}",
                    path.display()
                ));
                None
            }
        }
    }
}

impl<T: Record> RecordRepository<T> for JsonFileRepository<T> {
    fn create(&self, record: &T, id: &str) -> RepoResult<()> {
        self.write_record(record, id)
    }

    fn update(&self, record: &T, id: &str) -> RepoResult<()> {
        self.write_record(record, id)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let path = self.checked_record_path(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(RepoError::Io { path, source }),
        }
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Option<T>> {
        let path = self.checked_record_path(id)?;
        let payload = match fs::read_to_string(&path) {
            Ok(payload) => payload,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(RepoError::Io { path, source }),
        };
        Ok(Some(codec::decode(&payload)?))
    }

    fn get_all(&self) -> RepoResult<Vec<T>> {
        let files = self.record_files()?;
        let mut records = Vec::with_capacity(files.len());
        for path in files {
            if let Some(record) = self.read_isolated(&path) {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn get_range(&self, query: &RangeQuery) -> RepoResult<Vec<T>> {
        // Bounds and stems compare lowercase-folded, ordinal.
        let from_key = sortable_timestamp(clamp_to_floor(query.from)).to_lowercase();
        let to_key = sortable_timestamp(clamp_to_floor(query.to)).to_lowercase();
        let max_count = usize::try_from(query.max_count).unwrap_or(usize::MAX);

        let mut stems: Vec<(String, PathBuf)> = self
            .record_files()?
            .into_iter()
            .filter_map(|path| {
                let stem = path.file_stem().and_then(|stem| stem.to_str())?;
                Some((stem.to_lowercase(), path))
            })
            .collect();

        stems.sort_by(|left, right| left.0.cmp(&right.0));
        if query.most_recent_first {
            stems.reverse();
        }

        let selected: Vec<PathBuf> = stems
            .into_iter()
            .filter(|(key, _)| key.as_str() >= from_key.as_str() && key.as_str() <= to_key.as_str())
            .take(max_count)
            .map(|(_, path)| path)
            .collect();

        let mut records = Vec::with_capacity(selected.len());
        for path in selected {
            if let Some(record) = self.read_isolated(&path) {
                records.push(record);
            }
        }
        Ok(records)
    }
}
