//! Core engine for filecab: a file-backed, per-type JSON record store.
//!
//! Each record type owns one directory; each record is one JSON document
//! named `<id>.json`. The engine offers durable CRUD plus a bounded,
//! ordered range scan keyed by sortable timestamp identifiers.

pub mod codec;
pub mod logging;
pub mod repo;

pub use codec::{decode, encode, CodecError, CodecResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use repo::file_repo::{
    JsonFileRepository, RangeQuery, RecordRepository, RepoError, RepoResult, RANGE_DEFAULT_LIMIT,
};
pub use repo::record::Record;
pub use repo::sink::{CollectingSink, ErrorSink, LogSink};
pub use repo::store::FileStore;
pub use repo::timestamp::{is_sortable_timestamp, sortable_timestamp};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
