//! Pure path resolution for repositories and record files.
//!
//! # Responsibility
//! - Map (root, repository name) and (directory, record id) to paths.
//! - Own the single-component rule shared by record ids and repository
//!   names.
//!
//! # Invariants
//! - No function in this module performs I/O.
//! - Accepted components contain no path separators and no leading dot.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// File extension of every stored record, without the dot.
pub const RECORD_FILE_EXTENSION: &str = "json";

static COMPONENT_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^/\\.][^/\\]*$").expect("component rule regex is valid"));

/// Returns whether `value` is acceptable as a record id or repository name.
///
/// Rejects empty strings, anything containing `/` or `\`, and anything
/// starting with a dot (which also covers `.` and `..` traversal).
pub fn is_valid_component(value: &str) -> bool {
    COMPONENT_RULE.is_match(value)
}

/// Resolves the directory holding one repository's record files.
pub fn repository_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

/// Resolves the file path backing one record id.
pub fn record_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.{RECORD_FILE_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::{is_valid_component, record_path, repository_dir};
    use std::path::Path;

    #[test]
    fn component_rule_accepts_plain_and_timestamp_shaped_names() {
        assert!(is_valid_component("Ticket"));
        assert!(is_valid_component("5"));
        assert!(is_valid_component("2024-03-05T142503.123Z"));
        assert!(is_valid_component("with space"));
    }

    #[test]
    fn component_rule_rejects_traversal_and_separators() {
        assert!(!is_valid_component(""));
        assert!(!is_valid_component("."));
        assert!(!is_valid_component(".."));
        assert!(!is_valid_component(".hidden"));
        assert!(!is_valid_component("a/b"));
        assert!(!is_valid_component("a\\b"));
        assert!(!is_valid_component("../escape"));
    }

    #[test]
    fn repository_dir_joins_root_and_name() {
        let dir = repository_dir(Path::new("/data/store"), "Ticket");
        assert_eq!(dir, Path::new("/data/store/Ticket"));
    }

    #[test]
    fn record_path_appends_id_with_json_extension() {
        let path = record_path(Path::new("/data/store/Ticket"), "t-1");
        assert_eq!(path, Path::new("/data/store/Ticket/t-1.json"));
    }
}
