//! Storable record contract.
//!
//! # Responsibility
//! - Name the serialization bounds every stored type must satisfy.
//! - Carry the explicit type-name registry used for default repository
//!   naming.
//!
//! # Invariants
//! - `TYPE_NAME` is a valid repository directory name (single path
//!   component) and stays stable across releases, since it determines
//!   where existing data lives on disk.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Contract for types persisted by a repository.
///
/// `TYPE_NAME` replaces runtime type reflection: every record type states
/// its repository directory name explicitly, and the store factory uses it
/// when the caller does not supply a name.
pub trait Record: Serialize + DeserializeOwned {
    /// Default repository directory name for this type.
    const TYPE_NAME: &'static str;
}
