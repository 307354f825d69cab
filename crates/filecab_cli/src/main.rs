//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `filecab_core` linkage.
//! - Exercise one create/read/delete roundtrip against a scratch store.

use filecab_core::{FileStore, Record, RecordRepository};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct ProbeRecord {
    label: String,
    attempts: u32,
}

impl Record for ProbeRecord {
    const TYPE_NAME: &'static str = "ProbeRecord";
}

fn main() {
    println!("filecab_core version={}", filecab_core::core_version());
    if let Err(err) = roundtrip_probe() {
        eprintln!("probe failed: {err}");
        std::process::exit(1);
    }
}

fn roundtrip_probe() -> Result<(), Box<dyn Error>> {
    let root = std::env::temp_dir().join(format!("filecab-probe-{}", std::process::id()));
    let store = FileStore::try_new(&root)?;
    let repo = store.repository::<ProbeRecord>()?;

    let record = ProbeRecord {
        label: "probe".to_string(),
        attempts: 1,
    };
    repo.create(&record, "probe-1")?;
    let loaded = repo.get_by_id("probe-1")?;
    println!("roundtrip ok={}", loaded.as_ref() == Some(&record));
    repo.delete("probe-1")?;

    let _ = std::fs::remove_dir_all(&root);
    Ok(())
}
