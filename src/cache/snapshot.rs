//! Snapshot Module
//!
//! Whole-store persistence. The store is written as one JSON document:
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "<key>": { "value": ..., "created_at": ..., "expires_at": ..., "durability": "Normal" }
//!   }
//! }
//! ```
//!
//! Saving writes a sibling temp file first and renames it over the target,
//! so a crash mid-save leaves the previous snapshot intact.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a, V> {
    version: u32,
    entries: &'a HashMap<String, CacheEntry<V>>,
}

#[derive(Deserialize)]
struct SnapshotOwned<V> {
    version: u32,
    entries: HashMap<String, CacheEntry<V>>,
}

// == Save ==
/// Encodes `entries` to `path`, replacing any previous snapshot.
///
/// On failure the temp file is removed and any previous snapshot is kept.
pub fn save_snapshot<V: Serialize>(
    path: &Path,
    entries: &HashMap<String, CacheEntry<V>>,
) -> Result<()> {
    let temp_path = temp_path_for(path);

    let result = write_snapshot(&temp_path, entries).and_then(|()| {
        fs::rename(&temp_path, path)?;
        Ok(())
    });

    if result.is_err() {
        // may not exist if File::create failed
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_snapshot<V: Serialize>(
    temp_path: &Path,
    entries: &HashMap<String, CacheEntry<V>>,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(temp_path)?);
    serde_json::to_writer(
        &mut writer,
        &SnapshotRef {
            version: SNAPSHOT_VERSION,
            entries,
        },
    )?;
    writer.flush()?;
    Ok(())
}

// == Load ==
/// Decodes the snapshot at `path`.
pub fn load_snapshot<V: DeserializeOwned>(
    path: &Path,
) -> Result<HashMap<String, CacheEntry<V>>> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: SnapshotOwned<V> = serde_json::from_reader(reader)?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(CacheError::IncompatibleSnapshot(snapshot.version));
    }

    Ok(snapshot.entries)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
