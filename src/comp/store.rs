//! Lock store: locked compilations keyed by target
//!
//! Persisted as a JSON object mapping keys such as `linux_3.12` and
//! `linux_3.12_high` to listing text, indented by two spaces with sorted keys
//! and a trailing newline. Locking merges new compilations into the existing
//! entries and never drops a key.

use crate::comp::target::{comp_key, CompNames};
use crate::comp::Comp;
use crate::error::{DepsyncError, DepsyncResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Locked set of compilations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockStore {
    entries: BTreeMap<String, String>,
}

impl LockStore {
    /// Load the store, or an empty one if the file does not exist
    pub async fn load(path: &Path) -> DepsyncResult<Self> {
        if !path.exists() {
            debug!("Lock file {} not found, starting empty", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| DepsyncError::io(format!("reading lock file {}", path.display()), e))?;

        Self::from_json(&content, path)
    }

    /// Parse store contents. `path` is only used for error reporting.
    pub fn from_json(content: &str, path: &Path) -> DepsyncResult<Self> {
        serde_json::from_str(content).map_err(|source| DepsyncError::StoreCorrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize as sorted, two-space indented JSON with a trailing newline
    pub fn to_json(&self) -> DepsyncResult<String> {
        let mut json = serde_json::to_string_pretty(&self.entries)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the store to disk
    pub async fn save(&self, path: &Path) -> DepsyncResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DepsyncError::io(format!("creating directory {}", parent.display()), e))?;
        }

        fs::write(path, self.to_json()?)
            .await
            .map_err(|e| DepsyncError::io(format!("writing lock file {}", path.display()), e))
    }

    /// Listing stored under `key`; empty entries count as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|listing| !listing.is_empty())
    }

    /// Stored compilations of a target, or `None` unless both listings are present
    pub fn comp(&self, names: &CompNames) -> Option<Comp> {
        let (low_key, high_key) = names.keys();
        Some(Comp {
            low: self.get(low_key)?.to_string(),
            high: self.get(high_key)?.to_string(),
        })
    }

    /// Insert or replace one entry
    pub fn insert(&mut self, key: impl Into<String>, listing: impl Into<String>) {
        self.entries.insert(key.into(), listing.into());
    }

    /// Record both compilations of a target
    pub fn insert_comp(&mut self, names: &CompNames, comp: &Comp) {
        let (low_key, high_key) = names.keys();
        self.insert(low_key, comp.low.clone());
        self.insert(high_key, comp.high.clone());
    }

    /// Merge entries, replacing existing keys and keeping all others
    pub fn merge(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.entries.extend(entries);
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read every compilation file in `comps_dir`, keyed by lock key
pub async fn read_comps(comps_dir: &Path) -> DepsyncResult<BTreeMap<String, String>> {
    let mut comps = BTreeMap::new();

    if !comps_dir.is_dir() {
        warn!("Compilation directory {} not found", comps_dir.display());
        return Ok(comps);
    }

    let mut entries = fs::read_dir(comps_dir)
        .await
        .map_err(|e| DepsyncError::io(format!("reading directory {}", comps_dir.display()), e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DepsyncError::io(format!("reading directory {}", comps_dir.display()), e))?
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let listing = fs::read_to_string(&path)
            .await
            .map_err(|e| DepsyncError::io(format!("reading compilation {}", path.display()), e))?;

        debug!("Collected {} as {}", path.display(), comp_key(stem));
        comps.insert(comp_key(stem).to_string(), listing);
    }

    Ok(comps)
}

/// Write a target's compilations to `<comps_dir>/<name>.txt`, returning the
/// low and high paths
pub async fn write_comps(
    comps_dir: &Path,
    names: &CompNames,
    comp: &Comp,
) -> DepsyncResult<(PathBuf, PathBuf)> {
    fs::create_dir_all(comps_dir)
        .await
        .map_err(|e| DepsyncError::io(format!("creating directory {}", comps_dir.display()), e))?;

    let low = comps_dir.join(format!("{}.txt", names.low));
    let high = comps_dir.join(format!("{}.txt", names.high));
    for (path, listing) in [(&low, &comp.low), (&high, &comp.high)] {
        fs::write(path, listing)
            .await
            .map_err(|e| DepsyncError::io(format!("writing compilation {}", path.display()), e))?;
        debug!("Wrote {}", path.display());
    }

    Ok((low, high))
}

/// Merge all compilations in `comps_dir` into the lock file at `lock_path`
pub async fn lock(lock_path: &Path, comps_dir: &Path) -> DepsyncResult<LockStore> {
    let mut store = LockStore::load(lock_path).await?;
    let comps = read_comps(comps_dir).await?;
    let added = comps.len();

    store.merge(comps);
    store.save(lock_path).await?;

    info!(
        "Locked {} compilation(s) into {} ({} total)",
        added,
        lock_path.display(),
        store.len()
    );
    Ok(store)
}
