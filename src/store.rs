//! Local Scan Store
//!
//! The single ordered list of scan records, newest first. Persisted as one
//! JSON document carrying the scans entry plus an initialized flag - the
//! same layout the dashboard kept in browser storage, so a store file is
//! readable by both.
//!
//! The relay process is the sole writer. Every mutation serializes through
//! the in-process lock and rewrites the whole document; uncoordinated
//! writers doing their own read-modify-write would race (last writer wins),
//! which is exactly why writes are funneled through this type.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Scan;

/// Persisted document layout. Field names match the original browser
/// storage keys.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(rename = "phishlens_scans", default)]
    scans: Vec<Scan>,
    #[serde(rename = "phishlens_initialized", default)]
    initialized: bool,
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(String),
    #[error("store parse error: {0}")]
    Parse(String),
}

/// Scan store backed by a single JSON document on disk.
pub struct ScanStore {
    path: PathBuf,
    scans: RwLock<Vec<Scan>>,
}

impl ScanStore {
    /// Open the store at `path`. An existing document is loaded as-is; a
    /// missing one is seeded with an empty list and the initialized flag.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let scans = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| StoreError::Io(e.to_string()))?;
            let document: StoreDocument = serde_json::from_str(&content)
                .map_err(|e| StoreError::Parse(e.to_string()))?;
            document.scans
        } else {
            Vec::new()
        };

        let store = Self {
            path: path.to_path_buf(),
            scans: RwLock::new(scans),
        };

        if !path.exists() {
            store.persist(&store.scans.read())?;
        }

        Ok(store)
    }

    /// All scans, newest first.
    pub fn all(&self) -> Vec<Scan> {
        self.scans.read().clone()
    }

    /// Look up one scan by id.
    pub fn get(&self, id: &str) -> Option<Scan> {
        self.scans.read().iter().find(|s| s.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.scans.read().len()
    }

    /// Prepend a scan and persist. Newest-first invariant: the new scan
    /// becomes the head of the list.
    pub fn add(&self, scan: Scan) -> Result<(), StoreError> {
        let mut scans = self.scans.write();
        scans.insert(0, scan);
        self.persist(&scans)
    }

    /// Replace the whole list. The narrow write primitive: `add` and
    /// `clear` go through the same whole-document rewrite.
    pub fn replace_all(&self, new_scans: Vec<Scan>) -> Result<(), StoreError> {
        let mut scans = self.scans.write();
        *scans = new_scans;
        self.persist(&scans)
    }

    /// Remove every scan. There is no per-item deletion.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.replace_all(Vec::new())
    }

    fn persist(&self, scans: &[Scan]) -> Result<(), StoreError> {
        let document = StoreDocument {
            scans: scans.to_vec(),
            initialized: true,
        };
        let content = serde_json::to_string_pretty(&document)
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| StoreError::Io(e.to_string()))
    }
}
