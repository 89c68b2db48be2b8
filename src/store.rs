//! Persistent User-Entry Store
//!
//! Durable storage of the user-contributed subset. The whole subset lives in
//! one named record (`userScripts`) holding a JSON array; every mutation
//! rewrites the record in full.
//!
//! # Read path
//!
//! | Payload                        | Result                                   |
//! |--------------------------------|------------------------------------------|
//! | record absent                  | empty, no issues                         |
//! | not a JSON array               | empty, one `PersistenceRead` issue       |
//! | array with some bad records    | good records kept, one issue per dropped |
//!
//! Read problems never raise; they are returned in [`LoadReport::issues`]
//! and logged.
//!
//! # Write path
//!
//! [`UserStore::save`] only replaces the in-memory snapshot after the medium
//! accepted the write, so the snapshot never runs ahead of storage.
//!
//! After a load that reported issues, the first save copies the stored
//! payload to `userScripts.bak` before replacing it. If the record still
//! cannot be read at that point, the save fails instead of overwriting it.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::entry::ScriptEntry;
use crate::error::{CatalogError, Result};

/// Name of the record holding the user subset
pub const USER_SCRIPTS_KEY: &str = "userScripts";

/// Record that keeps the payload of a degraded load
pub fn backup_key(key: &str) -> String {
    format!("{}.bak", key)
}

/// A key-value storage medium
pub trait StorageBackend {
    /// Read a record. `Ok(None)` when it does not exist.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace a record in full
    fn write(&mut self, key: &str, payload: &str) -> io::Result<()>;
}

/// Records stored as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, key: &str, payload: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.record_path(key);
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, payload)?;
        // Rename over the record so readers never see a partial payload
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        debug!("Wrote {} bytes to {:?}", payload.len(), path);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    records: HashMap<String, String>,
    quota: Option<usize>,
    fail_writes: bool,
}

/// In-process medium. Clones share the same records, so a test can keep a
/// handle while a store owns another.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any write whose total stored size would exceed `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        let backend = Self::new();
        backend.lock().quota = Some(bytes);
        backend
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Seed a record directly, bypassing quota checks
    pub fn insert_raw(&self, key: &str, payload: &str) {
        self.lock()
            .records
            .insert(key.to_string(), payload.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().records.get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock().records.get(key).cloned())
    }

    fn write(&mut self, key: &str, payload: &str) -> io::Result<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(io::Error::other("storage medium unavailable"));
        }
        if let Some(quota) = state.quota {
            let others: usize = state
                .records
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + payload.len() > quota {
                return Err(io::Error::other(format!(
                    "storage quota of {} bytes exceeded",
                    quota
                )));
            }
        }
        state.records.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// Outcome of reading the persisted record
#[derive(Debug, Default)]
pub struct LoadReport {
    pub entries: Vec<ScriptEntry>,
    pub issues: Vec<CatalogError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Owner of the user subset and its backing record
pub struct UserStore {
    backend: Box<dyn StorageBackend>,
    entries: Vec<ScriptEntry>,
    backup_pending: bool,
}

impl UserStore {
    /// Wrap a backend. The snapshot starts empty until [`UserStore::load`].
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            entries: Vec::new(),
            backup_pending: false,
        }
    }

    /// Current snapshot of user entries, in insertion order
    pub fn entries(&self) -> &[ScriptEntry] {
        &self.entries
    }

    /// Read the record and replace the snapshot with what it holds
    pub fn load(&mut self) -> LoadReport {
        self.load_reserving(&[])
    }

    /// Like [`UserStore::load`], but records whose id is in `reserved` are
    /// dropped as collisions
    pub fn load_reserving(&mut self, reserved: &[u64]) -> LoadReport {
        let report = match self.backend.read(USER_SCRIPTS_KEY) {
            Ok(Some(payload)) => decode_payload(&payload, reserved),
            Ok(None) => {
                debug!("No {} record yet", USER_SCRIPTS_KEY);
                LoadReport::default()
            }
            Err(e) => LoadReport {
                entries: Vec::new(),
                issues: vec![CatalogError::persistence_read(e.to_string())],
            },
        };

        for issue in &report.issues {
            warn!("{}", issue);
        }
        info!("Loaded {} user scripts", report.entries.len());

        self.entries = report.entries.clone();
        self.backup_pending = !report.is_clean();
        report
    }

    /// Serialize `entries` and replace the whole record.
    ///
    /// The snapshot is updated only when the write succeeds.
    pub fn save(&mut self, entries: &[ScriptEntry]) -> Result<()> {
        let payload = serde_json::to_string(entries)?;
        if self.backup_pending {
            self.backup_record()?;
        }
        self.backend
            .write(USER_SCRIPTS_KEY, &payload)
            .map_err(|e| CatalogError::persistence_write(e.to_string()))?;
        self.entries = entries.to_vec();
        debug!("Saved {} user scripts", self.entries.len());
        Ok(())
    }

    /// Copy the current record aside before its first rewrite
    fn backup_record(&mut self) -> Result<()> {
        let stored = self.backend.read(USER_SCRIPTS_KEY).map_err(|e| {
            CatalogError::persistence_write(format!(
                "stored record is unreadable, refusing to overwrite it: {}",
                e
            ))
        })?;

        if let Some(stored) = stored {
            let key = backup_key(USER_SCRIPTS_KEY);
            self.backend.write(&key, &stored).map_err(|e| {
                CatalogError::persistence_write(format!("could not back up stored record: {}", e))
            })?;
            warn!("Kept a copy of the previous user scripts in {}", key);
        }
        self.backup_pending = false;
        Ok(())
    }

    /// Append one entry and persist
    pub fn insert(&mut self, entry: ScriptEntry) -> Result<()> {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(CatalogError::IdCollision(entry.id));
        }
        let mut candidate = self.entries.clone();
        candidate.push(entry);
        self.save(&candidate)
    }

    /// Remove the entry with `id` and persist. `Ok(None)` when absent.
    pub fn remove(&mut self, id: u64) -> Result<Option<ScriptEntry>> {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        let mut candidate = self.entries.clone();
        let removed = candidate.remove(index);
        self.save(&candidate)?;
        Ok(Some(removed))
    }
}

/// Decode a record payload, keeping every record that is a valid user entry
fn decode_payload(payload: &str, reserved: &[u64]) -> LoadReport {
    let records: Vec<serde_json::Value> = match serde_json::from_str(payload) {
        Ok(records) => records,
        Err(e) => {
            return LoadReport {
                entries: Vec::new(),
                issues: vec![CatalogError::persistence_read(format!(
                    "stored payload is not a list of scripts: {}",
                    e
                ))],
            };
        }
    };

    let mut report = LoadReport::default();
    let mut seen: HashSet<u64> = reserved.iter().copied().collect();

    for (index, record) in records.into_iter().enumerate() {
        let entry: ScriptEntry = match serde_json::from_value(record) {
            Ok(entry) => entry,
            Err(e) => {
                report.issues.push(CatalogError::persistence_read(format!(
                    "record {} dropped: {}",
                    index, e
                )));
                continue;
            }
        };

        if !entry.is_user_uploaded {
            report.issues.push(CatalogError::persistence_read(format!(
                "record {} dropped: not flagged as a user upload",
                index
            )));
            continue;
        }
        if let Err(e) = entry.validate() {
            report.issues.push(CatalogError::persistence_read(format!(
                "record {} dropped: {}",
                index, e
            )));
            continue;
        }
        if !seen.insert(entry.id) {
            report.issues.push(CatalogError::persistence_read(format!(
                "record {} dropped: id {} is already in use",
                index, entry.id
            )));
            continue;
        }

        report.entries.push(entry);
    }

    report
}
