//! Catalog Merge and Mutation Workflows
//!
//! [`Catalog`] combines the read-only curated set with the user subset owned
//! by [`UserStore`]. The merged collection is recomputed on every call, so it
//! always reflects the latest store snapshot.
//!
//! # Mutations
//!
//! - **create**: validate, assign id + `uploadedAt`, append, save. The entry
//!   is committed only if the save succeeds.
//! - **delete**: user entries only. Curated ids and unknown ids are no-ops
//!   reported through [`DeleteOutcome`], never errors.
//!
//! # Id assignment
//!
//! New ids are `max(now in millis, highest id + 1)`. Two creates inside one
//! clock tick therefore still get distinct, increasing ids.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::curated::curated_entries;
use crate::entry::{EntryDraft, ScriptEntry, UploadedFile};
use crate::error::{CatalogError, Result};
use crate::notify::{CatalogEvent, NotificationSink, TracingSink};
use crate::query::{self, PartitionedView, Query};
use crate::store::{StorageBackend, UserStore};

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Result of a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user entry was removed and the removal persisted
    Deleted(ScriptEntry),
    /// The id belongs to a curated entry; nothing changed
    Protected,
    /// No entry with this id; nothing changed
    NotFound,
}

/// The merged, addressable collection of curated and user entries
pub struct Catalog {
    curated: Vec<ScriptEntry>,
    store: UserStore,
    clock: Box<dyn Clock>,
    sink: Box<dyn NotificationSink>,
}

impl Catalog {
    /// Build a catalog over the built-in entries and load the user subset
    /// from `backend`.
    ///
    /// Read problems are reported to the sink as `StorageReadFailed` and the
    /// catalog starts with whatever could be recovered.
    pub fn open(
        backend: impl StorageBackend + 'static,
        sink: impl NotificationSink + 'static,
    ) -> Self {
        Self::with_parts(curated_entries(), UserStore::new(backend), sink)
    }

    /// Build a catalog from explicit parts and load the store
    pub fn with_parts(
        curated: Vec<ScriptEntry>,
        mut store: UserStore,
        sink: impl NotificationSink + 'static,
    ) -> Self {
        let reserved: Vec<u64> = curated.iter().map(|e| e.id).collect();
        let report = store.load_reserving(&reserved);
        for issue in &report.issues {
            sink.notify(&CatalogEvent::StorageReadFailed {
                reason: issue.to_string(),
            });
        }

        Self {
            curated,
            store,
            clock: Box::new(SystemClock),
            sink: Box::new(sink),
        }
    }

    /// Replace the clock used to stamp new entries
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn curated(&self) -> &[ScriptEntry] {
        &self.curated
    }

    pub fn user_entries(&self) -> &[ScriptEntry] {
        self.store.entries()
    }

    pub fn sink(&self) -> &dyn NotificationSink {
        self.sink.as_ref()
    }

    /// Curated entries first, then user entries, each in definition order
    pub fn collection(&self) -> Vec<ScriptEntry> {
        self.curated
            .iter()
            .chain(self.store.entries())
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u64) -> Option<&ScriptEntry> {
        self.curated
            .iter()
            .chain(self.store.entries())
            .find(|e| e.id == id)
    }

    /// Like [`Catalog::get`], but a missing id is a `NotFound` error
    pub fn find(&self, id: u64) -> Result<&ScriptEntry> {
        self.get(id).ok_or(CatalogError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.curated.len() + self.store.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn view(&self, query: &Query) -> Vec<ScriptEntry> {
        query::view(&self.collection(), query)
    }

    pub fn partitioned_view(&self, query: &Query) -> PartitionedView {
        query::partitioned_view(&self.collection(), query)
    }

    /// Ingest an uploaded script.
    ///
    /// Emits `EntryCreated` on success. On any failure emits
    /// `EntryCreateFailed`, returns the error, and leaves the catalog as it
    /// was.
    pub fn create(&mut self, draft: EntryDraft, file: UploadedFile) -> Result<ScriptEntry> {
        match self.try_create(draft, file) {
            Ok(entry) => {
                info!("Created script {} ({})", entry.id, entry.title);
                self.sink.notify(&CatalogEvent::EntryCreated {
                    id: entry.id,
                    title: entry.title.clone(),
                });
                Ok(entry)
            }
            Err(e) => {
                warn!("Script upload failed: {}", e);
                let reason = match &e {
                    CatalogError::Validation(msg) => msg.clone(),
                    other => other.to_string(),
                };
                self.sink.notify(&CatalogEvent::EntryCreateFailed { reason });
                Err(e)
            }
        }
    }

    fn try_create(&mut self, draft: EntryDraft, file: UploadedFile) -> Result<ScriptEntry> {
        file.validate()?;
        let now = self.clock.now();
        let id = self.next_id(now);
        let entry = draft.into_entry(id, now, file)?;

        if self.get(entry.id).is_some() {
            return Err(CatalogError::IdCollision(entry.id));
        }
        self.store.insert(entry.clone())?;
        Ok(entry)
    }

    fn next_id(&self, now: DateTime<Utc>) -> u64 {
        let now_millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let highest = self
            .curated
            .iter()
            .chain(self.store.entries())
            .map(|e| e.id)
            .max()
            .unwrap_or(0);
        now_millis.max(highest.saturating_add(1))
    }

    /// Remove a user entry by id.
    ///
    /// Returns an error only when the storage medium rejected the write; in
    /// that case the entry stays in the catalog.
    pub fn delete(&mut self, id: u64) -> Result<DeleteOutcome> {
        if self.curated.iter().any(|e| e.id == id) {
            debug!("Ignoring delete of curated script {}", id);
            return Ok(DeleteOutcome::Protected);
        }

        match self.store.remove(id) {
            Ok(Some(entry)) => {
                info!("Deleted script {} ({})", entry.id, entry.title);
                self.sink.notify(&CatalogEvent::EntryDeleted {
                    id: entry.id,
                    title: entry.title.clone(),
                });
                Ok(DeleteOutcome::Deleted(entry))
            }
            Ok(None) => {
                debug!("Delete target {} not found", id);
                Ok(DeleteOutcome::NotFound)
            }
            Err(e) => {
                warn!("Delete of script {} not persisted: {}", id, e);
                self.sink.notify(&CatalogEvent::EntryDeleteFailed {
                    id,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

impl Default for Catalog {
    /// Built-in entries only, backed by memory
    fn default() -> Self {
        Self::open(crate::store::MemoryBackend::new(), TracingSink)
    }
}
