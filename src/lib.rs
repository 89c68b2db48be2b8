//! Script Hub catalog engine
//!
//! Merges a curated script set with user uploads persisted by a local store,
//! and derives filtered, searched and sorted views over the result.

pub mod actions;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod curated;
pub mod entry;
pub mod error;
pub mod notify;
pub mod query;
pub mod store;
pub mod types;

pub use actions::{
    ActionOutcome, Clipboard, DirectoryDownloader, Downloader, Favorites, ShareLink, ShareTarget,
    StdoutClipboard,
};
pub use catalog::{Catalog, Clock, DeleteOutcome, FixedClock, SystemClock};
pub use config::CatalogConfig;
pub use curated::curated_entries;
pub use entry::{EntryDraft, ScriptEntry, UploadedFile};
pub use error::{CatalogError, Result};
pub use notify::{CatalogEvent, NotificationSink, RecordingSink, TracingSink};
pub use query::{PartitionedView, Query, partitioned_view, view};
pub use store::{
    FileBackend, LoadReport, MemoryBackend, StorageBackend, USER_SCRIPTS_KEY, UserStore, backup_key,
};
pub use types::{Complexity, FieldFilter, SortBy, ViewTab};
