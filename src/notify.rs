//! Notification events
//!
//! The engine fires discrete events into a [`NotificationSink`]. How (or
//! whether) they are displayed is up to the presentation layer.

use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Something the user should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    EntryCreated { id: u64, title: String },
    EntryCreateFailed { reason: String },
    EntryDeleted { id: u64, title: String },
    EntryDeleteFailed { id: u64, reason: String },
    CopySucceeded { id: u64 },
    CopyFailed { id: u64, reason: String },
    DownloadStarted { id: u64, file_name: String },
    LinkCopied { id: u64, url: String },
    FavoriteAdded { id: u64, title: String },
    FavoriteRemoved { id: u64, title: String },
    StorageReadFailed { reason: String },
}

impl CatalogEvent {
    pub fn title(&self) -> &'static str {
        match self {
            Self::EntryCreated { .. } => "Success",
            Self::EntryCreateFailed { .. } => "Error",
            Self::EntryDeleted { .. } => "Script Deleted",
            Self::EntryDeleteFailed { .. } => "Delete Failed",
            Self::CopySucceeded { .. } => "Copied to Clipboard",
            Self::CopyFailed { .. } => "Copy Failed",
            Self::DownloadStarted { .. } => "Download Started",
            Self::LinkCopied { .. } => "Link Copied",
            Self::FavoriteAdded { .. } => "Added to Favorites",
            Self::FavoriteRemoved { .. } => "Removed from Favorites",
            Self::StorageReadFailed { .. } => "Could Not Load Your Scripts",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::EntryCreated { .. } => "Script uploaded successfully!".to_string(),
            Self::EntryCreateFailed { reason } => reason.clone(),
            Self::EntryDeleted { title, .. } => format!("{} has been removed.", title),
            Self::EntryDeleteFailed { reason, .. } => reason.clone(),
            Self::CopySucceeded { .. } => {
                "Script code has been copied to your clipboard.".to_string()
            }
            Self::CopyFailed { .. } => "Unable to copy script code.".to_string(),
            Self::DownloadStarted { file_name, .. } => {
                format!("{} is being downloaded.", file_name)
            }
            Self::LinkCopied { .. } => "Script link copied to clipboard.".to_string(),
            Self::FavoriteAdded { title, .. } => format!("{} added to your favorites.", title),
            Self::FavoriteRemoved { title, .. } => {
                format!("{} removed from your favorites.", title)
            }
            Self::StorageReadFailed { reason } => {
                format!("Showing built-in scripts only: {}", reason)
            }
        }
    }

    /// Failure events get the destructive toast style
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::EntryCreateFailed { .. }
                | Self::EntryDeleteFailed { .. }
                | Self::CopyFailed { .. }
                | Self::StorageReadFailed { .. }
        )
    }
}

/// Receiver for catalog events
pub trait NotificationSink {
    fn notify(&self, event: &CatalogEvent);
}

/// Sink that logs every event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, event: &CatalogEvent) {
        if event.is_destructive() {
            warn!(title = event.title(), "{}", event.description());
        } else {
            info!(title = event.title(), "{}", event.description());
        }
    }
}

/// Sink that keeps every event; clones share the same buffer
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<CatalogEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CatalogEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<CatalogEvent> {
        self.events().pop()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: &CatalogEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}
