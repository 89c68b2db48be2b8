//! Per-entry actions: copy, download, share, favorite
//!
//! The side effects live behind provider traits. These functions only decide
//! whether an action applies to an entry and which event to emit from the
//! provider's success or failure.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::entry::ScriptEntry;
use crate::notify::{CatalogEvent, NotificationSink};

/// Text clipboard
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Native share capability (share sheet, etc.)
pub trait ShareTarget {
    fn share(&mut self, link: &ShareLink) -> Result<()>;
}

/// Saves a script body under a file name
pub trait Downloader {
    fn save(&mut self, file_name: &str, content: &str) -> Result<PathBuf>;
}

/// What gets handed to a share target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareLink {
    pub fn for_entry(entry: &ScriptEntry, base_url: &str) -> Self {
        Self {
            title: entry.title.clone(),
            text: entry.description.clone(),
            url: format!("{}{}", base_url.trim_end_matches('/'), entry.share_path()),
        }
    }
}

/// How an action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    Failed,
    /// The entry has nothing for this action (e.g. no content)
    Unavailable,
}

/// Copy the script body to the clipboard
pub fn copy_content(
    entry: &ScriptEntry,
    clipboard: &mut dyn Clipboard,
    sink: &dyn NotificationSink,
) -> ActionOutcome {
    let Some(content) = entry.content.as_deref().filter(|c| !c.is_empty()) else {
        return ActionOutcome::Unavailable;
    };

    match clipboard.write_text(content) {
        Ok(()) => {
            sink.notify(&CatalogEvent::CopySucceeded { id: entry.id });
            ActionOutcome::Done
        }
        Err(e) => {
            warn!("Copy of script {} failed: {:#}", entry.id, e);
            sink.notify(&CatalogEvent::CopyFailed {
                id: entry.id,
                reason: format!("{:#}", e),
            });
            ActionOutcome::Failed
        }
    }
}

/// Hand the script body to a downloader under its original file name
pub fn download(
    entry: &ScriptEntry,
    downloader: &mut dyn Downloader,
    sink: &dyn NotificationSink,
) -> Result<Option<PathBuf>> {
    let (Some(file_name), Some(content)) = (entry.file_name.as_deref(), entry.content.as_deref())
    else {
        return Ok(None);
    };
    if !entry.can_download() {
        return Ok(None);
    }

    let path = downloader.save(file_name, content)?;
    sink.notify(&CatalogEvent::DownloadStarted {
        id: entry.id,
        file_name: file_name.to_string(),
    });
    Ok(Some(path))
}

/// Share a link to the entry.
///
/// Tries the share target first. If there is none, or it fails, the link is
/// copied to the clipboard instead and `LinkCopied` is emitted.
pub fn share(
    entry: &ScriptEntry,
    base_url: &str,
    target: Option<&mut dyn ShareTarget>,
    clipboard: &mut dyn Clipboard,
    sink: &dyn NotificationSink,
) -> (ShareLink, ActionOutcome) {
    let link = ShareLink::for_entry(entry, base_url);

    if let Some(target) = target {
        match target.share(&link) {
            Ok(()) => return (link, ActionOutcome::Done),
            Err(e) => debug!("Share target failed, falling back to clipboard: {:#}", e),
        }
    }

    match clipboard.write_text(&link.url) {
        Ok(()) => {
            sink.notify(&CatalogEvent::LinkCopied {
                id: entry.id,
                url: link.url.clone(),
            });
            (link, ActionOutcome::Done)
        }
        Err(e) => {
            warn!("Could not copy share link for {}: {:#}", entry.id, e);
            (link, ActionOutcome::Failed)
        }
    }
}

/// Session-scoped favorite ids
#[derive(Debug, Default, Clone)]
pub struct Favorites {
    ids: BTreeSet<u64>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip the favorite state of `entry`; returns the new state
    pub fn toggle(&mut self, entry: &ScriptEntry, sink: &dyn NotificationSink) -> bool {
        if self.ids.remove(&entry.id) {
            sink.notify(&CatalogEvent::FavoriteRemoved {
                id: entry.id,
                title: entry.title.clone(),
            });
            false
        } else {
            self.ids.insert(entry.id);
            sink.notify(&CatalogEvent::FavoriteAdded {
                id: entry.id,
                title: entry.title.clone(),
            });
            true
        }
    }

    /// Forget ids that are no longer in the catalog
    pub fn retain_existing(&mut self, collection: &[ScriptEntry]) {
        self.ids.retain(|id| collection.iter().any(|e| e.id == *id));
    }
}

/// Writes downloads into a directory
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Downloader for DirectoryDownloader {
    fn save(&mut self, file_name: &str, content: &str) -> Result<PathBuf> {
        // Only the final component; a stored name must not escape the directory
        let name = Path::new(file_name)
            .file_name()
            .with_context(|| format!("Invalid file name {:?}", file_name))?;

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create download directory {:?}", self.dir))?;
        let path = self.dir.join(name);
        fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(path)
    }
}

/// "Clipboard" for terminal use: prints the text to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text.trim_end_matches('\n')).context("Failed to write to stdout")?;
        stdout.flush().context("Failed to flush stdout")
    }
}
