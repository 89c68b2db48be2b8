//! Script entries and upload drafts
//!
//! [`ScriptEntry`] is the unit of the catalog. Entries are validated at the
//! boundary (upload, load from storage) so consumers never re-check optional
//! fields on their own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::types::Complexity;

/// A catalog entry, curated or user-uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptEntry {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub language: String,
    pub complexity: Complexity,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub is_user_uploaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl ScriptEntry {
    /// Recency key: `uploadedAt` in epoch milliseconds, else the id.
    ///
    /// Curated ids are small literals, so built-ins always sort as older than
    /// anything uploaded.
    pub fn effective_timestamp(&self) -> i64 {
        match self.uploaded_at {
            Some(at) => at.timestamp_millis(),
            None => i64::try_from(self.id).unwrap_or(i64::MAX),
        }
    }

    pub fn can_copy(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
    }

    pub fn can_download(&self) -> bool {
        self.can_copy() && self.file_name.as_deref().is_some_and(|n| !n.is_empty())
    }

    pub fn can_delete(&self) -> bool {
        self.is_user_uploaded
    }

    /// Path component used to build share links
    pub fn share_path(&self) -> String {
        format!("/script/{}", self.id)
    }

    /// Case-insensitive substring match over title, description and tags.
    /// `needle` must already be lowercased; an empty needle matches.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }

    /// Check entry invariants, naming the first failing field
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        require_text("language", &self.language)?;
        require_text("category", &self.category)?;

        if self.is_user_uploaded {
            if self.uploaded_at.is_none() {
                return Err(CatalogError::validation(
                    "uploaded scripts must carry an upload timestamp",
                ));
            }
            if !self.can_copy() {
                return Err(CatalogError::validation("uploaded scripts must have content"));
            }
            if !self.can_download() {
                return Err(CatalogError::validation("uploaded scripts must have a file name"));
            }
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Upload form metadata, before an id and timestamp are assigned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub description: String,
    pub language: String,
    /// Raw text from the form; parsed into [`Complexity`] on ingest
    pub complexity: String,
    pub category: String,
    /// Comma-separated tag list
    pub tags: String,
}

impl EntryDraft {
    /// Tags split on commas, trimmed, empty pieces dropped
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn parsed_complexity(&self) -> Result<Complexity> {
        let raw = self.complexity.trim();
        if raw.is_empty() {
            return Err(CatalogError::validation("complexity is required"));
        }
        raw.parse().map_err(|_| {
            CatalogError::validation(format!(
                "complexity must be Beginner, Intermediate or Advanced (got '{}')",
                raw
            ))
        })
    }

    /// Build a user entry from this draft. The result is validated.
    pub fn into_entry(
        self,
        id: u64,
        uploaded_at: DateTime<Utc>,
        file: UploadedFile,
    ) -> Result<ScriptEntry> {
        let complexity = self.parsed_complexity()?;
        let tags = self.tag_list();
        let entry = ScriptEntry {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            language: self.language.trim().to_string(),
            complexity,
            category: self.category.trim().to_string(),
            tags,
            content: Some(file.content),
            file_name: Some(file.file_name),
            is_user_uploaded: true,
            uploaded_at: Some(uploaded_at),
        };
        entry.validate()?;
        Ok(entry)
    }
}

/// The file picked in the upload dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content: String,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Decode raw bytes as text. Invalid UTF-8 sequences are replaced.
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(file_name, String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_name.trim().is_empty() || self.content.is_empty() {
            return Err(CatalogError::validation("Please select a file to upload"));
        }
        Ok(())
    }
}
