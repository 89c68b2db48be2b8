//! Built-in catalog entries
//!
//! Curated entries are defined at build time, use ids 1..N, and are never
//! mutated or deleted at runtime.

use crate::entry::ScriptEntry;
use crate::types::Complexity;

const DATA_PROCESSOR: &str = r#"import csv
import sys

def clean(row):
    return {k.strip(): v.strip() for k, v in row.items() if v and v.strip()}

with open(sys.argv[1], newline="") as src, open(sys.argv[2], "w", newline="") as dst:
    reader = csv.DictReader(src)
    writer = csv.DictWriter(dst, fieldnames=reader.fieldnames)
    writer.writeheader()
    for row in reader:
        writer.writerow(clean(row))
"#;

const FILE_ORGANIZER: &str = r#"const fs = require("fs");
const path = require("path");

const dir = process.argv[2] || ".";
for (const name of fs.readdirSync(dir)) {
  const ext = path.extname(name).slice(1) || "other";
  fs.mkdirSync(path.join(dir, ext), { recursive: true });
  fs.renameSync(path.join(dir, name), path.join(dir, ext, name));
}
"#;

const BACKUP_MANAGER: &str = r#"#!/usr/bin/env bash
set -euo pipefail

SRC="${1:?source directory}"
DEST="${2:?destination directory}"
STAMP="$(date +%Y%m%d-%H%M%S)"

tar -czf "${DEST}/backup-${STAMP}.tar.gz" -C "${SRC}" .
find "${DEST}" -name 'backup-*.tar.gz' -mtime +30 -delete
"#;

fn entry(
    id: u64,
    title: &str,
    description: &str,
    language: &str,
    complexity: Complexity,
    category: &str,
    tags: &[&str],
) -> ScriptEntry {
    ScriptEntry {
        id,
        title: title.to_string(),
        description: description.to_string(),
        language: language.to_string(),
        complexity,
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        content: None,
        file_name: None,
        is_user_uploaded: false,
        uploaded_at: None,
    }
}

fn with_source(mut entry: ScriptEntry, file_name: &str, content: &str) -> ScriptEntry {
    entry.file_name = Some(file_name.to_string());
    entry.content = Some(content.to_string());
    entry
}

/// The curated set, in definition order
pub fn curated_entries() -> Vec<ScriptEntry> {
    vec![
        with_source(
            entry(
                1,
                "Data Processor",
                "Automated data cleaning and transformation script for CSV files",
                "Python",
                Complexity::Intermediate,
                "Data Processing",
                &["csv", "data", "automation"],
            ),
            "data_processor.py",
            DATA_PROCESSOR,
        ),
        with_source(
            entry(
                2,
                "File Organizer",
                "Automatically organize files in directories by type and date",
                "JavaScript",
                Complexity::Beginner,
                "File Management",
                &["files", "organization", "cleanup"],
            ),
            "file_organizer.js",
            FILE_ORGANIZER,
        ),
        entry(
            3,
            "API Monitor",
            "Monitor API endpoints and send alerts when downtime is detected",
            "Python",
            Complexity::Advanced,
            "Monitoring",
            &["api", "uptime", "alerts"],
        ),
        with_source(
            entry(
                4,
                "Backup Manager",
                "Automated backup solution with compression and cloud storage",
                "Bash",
                Complexity::Intermediate,
                "System Administration",
                &["backup", "compression", "cron"],
            ),
            "backup_manager.sh",
            BACKUP_MANAGER,
        ),
        entry(
            5,
            "Log Analyzer",
            "Parse and analyze server logs to identify patterns and issues",
            "Python",
            Complexity::Advanced,
            "Analytics",
            &["logs", "parsing", "analytics"],
        ),
        entry(
            6,
            "Image Resizer",
            "Batch resize images with watermark and format conversion",
            "JavaScript",
            Complexity::Beginner,
            "Media Processing",
            &["images", "batch", "watermark"],
        ),
    ]
}
