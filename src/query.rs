//! Filter/Sort/Search Engine
//!
//! [`view`] is a pure function of (collection, query): no side effects, no
//! hidden state. Filtering is conjunctive and always runs before sorting.
//!
//! | Sort           | Key                                          | Order |
//! |----------------|----------------------------------------------|-------|
//! | `newest`       | `uploadedAt` millis (else id), then id       | desc  |
//! | `oldest`       | `uploadedAt` millis (else id), then id       | asc   |
//! | `alphabetical` | title, locale-aware                          | asc   |
//! | `complexity`   | Beginner < Intermediate < Advanced           | asc   |
//!
//! All sorts are stable, so equal keys keep collection order.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::entry::ScriptEntry;
use crate::types::{Complexity, FieldFilter, SortBy, ViewTab};

/// Search, filter and sort parameters for one view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub search_term: String,
    pub language: FieldFilter<String>,
    pub complexity: FieldFilter<Complexity>,
    pub category: FieldFilter<String>,
    pub sort_by: SortBy,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = FieldFilter::Only(language.into());
        self
    }

    pub fn complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = FieldFilter::Only(complexity);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = FieldFilter::Only(category.into());
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// True when the search term or any field filter narrows the view
    pub fn has_active_filters(&self) -> bool {
        !self.search_term.is_empty()
            || self.language.is_active()
            || self.complexity.is_active()
            || self.category.is_active()
    }

    /// Reset search and filters, keeping the sort order
    pub fn clear_filters(&mut self) {
        let sort_by = self.sort_by;
        *self = Self {
            sort_by,
            ..Self::default()
        };
    }

    /// Whether `entry` passes every active predicate
    pub fn matches(&self, entry: &ScriptEntry) -> bool {
        let needle = self.search_term.to_lowercase();
        self.matches_with_needle(entry, &needle)
    }

    fn matches_with_needle(&self, entry: &ScriptEntry, needle: &str) -> bool {
        entry.matches_search(needle)
            && self.language.matches(&entry.language)
            && self.complexity.matches(&entry.complexity)
            && self.category.matches(&entry.category)
    }
}

/// Derive the displayed sequence from a collection
pub fn view(collection: &[ScriptEntry], query: &Query) -> Vec<ScriptEntry> {
    let needle = query.search_term.to_lowercase();
    let mut entries: Vec<ScriptEntry> = collection
        .iter()
        .filter(|entry| query.matches_with_needle(entry, &needle))
        .cloned()
        .collect();

    sort_entries(&mut entries, query.sort_by);
    entries
}

pub fn sort_entries(entries: &mut [ScriptEntry], sort_by: SortBy) {
    match sort_by {
        SortBy::Newest => entries.sort_by(|a, b| recency_key(b).cmp(&recency_key(a))),
        SortBy::Oldest => entries.sort_by_key(recency_key),
        SortBy::Alphabetical => entries.sort_by(|a, b| locale_compare(&a.title, &b.title)),
        SortBy::Complexity => entries.sort_by_key(|e| e.complexity.rank()),
    }
}

// Id breaks ties between uploads stamped in the same millisecond
fn recency_key(entry: &ScriptEntry) -> (i64, u64) {
    (entry.effective_timestamp(), entry.id)
}

/// Locale-aware title comparison.
///
/// Levels, each consulted only when the previous one ties:
///
/// 1. base letters: decomposed (NFD), combining marks dropped, case folded
/// 2. accents: unaccented before accented
/// 3. case: lowercase before uppercase
/// 4. raw byte order
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| case_marks(a).cmp(case_marks(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn case_marks(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfd().map(char::is_uppercase)
}

/// A view split by provenance for tab display and counting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedView {
    pub all: Vec<ScriptEntry>,
    pub mine: Vec<ScriptEntry>,
    pub curated: Vec<ScriptEntry>,
}

impl PartitionedView {
    /// Split an already-computed view. Order inside each part is preserved.
    pub fn from_view(all: Vec<ScriptEntry>) -> Self {
        let (mine, curated): (Vec<ScriptEntry>, Vec<ScriptEntry>) =
            all.iter().cloned().partition(|e| e.is_user_uploaded);
        Self { all, mine, curated }
    }

    pub fn tab(&self, tab: ViewTab) -> &[ScriptEntry] {
        match tab {
            ViewTab::All => &self.all,
            ViewTab::Mine => &self.mine,
            ViewTab::Curated => &self.curated,
        }
    }

    pub fn count(&self, tab: ViewTab) -> usize {
        self.tab(tab).len()
    }
}

/// [`view`] followed by the provenance split
pub fn partitioned_view(collection: &[ScriptEntry], query: &Query) -> PartitionedView {
    PartitionedView::from_view(view(collection, query))
}
