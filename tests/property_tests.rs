//! Property-Based Tests for the catalog view engine
//!
//! These tests verify:
//! - Every entry in a view satisfies every active predicate
//! - Views are idempotent
//! - Sort orders hold for arbitrary collections
//! - Title collation ignores accents at the first level and is a total order
//! - Create followed by delete restores the user subset
//! - Saving what was loaded does not change the next load

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use std::cmp::Ordering;

use scripthub::query::locale_compare;
use scripthub::{
    Catalog, Complexity, EntryDraft, FieldFilter, FixedClock, MemoryBackend, Query,
    RecordingSink, ScriptEntry, SortBy, USER_SCRIPTS_KEY, UploadedFile, UserStore, curated_entries,
    view,
};

// =============================================================================
// Strategies
// =============================================================================

const LANGUAGES: &[&str] = &["Python", "JavaScript", "Bash", "PowerShell", "Ruby", "Go"];
const CATEGORIES: &[&str] = &[
    "Data Processing",
    "File Management",
    "Monitoring",
    "System Administration",
    "Analytics",
    "Media Processing",
    "Web Scraping",
    "Automation",
];

fn complexity_strategy() -> impl Strategy<Value = Complexity> {
    prop_oneof![
        Just(Complexity::Beginner),
        Just(Complexity::Intermediate),
        Just(Complexity::Advanced),
    ]
}

fn sort_strategy() -> impl Strategy<Value = SortBy> {
    prop_oneof![
        Just(SortBy::Newest),
        Just(SortBy::Oldest),
        Just(SortBy::Alphabetical),
        Just(SortBy::Complexity),
    ]
}

fn filter_strategy<T: Clone + std::fmt::Debug + 'static>(
    values: impl Strategy<Value = T> + 'static,
) -> impl Strategy<Value = FieldFilter<T>> {
    prop_oneof![Just(FieldFilter::All), values.prop_map(FieldFilter::Only)]
}

fn language_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(LANGUAGES).prop_map(str::to_string)
}

fn category_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(CATEGORIES).prop_map(str::to_string)
}

/// User entries with Latin-1 titles and timestamps derived from the id
fn user_entry_strategy() -> impl Strategy<Value = ScriptEntry> {
    (
        7u64..2_000_000_000_000,
        "[A-Za-zÀ-ÖØ-öø-ÿ][A-Za-z0-9À-ÖØ-öø-ÿ ]{0,15}",
        "[a-z ]{1,30}",
        language_strategy(),
        complexity_strategy(),
        category_strategy(),
        prop::collection::vec("[a-z]{1,6}", 0..4),
    )
        .prop_map(
            |(id, title, description, language, complexity, category, tags)| ScriptEntry {
                id,
                title,
                description,
                language,
                complexity,
                category,
                tags,
                content: Some("echo hi".to_string()),
                file_name: Some("hi.sh".to_string()),
                is_user_uploaded: true,
                uploaded_at: Utc.timestamp_millis_opt(id as i64).single(),
            },
        )
}

/// Curated set followed by uploads with distinct ids
fn collection_strategy() -> impl Strategy<Value = Vec<ScriptEntry>> {
    prop::collection::vec(user_entry_strategy(), 0..12).prop_map(|uploads| {
        let mut entries = curated_entries();
        for entry in uploads {
            if entries.iter().all(|e| e.id != entry.id) {
                entries.push(entry);
            }
        }
        entries
    })
}

fn query_strategy() -> impl Strategy<Value = Query> {
    (
        prop_oneof![Just(String::new()), "[a-zA-Z]{1,3}"],
        filter_strategy(language_strategy()),
        filter_strategy(complexity_strategy()),
        filter_strategy(category_strategy()),
        sort_strategy(),
    )
        .prop_map(|(search_term, language, complexity, category, sort_by)| Query {
            search_term,
            language,
            complexity,
            category,
            sort_by,
        })
}

fn draft_strategy() -> impl Strategy<Value = EntryDraft> {
    (
        "[A-Za-z][A-Za-z ]{0,15}",
        "[a-z]{1,20}",
        language_strategy(),
        complexity_strategy(),
        category_strategy(),
        "[a-z, ]{0,20}",
    )
        .prop_map(|(title, description, language, complexity, category, tags)| EntryDraft {
            title,
            description,
            language,
            complexity: complexity.to_string(),
            category,
            tags,
        })
}

// =============================================================================
// View Engine Properties
// =============================================================================

proptest! {
    /// Every result satisfies the query, and nothing that satisfies it is missing
    #[test]
    fn view_contains_exactly_matching_entries(
        collection in collection_strategy(),
        query in query_strategy(),
    ) {
        let result = view(&collection, &query);
        prop_assert!(result.iter().all(|e| query.matches(e)));

        let expected = collection.iter().filter(|e| query.matches(e)).count();
        prop_assert_eq!(result.len(), expected);
    }

    /// view(view(C, Q), Q) == view(C, Q)
    #[test]
    fn view_is_idempotent(collection in collection_strategy(), query in query_strategy()) {
        let once = view(&collection, &query);
        let twice = view(&once, &query);
        prop_assert_eq!(once, twice);
    }

    /// Alphabetical titles are non-decreasing
    #[test]
    fn alphabetical_titles_are_ordered(collection in collection_strategy()) {
        let result = view(&collection, &Query::new().sort_by(SortBy::Alphabetical));
        for pair in result.windows(2) {
            prop_assert_ne!(locale_compare(&pair[0].title, &pair[1].title), Ordering::Greater);
        }
    }

    /// Complexity ranks are non-decreasing
    #[test]
    fn complexity_ranks_are_ordered(collection in collection_strategy()) {
        let result = view(&collection, &Query::new().sort_by(SortBy::Complexity));
        for pair in result.windows(2) {
            prop_assert!(pair[0].complexity.rank() <= pair[1].complexity.rank());
        }
    }

    /// Newest is the exact reverse of oldest when ids are distinct
    #[test]
    fn newest_reverses_oldest(collection in collection_strategy()) {
        let newest = view(&collection, &Query::new().sort_by(SortBy::Newest));
        let mut oldest = view(&collection, &Query::new().sort_by(SortBy::Oldest));
        oldest.reverse();
        prop_assert_eq!(newest, oldest);
    }
}

// =============================================================================
// Title Collation Properties
// =============================================================================

/// Put an accent on every vowel that has a precomposed form
fn accented(word: &str) -> String {
    word.chars()
        .map(|c| match c {
            'a' => 'à',
            'e' => 'é',
            'i' => 'î',
            'o' => 'ô',
            'u' => 'ü',
            other => other,
        })
        .collect()
}

proptest! {
    /// Accents never move a title past a word with different base letters
    #[test]
    fn accents_do_not_change_base_order(x in "[a-z]{1,8}", y in "[a-z]{1,8}") {
        prop_assume!(x != y);
        prop_assert_eq!(locale_compare(&accented(&x), &y), x.cmp(&y));
        prop_assert_eq!(locale_compare(&x, &accented(&y)), x.cmp(&y));
    }

    /// compare(a, b) is the reverse of compare(b, a)
    #[test]
    fn locale_compare_is_antisymmetric(
        a in "[A-Za-zÀ-ÖØ-öø-ÿ ]{0,10}",
        b in "[A-Za-zÀ-ÖØ-öø-ÿ ]{0,10}",
    ) {
        prop_assert_eq!(locale_compare(&a, &b), locale_compare(&b, &a).reverse());
        prop_assert_eq!(locale_compare(&a, &b) == Ordering::Equal, a == b);
    }
}

// =============================================================================
// Store and Mutation Properties
// =============================================================================

proptest! {
    /// Create followed by delete of the same id restores the user subset
    #[test]
    fn create_then_delete_restores_user_subset(
        first in draft_strategy(),
        second in draft_strategy(),
        now in 0i64..2_000_000_000_000,
    ) {
        let clock = FixedClock(Utc.timestamp_millis_opt(now).unwrap());
        let mut catalog = Catalog::open(MemoryBackend::new(), RecordingSink::new())
            .with_clock(clock);
        let file = UploadedFile::new("tool.sh", "echo tool");

        catalog.create(first, file.clone()).unwrap();
        let before = catalog.user_entries().to_vec();

        let created = catalog.create(second, file).unwrap();
        catalog.delete(created.id).unwrap();
        prop_assert_eq!(catalog.user_entries(), &before[..]);
        prop_assert_eq!(catalog.curated(), &curated_entries()[..]);
    }

    /// save(load()) leaves the next load unchanged
    #[test]
    fn save_of_load_is_noop(uploads in prop::collection::vec(user_entry_strategy(), 0..8)) {
        let backend = MemoryBackend::new();
        let payload = serde_json::to_string(&uploads).unwrap();
        backend.insert_raw(USER_SCRIPTS_KEY, &payload);

        let mut store = UserStore::new(backend.clone());
        let first = store.load().entries;
        store.save(&first).unwrap();

        let mut reopened = UserStore::new(backend);
        prop_assert_eq!(reopened.load().entries, first);
    }
}
