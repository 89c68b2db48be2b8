//! Type-safe catalog enums
//!
//! Closed value sets used by entries and queries. String forms match the
//! values the filter bar and the persisted records use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Sentinel that disables a field filter
pub const ALL: &str = "all";

/// Script difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Complexity {
    Beginner = 0,
    Intermediate = 1,
    Advanced = 2,
}

impl Complexity {
    /// Fixed sort rank: Beginner < Intermediate < Advanced
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Ordering applied to a filtered view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Newest,
    Oldest,
    Alphabetical,
    Complexity,
}

/// Provenance tab of a partitioned view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ViewTab {
    #[default]
    All,
    Mine,
    Curated,
}

/// Exact-match filter on one entry field. `"all"` parses to [`FieldFilter::All`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldFilter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> FieldFilter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Only(_))
    }
}

impl<T: FromStr> FromStr for FieldFilter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for FieldFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(value) => value.fmt(f),
        }
    }
}
