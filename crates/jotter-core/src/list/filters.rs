//! Note list filtering and sorting.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::Error;
use crate::models::Note;

/// Ordering applied to the visible note list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Most recently updated first
    #[default]
    Newest,
    /// Least recently updated first
    Oldest,
    /// Title A-Z
    TitleAsc,
    /// Title Z-A
    TitleDesc,
}

impl SortOrder {
    pub const ALL: [Self; 4] = [Self::Newest, Self::Oldest, Self::TitleAsc, Self::TitleDesc];

    /// Stable identifier used in config files and CLI flags
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::TitleAsc => "titleAsc",
            Self::TitleDesc => "titleDesc",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest First",
            Self::Oldest => "Oldest First",
            Self::TitleAsc => "Title A-Z",
            Self::TitleDesc => "Title Z-A",
        }
    }

    fn compare(self, a: &Note, b: &Note) -> Ordering {
        match self {
            Self::Newest => b.last_updated.cmp(&a.last_updated),
            Self::Oldest => a.last_updated.cmp(&b.last_updated),
            Self::TitleAsc => compare_titles(&a.title, &b.title),
            Self::TitleDesc => compare_titles(&b.title, &a.title),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Unknown sort order '{s}' (expected newest, oldest, titleAsc or titleDesc)"
                ))
            })
    }
}

/// Locale-style title comparison.
///
/// Letters compare by base letter first, ignoring accents and case. Ties
/// are broken by accents (unaccented first), then by case (lowercase first).
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    fold_diacritics(&a_lower)
        .cmp(&fold_diacritics(&b_lower))
        .then_with(|| a_lower.cmp(&b_lower))
        .then_with(|| b.cmp(a))
}

fn fold_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Notes whose title or body contains `query`, case-insensitively.
///
/// A blank query keeps every note. Otherwise the query is matched as typed,
/// surrounding whitespace included. Relative order is preserved.
#[must_use]
pub fn filter_notes(notes: &[Note], query: &str) -> Vec<Note> {
    if query.trim().is_empty() {
        return notes.to_vec();
    }
    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|note| note.matches(&needle))
        .cloned()
        .collect()
}

/// Stable sort of `notes` by `order`.
pub fn sort_notes(notes: &mut [Note], order: SortOrder) {
    notes.sort_by(|a, b| order.compare(a, b));
}

/// Filter then sort.
#[must_use]
pub fn project_notes(notes: &[Note], query: &str, order: SortOrder) -> Vec<Note> {
    let mut visible = filter_notes(notes, query);
    sort_notes(&mut visible, order);
    visible
}
