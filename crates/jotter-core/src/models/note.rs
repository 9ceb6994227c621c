//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// Identifier of a note within one user's collection.
///
/// New ids are UUID v7 strings. Ids read back from storage may be any
/// non-empty token without whitespace or `_`, which keeps older
/// millisecond-timestamp ids valid. The `_` ban keeps
/// `@image_<username>_<noteId>` keys unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId(String);

impl NoteId {
    /// Create a new unique note ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Borrow the string form of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::InvalidInput("Note ID cannot be empty".into()));
        }
        if s.chars().any(|c| c == '_' || c.is_whitespace()) {
            return Err(Error::InvalidInput(format!(
                "Note ID must not contain '_' or whitespace: {s:?}"
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for NoteId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.0
    }
}

/// A note owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    /// Whether an image reference is attached
    #[serde(default)]
    pub image: bool,
    /// Last write time (Unix ms)
    pub last_updated: i64,
}

impl Note {
    /// Create a new note stamped with `now` (Unix ms)
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>, image: bool, now: i64) -> Self {
        Self {
            id: NoteId::new(),
            title: title.into(),
            body: body.into(),
            image,
            last_updated: now,
        }
    }

    /// Body preview truncated to `max_len` characters, with an ellipsis
    /// when something was cut off.
    #[must_use]
    pub fn body_preview(&self, max_len: usize) -> String {
        if self.body.chars().count() <= max_len {
            return self.body.clone();
        }
        let mut preview: String = self.body.chars().take(max_len).collect();
        preview.push_str("...");
        preview
    }

    /// Case-insensitive substring match against title or body.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.body.to_lowercase().contains(needle)
    }
}
