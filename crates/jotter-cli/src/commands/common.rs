use std::path::Path;

use chrono::Utc;
use jotter_core::db::LibSqlStore;
use jotter_core::session::AccountService;
use jotter_core::storage::NoteStorage;
use jotter_core::{Note, NoteId, Session};
use serde::Serialize;

use crate::error::CliError;

pub type Storage = NoteStorage<LibSqlStore>;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub image: bool,
    pub last_updated: i64,
    pub relative_time: String,
}

#[derive(Debug, Serialize)]
pub struct NoteDetail {
    pub id: String,
    pub title: String,
    pub body: String,
    pub image: bool,
    pub image_uri: Option<String>,
    pub last_updated: i64,
    pub last_updated_iso: String,
}

pub async fn open_storage(db_path: &Path) -> Result<Storage, CliError> {
    let store = LibSqlStore::open(db_path).await?;
    Ok(NoteStorage::new(store))
}

/// Session for the remembered active user.
pub async fn require_session(storage: &Storage) -> Result<Session, CliError> {
    AccountService::new(storage)
        .restore()
        .await?
        .ok_or(CliError::NotLoggedIn)
}

pub fn normalize_note_identifier(raw: &str) -> Result<String, CliError> {
    let normalized = raw.trim();
    if normalized.is_empty() {
        return Err(CliError::EmptyNoteId);
    }
    Ok(normalized.to_string())
}

/// Resolve a full id or a unique id prefix against `notes`.
pub fn resolve_note_id(notes: &[Note], note_query: &str) -> Result<NoteId, CliError> {
    if let Some(note) = notes.iter().find(|note| note.id.as_str() == note_query) {
        return Ok(note.id.clone());
    }

    let matching_ids: Vec<&NoteId> = notes
        .iter()
        .map(|note| &note.id)
        .filter(|id| id.as_str().starts_with(note_query))
        .collect();

    match matching_ids.as_slice() {
        [] => Err(CliError::NoteNotFound(note_query.to_string())),
        [id] => Ok((*id).clone()),
        _ => {
            let options = matching_ids
                .iter()
                .take(3)
                .map(|id| short_id(id))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousNoteId(format!(
                "ID prefix '{note_query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub async fn resolve_note_id_for_session(
    storage: &Storage,
    session: &Session,
    raw: &str,
) -> Result<NoteId, CliError> {
    let note_query = normalize_note_identifier(raw)?;
    let notes = storage.get_notes_for_user(session.username()).await?;
    resolve_note_id(&notes, &note_query)
}

pub fn short_id(id: &NoteId) -> String {
    id.as_str().chars().take(13).collect()
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    notes
        .iter()
        .map(|note| {
            let short_id = short_id(&note.id);
            let title = note_preview(&note.title, 30);
            let body = note_preview(&note.body, 40);
            let relative_time = format_relative_time(note.last_updated, now_ms);
            let badge = if note.image { " [img]" } else { "" };

            format!("{short_id:<13}  {title:<30}  {body:<40}  {relative_time}{badge}")
        })
        .collect()
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    let now_ms = Utc::now().timestamp_millis();

    NoteListItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        preview: note.body_preview(50),
        image: note.image,
        last_updated: note.last_updated,
        relative_time: format_relative_time(note.last_updated, now_ms),
    }
}

pub fn note_to_detail(note: &Note, image_uri: Option<String>) -> NoteDetail {
    NoteDetail {
        id: note.id.to_string(),
        title: note.title.clone(),
        body: note.body.clone(),
        image: note.image,
        image_uri,
        last_updated: note.last_updated,
        last_updated_iso: format_timestamp(note.last_updated),
    }
}

/// First line of `text`, whitespace collapsed, cut to `max_chars`.
pub fn note_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
