//! Note creation and editing.

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use crate::models::{Note, NoteId};
use crate::session::Session;
use crate::storage::{ImageChange, NoteStorage};
use crate::util::{normalize_text_option, Clock, SystemClock};

/// User-entered fields for a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub body: String,
    /// URI of the attached image, if any
    pub image_uri: Option<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            image_uri: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }

    /// Draft pre-filled from an existing note and its image reference
    pub fn from_note(note: &Note, image_uri: Option<String>) -> Self {
        Self {
            title: note.title.clone(),
            body: note.body.clone(),
            image_uri,
        }
    }
}

/// A draft that passed validation
struct ValidDraft {
    title: String,
    body: String,
    image_uri: Option<String>,
}

impl NoteDraft {
    fn validate(&self) -> Result<ValidDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("Please enter a title".to_string()));
        }
        Ok(ValidDraft {
            title: title.to_string(),
            body: self.body.trim().to_string(),
            image_uri: normalize_text_option(self.image_uri.clone()),
        })
    }
}

/// Creates and updates notes for a session.
pub struct NoteEditor<'a, S, C = SystemClock> {
    storage: &'a NoteStorage<S>,
    clock: C,
}

impl<'a, S: KeyValueStore> NoteEditor<'a, S> {
    pub const fn new(storage: &'a NoteStorage<S>) -> Self {
        Self {
            storage,
            clock: SystemClock,
        }
    }
}

impl<'a, S: KeyValueStore, C: Clock> NoteEditor<'a, S, C> {
    pub const fn with_clock(storage: &'a NoteStorage<S>, clock: C) -> Self {
        Self { storage, clock }
    }

    /// Validate `draft`, append it as a new note and store its image
    /// reference, in one write.
    pub async fn create(&self, session: Option<&Session>, draft: &NoteDraft) -> Result<Note> {
        let username = require_session(session)?;
        let draft = draft.validate()?;

        let mut notes = self.storage.get_notes_for_user(username).await?;
        let note = Note::new(
            draft.title,
            draft.body,
            draft.image_uri.is_some(),
            self.clock.now_millis(),
        );
        notes.push(note.clone());

        let image = match draft.image_uri.as_deref() {
            Some(uri) => ImageChange::Set {
                note_id: &note.id,
                uri,
            },
            None => ImageChange::Keep,
        };
        self.storage
            .save_notes_with_image(username, &notes, image)
            .await?;

        tracing::debug!("Created note {} for {username}", note.id);
        Ok(note)
    }

    /// Replace the fields of note `id` with `draft`, keeping its id.
    ///
    /// A draft without an image clears any stored image reference.
    pub async fn update(
        &self,
        session: Option<&Session>,
        id: &NoteId,
        draft: &NoteDraft,
    ) -> Result<Note> {
        let username = require_session(session)?;
        let draft = draft.validate()?;

        let mut notes = self.storage.get_notes_for_user(username).await?;
        let note = notes
            .iter_mut()
            .find(|note| &note.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        note.title = draft.title;
        note.body = draft.body;
        note.image = draft.image_uri.is_some();
        note.last_updated = self.clock.now_millis();
        let updated = note.clone();

        let image = match draft.image_uri.as_deref() {
            Some(uri) => ImageChange::Set { note_id: id, uri },
            None => ImageChange::Clear(id),
        };
        self.storage
            .save_notes_with_image(username, &notes, image)
            .await?;

        tracing::debug!("Updated note {id} for {username}");
        Ok(updated)
    }

    /// Load note `id` and its image reference for editing.
    pub async fn open(
        &self,
        session: Option<&Session>,
        id: &NoteId,
    ) -> Result<(Note, Option<String>)> {
        let username = require_session(session)?;

        let note = self
            .storage
            .get_notes_for_user(username)
            .await?
            .into_iter()
            .find(|note| &note.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let image_uri = if note.image {
            self.storage.get_image_for_note(username, id).await?
        } else {
            None
        };
        Ok((note, image_uri))
    }
}

fn require_session(session: Option<&Session>) -> Result<&str> {
    session.map(Session::username).ok_or(Error::LoginRequired)
}
