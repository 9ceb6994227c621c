//! Note list view-model.
//!
//! Holds one user's full note collection plus the current search query and
//! sort order, and keeps a filtered, sorted projection of it. Every change to
//! any of the three recomputes the projection from the full collection.

mod filters;

pub use filters::{compare_titles, filter_notes, project_notes, sort_notes, SortOrder};

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use crate::models::{Note, NoteId};
use crate::session::Session;
use crate::storage::NoteStorage;

/// Lifecycle of one list activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Ready,
}

/// Result of [`NoteListViewModel::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Notes loaded; the projection is current
    Ready,
    /// No session; the caller should route to login
    LoginRequired,
}

#[derive(Debug, Clone)]
pub struct NoteListViewModel {
    state: ListState,
    session: Option<Session>,
    notes: Vec<Note>,
    query: String,
    sort: SortOrder,
    visible: Vec<Note>,
}

impl Default for NoteListViewModel {
    fn default() -> Self {
        Self::new(SortOrder::default())
    }
}

impl NoteListViewModel {
    #[must_use]
    pub const fn new(sort: SortOrder) -> Self {
        Self {
            state: ListState::Idle,
            session: None,
            notes: Vec::new(),
            query: String::new(),
            sort,
            visible: Vec::new(),
        }
    }

    /// Load `session`'s notes. Without a session nothing is read.
    pub async fn load<S: KeyValueStore>(
        &mut self,
        storage: &NoteStorage<S>,
        session: Option<&Session>,
    ) -> Result<LoadOutcome> {
        let Some(session) = session else {
            self.reset();
            return Ok(LoadOutcome::LoginRequired);
        };

        self.state = ListState::Loading;
        match storage.get_notes_for_user(session.username()).await {
            Ok(notes) => {
                self.session = Some(session.clone());
                self.notes = notes;
                self.state = ListState::Ready;
                self.recompute();
                Ok(LoadOutcome::Ready)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.recompute();
    }

    /// Remove the note with `id` and persist the remaining collection.
    ///
    /// The in-memory list changes before the write is attempted, so on a
    /// write error the view shows the deletion while storage still holds the
    /// note; reloading reconciles the two.
    pub async fn delete<S: KeyValueStore>(
        &mut self,
        storage: &NoteStorage<S>,
        id: &NoteId,
    ) -> Result<Note> {
        let username = match (&self.state, &self.session) {
            (ListState::Ready, Some(session)) => session.username().to_string(),
            _ => return Err(Error::LoginRequired),
        };

        let index = self
            .notes
            .iter()
            .position(|note| &note.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let removed = self.notes.remove(index);
        self.recompute();

        storage.delete_note(&username, &self.notes, id).await?;
        tracing::debug!("Deleted note {id}");
        Ok(removed)
    }

    pub const fn state(&self) -> ListState {
        self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Full, unfiltered collection in stored order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Filtered and sorted projection
    pub fn visible(&self) -> &[Note] {
        &self.visible
    }

    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    pub fn total_count(&self) -> usize {
        self.notes.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Whether a non-blank query is hiding part of the collection
    pub fn is_filtered(&self) -> bool {
        !self.query.trim().is_empty()
    }

    fn recompute(&mut self) {
        self.visible = project_notes(&self.notes, &self.query, self.sort);
    }

    fn reset(&mut self) {
        self.state = ListState::Idle;
        self.session = None;
        self.notes.clear();
        self.visible.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::testing::{FailingStore, RecordingStore};
    use crate::kv::MemoryStore;
    use pretty_assertions::assert_eq;

    fn note(id: &str, title: &str, body: &str, last_updated: i64) -> Note {
        Note {
            id: id.parse().unwrap(),
            title: title.to_string(),
            body: body.to_string(),
            image: false,
            last_updated,
        }
    }

    fn titles(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.title.as_str()).collect()
    }

    async fn seeded() -> (NoteStorage<MemoryStore>, Session) {
        let storage = NoteStorage::new(MemoryStore::new());
        storage
            .save_notes_for_user(
                "alice",
                &[
                    note("1", "Alpha", "first", 100),
                    note("2", "beta", "second entry", 300),
                    note("3", "Gamma", "Third Entry", 200),
                ],
            )
            .await
            .unwrap();
        (storage, Session::new("alice"))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn load_without_session_requires_login() {
        let storage = NoteStorage::new(RecordingStore::new());
        let mut list = NoteListViewModel::default();

        let outcome = list.load(&storage, None).await.unwrap();
        assert_eq!(outcome, LoadOutcome::LoginRequired);
        assert_eq!(list.state(), ListState::Idle);
        assert!(list.visible().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn load_orders_newest_first_by_default() {
        let (storage, session) = seeded().await;
        let mut list = NoteListViewModel::default();

        let outcome = list.load(&storage, Some(&session)).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Ready);
        assert_eq!(list.state(), ListState::Ready);
        assert_eq!(titles(list.visible()), vec!["beta", "Gamma", "Alpha"]);
        assert_eq!(titles(list.notes()), vec!["Alpha", "beta", "Gamma"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn query_and_sort_changes_recompute() {
        let (storage, session) = seeded().await;
        let mut list = NoteListViewModel::new(SortOrder::TitleAsc);
        list.load(&storage, Some(&session)).await.unwrap();
        assert_eq!(titles(list.visible()), vec!["Alpha", "beta", "Gamma"]);

        list.set_query("ENTRY");
        assert_eq!(titles(list.visible()), vec!["beta", "Gamma"]);
        assert!(list.is_filtered());
        assert_eq!((list.visible_count(), list.total_count()), (2, 3));

        list.set_sort(SortOrder::Oldest);
        assert_eq!(titles(list.visible()), vec!["Gamma", "beta"]);

        list.set_query("  ");
        assert!(!list.is_filtered());
        assert_eq!(titles(list.visible()), vec!["Alpha", "Gamma", "beta"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_removes_and_persists() {
        let (storage, session) = seeded().await;
        let mut list = NoteListViewModel::default();
        list.load(&storage, Some(&session)).await.unwrap();

        let id: NoteId = "2".parse().unwrap();
        let removed = list.delete(&storage, &id).await.unwrap();
        assert_eq!(removed.title, "beta");
        assert_eq!(titles(list.visible()), vec!["Gamma", "Alpha"]);
        assert!(list.find(&id).is_none());

        let stored = storage.get_notes_for_user("alice").await.unwrap();
        assert_eq!(titles(&stored), vec!["Alpha", "Gamma"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_only_note_leaves_empty_collection() {
        let storage = NoteStorage::new(MemoryStore::new());
        storage
            .save_notes_for_user("solo", &[note("9", "Only", "", 1)])
            .await
            .unwrap();
        let session = Session::new("solo");
        let mut list = NoteListViewModel::default();
        list.load(&storage, Some(&session)).await.unwrap();

        list.delete(&storage, &"9".parse().unwrap()).await.unwrap();

        assert!(list.visible().is_empty());
        assert!(storage.get_notes_for_user("solo").await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_drops_image_reference() {
        let (storage, session) = seeded().await;
        let id: NoteId = "3".parse().unwrap();
        storage
            .save_image_for_note("alice", &id, "file:///g.png")
            .await
            .unwrap();
        let mut list = NoteListViewModel::default();
        list.load(&storage, Some(&session)).await.unwrap();

        list.delete(&storage, &id).await.unwrap();
        assert_eq!(storage.get_image_for_note("alice", &id).await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_unknown_id_writes_nothing() {
        let storage = NoteStorage::new(RecordingStore::new());
        storage
            .save_notes_for_user("alice", &[note("1", "a", "", 1)])
            .await
            .unwrap();
        let session = Session::new("alice");
        let mut list = NoteListViewModel::default();
        list.load(&storage, Some(&session)).await.unwrap();
        let writes_before = storage.store().writes();

        let err = list
            .delete(&storage, &"404".parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(storage.store().writes(), writes_before);
        assert_eq!(list.total_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_before_load_requires_login() {
        let storage = NoteStorage::new(MemoryStore::new());
        let mut list = NoteListViewModel::default();

        let err = list
            .delete(&storage, &"1".parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LoginRequired));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn load_failure_is_reported_and_resets() {
        let storage = NoteStorage::new(FailingStore);
        let mut list = NoteListViewModel::default();

        let err = list
            .load(&storage, Some(&Session::new("alice")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(list.state(), ListState::Idle);
    }
}
