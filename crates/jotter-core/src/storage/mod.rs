//! Typed persistence over a [`KeyValueStore`].
//!
//! Collections (users, one user's notes) are always read and written whole:
//! saving a list replaces whatever was stored before. Absent keys read as
//! empty collections; backend and decode failures are returned as errors so
//! callers can tell "no data" from "read failed".

pub mod keys;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::kv::{KeyValueStore, WriteBatch};
use crate::models::{Note, NoteId, User};

use keys::{image_key, notes_key, ACTIVE_USER_KEY, USERS_KEY};

/// What to do with a note's image reference when saving the note list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageChange<'a> {
    /// Leave any stored reference untouched
    Keep,
    /// Store `uri` as the note's image reference
    Set { note_id: &'a NoteId, uri: &'a str },
    /// Remove the note's image reference
    Clear(&'a NoteId),
}

/// Persistence layer for users, the active-user pointer, notes and image
/// references.
#[derive(Debug, Clone)]
pub struct NoteStorage<S> {
    store: S,
}

impl<S: KeyValueStore> NoteStorage<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying key-value backend
    pub const fn store(&self) -> &S {
        &self.store
    }

    // -- users -------------------------------------------------------------

    /// Replace the stored user list with `users`.
    pub async fn store_users(&self, users: &[User]) -> Result<()> {
        tracing::debug!("Storing {} users", users.len());
        self.write_json(USERS_KEY, users).await
    }

    /// All stored users in insertion order.
    pub async fn get_users(&self) -> Result<Vec<User>> {
        let users: Vec<User> = self.read_json(USERS_KEY).await?.unwrap_or_default();
        tracing::debug!("Retrieved {} users", users.len());
        Ok(users)
    }

    // -- active user -------------------------------------------------------

    pub async fn set_active_user(&self, username: &str) -> Result<()> {
        tracing::debug!("Setting active user: {username}");
        self.store
            .set(ACTIVE_USER_KEY, username)
            .await
            .inspect_err(|e| tracing::warn!("Error setting active user: {e}"))
    }

    /// The stored active username, `None` when nobody is logged in.
    pub async fn get_active_user(&self) -> Result<Option<String>> {
        let user = self
            .store
            .get(ACTIVE_USER_KEY)
            .await
            .inspect_err(|e| tracing::warn!("Error getting active user: {e}"))?
            .filter(|name| !name.is_empty());
        tracing::debug!("Retrieved active user: {user:?}");
        Ok(user)
    }

    pub async fn clear_active_user(&self) -> Result<()> {
        self.store
            .remove(ACTIVE_USER_KEY)
            .await
            .inspect_err(|e| tracing::warn!("Error clearing active user: {e}"))?;
        tracing::debug!("Active user cleared");
        Ok(())
    }

    // -- notes -------------------------------------------------------------

    /// `username`'s full note collection in stored order.
    pub async fn get_notes_for_user(&self, username: &str) -> Result<Vec<Note>> {
        let notes: Vec<Note> = self
            .read_json(&notes_key(username))
            .await?
            .unwrap_or_default();
        tracing::debug!("Retrieved {} notes for {username}", notes.len());
        Ok(notes)
    }

    /// Replace `username`'s note collection with `notes`.
    pub async fn save_notes_for_user(&self, username: &str, notes: &[Note]) -> Result<()> {
        tracing::debug!("Saving {} notes for {username}", notes.len());
        self.write_json(&notes_key(username), notes).await
    }

    /// Replace `username`'s note collection and update one image reference
    /// in a single atomic batch.
    pub async fn save_notes_with_image(
        &self,
        username: &str,
        notes: &[Note],
        image: ImageChange<'_>,
    ) -> Result<()> {
        let key = notes_key(username);
        let raw = encode(&key, notes)?;
        let mut batch = WriteBatch::new().set(key, raw);
        batch = match image {
            ImageChange::Keep => batch,
            ImageChange::Set { note_id, uri } => batch.set(image_key(username, note_id), uri),
            ImageChange::Clear(note_id) => batch.remove(image_key(username, note_id)),
        };

        tracing::debug!(
            "Saving {} notes for {username} with image change {image:?}",
            notes.len()
        );
        self.store
            .apply(batch)
            .await
            .inspect_err(|e| tracing::warn!("Error saving notes for {username}: {e}"))
    }

    /// Persist `remaining` (the collection after removing `note_id`) and drop
    /// the removed note's image reference in one batch.
    pub async fn delete_note(
        &self,
        username: &str,
        remaining: &[Note],
        note_id: &NoteId,
    ) -> Result<()> {
        tracing::debug!("Deleting note {note_id} for {username}");
        self.save_notes_with_image(username, remaining, ImageChange::Clear(note_id))
            .await
    }

    // -- images ------------------------------------------------------------

    pub async fn save_image_for_note(
        &self,
        username: &str,
        note_id: &NoteId,
        uri: &str,
    ) -> Result<()> {
        tracing::debug!("Saving image for note {note_id} of {username}");
        self.store
            .set(&image_key(username, note_id), uri)
            .await
            .inspect_err(|e| tracing::warn!("Error saving image: {e}"))
    }

    pub async fn get_image_for_note(
        &self,
        username: &str,
        note_id: &NoteId,
    ) -> Result<Option<String>> {
        self.store
            .get(&image_key(username, note_id))
            .await
            .inspect_err(|e| tracing::warn!("Error getting image: {e}"))
    }

    pub async fn remove_image_for_note(&self, username: &str, note_id: &NoteId) -> Result<()> {
        self.store
            .remove(&image_key(username, note_id))
            .await
            .inspect_err(|e| tracing::warn!("Error removing image: {e}"))
    }

    // -- helpers -----------------------------------------------------------

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self
            .store
            .get(key)
            .await
            .inspect_err(|e| tracing::warn!("Error loading {key}: {e}"))?
        else {
            return Ok(None);
        };

        let value = serde_json::from_str(&raw)
            .inspect_err(|e| tracing::warn!("Error decoding {key}: {e}"))?;
        Ok(Some(value))
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = encode(key, value)?;
        self.store
            .set(key, &raw)
            .await
            .inspect_err(|e| tracing::warn!("Error saving {key}: {e}"))
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String> {
    let raw = serde_json::to_string(value)
        .inspect_err(|e| tracing::warn!("Error encoding {key}: {e}"))?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::kv::testing::FailingStore;
    use crate::kv::MemoryStore;
    use pretty_assertions::assert_eq;

    fn setup() -> NoteStorage<MemoryStore> {
        NoteStorage::new(MemoryStore::new())
    }

    fn note(id: &str, title: &str, last_updated: i64) -> Note {
        Note {
            id: id.parse().unwrap(),
            title: title.to_string(),
            body: format!("{title} body"),
            image: false,
            last_updated,
        }
    }

    #[test]
    fn encode_failure_is_a_serialization_error() {
        let unencodable = std::collections::BTreeMap::from([((1, 2), "pair key")]);

        let err = encode("@notes_alice", &unencodable).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(encode("@users", &[1, 2]).unwrap(), "[1,2]");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_get_users_empty_by_default() {
        let storage = setup();
        assert!(storage.get_users().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_store_users_overwrites_whole_list() {
        let storage = setup();
        storage
            .store_users(&[User::new("alice", "a"), User::new("bob", "b")])
            .await
            .unwrap();
        storage.store_users(&[User::new("carol", "c")]).await.unwrap();

        assert_eq!(
            storage.get_users().await.unwrap(),
            vec![User::new("carol", "c")]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_active_user_absent_before_set() {
        let storage = setup();
        assert_eq!(storage.get_active_user().await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_active_user_set_get_clear() {
        let storage = setup();
        storage.set_active_user("alice").await.unwrap();
        assert_eq!(
            storage.get_active_user().await.unwrap().as_deref(),
            Some("alice")
        );

        storage.clear_active_user().await.unwrap();
        assert_eq!(storage.get_active_user().await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_active_user_is_raw_string() {
        let storage = setup();
        storage.set_active_user("alice").await.unwrap();
        assert_eq!(
            storage.store().get("@active_user").await.unwrap().as_deref(),
            Some("alice")
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_last_save_wins() {
        let storage = setup();
        let first = vec![note("1", "one", 1), note("2", "two", 2)];
        let second = vec![note("3", "three", 3)];

        storage.save_notes_for_user("alice", &first).await.unwrap();
        storage.save_notes_for_user("alice", &second).await.unwrap();

        assert_eq!(storage.get_notes_for_user("alice").await.unwrap(), second);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_notes_round_trip_preserves_order_and_fields() {
        let storage = setup();
        let mut notes = vec![note("20", "b", 20), note("10", "a", 10)];
        notes[0].image = true;

        storage.save_notes_for_user("alice", &notes).await.unwrap();
        assert_eq!(storage.get_notes_for_user("alice").await.unwrap(), notes);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_notes_are_isolated_per_user() {
        let storage = setup();
        storage
            .save_notes_for_user("alice", &[note("1", "mine", 1)])
            .await
            .unwrap();

        assert!(storage.get_notes_for_user("bob").await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reads_data_written_in_original_format() {
        let storage = setup();
        storage
            .store()
            .set(
                "@notes_alice",
                r#"[{"id":"1718000000000","title":"Hi","body":"there","lastUpdated":1718000000000}]"#,
            )
            .await
            .unwrap();

        let notes = storage.get_notes_for_user("alice").await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id.as_str(), "1718000000000");
        assert!(!notes[0].image);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_corrupt_notes_surface_as_error() {
        let storage = setup();
        storage.store().set("@notes_alice", "not json").await.unwrap();

        let err = storage.get_notes_for_user("alice").await.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_image_reference_round_trip() {
        let storage = setup();
        let id: NoteId = "42".parse().unwrap();

        assert_eq!(storage.get_image_for_note("alice", &id).await.unwrap(), None);
        storage
            .save_image_for_note("alice", &id, "file:///a.jpg")
            .await
            .unwrap();
        assert_eq!(
            storage
                .get_image_for_note("alice", &id)
                .await
                .unwrap()
                .as_deref(),
            Some("file:///a.jpg")
        );
        assert_eq!(storage.get_image_for_note("bob", &id).await.unwrap(), None);

        storage.remove_image_for_note("alice", &id).await.unwrap();
        assert_eq!(storage.get_image_for_note("alice", &id).await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_save_notes_with_image_writes_both() {
        let storage = setup();
        let mut n = note("7", "photo", 7);
        n.image = true;

        storage
            .save_notes_with_image(
                "alice",
                std::slice::from_ref(&n),
                ImageChange::Set {
                    note_id: &n.id,
                    uri: "content://photo/7",
                },
            )
            .await
            .unwrap();

        assert_eq!(
            storage.get_notes_for_user("alice").await.unwrap(),
            vec![n.clone()]
        );
        assert_eq!(
            storage
                .get_image_for_note("alice", &n.id)
                .await
                .unwrap()
                .as_deref(),
            Some("content://photo/7")
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_note_removes_image_reference() {
        let storage = setup();
        let keep = note("1", "keep", 1);
        let gone = note("2", "gone", 2);
        storage
            .save_notes_for_user("alice", &[keep.clone(), gone.clone()])
            .await
            .unwrap();
        storage
            .save_image_for_note("alice", &gone.id, "file:///gone.jpg")
            .await
            .unwrap();

        storage
            .delete_note("alice", std::slice::from_ref(&keep), &gone.id)
            .await
            .unwrap();

        assert_eq!(storage.get_notes_for_user("alice").await.unwrap(), vec![keep]);
        assert_eq!(
            storage.get_image_for_note("alice", &gone.id).await.unwrap(),
            None
        );
        assert_eq!(
            storage.store().keys().await,
            vec!["@notes_alice".to_string()]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_backend_failures_are_not_defaults() {
        let storage = NoteStorage::new(FailingStore);

        assert!(matches!(
            storage.get_users().await,
            Err(Error::Storage(_))
        ));
        assert!(matches!(
            storage.get_active_user().await,
            Err(Error::Storage(_))
        ));
        assert!(matches!(
            storage.get_notes_for_user("alice").await,
            Err(Error::Storage(_))
        ));
        assert!(storage.save_notes_for_user("alice", &[]).await.is_err());
        assert!(storage.clear_active_user().await.is_err());
    }
}
