//! Persisted key layout.
//!
//! These keys are the on-disk format; changing them orphans existing data.

use crate::models::NoteId;

/// All user records, JSON array
pub const USERS_KEY: &str = "@users";

/// Active username, raw string
pub const ACTIVE_USER_KEY: &str = "@active_user";

const NOTES_PREFIX: &str = "@notes_";
const IMAGE_PREFIX: &str = "@image_";

/// Key of `username`'s note collection
pub fn notes_key(username: &str) -> String {
    format!("{NOTES_PREFIX}{username}")
}

/// Key of the image reference attached to `note_id`
pub fn image_key(username: &str, note_id: &NoteId) -> String {
    format!("{IMAGE_PREFIX}{username}_{note_id}")
}
