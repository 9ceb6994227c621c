//! Data models for Jotter

mod note;
mod user;

pub use note::{Note, NoteId};
pub use user::User;
