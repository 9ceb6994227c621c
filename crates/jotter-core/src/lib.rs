//! jotter-core - Core library for Jotter
//!
//! Models, the key-value storage adapter and its backends, the typed
//! persistence layer, sessions, and the note list / editor logic shared by
//! every Jotter front-end.

pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod kv;
pub mod list;
pub mod models;
pub mod session;
pub mod storage;
pub mod util;

pub use error::{Error, Result};
pub use models::{Note, NoteId, User};
pub use session::Session;
