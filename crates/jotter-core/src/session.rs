//! Sign-up, login and the explicit session value.
//!
//! Login is identity selection: any non-empty username/password pair is
//! accepted and the password is never compared against the stored account.
//! The active-user key persists only so a later process can restore the
//! session; everything downstream takes a [`Session`] argument instead of
//! reading that key.

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use crate::models::User;
use crate::storage::NoteStorage;

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    username: String,
}

impl Session {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Account and session operations over the persistence layer.
pub struct AccountService<'a, S> {
    storage: &'a NoteStorage<S>,
}

impl<'a, S: KeyValueStore> AccountService<'a, S> {
    pub const fn new(storage: &'a NoteStorage<S>) -> Self {
        Self { storage }
    }

    /// Register a new account. Does not log in.
    pub async fn sign_up(&self, username: &str, password: &str) -> Result<User> {
        let (username, password) = validate_credentials(username, password)?;

        let mut users = self.storage.get_users().await?;
        if users.iter().any(|user| user.username == username) {
            return Err(Error::UserExists(username.to_string()));
        }

        let user = User::new(username, password);
        users.push(user.clone());
        self.storage.store_users(&users).await?;

        tracing::info!("Created user {username}");
        Ok(user)
    }

    /// Start a session for `username` and remember it as the active user.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let (username, _) = validate_credentials(username, password)?;

        self.storage.set_active_user(username).await?;
        tracing::info!("Logged in as {username}");
        Ok(Session::new(username))
    }

    /// Session for the remembered active user, if any.
    pub async fn restore(&self) -> Result<Option<Session>> {
        Ok(self.storage.get_active_user().await?.map(Session::new))
    }

    /// End `session` and forget the active user.
    pub async fn logout(&self, session: Session) -> Result<()> {
        self.storage.clear_active_user().await?;
        tracing::info!("Logged out {}", session.username());
        Ok(())
    }
}

fn validate_credentials<'c>(username: &'c str, password: &'c str) -> Result<(&'c str, &'c str)> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(Error::InvalidInput(
            "Please enter both username and password".to_string(),
        ));
    }
    Ok((username, password))
}
