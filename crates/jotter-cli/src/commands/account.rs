use jotter_core::session::AccountService;

use crate::commands::common::{require_session, Storage};
use crate::error::CliError;

pub async fn run_signup(username: &str, password: &str, storage: &Storage) -> Result<(), CliError> {
    let user = AccountService::new(storage)
        .sign_up(username, password)
        .await?;
    println!("Account created for {}", user.username);
    Ok(())
}

pub async fn run_login(username: &str, password: &str, storage: &Storage) -> Result<(), CliError> {
    let session = AccountService::new(storage)
        .login(username, password)
        .await?;
    println!("Logged in as {}", session.username());
    Ok(())
}

pub async fn run_logout(storage: &Storage) -> Result<(), CliError> {
    let session = require_session(storage).await?;
    let username = session.username().to_string();
    AccountService::new(storage).logout(session).await?;
    println!("Logged out {username}");
    Ok(())
}

pub async fn run_whoami(storage: &Storage) -> Result<(), CliError> {
    let session = require_session(storage).await?;
    println!("{}", session.username());
    Ok(())
}
