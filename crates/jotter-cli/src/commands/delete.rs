use jotter_core::list::{LoadOutcome, NoteListViewModel};

use crate::commands::common::{normalize_note_identifier, require_session, resolve_note_id, Storage};
use crate::error::CliError;

pub async fn run_delete(id: &str, storage: &Storage) -> Result<(), CliError> {
    let note_query = normalize_note_identifier(id)?;
    let session = require_session(storage).await?;

    let mut list = NoteListViewModel::default();
    if list.load(storage, Some(&session)).await? == LoadOutcome::LoginRequired {
        return Err(CliError::NotLoggedIn);
    }

    let note_id = resolve_note_id(list.notes(), &note_query)?;
    let removed = list.delete(storage, &note_id).await?;
    println!("{}", removed.id);
    Ok(())
}
