use jotter_core::editor::{NoteDraft, NoteEditor};

use crate::commands::common::{require_session, Storage};
use crate::error::CliError;

pub async fn run_add(
    title: &str,
    body: &str,
    image: Option<String>,
    storage: &Storage,
) -> Result<(), CliError> {
    let session = require_session(storage).await?;

    let mut draft = NoteDraft::new(title, body);
    draft.image_uri = image;

    let note = NoteEditor::new(storage)
        .create(Some(&session), &draft)
        .await?;
    println!("{}", note.id);
    Ok(())
}
