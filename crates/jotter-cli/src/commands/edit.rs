use jotter_core::editor::{NoteDraft, NoteEditor};

use crate::commands::common::{require_session, resolve_note_id_for_session, Storage};
use crate::error::CliError;

/// Field replacements requested on the command line.
#[derive(Debug, Default)]
pub struct EditChanges {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
    pub clear_image: bool,
}

impl EditChanges {
    /// Apply the requested replacements on top of `draft`.
    pub fn apply(self, mut draft: NoteDraft) -> NoteDraft {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(body) = self.body {
            draft.body = body;
        }
        if self.clear_image {
            draft.image_uri = None;
        } else if let Some(image) = self.image {
            draft.image_uri = Some(image);
        }
        draft
    }
}

pub async fn run_edit(id: &str, changes: EditChanges, storage: &Storage) -> Result<(), CliError> {
    let session = require_session(storage).await?;
    let note_id = resolve_note_id_for_session(storage, &session, id).await?;

    let editor = NoteEditor::new(storage);
    let (note, image_uri) = editor.open(Some(&session), &note_id).await?;
    let current = NoteDraft::from_note(&note, image_uri);
    let edited = changes.apply(current.clone());

    if edited == current {
        println!("{}", note.id);
        return Ok(());
    }

    let updated = editor.update(Some(&session), &note_id, &edited).await?;
    println!("{}", updated.id);
    Ok(())
}
