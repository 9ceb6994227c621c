use jotter_core::editor::NoteEditor;

use crate::commands::common::{
    format_timestamp, note_to_detail, require_session, resolve_note_id_for_session, Storage,
};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, storage: &Storage) -> Result<(), CliError> {
    let session = require_session(storage).await?;
    let note_id = resolve_note_id_for_session(storage, &session, id).await?;

    let (note, image_uri) = NoteEditor::new(storage)
        .open(Some(&session), &note_id)
        .await?;

    if as_json {
        let detail = note_to_detail(&note, image_uri);
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("{}", note.title);
    println!("id: {}", note.id);
    println!("updated: {}", format_timestamp(note.last_updated));
    if let Some(uri) = image_uri {
        println!("image: {uri}");
    }
    if !note.body.is_empty() {
        println!();
        println!("{}", note.body);
    }
    Ok(())
}
