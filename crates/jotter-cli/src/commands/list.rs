use jotter_core::list::{LoadOutcome, NoteListViewModel, SortOrder};

use crate::commands::common::{
    format_note_lines, note_to_list_item, require_session, NoteListItem, Storage,
};
use crate::error::CliError;

pub async fn run_list(
    query: Option<&str>,
    sort: SortOrder,
    as_json: bool,
    storage: &Storage,
) -> Result<(), CliError> {
    let session = require_session(storage).await?;

    let mut list = NoteListViewModel::new(sort);
    if list.load(storage, Some(&session)).await? == LoadOutcome::LoginRequired {
        return Err(CliError::NotLoggedIn);
    }
    if let Some(query) = query {
        list.set_query(query);
    }

    if as_json {
        let json_items = list
            .visible()
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if list.is_filtered() {
        println!(
            "Showing {} of {} notes ({})",
            list.visible_count(),
            list.total_count(),
            list.sort().label()
        );
    }
    for line in format_note_lines(list.visible()) {
        println!("{line}");
    }
    Ok(())
}
