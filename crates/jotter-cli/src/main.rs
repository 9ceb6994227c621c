//! Jotter CLI - Command-line front-end for the Jotter notebook
//!
//! Accounts, notes, search and sort against a local database.

mod cli;
mod commands;
mod error;

use clap::Parser;
use jotter_core::config::AppConfig;
use jotter_core::list::SortOrder;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::account::{run_login, run_logout, run_signup, run_whoami};
use crate::commands::add::run_add;
use crate::commands::common::open_storage;
use crate::commands::delete::run_delete;
use crate::commands::edit::{run_edit, EditChanges};
use crate::commands::list::run_list;
use crate::commands::show::run_show;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    let db_path = config.resolve_db_path(cli.db_path);
    tracing::debug!("Using database at {}", db_path.display());
    let storage = open_storage(&db_path).await?;

    match cli.command {
        Commands::Signup { username, password } => {
            run_signup(&username, &password, &storage).await?;
        }
        Commands::Login { username, password } => {
            run_login(&username, &password, &storage).await?;
        }
        Commands::Logout => run_logout(&storage).await?,
        Commands::Whoami => run_whoami(&storage).await?,
        Commands::Add { title, body, image } => run_add(&title, &body, image, &storage).await?,
        Commands::Edit {
            id,
            title,
            body,
            image,
            clear_image,
        } => {
            let changes = EditChanges {
                title,
                body,
                image,
                clear_image,
            };
            run_edit(&id, changes, &storage).await?;
        }
        Commands::Show { id, json } => run_show(&id, json, &storage).await?,
        Commands::Delete { id } => run_delete(&id, &storage).await?,
        Commands::List { query, sort, json } => {
            let sort = sort.map_or(config.default_sort, SortOrder::from);
            run_list(query.as_deref(), sort, json, &storage).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "jotter=warn".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
