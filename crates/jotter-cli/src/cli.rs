use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "jotter")]
#[command(about = "Keep short notes, search them, sort them")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    #[command(alias = "sign-up")]
    Signup {
        #[arg(long, short)]
        username: String,
        #[arg(long, short)]
        password: String,
    },
    /// Log in as a user (any password is accepted)
    Login {
        #[arg(long, short)]
        username: String,
        #[arg(long, short)]
        password: String,
    },
    /// Log out the active user
    Logout,
    /// Show the active user
    Whoami,
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        title: String,
        /// Note body
        #[arg(short, long, default_value = "")]
        body: String,
        /// URI of an image to attach
        #[arg(long, value_name = "URI")]
        image: Option<String>,
    },
    /// Edit an existing note
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        /// Replace the title
        #[arg(long)]
        title: Option<String>,
        /// Replace the body
        #[arg(short, long)]
        body: Option<String>,
        /// Attach (or replace) an image URI
        #[arg(long, value_name = "URI", conflicts_with = "clear_image")]
        image: Option<String>,
        /// Remove the attached image
        #[arg(long)]
        clear_image: bool,
    },
    /// Show one note
    Show {
        /// Note ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a note
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// List notes
    List {
        /// Only notes whose title or body contains this text
        #[arg(short, long)]
        query: Option<String>,
        /// Sort order (defaults to the configured order)
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
    #[value(name = "titleAsc", alias = "title-asc")]
    TitleAsc,
    #[value(name = "titleDesc", alias = "title-desc")]
    TitleDesc,
}

impl From<SortArg> for jotter_core::list::SortOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Newest => Self::Newest,
            SortArg::Oldest => Self::Oldest,
            SortArg::TitleAsc => Self::TitleAsc,
            SortArg::TitleDesc => Self::TitleDesc,
        }
    }
}
