//! Command-line surface for ragdesk.
//!
//! One-shot subcommands each build a fresh controller; `shell` keeps one controller alive so the
//! selection, summaries, and chat answers persist between commands.

pub mod commands;
pub mod files;
pub mod render;
pub mod shell;

use crate::backend::SummaryStyle;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::run;

/// Ragdesk - summarize and chat with documents on a RAG service
#[derive(Parser, Debug)]
#[command(name = "ragdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Override the service base URL from the environment
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List uploaded documents
    List {
        /// Only list documents tagged with this case id
        #[arg(long)]
        case: Option<String>,
    },
    /// Show one document's metadata
    Show {
        /// Document id
        id: String,
    },
    /// Upload files or directories of documents
    Upload {
        /// Files or directories; directories are searched recursively
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Case id applied to every uploaded file
        #[arg(long)]
        case: Option<String>,
    },
    /// Summarize one document or several combined
    Summarize {
        /// Document ids in the order they should be combined
        #[arg(required = true)]
        ids: Vec<String>,
        /// Summary style: brief, detailed, or key_points
        #[arg(long, default_value_t = SummaryStyle::Brief)]
        style: SummaryStyle,
    },
    /// Ask a question about one or more documents
    Chat {
        /// Document ids to ask about
        #[arg(required = true)]
        ids: Vec<String>,
        /// Question to send
        #[arg(long, short)]
        message: String,
    },
    /// Delete a document
    Delete {
        /// Document id
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Start an interactive session
    Shell,
}
