pub mod ask;
pub mod ingest;
pub mod providers;
pub mod serve;
pub mod status;

pub use ask::handle_ask;
pub use ingest::handle_ingest;
pub use serve::handle_serve;
pub use status::handle_status;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "retrieval-augmented question answering over a text corpus")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to .docqa.yml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chunk and embed the corpus, then build and persist the index
    Ingest {
        /// Discard any persisted index and rebuild
        #[arg(long)]
        force: bool,
    },
    /// Answer a question from the corpus
    Ask {
        /// The question
        question: String,

        /// Number of passages to retrieve
        #[arg(long)]
        top: Option<usize>,
    },
    /// Serve the HTTP API
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show readiness-relevant state without touching providers
    Status,
}
