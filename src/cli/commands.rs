//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "threadrag")]
#[command(about = "Question answering over discussion threads with hybrid retrieval and LLM reranking")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: configured level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: threadrag.toml, then threadrag.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a text file into chunks and print them
    Chunk {
        /// Corpus file, plain text
        file: PathBuf,
    },
    /// Ingest a corpus file and answer one question
    Ask {
        /// Corpus file, plain text
        file: PathBuf,
        /// The question
        question: String,
        /// Print raw and reranked candidates instead of an answer
        #[arg(long)]
        raw: bool,
    },
    /// Ingest a corpus file and answer questions read from stdin
    Chat {
        /// Corpus file, plain text
        file: PathBuf,
    },
    /// Show current configuration
    Config,
}
