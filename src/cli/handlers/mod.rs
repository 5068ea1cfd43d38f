//! CLI command handlers
//!
//! One file per command; shared corpus loading lives here

mod ask;
mod chat;
mod chunk;
mod info;

use std::path::Path;

pub use ask::handle_ask_command;
pub use chat::handle_chat_command;
pub use chunk::handle_chunk_command;
pub use info::handle_config_command;

use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::index::collection_name;
use crate::rag::RagService;
use crate::AppConfig;
use crate::Result;

/// Collection named after the corpus file stem
fn collection_for(config: &AppConfig, file: &Path) -> String {
    let topic = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string());
    collection_name(&config.index.name, &topic)
}

/// Build a service for `file` and ingest its contents
async fn load_corpus(config: &AppConfig, file: &Path) -> Result<RagService> {
    let text = tokio::fs::read_to_string(file).await?;
    let service = RagService::new(config, &collection_for(config, file))?;

    let count = service.ingest(&text).await?;
    if count == 0 {
        print_warning(&format!(
            "{} produced no chunks (need at least {} estimated tokens)",
            file.display(),
            config.chunking.min_tokens
        ));
    } else {
        print_success(&format!("Indexed {count} chunks from {}", file.display()));
    }

    Ok(service)
}
