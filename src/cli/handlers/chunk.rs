use std::path::Path;

use crate::chunking::Chunker;
use crate::cli::output::print_chunk_list;
use crate::cli::output::print_info;
use crate::AppConfig;
use crate::Result;

pub async fn handle_chunk_command(config: &AppConfig, file: &Path) -> Result<()> {
    let text = tokio::fs::read_to_string(file).await?;
    print_info(&format!(
        "Chunking {} (max {} / min {} tokens, overlap {})",
        file.display(),
        config.chunking.max_tokens,
        config.chunking.min_tokens,
        config.chunking.overlap
    ));

    let chunks = Chunker::new(config.chunking).chunk(&text);
    print_chunk_list(&chunks, config.retrieval.preview_chars);
    Ok(())
}
