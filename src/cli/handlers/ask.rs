use std::path::Path;

use super::load_corpus;
use crate::cli::output::print_retrieval_trace;
use crate::AppConfig;
use crate::Result;

/// Answer one question, or show the retrieval trace with `raw`
pub async fn handle_ask_command(
    config: &AppConfig,
    file: &Path,
    question: &str,
    raw: bool,
) -> Result<()> {
    let service = load_corpus(config, file).await?;

    if raw {
        let trace = service.retrieve(question).await?;
        print_retrieval_trace(&trace, config.retrieval.preview_chars);
        return Ok(());
    }

    println!("\n💭 Generating answer...");
    let response = service.answer(question).await?;
    println!();
    println!("{}", response.format());
    Ok(())
}
