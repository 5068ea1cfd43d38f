use std::io;
use std::path::Path;

use super::load_corpus;
use crate::cli::output::print_error;
use crate::cli::output::print_info;
use crate::cli::output::print_prompt;
use crate::cli::output::print_retrieval_trace;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::AppConfig;
use crate::Result;

/// Prefix that shows candidates instead of answering
const RAW_PREFIX: &str = "/raw";

/// What a line of chat input asks for
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Skip,
    Quit,
    Raw(&'a str),
    Ask(&'a str),
}

fn parse_input(line: &str) -> ChatInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Skip;
    }
    if line.eq_ignore_ascii_case("/quit") || line.eq_ignore_ascii_case("/exit") {
        return ChatInput::Quit;
    }
    match line.strip_prefix(RAW_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            let question = rest.trim();
            if question.is_empty() {
                ChatInput::Skip
            } else {
                ChatInput::Raw(question)
            }
        }
        _ => ChatInput::Ask(line),
    }
}

/// Interactive question loop over one ingested corpus
pub async fn handle_chat_command(config: &AppConfig, file: &Path) -> Result<()> {
    let service = load_corpus(config, file).await?;

    if !service.has_llm() {
        print_warning("No LLM API key configured; only /raw queries will work");
    }
    print_info("Ask a question, prefix with /raw to see candidates, /quit to leave");
    println!();

    loop {
        print_prompt("You: ");

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        match parse_input(&input) {
            ChatInput::Skip => continue,
            ChatInput::Quit => break,
            ChatInput::Raw(question) => match service.retrieve(question).await {
                Ok(trace) => print_retrieval_trace(&trace, config.retrieval.preview_chars),
                Err(e) => print_error(&format!("Retrieval failed: {e}")),
            },
            ChatInput::Ask(question) => match service.answer(question).await {
                Ok(response) => {
                    println!();
                    println!("Assistant: {}", response.answer);
                    if let Some(reason) = response.rerank.fallback_reason() {
                        print_warning(&format!("Reranking skipped: {reason}"));
                    }
                }
                Err(e) => print_error(&format!("Failed to answer: {e}")),
            },
        }
        println!();
    }

    println!();
    print_success("👋 Goodbye!");
    Ok(())
}
