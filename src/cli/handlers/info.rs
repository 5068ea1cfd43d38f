use crate::cli::output::print_config;
use crate::cli::output::print_info;
use crate::AppConfig;
use crate::Result;

pub fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    println!();
    if config.llm_enabled() {
        print_info("Reranking and answer synthesis enabled");
    } else {
        print_info("No LLM API key: reranking passes through and synthesis is disabled");
    }
    Ok(())
}
