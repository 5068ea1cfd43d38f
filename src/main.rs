use clap::Parser;
use threadrag::cli::handle_ask_command;
use threadrag::cli::handle_chat_command;
use threadrag::cli::handle_chunk_command;
use threadrag::cli::handle_config_command;
use threadrag::cli::Cli;
use threadrag::cli::Commands;
use threadrag::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    if cli.verbose {
        threadrag::logging::init_logging_with_level("debug", config.logging.log_dir.as_deref())?;
    } else {
        threadrag::logging::init_logging(&config.logging)?;
    }
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Chunk { file } => handle_chunk_command(&config, &file).await?,
        Commands::Ask {
            file,
            question,
            raw,
        } => handle_ask_command(&config, &file, &question, raw).await?,
        Commands::Chat { file } => handle_chat_command(&config, &file).await?,
        Commands::Config => handle_config_command(&config)?,
    }

    Ok(())
}
