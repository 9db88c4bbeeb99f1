//! Cable CLI binary.
//!
//! - List the available channels
//! - Watch a channel locally: submit cues, follow the story, let the
//!   countdown take over

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use cli::{Cli, Commands, list_themes, watch};

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    cable::init_tracing(log_level)?;

    match cli.command {
        Commands::Themes { format } => {
            list_themes(format).await?;
        }

        Commands::Watch {
            theme,
            cues,
            seconds,
            config,
        } => {
            watch(&theme, &cues, seconds, config.as_deref()).await?;
        }
    }

    Ok(())
}
