//! Channel listing.

use super::OutputFormat;
use cable::{CableResult, StoryEngine, ThemeCatalog};

/// Prints the built-in channel catalog.
pub async fn list_themes(format: OutputFormat) -> CableResult<()> {
    let themes = StoryEngine::new().list_themes().await?;

    match format {
        OutputFormat::Human => {
            if themes.is_empty() {
                println!("No channels available.");
                return Ok(());
            }
            println!("{:<18} {:<18} DESCRIPTION", "ID", "CHANNEL");
            for theme in &themes {
                println!(
                    "{:<18} {:<18} {}",
                    theme.id(),
                    format!("{} {}", theme.icon(), theme.label()),
                    theme.description()
                );
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&themes) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!(error = %e, "Failed to serialize channels"),
        },
    }

    Ok(())
}
