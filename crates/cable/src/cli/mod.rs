//! Command-line interface module.

mod commands;
mod themes;
mod watch;

pub use commands::{Cli, Commands, OutputFormat};
pub use themes::list_themes;
pub use watch::watch;
