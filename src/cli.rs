use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::menu::InvalidChoicePolicy;

#[derive(Debug, Parser)]
#[command(
    name = "acs-chat",
    about = "Interactive console for Communication Services identity and chat"
)]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// What to do with a key that is not a menu option
    #[arg(long, global = true, value_enum)]
    pub invalid_choice: Option<InvalidChoicePolicy>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the interactive menu
    Run,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
