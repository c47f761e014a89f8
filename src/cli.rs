use clap::{Command, CommandFactory, Parser, Subcommand};

use crate::command_name;

#[derive(Parser)]
#[command(author, version, about, color = clap::ColorChoice::Never)]
pub struct Cli {
    /// Disable styling and separators
    #[arg(long, global = true)]
    pub plain: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List saved profiles
    List,
    /// Show which profile the live configuration belongs to
    Current,
    /// Create a profile and make it the live configuration
    Create {
        /// Profile name
        #[arg(value_name = "name")]
        name: String,
        /// Store this API key in the profile's settings
        #[arg(long, value_name = "key")]
        api_key: Option<String>,
        /// Custom API base URL for the profile
        #[arg(long, value_name = "url", requires = "api_key")]
        base_url: Option<String>,
        /// Model recorded in the profile's settings
        #[arg(long, value_name = "model", requires = "api_key")]
        model: Option<String>,
        /// Copy the current live configuration instead of entering a key
        #[arg(long, conflicts_with = "api_key")]
        from_live: bool,
        /// Skip confirmations
        #[arg(long)]
        yes: bool,
    },
    /// Save the current live configuration as a profile
    Save {
        /// Profile name
        #[arg(value_name = "name")]
        name: String,
        /// Skip confirmations
        #[arg(long)]
        yes: bool,
    },
    /// Make a saved profile the live configuration
    Activate {
        /// Profile name
        #[arg(value_name = "name")]
        name: String,
        /// Skip confirmations
        #[arg(long)]
        yes: bool,
    },
    /// Delete a saved profile
    Delete {
        /// Profile name
        #[arg(value_name = "name")]
        name: String,
        /// Skip delete confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Move aside settings of profiles holding both credential kinds
    Repair,
    /// Move legacy per-profile Keychain entries into the profile store
    MigrateKeychain,
}

pub fn command_with_examples() -> Command {
    let name = command_name();
    let mut cmd = Cli::command();
    cmd.set_bin_name(name);
    cmd = cmd.after_help(examples_root(name));
    cmd
}

fn examples_root(name: &str) -> String {
    format!(
        "Examples:\n  {name} create work --api-key sk-...\n  {name} save work\n  {name} activate personal\n  {name} list\n  {name} current\n  {name} delete work"
    )
}
