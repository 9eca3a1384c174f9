use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::provider::ProviderKind;

#[derive(Parser, Debug)]
#[command(name = "ideagen", version, about = "LLM-backed short-form content idea generator")]
pub struct Cli {
    /// TOML config file (defaults to ./ideagen.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderKind>,

    #[arg(long, global = true)]
    pub model: Option<String>,

    #[arg(long, global = true)]
    pub api_base: Option<String>,

    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Save each prompt and raw completion under <root>/.ideagen/tx/
    #[arg(long, default_value_t = false, global = true)]
    pub save_transcript: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate ideas once and print them
    Generate(GenerateArgs),
    /// Manage favorited idea ids
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Free-text request
    #[arg(long, conflicts_with = "prefs", required_unless_present = "prefs")]
    pub prompt: Option<String>,

    /// Preferences file (.json, .yaml, .toml)
    #[arg(long)]
    pub prefs: Option<PathBuf>,

    #[arg(long, conflicts_with = "prefs")]
    pub platform: Option<String>,

    #[arg(long, conflicts_with = "prefs")]
    pub format: Option<String>,

    #[arg(long, conflicts_with = "prefs")]
    pub tone: Option<String>,

    #[arg(long, conflicts_with = "prefs")]
    pub audience: Option<String>,

    #[arg(long, conflicts_with = "prefs")]
    pub count: Option<u32>,

    #[arg(long, default_value_t = false, conflicts_with = "prefs")]
    pub categorized: bool,

    /// Print the response envelope as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesAction {
    List,
    /// Flip membership of one idea id
    Toggle { id: String },
}
