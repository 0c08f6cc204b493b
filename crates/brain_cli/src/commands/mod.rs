//! CLI command definitions.
//!
//! Each subcommand is a thin front end over `brain_chat`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use brain_chat::{ChatError, ClientConfig};

pub mod ask;
pub mod brands;
pub mod chat;

/// Brand Brain - ask questions about your brands
#[derive(Parser)]
#[command(name = "brain")]
#[command(version, about = "Brand Brain - ask questions about your brands")]
#[command(long_about = r#"
Brand Brain answers natural-language questions about a brand's assets,
voice and guidelines.

COMMANDS:
  brands   → List the brands the service knows about
  ask      → Ask a single question and print the answer
  chat     → Interactive conversation (Enter sends, trailing \ continues)

CONFIGURATION (lowest precedence first):
  .brandbrain/settings.json, BRANDBRAIN_BASE_URL / BRANDBRAIN_API_KEY,
  then --base-url / --api-key.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Configuration error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to .brandbrain/settings.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Service base URL, e.g. http://localhost:3000/api
    #[arg(long, global = true, env = "BRANDBRAIN_BASE_URL")]
    pub base_url: Option<String>,

    /// API key sent as x-api-key
    #[arg(long, global = true, env = "BRANDBRAIN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available brands
    Brands(brands::BrandsArgs),

    /// Ask a single question
    Ask(ask::AskArgs),

    /// Start an interactive chat
    Chat(chat::ChatArgs),
}

/// Build the client configuration from the settings file and flags.
///
/// Environment variables reach us through clap's `env` attributes, so the
/// flags already carry them.
pub fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path).map_err(|e| match e {
            ChatError::Config(_) => e,
            other => ChatError::Config(format!("cannot read {}: {}", path.display(), other)),
        })?,
        None => ClientConfig::load(&std::env::current_dir()?)?,
    };

    if let Some(url) = cli.base_url.as_ref().filter(|v| !v.is_empty()) {
        config.base_url = url.clone();
    }
    if let Some(key) = cli.api_key.as_ref().filter(|v| !v.is_empty()) {
        config.api_key = Some(key.clone());
    }

    debug!("Using service at {}", config.base_url);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_settings_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, r#"{"baseUrl":"http://from-file/api","apiKey":"file-key"}"#).unwrap();

        let cli = Cli::parse_from([
            "brain",
            "--config",
            path.to_str().unwrap(),
            "--base-url",
            "http://from-flag/api",
            "brands",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.base_url, "http://from-flag/api");
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_missing_settings_file_is_an_error() {
        let cli = Cli::parse_from(["brain", "--config", "/nonexistent/settings.json", "brands"]);
        let err = load_config(&cli).unwrap_err();
        assert!(matches!(err.downcast_ref::<ChatError>(), Some(ChatError::Config(_))));
    }
}
