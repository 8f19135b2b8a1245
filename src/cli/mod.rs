//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the bridge using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// HieBridge - HIE Partner Feed Ingestion Bridge
#[derive(Parser, Debug)]
#[command(name = "hiebridge")]
#[command(version, about, long_about = None)]
#[command(author = "HieBridge Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "hiebridge.toml", env = "HIEBRIDGE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HIEBRIDGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pull new partner files, convert them, and dispatch notifications
    Ingest(commands::ingest::IngestArgs),

    /// Mirror new partner files into the replica without converting
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_ingest() {
        let cli = Cli::parse_from(["hiebridge", "ingest"]);
        assert_eq!(cli.config, "hiebridge.toml");
        assert!(matches!(cli.command, Commands::Ingest(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["hiebridge", "--config", "custom.toml", "ingest"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["hiebridge", "--log-level", "debug", "ingest"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_ingest_with_filter() {
        let cli = Cli::parse_from(["hiebridge", "ingest", "--filter", "20250102"]);
        match cli.command {
            Commands::Ingest(args) => assert_eq!(args.filter.as_deref(), Some("20250102")),
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn test_cli_parse_sync() {
        let cli = Cli::parse_from(["hiebridge", "sync"]);
        assert!(matches!(cli.command, Commands::Sync(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["hiebridge", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["hiebridge", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
