//! Sync command implementation
//!
//! This module implements the `sync` command: mirror new partner files
//! into the replica without parsing, converting, or dispatching.

use crate::config::load_config;
use crate::core::pipeline::IngestionPipeline;
use crate::domain::HieError;
use clap::Args;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Only sync remote files whose name contains this token
    #[arg(long)]
    pub filter: Option<String>,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let mut pipeline = match IngestionPipeline::from_config(config).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create ingestion pipeline");
                eprintln!("Failed to initialize sync: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        println!("🚀 Starting sync...");
        println!();

        let summary = match pipeline.sync_only(self.filter.as_deref()).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Sync failed");
                eprintln!("Sync failed: {e}");
                return Ok(match e {
                    HieError::Connection(_) => 4,
                    _ => 5,
                });
            }
        };

        println!();
        println!("📊 Sync Summary:");
        println!("  Files Downloaded: {}", summary.files_downloaded);
        println!("  Files Skipped: {}", summary.files_skipped);
        println!("  Files Failed: {}", summary.files_failed);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        if !summary.errors.is_empty() {
            println!("⚠️  Errors encountered:");
            for error in &summary.errors {
                println!("  - {:?}: {}", error.error_type, error.message);
                if let Some(context) = &error.context {
                    println!("    Context: {context}");
                }
            }
            println!();
        }

        let exit_code = if summary.is_successful() {
            println!("✅ Sync completed successfully!");
            0
        } else {
            println!("⚠️  Sync completed with failures");
            1
        };

        Ok(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_args_defaults() {
        let args = SyncArgs { filter: None };
        assert!(args.filter.is_none());
    }
}
