//! Ingest command implementation
//!
//! This module implements the `ingest` command: one full run against the
//! configured partner, from remote sync through notification dispatch.

use crate::config::load_config;
use crate::core::pipeline::IngestionPipeline;
use crate::domain::HieError;
use clap::Args;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - convert but do not dispatch notifications
    #[arg(long)]
    pub dry_run: bool,

    /// Only ingest remote files whose name contains this token
    /// (typically a YYYYMMDD drop date)
    #[arg(long)]
    pub filter: Option<String>,
}

impl IngestArgs {
    /// Execute the ingest command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting ingest command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Apply dry-run flag from CLI
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        // Validate configuration
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2); // Configuration error exit code
        }

        // Dry run mode
        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no notifications will be dispatched");
            println!("🔍 DRY RUN MODE - No notifications will be dispatched");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !config.application.dry_run {
            println!("Ingestion Configuration:");
            println!("  Partner: {}", config.partner.name);
            println!(
                "  Remote: {}:{}{}",
                config.partner.host, config.partner.port, config.partner.remote_directory
            );
            println!("  Replica: {:?}", config.replica_target);
            println!("  Dispatch: {:?}", config.dispatch_target);
            if let Some(filter) = &self.filter {
                println!("  Filter: {filter}");
            }
            println!();
            print!("Proceed with ingestion? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Ingestion cancelled.");
                return Ok(0);
            }
        }

        // Create the pipeline
        tracing::info!("Creating ingestion pipeline");
        let mut pipeline = match IngestionPipeline::from_config(config).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create ingestion pipeline");
                eprintln!("Failed to initialize ingestion: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        // Execute the run
        tracing::info!("Executing ingestion run");
        println!("🚀 Starting ingestion...");
        println!();

        let summary = match pipeline.run(self.filter.as_deref()).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Ingestion run failed");
                eprintln!("Ingestion failed: {e}");
                return Ok(match e {
                    HieError::Connection(_) => 4, // Connection error exit code
                    _ => 5,                       // Fatal error exit code
                });
            }
        };

        // Display summary
        println!();
        println!("📊 Ingestion Summary:");
        println!("  Files Downloaded: {}", summary.files_downloaded);
        println!("  Files Skipped: {}", summary.files_skipped);
        println!("  Files Processed: {}", summary.files_processed);
        println!("  Files Failed: {}", summary.files_failed);
        println!("  Rows Parsed: {}", summary.rows_parsed);
        println!("  Rows Dropped: {}", summary.rows_dropped);
        println!("  Messages Converted: {}", summary.messages_converted);
        println!("  Notifications Sent: {}", summary.notifications_sent);
        println!("  Dispatch Failures: {}", summary.dispatch_failures);
        println!("  Validation Findings: {}", summary.validation_findings);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!("  Conversion Rate: {:.2}%", summary.conversion_rate());
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

        // Determine exit code
        let exit_code = if summary.is_successful() {
            println!("✅ Ingestion completed successfully!");
            0
        } else {
            println!("⚠️  Ingestion completed with failures");
            1 // Partial success
        };

        Ok(exit_code)
    }
}
