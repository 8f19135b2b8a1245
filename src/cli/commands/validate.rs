//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the bridge configuration file.

use crate::config::load_config;
use crate::config::schema::{DispatchTarget, ReplicaTarget};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Load configuration
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Validate configuration
        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Environment: {:?}", config.environment);
                println!("  Partner: {}", config.partner.name);
                println!(
                    "  Remote Server: {}:{}",
                    config.partner.host, config.partner.port
                );
                println!("  Remote Directory: {}", config.partner.remote_directory);
                println!("  Partner Timezone: {}", config.partner.timezone);
                println!(
                    "  Encrypted Feed: {}",
                    if config.partner.decryption.is_some() {
                        "yes"
                    } else {
                        "no"
                    }
                );

                // Display the active replica backend
                match config.replica_target {
                    ReplicaTarget::Local => {
                        if let Some(ref local) = config.local_replica {
                            println!("  Replica Target: Local");
                            println!("  Replica Root: {}", local.root);
                        }
                    }
                    ReplicaTarget::S3 => {
                        if let Some(ref s3) = config.s3_replica {
                            println!("  Replica Target: S3");
                            println!("  Replica Bucket: {}", s3.bucket);
                            println!("  Replica Prefix: {}", s3.prefix);
                            println!("  Replica Region: {}", s3.region);
                        }
                    }
                }

                // Display the active dispatch channel
                match config.dispatch_target {
                    DispatchTarget::Local => {
                        println!("  Dispatch Target: Local (no network delivery)");
                    }
                    DispatchTarget::Queue => {
                        if let Some(ref queue) = config.queue {
                            println!("  Dispatch Target: Queue");
                            println!("  Queue URL: {}", queue.url);
                            println!("  Queue Region: {}", queue.region);
                        }
                    }
                }

                println!("  Max Retries: {}", config.retry.max_retries);
                println!("  Initial Delay: {}ms", config.retry.initial_delay_ms);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}
