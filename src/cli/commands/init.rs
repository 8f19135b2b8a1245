//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "hiebridge.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing HieBridge configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        // Generate configuration content
        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        // Write to file
        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your partner's settings", self.output);
                println!("  2. Set replica_target to 'local' or 's3'");
                println!("  3. Create a .env file with your credentials:");
                println!("     - Set HIEBRIDGE_PARTNER_PASSWORD");
                println!("     - Set HIEBRIDGE_PGP_KEY and HIEBRIDGE_PGP_PASSPHRASE (encrypted feeds only)");
                println!("  4. Validate configuration: hiebridge validate-config");
                println!("  5. Run an ingestion: hiebridge ingest");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# HieBridge Configuration File
# HIE Partner Feed Ingestion Bridge
# One file describes one partner; run one bridge process per partner.

environment = "development"

# Replica backend (local or s3)
replica_target = "local"

# Notification channel (local or queue)
dispatch_target = "local"

[application]
log_level = "info"
dry_run = false

[partner]
name = "Coastal HIE"
host = "feeds.coastal.example"
port = 21
username = "bridge"
password = "${HIEBRIDGE_PARTNER_PASSWORD}"
remote_directory = "/outbound/adt"
timezone = "America/Chicago"

[local_replica]
root = "/var/lib/hiebridge/replica"

# [s3_replica]
# bucket = "hie-feed-replica"
# prefix = "coastal"
# region = "us-east-1"

# [queue]
# url = "https://sqs.us-east-1.amazonaws.com/123456789012/adt-notifications.fifo"
# region = "us-east-1"

[retry]
max_retries = 3
initial_delay_ms = 500
max_delay_ms = 30000
backoff_multiplier = 2.0

[logging]
format = "text"
file_enabled = false
file_path = "logs"
file_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# HieBridge Configuration File
# HIE Partner Feed Ingestion Bridge
#
# This file contains all configuration options with examples and explanations.
#
# One configuration file describes one HIE partner. To ingest several
# partners, run one bridge invocation per partner with its own file.

# Runtime environment: development | staging | production
environment = "development"

# Replica backend (local or s3). The replica is the durable mirror every
# downloaded file lands in before any parsing happens.
replica_target = "local"

# Notification channel (local or queue)
# - local: record events in memory, no network delivery (development)
# - queue: durable FIFO queue with per-patient ordering (production)
dispatch_target = "local"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (convert rows but never dispatch notifications)
dry_run = false

# ============================================================================
# Partner Connection
# ============================================================================
[partner]
# Partner display name (carried into every notification event)
name = "Coastal HIE"

# Remote file server host and port
host = "feeds.coastal.example"
port = 21

# Remote session credentials (use environment variables)
username = "bridge"
password = "${HIEBRIDGE_PARTNER_PASSWORD}"

# Remote directory holding the partner's feed drops
remote_directory = "/outbound/adt"

# IANA timezone the partner's wall-clock timestamps are in.
# Naive feed timestamps are interpreted in this zone before UTC conversion.
timezone = "America/Chicago"

# Decryption material, only for partners whose feed is PGP-encrypted.
# [partner.decryption]
# private_key = "${HIEBRIDGE_PGP_KEY}"
# passphrase = "${HIEBRIDGE_PGP_PASSPHRASE}"

# ============================================================================
# Replica Backend
# ============================================================================
[local_replica]
# Root directory of the replica subtree
root = "/var/lib/hiebridge/replica"

# Uncomment this section if using S3 (replica_target = "s3")
# [s3_replica]
# bucket = "hie-feed-replica"
# prefix = "coastal"
# region = "us-east-1"

# ============================================================================
# Notification Dispatch
# ============================================================================
# Required when dispatch_target = "queue". The URL must point at a FIFO
# queue; per-patient ordering relies on message groups.
# [queue]
# url = "https://sqs.us-east-1.amazonaws.com/123456789012/adt-notifications.fifo"
# region = "us-east-1"

# ============================================================================
# Dispatch Retry Policy
# ============================================================================
[retry]
# Maximum retry attempts after the first delivery failure
max_retries = 3

# Exponential backoff: initial delay, cap, and growth factor
initial_delay_ms = 500
max_delay_ms = 30000
backoff_multiplier = 2.0

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Console output format: text | json
format = "text"

# Enable rolling file logs in addition to the console
file_enabled = false

# Directory for rolling file logs
file_path = "logs"

# File rotation cadence: hourly | daily | never
file_rotation = "daily"
"#
        .to_string()
    }
}
