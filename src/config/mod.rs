//! Configuration management for the ingestion bridge.
//!
//! One TOML file describes one HIE partner run: connection parameters,
//! replica backend, notification channel, retry policy, and logging.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hiebridge::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hiebridge.toml")?;
//! println!("Partner: {}", config.partner.name);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! replica_target = "s3"
//! dispatch_target = "queue"
//!
//! [application]
//! log_level = "info"
//!
//! [partner]
//! name = "Coastal HIE"
//! host = "feeds.coastal.example"
//! port = 21
//! username = "bridge"
//! password = "${HIEBRIDGE_PARTNER_PASSWORD}"
//! remote_directory = "/outbound/adt"
//! timezone = "America/Chicago"
//!
//! [s3_replica]
//! bucket = "hie-feed-replica"
//! prefix = "coastal"
//! region = "us-east-1"
//!
//! [queue]
//! url = "https://sqs.us-east-1.amazonaws.com/123456789012/adt-notifications.fifo"
//! region = "us-east-1"
//! ```
//!
//! # Environment Variables
//!
//! `${VAR_NAME}` placeholders are substituted at load time, which is how
//! credentials travel from the secret store into the process without being
//! written to disk. `HIEBRIDGE_*` variables override individual keys after
//! parsing.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BridgeConfig, DecryptionConfig, DispatchTarget, Environment,
    LocalReplicaConfig, LoggingConfig, PartnerConfig, QueueConfig, ReplicaTarget, RetryConfig,
    S3ReplicaConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
