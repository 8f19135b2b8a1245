//! Configuration schema types
//!
//! This module defines the configuration structure for the bridge. One
//! configuration file describes one HIE partner; multiple partners run as
//! independent invocations with their own files.

use crate::config::SecretString;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Replica backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplicaTarget {
    /// Local filesystem subtree
    Local,
    /// S3 bucket + prefix
    S3,
}

/// Notification channel selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchTarget {
    /// Record events locally without any network call (development)
    Local,
    /// Durable per-patient-ordered FIFO queue (production)
    Queue,
}

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main bridge configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Application-level settings
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// The HIE partner this configuration describes
    pub partner: PartnerConfig,

    /// Replica backend (local or s3)
    pub replica_target: ReplicaTarget,

    /// Local replica configuration (required if replica_target = local)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_replica: Option<LocalReplicaConfig>,

    /// S3 replica configuration (required if replica_target = s3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_replica: Option<S3ReplicaConfig>,

    /// Notification channel (local or queue)
    pub dispatch_target: DispatchTarget,

    /// Queue configuration (required if dispatch_target = queue)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueConfig>,

    /// Dispatch retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.partner.validate()?;

        // Both backend sections may be present in the file; only the active
        // one is validated.
        match self.replica_target {
            ReplicaTarget::Local => {
                if let Some(ref config) = self.local_replica {
                    config.validate()?;
                } else {
                    return Err(
                        "local_replica configuration is required when replica_target = 'local'"
                            .to_string(),
                    );
                }
            }
            ReplicaTarget::S3 => {
                if let Some(ref config) = self.s3_replica {
                    config.validate()?;
                } else {
                    return Err(
                        "s3_replica configuration is required when replica_target = 's3'"
                            .to_string(),
                    );
                }
            }
        }

        if self.dispatch_target == DispatchTarget::Queue {
            match self.queue {
                Some(ref config) => config.validate()?,
                None => {
                    return Err(
                        "queue configuration is required when dispatch_target = 'queue'"
                            .to_string(),
                    )
                }
            }
        }

        self.retry.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (convert but don't dispatch)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// One HIE partner's connection and feed parameters
///
/// Immutable per run. Credentials arrive through `${VAR}` substitution so
/// the secret store stays outside this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerConfig {
    /// Partner display name (carried into notification events)
    pub name: String,

    /// Remote server host
    pub host: String,

    /// Remote server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Remote session username
    pub username: String,

    /// Remote session password
    pub password: SecretString,

    /// Remote directory holding the partner's feed files
    pub remote_directory: String,

    /// IANA timezone the partner's wall-clock timestamps are in
    pub timezone: String,

    /// Decryption material for partners whose feed is encrypted at rest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decryption: Option<DecryptionConfig>,
}

impl PartnerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("partner.name cannot be empty".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("partner.host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("partner.port cannot be 0".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("partner.username cannot be empty".to_string());
        }
        if self.remote_directory.trim().is_empty() {
            return Err("partner.remote_directory cannot be empty".to_string());
        }
        self.parsed_timezone()?;
        Ok(())
    }

    /// Parses the configured IANA timezone
    ///
    /// # Errors
    ///
    /// Returns an error if the timezone name is not a valid IANA zone
    pub fn parsed_timezone(&self) -> Result<Tz, String> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| format!("partner.timezone is not a valid IANA zone: '{}'", self.timezone))
    }
}

/// Decryption material for an encrypted partner feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptionConfig {
    /// Armored private key
    pub private_key: SecretString,

    /// Passphrase protecting the private key
    pub passphrase: SecretString,
}

/// Local-disk replica configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalReplicaConfig {
    /// Root directory of the replica subtree
    pub root: String,
}

impl LocalReplicaConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root.trim().is_empty() {
            return Err("local_replica.root cannot be empty".to_string());
        }
        Ok(())
    }
}

/// S3 replica configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3ReplicaConfig {
    /// Bucket name
    pub bucket: String,

    /// Key prefix under which replica entries are stored
    #[serde(default)]
    pub prefix: String,

    /// AWS region
    pub region: String,
}

impl S3ReplicaConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bucket.trim().is_empty() {
            return Err("s3_replica.bucket cannot be empty".to_string());
        }
        if self.region.trim().is_empty() {
            return Err("s3_replica.region cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Notification queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// FIFO queue URL
    pub url: String,

    /// AWS region
    pub region: String,
}

impl QueueConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("queue.url cannot be empty".to_string());
        }
        if self.region.trim().is_empty() {
            return Err("queue.region cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Dispatch retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backoff_multiplier < 1.0 {
            return Err("retry.backoff_multiplier must be >= 1.0".to_string());
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err("retry.max_delay_ms must be >= retry.initial_delay_ms".to_string());
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log output format ("text" or "json")
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Enable rolling file logs in addition to the console
    #[serde(default)]
    pub file_enabled: bool,

    /// Directory for rolling file logs
    #[serde(default = "default_log_path")]
    pub file_path: String,

    /// File rotation cadence ("hourly", "daily", "never")
    #[serde(default = "default_log_rotation")]
    pub file_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if !["text", "json"].contains(&self.format.as_str()) {
            return Err(format!(
                "Invalid logging.format '{}'. Must be 'text' or 'json'",
                self.format
            ));
        }
        if !["hourly", "daily", "never"].contains(&self.file_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.file_rotation '{}'. Must be one of: hourly, daily, never",
                self.file_rotation
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            file_enabled: false,
            file_path: default_log_path(),
            file_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    21
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn sample_config() -> BridgeConfig {
        BridgeConfig {
            application: ApplicationConfig {
                log_level: "info".to_string(),
                dry_run: false,
            },
            environment: Environment::Development,
            partner: PartnerConfig {
                name: "Coastal HIE".to_string(),
                host: "feeds.coastal.example".to_string(),
                port: 21,
                username: "bridge".to_string(),
                password: secret_string("hunter2".to_string()),
                remote_directory: "/outbound/adt".to_string(),
                timezone: "America/Chicago".to_string(),
                decryption: None,
            },
            replica_target: ReplicaTarget::Local,
            local_replica: Some(LocalReplicaConfig {
                root: "/var/lib/hiebridge/replica".to_string(),
            }),
            s3_replica: None,
            dispatch_target: DispatchTarget::Local,
            queue: None,
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_sample_config_is_valid() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_missing_replica_backend_rejected() {
        let mut config = sample_config();
        config.local_replica = None;
        let err = config.validate().unwrap_err();
        assert!(err.contains("local_replica"));
    }

    #[test]
    fn test_queue_target_requires_queue_section() {
        let mut config = sample_config();
        config.dispatch_target = DispatchTarget::Queue;
        let err = config.validate().unwrap_err();
        assert!(err.contains("queue"));
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let mut config = sample_config();
        config.partner.timezone = "Mars/Olympus_Mons".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("IANA"));
    }

    #[test]
    fn test_timezone_parses() {
        let config = sample_config();
        let tz = config.partner.parsed_timezone().unwrap();
        assert_eq!(tz, chrono_tz::America::Chicago);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = sample_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_multiplier_floor() {
        let mut config = sample_config();
        config.retry.backoff_multiplier = 0.5;
        assert!(config.validate().is_err());
    }
}
