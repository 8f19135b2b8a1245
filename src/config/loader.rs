//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BridgeConfig;
use crate::config::secret_string;
use crate::domain::errors::HieError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`BridgeConfig`]
/// 4. Applies environment variable overrides (`HIEBRIDGE_*` prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use hiebridge::config::loader::load_config;
///
/// let config = load_config("hiebridge.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BridgeConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(HieError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        HieError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: BridgeConfig = toml::from_str(&contents)
        .map_err(|e| HieError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        HieError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched so documentation examples don't have
/// to exist as real variables.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static pattern");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(HieError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `HIEBRIDGE_*` prefix
///
/// Variables follow the pattern `HIEBRIDGE_<SECTION>_<KEY>`, e.g.
/// `HIEBRIDGE_PARTNER_HOST` or `HIEBRIDGE_QUEUE_URL`.
fn apply_env_overrides(config: &mut BridgeConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("HIEBRIDGE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("HIEBRIDGE_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Partner overrides
    if let Ok(val) = std::env::var("HIEBRIDGE_PARTNER_HOST") {
        config.partner.host = val;
    }
    if let Ok(val) = std::env::var("HIEBRIDGE_PARTNER_PORT") {
        if let Ok(port) = val.parse() {
            config.partner.port = port;
        }
    }
    if let Ok(val) = std::env::var("HIEBRIDGE_PARTNER_USERNAME") {
        config.partner.username = val;
    }
    if let Ok(val) = std::env::var("HIEBRIDGE_PARTNER_PASSWORD") {
        config.partner.password = secret_string(val);
    }
    if let Ok(val) = std::env::var("HIEBRIDGE_PARTNER_REMOTE_DIRECTORY") {
        config.partner.remote_directory = val;
    }
    if let Ok(val) = std::env::var("HIEBRIDGE_PARTNER_TIMEZONE") {
        config.partner.timezone = val;
    }

    // Replica overrides
    if let Some(ref mut s3) = config.s3_replica {
        if let Ok(val) = std::env::var("HIEBRIDGE_S3_REPLICA_BUCKET") {
            s3.bucket = val;
        }
        if let Ok(val) = std::env::var("HIEBRIDGE_S3_REPLICA_REGION") {
            s3.region = val;
        }
    }
    if let Some(ref mut local) = config.local_replica {
        if let Ok(val) = std::env::var("HIEBRIDGE_LOCAL_REPLICA_ROOT") {
            local.root = val;
        }
    }

    // Queue overrides
    if let Some(ref mut queue) = config.queue {
        if let Ok(val) = std::env::var("HIEBRIDGE_QUEUE_URL") {
            queue.url = val;
        }
        if let Ok(val) = std::env::var("HIEBRIDGE_QUEUE_REGION") {
            queue.region = val;
        }
    }
}
