//! Logging and observability
//!
//! Structured logging for the bridge:
//! - console output, text or JSON
//! - configurable log levels via config or `RUST_LOG`
//! - optional rolling file logs
//!
//! Initialize once from the binary and keep the returned guard alive:
//!
//! ```no_run
//! use hiebridge::config::LoggingConfig;
//! use hiebridge::logging::init_logging;
//!
//! let _guard = init_logging("info", &LoggingConfig::default()).unwrap();
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
