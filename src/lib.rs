// HieBridge - HIE Partner Feed Ingestion Bridge
// Copyright (c) 2025 HieBridge Contributors
// Licensed under the MIT License

//! # HieBridge - HIE Partner Feed Ingestion
//!
//! HieBridge pulls flat-file patient event feeds from Health Information
//! Exchange partners, mirrors them into durable replica storage, converts
//! each row into an HL7v2 ADT message, and dispatches one notification per
//! patient event to a downstream FIFO queue.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Syncing** new feed files from a partner's FTP server into a replica
//! - **Decrypting** PGP-encrypted feed payloads on the way in
//! - **Parsing** pipe-separated feed rows with per-field normalization
//! - **Converting** rows into HL7v2 ADT A01/A03 messages
//! - **Normalizing** event timestamps from partner wall-clock time to UTC
//! - **Dispatching** per-patient-ordered notifications downstream
//!
//! ## Architecture
//!
//! HieBridge follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (sync, schema, convert, datetime, pipeline)
//! - [`adapters`] - External integrations (remote server, replica, queue)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hiebridge::config::load_config;
//! use hiebridge::core::pipeline::IngestionPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = load_config("hiebridge.toml")?;
//!
//!     // Build the pipeline for the configured partner
//!     let mut pipeline = IngestionPipeline::from_config(config).await?;
//!
//!     // Execute one ingestion run
//!     let summary = pipeline.run(None).await?;
//!
//!     println!("Dispatched {} notifications", summary.notifications_sent);
//!     Ok(())
//! }
//! ```
//!
//! ## Failure Containment
//!
//! Failures are contained at the narrowest possible scope so one bad
//! input never sinks a run:
//!
//! - A connection failure aborts the run (nothing downstream can happen)
//! - A file that cannot be read, decrypted, or parsed is skipped, leaving
//!   a `<file>.error` artifact next to its replica entry
//! - A row without a recoverable patient identity is dropped
//! - A delivery that exhausts its retries fails only its own event
//!
//! ## Error Handling
//!
//! HieBridge uses the [`domain::HieError`] type for all errors:
//!
//! ```rust,no_run
//! use hiebridge::domain::HieError;
//!
//! fn example() -> Result<(), HieError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = hiebridge::config::load_config("hiebridge.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! HieBridge uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn, error};
//!
//! info!("Starting ingestion");
//! warn!(file = "adt_20250102.psv", "Skipping file after read failure");
//! error!(error = "connection refused", "Remote session failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
