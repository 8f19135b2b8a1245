//! Core business logic for the ingestion bridge.
//!
//! # Modules
//!
//! - [`sync`] - Remote-to-replica synchronization
//! - [`decrypt`] - Encrypted feed payload handling
//! - [`schema`] - Feed column layout, parsing, and field normalization
//! - [`convert`] - Row to ADT message conversion
//! - [`datetime`] - Timestamp parsing and UTC normalization
//! - [`pipeline`] - Run orchestration and summary reporting
//!
//! # Ingestion Workflow
//!
//! The typical run:
//!
//! 1. **Connect**: Open the remote session to the partner's server
//! 2. **Sync**: Diff the remote directory against the replica and pull
//!    new files, decrypting on the way in
//! 3. **Parse**: Split each file into rows and normalize every field
//! 4. **Convert**: Build one ADT message per row
//! 5. **Normalize**: Rewrite event timestamps to 14-digit UTC
//! 6. **Dispatch**: Deliver one notification per patient-identified row
//! 7. **Report**: Log the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use hiebridge::config::load_config;
//! use hiebridge::core::pipeline::IngestionPipeline;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hiebridge.toml")?;
//! let mut pipeline = IngestionPipeline::from_config(config).await?;
//!
//! let summary = pipeline.run(None).await?;
//! println!("Converted: {}", summary.messages_converted);
//! println!("Dispatched: {}", summary.notifications_sent);
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod datetime;
pub mod decrypt;
pub mod pipeline;
pub mod schema;
pub mod sync;
