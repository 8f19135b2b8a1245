//! Ingestion pipeline orchestrator
//!
//! Drives one partner run end to end: connect, sync new files into the
//! replica, parse and convert each downloaded file, normalize
//! timestamps, and dispatch one notification per surviving row.
//!
//! Failure containment follows the error taxonomy: connection problems
//! abort the run, a bad file is skipped (leaving a `<file>.error`
//! artifact next to its replica entry), a bad row is dropped, and a
//! dispatch failure affects only its own event. The remote session is
//! closed on every exit path.

pub mod summary;

pub use summary::{RunError, RunErrorType, RunSummary};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::adapters::queue::{LocalDispatcher, NotificationDispatcher, SqsDispatcher};
use crate::adapters::remote::{FtpFeedClient, RemoteFileClient};
use crate::adapters::replica::{create_replica_store, replica_path, ReplicaStore};
use crate::config::{BridgeConfig, DispatchTarget};
use crate::core::convert::{extract_composite_id, AdtConverter};
use crate::core::datetime::{TimestampNormalizer, WIRE_TIMESTAMP_FORMAT};
use crate::core::decrypt::FeedDecryptor;
use crate::core::schema::parse_feed;
use crate::core::sync::SyncEngine;
use crate::domain::{ClinicalMessage, HieError, NotificationEvent, Result};

/// One partner's ingestion pipeline
pub struct IngestionPipeline {
    config: BridgeConfig,
    remote: Box<dyn RemoteFileClient>,
    replica: Box<dyn ReplicaStore>,
    dispatcher: Box<dyn NotificationDispatcher>,
    decryptor: Option<FeedDecryptor>,
    converter: AdtConverter,
    normalizer: TimestampNormalizer,
}

impl IngestionPipeline {
    /// Builds the pipeline with the adapters named in the configuration
    pub async fn from_config(config: BridgeConfig) -> Result<Self> {
        let remote: Box<dyn RemoteFileClient> =
            Box::new(FtpFeedClient::new(config.partner.clone()));
        let replica = create_replica_store(&config).await?;

        let dispatcher: Box<dyn NotificationDispatcher> = match config.dispatch_target {
            DispatchTarget::Local => Box::new(LocalDispatcher::new()),
            DispatchTarget::Queue => {
                let queue = config.queue.as_ref().ok_or_else(|| {
                    HieError::Configuration(
                        "dispatch_target is 'queue' but [queue] is missing".to_string(),
                    )
                })?;
                Box::new(SqsDispatcher::new(queue, config.retry.clone()).await)
            }
        };

        Self::with_adapters(config, remote, replica, dispatcher)
    }

    /// Builds the pipeline around caller-supplied adapters (used by tests)
    pub fn with_adapters(
        config: BridgeConfig,
        remote: Box<dyn RemoteFileClient>,
        replica: Box<dyn ReplicaStore>,
        dispatcher: Box<dyn NotificationDispatcher>,
    ) -> Result<Self> {
        let timezone = config
            .partner
            .parsed_timezone()
            .map_err(HieError::Configuration)?;
        let decryptor = match &config.partner.decryption {
            Some(decryption) => Some(FeedDecryptor::new(decryption)?),
            None => None,
        };

        Ok(Self {
            converter: AdtConverter::new(timezone),
            normalizer: TimestampNormalizer::new(timezone),
            config,
            remote,
            replica,
            dispatcher,
            decryptor,
        })
    }

    /// Runs one full ingestion pass
    ///
    /// `filter` restricts the remote listing to names containing the
    /// token, which is how a run is scoped to a single day's drop.
    pub async fn run(&mut self, filter: Option<&str>) -> Result<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary::new();

        info!(partner = %self.config.partner.name, "Starting ingestion run");
        self.remote.connect().await?;
        let result = self.run_inner(filter, &mut summary).await;
        // The session closes on every exit path
        if let Err(e) = self.remote.disconnect().await {
            warn!(error = %e, "Remote disconnect failed");
        }
        result?;

        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    /// Mirrors new files into the replica without converting anything
    pub async fn sync_only(&mut self, filter: Option<&str>) -> Result<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary::new();

        self.remote.connect().await?;
        let result = self.sync_files(filter, &mut summary).await;
        if let Err(e) = self.remote.disconnect().await {
            warn!(error = %e, "Remote disconnect failed");
        }
        result?;

        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn run_inner(&mut self, filter: Option<&str>, summary: &mut RunSummary) -> Result<()> {
        let downloaded = self.sync_files(filter, summary).await?;
        let replica_dir = replica_path(&self.config.partner.remote_directory);

        for name in downloaded {
            let replica_file = format!("{replica_dir}/{name}");
            match self.process_file(&replica_file, summary).await {
                Ok(()) => summary.files_processed += 1,
                Err(e) => {
                    warn!(file = %name, error = %e, "Abandoning file after processing failure");
                    summary.files_failed += 1;
                    summary.add_error(
                        RunError::new(RunErrorType::FileProcessing, e.to_string())
                            .with_context(name.clone()),
                    );
                    self.write_error_artifact(&replica_file, &e).await;
                }
            }
        }
        Ok(())
    }

    async fn sync_files(
        &mut self,
        filter: Option<&str>,
        summary: &mut RunSummary,
    ) -> Result<Vec<String>> {
        let mut engine = SyncEngine::new(
            self.remote.as_mut(),
            self.replica.as_ref(),
            self.decryptor.as_ref(),
        );
        let outcome = engine
            .sync(&self.config.partner.remote_directory, filter)
            .await?;

        summary.files_downloaded = outcome.downloaded.len();
        summary.files_skipped = outcome.skipped_existing;
        for failure in &outcome.failures {
            summary.files_failed += 1;
            summary.add_error(
                RunError::new(RunErrorType::FileProcessing, failure.message.clone())
                    .with_context(failure.file.clone()),
            );
        }
        Ok(outcome.downloaded)
    }

    /// Parses one replica file and dispatches its rows
    async fn process_file(&self, replica_file: &str, summary: &mut RunSummary) -> Result<()> {
        let bytes = self.replica.read_file(replica_file).await?;
        let text = String::from_utf8(bytes).map_err(|e| {
            HieError::file_processing(replica_file, format!("not valid UTF-8: {e}"))
        })?;

        let rows = parse_feed(&text);
        info!(file = replica_file, rows = rows.len(), "Parsed feed file");
        summary.rows_parsed += rows.len();

        for row in rows {
            summary.validation_findings += row.diagnostics.len();

            let mut message = self.converter.convert(&row);
            let timestamp_findings = self.normalizer.normalize(&mut message);
            summary.validation_findings += timestamp_findings.len();

            let composite = match extract_composite_id(&message) {
                Ok(composite) => composite,
                Err(e) => {
                    warn!(file = replica_file, error = %e, "Dropping row with unrecoverable identity");
                    summary.rows_dropped += 1;
                    summary.add_error(
                        RunError::new(RunErrorType::RowValidation, e.to_string())
                            .with_context(replica_file.to_string()),
                    );
                    continue;
                }
            };
            summary.messages_converted += 1;

            let event = NotificationEvent {
                customer_id: composite.customer_id,
                patient_id: composite.patient_id,
                source_timestamp: event_occurred_at(&message),
                received_timestamp: Utc::now(),
                message: message.to_wire(),
                partner_name: self.config.partner.name.clone(),
                raw_file_reference: Some(replica_file.to_string()),
            };

            if self.config.application.dry_run {
                debug!(patient_id = %event.patient_id, "Dry run, not dispatching");
                continue;
            }

            match self.dispatcher.dispatch(&event).await {
                Ok(()) => summary.notifications_sent += 1,
                Err(e) => {
                    warn!(patient_id = %event.patient_id, error = %e, "Dispatch failed");
                    summary.dispatch_failures += 1;
                    summary.add_error(
                        RunError::new(RunErrorType::Dispatch, e.to_string())
                            .with_context(replica_file.to_string()),
                    );
                }
            }
        }
        Ok(())
    }

    /// Leaves a `<file>.error` marker next to the replica entry so a
    /// failed file is visible without trawling logs
    async fn write_error_artifact(&self, replica_file: &str, error: &HieError) {
        let artifact = format!("{replica_file}.error");
        if let Err(e) = self
            .replica
            .write_file(&artifact, error.to_string().as_bytes())
            .await
        {
            warn!(artifact = %artifact, error = %e, "Could not write error artifact");
        }
    }
}

/// When the event occurred, read back from the normalized EVN-6 (UTC)
fn event_occurred_at(message: &ClinicalMessage) -> DateTime<Utc> {
    message
        .segment("EVN")
        .and_then(|evn| evn.component(6, 1))
        .and_then(|value| NaiveDateTime::parse_from_str(value, WIRE_TIMESTAMP_FORMAT).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_else(Utc::now)
}
