//! Run summary and reporting
//!
//! Tracks what one ingestion run did: files moved, rows converted,
//! notifications delivered, and every error the run survived.

use std::time::Duration;

/// Classification of a run error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunErrorType {
    /// Remote session failure (fatal for the run)
    Connection,
    /// One file could not be processed
    FileProcessing,
    /// One row could not be converted or identified
    RowValidation,
    /// Delivery failed after retries
    Dispatch,
    /// Configuration problem discovered at runtime
    Configuration,
    /// Anything else
    Unknown,
}

/// One error the run recorded and survived
#[derive(Debug, Clone)]
pub struct RunError {
    pub error_type: RunErrorType,
    pub message: String,

    /// Optional context (e.g. file name, row number)
    pub context: Option<String>,
}

impl RunError {
    pub fn new(error_type: RunErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Summary of one ingestion run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Files newly mirrored into the replica
    pub files_downloaded: usize,

    /// Files already in the replica and skipped by the sync diff
    pub files_skipped: usize,

    /// Files fully parsed and converted
    pub files_processed: usize,

    /// Files abandoned after a file-scoped failure
    pub files_failed: usize,

    /// Feed rows parsed across all files
    pub rows_parsed: usize,

    /// Rows dropped because the patient identity was unrecoverable
    pub rows_dropped: usize,

    /// Messages successfully converted
    pub messages_converted: usize,

    /// Notifications delivered downstream
    pub notifications_sent: usize,

    /// Deliveries that failed after retries
    pub dispatch_failures: usize,

    /// Per-field validation findings captured along the way
    pub validation_findings: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Errors the run recorded and survived
    pub errors: Vec<RunError>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: RunError) {
        self.errors.push(error);
    }

    /// True when nothing failed anywhere in the run
    pub fn is_successful(&self) -> bool {
        self.files_failed == 0 && self.dispatch_failures == 0 && self.errors.is_empty()
    }

    /// Share of parsed rows that became messages, as a percentage
    pub fn conversion_rate(&self) -> f64 {
        if self.rows_parsed == 0 {
            return 100.0;
        }
        (self.messages_converted as f64 / self.rows_parsed as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            files_downloaded = self.files_downloaded,
            files_skipped = self.files_skipped,
            files_processed = self.files_processed,
            files_failed = self.files_failed,
            rows_parsed = self.rows_parsed,
            rows_dropped = self.rows_dropped,
            messages_converted = self.messages_converted,
            notifications_sent = self.notifications_sent,
            dispatch_failures = self.dispatch_failures,
            validation_findings = self.validation_findings,
            duration_secs = self.duration.as_secs(),
            conversion_rate = format!("{:.2}%", self.conversion_rate()),
            "Ingestion run completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Ingestion run completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Run error"
                );
            }
        }
    }
}
