//! End-to-end pipeline tests over in-memory adapters
//!
//! These tests drive [`IngestionPipeline`] through a fake remote server,
//! a real local replica in a temp directory, and a recording dispatcher,
//! covering the failure-containment behavior of a full run.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tempfile::TempDir;

use hiebridge::adapters::queue::LocalDispatcher;
use hiebridge::adapters::remote::RemoteFileClient;
use hiebridge::adapters::replica::LocalReplicaStore;
use hiebridge::config::{
    secret_string, ApplicationConfig, BridgeConfig, DispatchTarget, Environment,
    LocalReplicaConfig, LoggingConfig, PartnerConfig, ReplicaTarget, RetryConfig,
};
use hiebridge::core::pipeline::IngestionPipeline;
use hiebridge::core::schema::header_line;
use hiebridge::domain::{RemoteError, Result};

const REMOTE_DIR: &str = "/outbound/adt";
const CUSTOMER: &str = "550e8400-e29b-41d4-a716-446655440000";
const PATIENT: &str = "650e8400-e29b-41d4-a716-446655440001";

/// In-memory remote server with a single directory of files
struct FakeRemote {
    files: HashMap<String, Vec<u8>>,
    directory: String,
    fail_reads: HashSet<String>,
}

impl FakeRemote {
    fn new(files: &[(&str, &[u8])]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(name, contents)| (name.to_string(), contents.to_vec()))
                .collect(),
            directory: REMOTE_DIR.to_string(),
            fail_reads: HashSet::new(),
        }
    }
}

#[async_trait]
impl RemoteFileClient for FakeRemote {
    async fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }

    async fn list(&mut self, _path: &str, filter: Option<&str>) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .files
            .keys()
            .filter(|name| filter.map(|token| name.contains(token)).unwrap_or(true))
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }

    async fn read(&mut self, path: &str) -> Result<Vec<u8>> {
        let name = path.rsplit('/').next().unwrap_or(path);
        if self.fail_reads.contains(name) {
            return Err(RemoteError::ReadFailed {
                path: path.to_string(),
                message: "simulated".to_string(),
            }
            .into());
        }
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| RemoteError::FileNotFound(path.to_string()).into())
    }

    async fn write(&mut self, _path: &str, _contents: &[u8]) -> Result<()> {
        Ok(())
    }

    async fn exists(&mut self, path: &str) -> Result<bool> {
        Ok(path == self.directory)
    }
}

fn test_config(replica_root: &std::path::Path, dry_run: bool) -> BridgeConfig {
    BridgeConfig {
        application: ApplicationConfig {
            log_level: "info".to_string(),
            dry_run,
        },
        environment: Environment::Development,
        partner: PartnerConfig {
            name: "Coastal HIE".to_string(),
            host: "feeds.coastal.example".to_string(),
            port: 21,
            username: "bridge".to_string(),
            password: secret_string("test_pass".to_string()),
            remote_directory: REMOTE_DIR.to_string(),
            timezone: "America/New_York".to_string(),
            decryption: None,
        },
        replica_target: ReplicaTarget::Local,
        local_replica: Some(LocalReplicaConfig {
            root: replica_root.to_string_lossy().into_owned(),
        }),
        s3_replica: None,
        dispatch_target: DispatchTarget::Local,
        queue: None,
        retry: RetryConfig::default(),
        logging: LoggingConfig::default(),
    }
}

/// One feed row in fixed column order, 29 pipe-separated fields
fn feed_row(visit: &str, network_id: &str, admit: &str, discharge: &str) -> String {
    [
        "CGH",                   // FacilityAbbrev
        "Coastal General",       // FacilityName
        visit,                   // VisitNumber
        "MRN001",                // PatientID
        "Doe",                   // LastName
        "Jane",                  // FirstName
        "Q",                     // MiddleName
        "1 Main St",             // StreetAddress
        "Springfield",           // City
        "IL",                    // State
        "62704",                 // ZipCode
        "(217) 555-0100",        // PrimaryPhoneNumber
        "123-45-6789",           // SSN
        "1990-01-15",            // PatientDateofBirth
        "F",                     // Gender
        "M",                     // MaritalStatus
        admit,                   // AdmitDateTime
        "Chest pain",            // ChiefComplaint
        "R07.9",                 // DiagnosisCode
        "Chest pain",            // DiagnosisText
        "ICD-10",                // DiagnosisCodingSystem
        "Dr. Howser, Doogie R",  // AttendingPhysicianName
        "",                      // ReferringPhysicianName
        "",                      // AdmittingPhysicianName
        "COASTAL",               // SendingToSystem
        network_id,              // NetworkPatID
        discharge,               // DischargeDateTime
        "3",                     // EmergencySeverityLevel
        "E",                     // PatClass
    ]
    .join("|")
}

fn composite_id() -> String {
    format!("{CUSTOMER}_{PATIENT}")
}

fn feed_file(rows: &[String]) -> Vec<u8> {
    let mut text = header_line();
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text.into_bytes()
}

fn build_pipeline(
    remote: FakeRemote,
    replica_root: &std::path::Path,
    dry_run: bool,
) -> (IngestionPipeline, Arc<LocalDispatcher>) {
    let dispatcher = Arc::new(LocalDispatcher::new());
    let pipeline = IngestionPipeline::with_adapters(
        test_config(replica_root, dry_run),
        Box::new(remote),
        Box::new(LocalReplicaStore::new(replica_root)),
        Box::new(Arc::clone(&dispatcher)),
    )
    .expect("pipeline construction");
    (pipeline, dispatcher)
}

#[tokio::test]
async fn test_full_run_dispatches_one_event_per_row() {
    let tmp = TempDir::new().unwrap();
    let rows = vec![
        feed_row("V1001", &composite_id(), "20250102120000", ""),
        feed_row("V1002", &composite_id(), "20250102130000", "20250103090000"),
    ];
    let remote = FakeRemote::new(&[("roster_20250102.psv", &feed_file(&rows))]);
    let (mut pipeline, dispatcher) = build_pipeline(remote, tmp.path(), false);

    let summary = pipeline.run(None).await.unwrap();

    assert_eq!(summary.files_downloaded, 1);
    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.files_failed, 0);
    assert_eq!(summary.rows_parsed, 2);
    assert_eq!(summary.rows_dropped, 0);
    assert_eq!(summary.messages_converted, 2);
    assert_eq!(summary.notifications_sent, 2);
    assert!(summary.is_successful());

    let events = dispatcher.recorded();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].customer_id.as_str(), CUSTOMER);
    assert_eq!(events[0].patient_id.as_str(), PATIENT);
    assert_eq!(events[0].partner_name, "Coastal HIE");
    assert_eq!(
        events[0].raw_file_reference.as_deref(),
        Some("outbound/adt/roster_20250102.psv")
    );

    // Admit row converts to A01, discharge row to A03
    assert!(events[0].message.starts_with("MSH|^~\\&|HIEGATE"));
    assert!(events[0].message.contains("ADT^A01"));
    assert!(events[1].message.contains("ADT^A03"));
}

#[tokio::test]
async fn test_event_timestamps_are_normalized_to_utc() {
    let tmp = TempDir::new().unwrap();
    // Partner wall-clock noon Eastern in January is 17:00 UTC
    let rows = vec![feed_row("V1001", &composite_id(), "20250102120000", "")];
    let remote = FakeRemote::new(&[("roster.psv", &feed_file(&rows))]);
    let (mut pipeline, dispatcher) = build_pipeline(remote, tmp.path(), false);

    pipeline.run(None).await.unwrap();

    let events = dispatcher.recorded();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0]
            .source_timestamp
            .format("%Y%m%d%H%M%S")
            .to_string(),
        "20250102170000"
    );
    assert!(events[0].message.contains("20250102170000"));
}

#[tokio::test]
async fn test_rerun_skips_files_already_in_the_replica() {
    let tmp = TempDir::new().unwrap();
    let rows = vec![feed_row("V1001", &composite_id(), "20250102120000", "")];
    let file = feed_file(&rows);

    let remote = FakeRemote::new(&[("roster.psv", &file)]);
    let (mut pipeline, dispatcher) = build_pipeline(remote, tmp.path(), false);
    pipeline.run(None).await.unwrap();

    // A second pipeline against the same replica sees nothing new
    let remote = FakeRemote::new(&[("roster.psv", &file)]);
    let (mut pipeline, second_dispatcher) = build_pipeline(remote, tmp.path(), false);
    let summary = pipeline.run(None).await.unwrap();

    assert_eq!(summary.files_downloaded, 0);
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.notifications_sent, 0);
    assert_eq!(dispatcher.recorded().len(), 1);
    assert!(second_dispatcher.recorded().is_empty());
}

#[tokio::test]
async fn test_row_without_recoverable_identity_is_dropped() {
    let tmp = TempDir::new().unwrap();
    let rows = vec![
        feed_row("V1001", &composite_id(), "20250102120000", ""),
        feed_row("V1002", "not-a-composite", "20250102130000", ""),
    ];
    let remote = FakeRemote::new(&[("roster.psv", &feed_file(&rows))]);
    let (mut pipeline, dispatcher) = build_pipeline(remote, tmp.path(), false);

    let summary = pipeline.run(None).await.unwrap();

    assert_eq!(summary.rows_parsed, 2);
    assert_eq!(summary.rows_dropped, 1);
    assert_eq!(summary.messages_converted, 1);
    assert_eq!(summary.notifications_sent, 1);
    assert_eq!(dispatcher.recorded().len(), 1);
    assert!(!summary.is_successful());
}

#[tokio::test]
async fn test_unparseable_file_is_skipped_with_error_artifact() {
    let tmp = TempDir::new().unwrap();
    let good = feed_file(&[feed_row("V1001", &composite_id(), "20250102120000", "")]);
    let remote = FakeRemote::new(&[
        ("a_good.psv", good.as_slice()),
        ("b_bad.psv", &[0xff, 0xfe, 0x00, 0x01]),
    ]);
    let (mut pipeline, dispatcher) = build_pipeline(remote, tmp.path(), false);

    let summary = pipeline.run(None).await.unwrap();

    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(summary.notifications_sent, 1);
    assert_eq!(dispatcher.recorded().len(), 1);
    assert!(!summary.is_successful());

    // The failed file leaves a visible marker next to its replica entry
    let artifact = tmp.path().join("outbound/adt/b_bad.psv.error");
    assert!(artifact.exists());
}

#[tokio::test]
async fn test_dry_run_converts_but_never_dispatches() {
    let tmp = TempDir::new().unwrap();
    let rows = vec![
        feed_row("V1001", &composite_id(), "20250102120000", ""),
        feed_row("V1002", &composite_id(), "20250102130000", ""),
    ];
    let remote = FakeRemote::new(&[("roster.psv", &feed_file(&rows))]);
    let (mut pipeline, dispatcher) = build_pipeline(remote, tmp.path(), true);

    let summary = pipeline.run(None).await.unwrap();

    assert_eq!(summary.messages_converted, 2);
    assert_eq!(summary.notifications_sent, 0);
    assert!(dispatcher.recorded().is_empty());
}

#[tokio::test]
async fn test_filter_restricts_the_run_to_one_drop() {
    let tmp = TempDir::new().unwrap();
    let jan2 = feed_file(&[feed_row("V1001", &composite_id(), "20250102120000", "")]);
    let jan3 = feed_file(&[feed_row("V1002", &composite_id(), "20250103120000", "")]);
    let remote = FakeRemote::new(&[
        ("roster_20250102.psv", jan2.as_slice()),
        ("roster_20250103.psv", jan3.as_slice()),
    ]);
    let (mut pipeline, dispatcher) = build_pipeline(remote, tmp.path(), false);

    let summary = pipeline.run(Some("20250103")).await.unwrap();

    assert_eq!(summary.files_downloaded, 1);
    assert_eq!(summary.notifications_sent, 1);
    let events = dispatcher.recorded();
    assert_eq!(
        events[0].raw_file_reference.as_deref(),
        Some("outbound/adt/roster_20250103.psv")
    );
}

#[tokio::test]
async fn test_sync_only_mirrors_without_converting() {
    let tmp = TempDir::new().unwrap();
    let rows = vec![feed_row("V1001", &composite_id(), "20250102120000", "")];
    let remote = FakeRemote::new(&[("roster.psv", &feed_file(&rows))]);
    let (mut pipeline, dispatcher) = build_pipeline(remote, tmp.path(), false);

    let summary = pipeline.sync_only(None).await.unwrap();

    assert_eq!(summary.files_downloaded, 1);
    assert_eq!(summary.rows_parsed, 0);
    assert_eq!(summary.notifications_sent, 0);
    assert!(dispatcher.recorded().is_empty());
    assert!(tmp.path().join("outbound/adt/roster.psv").exists());
}
