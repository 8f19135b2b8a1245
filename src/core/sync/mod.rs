//! Remote-to-replica synchronization
//!
//! Pulls files the partner has published that the replica has not seen
//! yet. The diff is by file name: a file already present in the replica
//! is never re-downloaded, which makes a re-run of the same day a no-op.
//!
//! Failure scoping: a missing remote directory aborts the run; a failure
//! on one file (read or decrypt) skips that file and the sync continues;
//! a replica write failure is logged and the file is retried naturally
//! on the next run because the name diff still shows it as new.

use std::collections::HashSet;
use tracing::{info, warn};

use crate::adapters::remote::RemoteFileClient;
use crate::adapters::replica::{replica_path, ReplicaStore};
use crate::core::decrypt::FeedDecryptor;
use crate::domain::{HieError, RemoteError, Result};

/// One file-scoped sync failure
#[derive(Debug, Clone)]
pub struct SyncFailure {
    pub file: String,
    pub message: String,
}

/// Result of one sync pass
#[derive(Debug, Default)]
pub struct SyncOutcome {
    /// Names of files newly written to the replica, in listing order
    pub downloaded: Vec<String>,

    /// Files already present in the replica and skipped
    pub skipped_existing: usize,

    /// File-scoped failures (the run continued past these)
    pub failures: Vec<SyncFailure>,
}

/// Mirrors new partner files into the replica
pub struct SyncEngine<'a> {
    remote: &'a mut dyn RemoteFileClient,
    replica: &'a dyn ReplicaStore,
    decryptor: Option<&'a FeedDecryptor>,
}

impl<'a> SyncEngine<'a> {
    pub fn new(
        remote: &'a mut dyn RemoteFileClient,
        replica: &'a dyn ReplicaStore,
        decryptor: Option<&'a FeedDecryptor>,
    ) -> Self {
        Self {
            remote,
            replica,
            decryptor,
        }
    }

    /// Runs one sync pass over a remote directory
    ///
    /// When `filter` is given, only remote names containing the token
    /// are considered (used to restrict a run to one day's drop).
    ///
    /// # Errors
    ///
    /// Returns [`HieError::Connection`] when the remote directory does
    /// not exist or listing fails. File-scoped failures are reported in
    /// the outcome instead.
    pub async fn sync(&mut self, remote_directory: &str, filter: Option<&str>) -> Result<SyncOutcome> {
        if !self.remote.exists(remote_directory).await? {
            return Err(RemoteError::DirectoryNotFound(remote_directory.to_string()).into());
        }

        let remote_names = self.remote.list(remote_directory, filter).await?;
        let replica_dir = replica_path(remote_directory);
        let existing: HashSet<String> = self
            .replica
            .list_file_names(&replica_dir)
            .await?
            .into_iter()
            .collect();

        info!(
            remote_directory,
            remote_files = remote_names.len(),
            replica_files = existing.len(),
            "Diffing remote directory against replica"
        );

        let mut outcome = SyncOutcome::default();
        for name in remote_names {
            if existing.contains(&name) {
                outcome.skipped_existing += 1;
                continue;
            }
            match self.pull_file(remote_directory, &replica_dir, &name).await {
                Ok(()) => outcome.downloaded.push(name),
                Err(e) => {
                    warn!(file = %name, error = %e, "Skipping file after sync failure");
                    outcome.failures.push(SyncFailure {
                        file: name,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            downloaded = outcome.downloaded.len(),
            skipped = outcome.skipped_existing,
            failed = outcome.failures.len(),
            "Sync pass complete"
        );
        Ok(outcome)
    }

    async fn pull_file(&mut self, remote_dir: &str, replica_dir: &str, name: &str) -> Result<()> {
        let remote_file = format!("{}/{}", remote_dir.trim_end_matches('/'), name);
        let payload = self.remote.read(&remote_file).await.map_err(|e| {
            HieError::file_processing(name, format!("remote read failed: {e}"))
        })?;

        let plaintext = match self.decryptor {
            Some(decryptor) if FeedDecryptor::is_encrypted_name(name) => {
                decryptor.decrypt(name, &payload)?
            }
            _ => payload,
        };

        let replica_file = format!("{replica_dir}/{name}");
        // Left for the next run to retry; the name diff still shows the
        // file as new
        if let Err(e) = self.replica.write_file(&replica_file, &plaintext).await {
            warn!(file = %replica_file, error = %e, "Replica write failed");
            return Err(HieError::file_processing(
                name,
                format!("replica write failed: {e}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replica::LocalReplicaStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct FakeRemote {
        files: HashMap<String, Vec<u8>>,
        directory: String,
        fail_reads: HashSet<String>,
    }

    impl FakeRemote {
        fn new(directory: &str, files: &[(&str, &[u8])]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(name, contents)| (name.to_string(), contents.to_vec()))
                    .collect(),
                directory: directory.to_string(),
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

    const DIR: &str = "/outbound/adt";

    #[tokio::test]
    async fn test_sync_downloads_new_files() {
        let tmp = TempDir::new().unwrap();
        let replica = LocalReplicaStore::new(tmp.path());
        let mut remote = FakeRemote::new(DIR, &[("a.psv", b"a"), ("b.psv", b"b")]);

        let mut engine = SyncEngine::new(&mut remote, &replica, None);
        let outcome = engine.sync(DIR, None).await.unwrap();

        assert_eq!(outcome.downloaded, vec!["a.psv", "b.psv"]);
        assert_eq!(outcome.skipped_existing, 0);
        assert!(outcome.failures.is_empty());
        assert_eq!(replica.read_file("outbound/adt/a.psv").await.unwrap(), b"a");
    }

    #[tokio::test]
    async fn test_rerun_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let replica = LocalReplicaStore::new(tmp.path());
        let mut remote = FakeRemote::new(DIR, &[("a.psv", b"a")]);

        let mut engine = SyncEngine::new(&mut remote, &replica, None);
        engine.sync(DIR, None).await.unwrap();
        let second = engine.sync(DIR, None).await.unwrap();

        assert!(second.downloaded.is_empty());
        assert_eq!(second.skipped_existing, 1);
    }

    #[tokio::test]
    async fn test_missing_remote_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let replica = LocalReplicaStore::new(tmp.path());
        let mut remote = FakeRemote::new(DIR, &[]);

        let mut engine = SyncEngine::new(&mut remote, &replica, None);
        let err = engine.sync("/outbound/other", None).await.unwrap_err();
        assert!(matches!(
            err,
            HieError::Connection(RemoteError::DirectoryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_one_bad_file_does_not_abort_the_pass() {
        let tmp = TempDir::new().unwrap();
        let replica = LocalReplicaStore::new(tmp.path());
        let mut remote = FakeRemote::new(DIR, &[("a.psv", b"a"), ("broken.psv", b"x")]);
        remote.fail_reads.insert("broken.psv".to_string());

        let mut engine = SyncEngine::new(&mut remote, &replica, None);
        let outcome = engine.sync(DIR, None).await.unwrap();

        assert_eq!(outcome.downloaded, vec!["a.psv"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].file, "broken.psv");
    }

    #[tokio::test]
    async fn test_filter_restricts_the_listing() {
        let tmp = TempDir::new().unwrap();
        let replica = LocalReplicaStore::new(tmp.path());
        let mut remote = FakeRemote::new(
            DIR,
            &[("roster_20250102.psv", b"a"), ("roster_20250103.psv", b"b")],
        );

        let mut engine = SyncEngine::new(&mut remote, &replica, None);
        let outcome = engine.sync(DIR, Some("20250103")).await.unwrap();
        assert_eq!(outcome.downloaded, vec!["roster_20250103.psv"]);
    }
}
