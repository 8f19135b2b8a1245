//! Remote file client abstraction
//!
//! The partner's file server is reached through this trait so the sync
//! engine and the tests never see the transfer protocol. The production
//! implementation speaks FTP; tests substitute an in-memory fake.

use async_trait::async_trait;

use crate::domain::Result;

/// Session-oriented client for the partner's remote file server
///
/// `connect()` and `disconnect()` are idempotent: connecting an open
/// session or disconnecting a closed one is a no-op. Every other method
/// requires an open session and fails with
/// [`crate::domain::RemoteError::NotConnected`] otherwise.
#[async_trait]
pub trait RemoteFileClient: Send {
    /// Opens the session, authenticating with the configured credentials
    async fn connect(&mut self) -> Result<()>;

    /// Closes the session
    async fn disconnect(&mut self) -> Result<()>;

    /// Lists file names in a remote directory
    ///
    /// Returned names are bare file names, not full paths. When `filter`
    /// is given only names containing the token are returned.
    async fn list(&mut self, path: &str, filter: Option<&str>) -> Result<Vec<String>>;

    /// Reads a remote file into memory, transparently gunzipping
    /// `.gz` payloads
    async fn read(&mut self, path: &str) -> Result<Vec<u8>>;

    /// Writes a remote file
    async fn write(&mut self, path: &str, contents: &[u8]) -> Result<()>;

    /// True if the remote path (file or directory) exists
    async fn exists(&mut self, path: &str) -> Result<bool>;
}
