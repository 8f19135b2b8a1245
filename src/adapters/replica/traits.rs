//! Replica store abstraction
//!
//! Every file pulled from the partner is persisted to a replica before
//! any parsing happens, so a conversion bug can always be replayed from
//! the stored original. Two backends exist: local disk for development
//! and object storage for production.

use async_trait::async_trait;

use crate::domain::Result;

/// Durable store mirroring the partner's outbound directory
///
/// Paths are relative, `/`-separated, and identical across backends, so
/// a replica written against one backend can be read by the other.
#[async_trait]
pub trait ReplicaStore: Send + Sync {
    /// Lists bare file names directly under a replica directory
    ///
    /// A directory that does not exist yet lists as empty.
    async fn list_file_names(&self, dir: &str) -> Result<Vec<String>>;

    /// Reads one replica entry
    async fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Writes one replica entry, creating parent directories as needed
    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<()>;

    /// True if the entry exists
    async fn has_file(&self, path: &str) -> Result<bool>;
}

/// Maps a remote path to its replica path
///
/// The replica mirrors the remote layout with the leading slash removed,
/// so `/outbound/adt/roster.psv` lands at `outbound/adt/roster.psv`.
pub fn replica_path(remote_path: &str) -> String {
    remote_path.trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replica_path_strips_leading_slash() {
        assert_eq!(replica_path("/outbound/adt/a.psv"), "outbound/adt/a.psv");
        assert_eq!(replica_path("outbound/a.psv"), "outbound/a.psv");
    }
}
