//! Replica store selection
//!
//! Picks the backend named by `replica_target` in the configuration and
//! validates that its section is present.

use tracing::info;

use crate::config::{BridgeConfig, ReplicaTarget};
use crate::domain::{HieError, Result};

use super::local::LocalReplicaStore;
use super::s3::S3ReplicaStore;
use super::traits::ReplicaStore;

/// Builds the configured replica store backend
pub async fn create_replica_store(config: &BridgeConfig) -> Result<Box<dyn ReplicaStore>> {
    match config.replica_target {
        ReplicaTarget::Local => {
            let local = config.local_replica.as_ref().ok_or_else(|| {
                HieError::Configuration(
                    "replica_target is 'local' but [local_replica] is missing".to_string(),
                )
            })?;
            info!(root = %local.root, "Using local replica store");
            Ok(Box::new(LocalReplicaStore::new(&local.root)))
        }
        ReplicaTarget::S3 => {
            let s3 = config.s3_replica.as_ref().ok_or_else(|| {
                HieError::Configuration(
                    "replica_target is 's3' but [s3_replica] is missing".to_string(),
                )
            })?;
            info!(bucket = %s3.bucket, prefix = %s3.prefix, "Using object-storage replica store");
            Ok(Box::new(S3ReplicaStore::new(s3).await))
        }
    }
}
