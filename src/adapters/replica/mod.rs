//! Replica storage adapters
//!
//! Two interchangeable backends behind [`traits::ReplicaStore`]:
//! local disk and object storage.

pub mod factory;
pub mod local;
pub mod s3;
pub mod traits;

pub use factory::create_replica_store;
pub use local::LocalReplicaStore;
pub use s3::S3ReplicaStore;
pub use traits::{replica_path, ReplicaStore};
