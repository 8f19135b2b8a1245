//! Object-storage replica store
//!
//! Production backend. Replica paths map directly to object keys under
//! an optional key prefix.

use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

use crate::config::S3ReplicaConfig;
use crate::domain::{ReplicaError, Result};

use super::traits::ReplicaStore;

/// Replica store backed by an object-storage bucket
pub struct S3ReplicaStore {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3ReplicaStore {
    /// Builds a store from configuration, loading AWS credentials from
    /// the ambient environment
    pub async fn new(config: &S3ReplicaConfig) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;
        Self::with_client(Client::new(&shared), config)
    }

    /// Builds a store around an existing client (used by tests)
    pub fn with_client(client: Client, config: &S3ReplicaConfig) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            prefix: config.prefix.trim_matches('/').to_string(),
        }
    }

    fn key(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.prefix, path)
        }
    }
}

#[async_trait]
impl ReplicaStore for S3ReplicaStore {
    async fn list_file_names(&self, dir: &str) -> Result<Vec<String>> {
        let mut key_prefix = self.key(dir);
        if !key_prefix.is_empty() && !key_prefix.ends_with('/') {
            key_prefix.push('/');
        }

        let mut names = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&key_prefix)
            .delimiter("/")
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| ReplicaError::ListFailed {
                path: dir.to_string(),
                message: e.to_string(),
            })?;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    if let Some(name) = key.rsplit('/').next() {
                        if !name.is_empty() {
                            names.push(name.to_string());
                        }
                    }
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let key = self.key(path);
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service) if service.err().is_no_such_key() => {
                    ReplicaError::NotFound(path.to_string())
                }
                _ => ReplicaError::ReadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                },
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| ReplicaError::ReadFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?
            .into_bytes();
        Ok(bytes.to_vec())
    }

    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<()> {
        let key = self.key(path);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(contents.to_vec()))
            .send()
            .await
            .map_err(|e| ReplicaError::WriteFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        debug!(key, bytes = contents.len(), "Wrote replica object");
        Ok(())
    }

    async fn has_file(&self, path: &str) -> Result<bool> {
        let key = self.key(path);
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service)) if service.err().is_not_found() => Ok(false),
            Err(e) => Err(ReplicaError::ReadFailed {
                path: path.to_string(),
                message: e.to_string(),
            }
            .into()),
        }
    }
}
