//! FTP implementation of the remote file client
//!
//! Wraps an async FTP session. The session handle lives in an `Option`
//! so connect/disconnect stay idempotent and a dropped connection is
//! observable as `NotConnected` rather than a hung socket.

use async_trait::async_trait;
use flate2::read::GzDecoder;
use secrecy::ExposeSecret;
use std::io::Read;
use suppaftp::AsyncFtpStream;
use futures_lite::io::AsyncReadExt;
use tracing::{debug, info, warn};

use crate::config::PartnerConfig;
use crate::domain::{RemoteError, Result};

use super::traits::RemoteFileClient;

/// Remote file client speaking FTP to the partner's server
pub struct FtpFeedClient {
    config: PartnerConfig,
    stream: Option<AsyncFtpStream>,
}

impl FtpFeedClient {
    pub fn new(config: PartnerConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    fn stream_mut(&mut self) -> Result<&mut AsyncFtpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| RemoteError::NotConnected.into())
    }
}

#[async_trait]
impl RemoteFileClient for FtpFeedClient {
    async fn connect(&mut self) -> Result<()> {
        if self.stream.is_some() {
            debug!("Remote session already open, skipping connect");
            return Ok(());
        }

        let address = format!("{}:{}", self.config.host, self.config.port);
        info!(host = %self.config.host, port = self.config.port, "Connecting to partner server");

        let mut stream = AsyncFtpStream::connect(&address)
            .await
            .map_err(|e| RemoteError::ConnectionFailed(format!("{address}: {e}")))?;

        stream
            .login(
                self.config.username.as_str(),
                self.config.password.expose_secret().as_ref(),
            )
            .await
            .map_err(|e| RemoteError::AuthenticationFailed(e.to_string()))?;

        self.stream = Some(stream);
        info!("Remote session established");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            // A failed QUIT still tears down our side of the session
            if let Err(e) = stream.quit().await {
                warn!(error = %e, "Remote session did not close cleanly");
            } else {
                debug!("Remote session closed");
            }
        }
        Ok(())
    }

    async fn list(&mut self, path: &str, filter: Option<&str>) -> Result<Vec<String>> {
        let stream = self.stream_mut()?;
        let entries = stream
            .nlst(Some(path))
            .await
            .map_err(|e| RemoteError::ListFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        // NLST may return full paths; reduce to bare file names
        let names = entries
            .into_iter()
            .map(|entry| {
                entry
                    .rsplit('/')
                    .next()
                    .unwrap_or(entry.as_str())
                    .to_string()
            })
            .filter(|name| !name.is_empty() && name != "." && name != "..")
            .filter(|name| filter.map(|token| name.contains(token)).unwrap_or(true))
            .collect();

        Ok(names)
    }

    async fn read(&mut self, path: &str) -> Result<Vec<u8>> {
        let stream = self.stream_mut()?;
        let mut data = stream
            .retr_as_stream(path)
            .await
            .map_err(|e| RemoteError::ReadFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        let mut bytes = Vec::new();
        data.read_to_end(&mut bytes)
            .await
            .map_err(|e| RemoteError::ReadFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        stream
            .finalize_retr_stream(data)
            .await
            .map_err(|e| RemoteError::ReadFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        if path.ends_with(".gz") || bytes.starts_with(&[0x1f, 0x8b]) {
            debug!(path, compressed_bytes = bytes.len(), "Gunzipping remote file");
            let mut decoded = Vec::new();
            GzDecoder::new(bytes.as_slice())
                .read_to_end(&mut decoded)
                .map_err(|e| RemoteError::ReadFailed {
                    path: path.to_string(),
                    message: format!("gzip decode failed: {e}"),
                })?;
            return Ok(decoded);
        }

        Ok(bytes)
    }

    async fn write(&mut self, path: &str, contents: &[u8]) -> Result<()> {
        let stream = self.stream_mut()?;
        let mut reader = contents;
        stream
            .put_file(path, &mut reader)
            .await
            .map_err(|e| RemoteError::WriteFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        debug!(path, bytes = contents.len(), "Wrote remote file");
        Ok(())
    }

    async fn exists(&mut self, path: &str) -> Result<bool> {
        let stream = self.stream_mut()?;
        if stream.size(path).await.is_ok() {
            return Ok(true);
        }
        // SIZE fails on directories, probe with a change-directory instead
        match stream.cwd(path).await {
            Ok(()) => {
                if let Err(e) = stream.cdup().await {
                    warn!(error = %e, "Could not return to parent directory after probe");
                }
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}
