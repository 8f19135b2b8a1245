//! Encrypted feed payload handling
//!
//! Some partners PGP-encrypt their feed files at rest. The decryptor is
//! built once per run from the configured armored private key and
//! applied to each downloaded payload before it reaches the replica, so
//! the replica always holds plaintext.

use pgp::composed::{Deserializable, Message, SignedSecretKey};
use secrecy::ExposeSecret;
use std::io::Cursor;
use tracing::debug;

use crate::config::DecryptionConfig;
use crate::domain::{HieError, Result};

const ARMOR_PREFIX: &[u8] = b"-----BEGIN";

/// File extensions conventionally marking an encrypted payload
const ENCRYPTED_EXTENSIONS: [&str; 3] = [".gpg", ".pgp", ".asc"];

/// Decrypts partner feed payloads with a configured private key
pub struct FeedDecryptor {
    key: SignedSecretKey,
    passphrase: String,
}

impl FeedDecryptor {
    /// Parses the armored private key from configuration
    ///
    /// # Errors
    ///
    /// Returns [`HieError::Configuration`] when the key material does
    /// not parse; a bad key should fail the run before any transfer.
    pub fn new(config: &DecryptionConfig) -> Result<Self> {
        let (key, _headers) =
            SignedSecretKey::from_string(config.private_key.expose_secret().as_ref())
                .map_err(|e| {
                    HieError::Configuration(format!("Decryption key does not parse: {e}"))
                })?;
        Ok(Self {
            key,
            passphrase: config.passphrase.expose_secret().as_ref().to_string(),
        })
    }

    /// True when the file name marks an encrypted payload
    pub fn is_encrypted_name(name: &str) -> bool {
        ENCRYPTED_EXTENSIONS
            .iter()
            .any(|ext| name.to_lowercase().ends_with(ext))
    }

    /// Decrypts one payload, accepting both armored and binary form
    ///
    /// # Errors
    ///
    /// Returns [`HieError::FileProcessing`] scoped to `file`; the caller
    /// skips the file and the run continues.
    pub fn decrypt(&self, file: &str, payload: &[u8]) -> Result<Vec<u8>> {
        let message = if payload.starts_with(ARMOR_PREFIX) {
            Message::from_armor_single(Cursor::new(payload))
                .map(|(message, _headers)| message)
                .map_err(|e| HieError::file_processing(file, format!("bad armor: {e}")))?
        } else {
            Message::from_bytes(Cursor::new(payload))
                .map_err(|e| HieError::file_processing(file, format!("bad payload: {e}")))?
        };

        let (decrypted, _key_ids) = message
            .decrypt(|| self.passphrase.clone(), &[&self.key])
            .map_err(|e| HieError::file_processing(file, format!("decryption failed: {e}")))?;

        let decrypted = decrypted
            .decompress()
            .map_err(|e| HieError::file_processing(file, format!("decompression failed: {e}")))?;

        let content = decrypted
            .get_content()
            .map_err(|e| HieError::file_processing(file, format!("unreadable content: {e}")))?
            .ok_or_else(|| HieError::file_processing(file, "decrypted message is empty"))?;

        debug!(file, bytes = content.len(), "Decrypted feed payload");
        Ok(content)
    }
}
