//! Encrypt and decrypt pipelines.
//!
//! Each call owns its salt, nonce, key and buffers; nothing is shared
//! between calls except the OS random source. The synchronous methods do the
//! work; the `_blocking` variants move it onto tokio's blocking pool so an
//! async caller can run many files at once without stalling the runtime on
//! key derivation.

use tracing::debug;

use crate::cipher::{AesGcm, Derive};
use crate::config::{NONCE_SIZE, SALT_SIZE};
use crate::container::{Container, Metadata};
use crate::error::Result;
use crate::secret::Password;

/// Result of a successful decryption.
#[derive(Debug)]
pub struct Opened {
    pub metadata: Metadata,
    pub plaintext: Vec<u8>,
}

#[derive(Clone)]
pub struct Processor {
    password: Password,
}

impl Processor {
    pub const fn new(password: Password) -> Self {
        Self { password }
    }

    /// Seals `plaintext` into a container recording `filename`.
    ///
    /// # Errors
    ///
    /// `MetadataTooLarge` if the serialized metadata exceeds the length
    /// prefix, `Rng` if the OS random source fails.
    pub fn encrypt(&self, plaintext: &[u8], filename: &str) -> Result<Vec<u8>> {
        self.encrypt_with(plaintext, &Metadata::now(filename))
    }

    /// Seals `plaintext` with caller-supplied metadata.
    pub fn encrypt_with(&self, plaintext: &[u8], metadata: &Metadata) -> Result<Vec<u8>> {
        let metadata_bytes = metadata.to_bytes()?;

        let salt: [u8; SALT_SIZE] = Derive::random_bytes()?;
        let nonce: [u8; NONCE_SIZE] = Derive::random_bytes()?;

        let key = Derive::new(&self.password).derive_key(&salt)?;
        let ciphertext = AesGcm::new(&key).encrypt(&nonce, plaintext, &metadata_bytes)?;
        debug!(name = ?metadata.name(), plaintext = plaintext.len(), metadata = metadata_bytes.len(), "sealed");

        Container::encode(&salt, &nonce, &metadata_bytes, &ciphertext)
    }

    /// Opens a container.
    ///
    /// # Errors
    ///
    /// `Format` from decoding, unchanged. `Authentication` if the tag does
    /// not verify, whether the password is wrong or the bytes were altered.
    pub fn decrypt(&self, bytes: &[u8]) -> Result<Opened> {
        let container = Container::decode(bytes)?;

        let key = Derive::new(&self.password).derive_key(container.salt())?;
        let plaintext = AesGcm::new(&key).decrypt(container.nonce(), container.ciphertext(), container.metadata_bytes())?;
        debug!(name = ?container.metadata().name(), plaintext = plaintext.len(), "opened");

        Ok(Opened { metadata: container.into_metadata(), plaintext })
    }

    pub async fn encrypt_blocking(&self, plaintext: Vec<u8>, filename: String) -> Result<Vec<u8>> {
        let processor = self.clone();
        tokio::task::spawn_blocking(move || processor.encrypt(&plaintext, &filename)).await?
    }

    pub async fn decrypt_blocking(&self, bytes: Vec<u8>) -> Result<Opened> {
        let processor = self.clone();
        tokio::task::spawn_blocking(move || processor.decrypt(&bytes)).await?
    }
}
