//! The container wire format.
//!
//! ```text
//! magic(8) · version(1) · salt(16) · nonce(12) · metadata length(2, BE) · metadata · ciphertext‖tag
//! ```
//!
//! Pure data layout: no I/O and no cryptography happen here. The ciphertext
//! region is handed to the AEAD untouched.

use crate::config::{NONCE_SIZE, SALT_SIZE};
use crate::error::Result;

pub mod deserializer;
pub mod metadata;
pub mod serializer;

pub use deserializer::Deserializer;
pub use metadata::Metadata;
pub use serializer::{SerializeParams, Serializer};

/// A decoded container borrowing its variable-length regions from the input.
#[derive(Debug)]
pub struct Container<'a> {
    salt: [u8; SALT_SIZE],
    nonce: [u8; NONCE_SIZE],
    metadata_bytes: &'a [u8],
    metadata: Metadata,
    ciphertext: &'a [u8],
}

impl<'a> Container<'a> {
    /// Encodes a container from its parts.
    ///
    /// # Errors
    ///
    /// Returns `MetadataTooLarge` if the metadata does not fit the two-byte
    /// length prefix.
    pub fn encode(salt: &[u8; SALT_SIZE], nonce: &[u8; NONCE_SIZE], metadata: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        Serializer::serialize(&SerializeParams { salt, nonce, metadata, ciphertext })
    }

    /// Decodes `bytes` without copying the metadata or ciphertext.
    ///
    /// # Errors
    ///
    /// Returns `Format` for short input, a foreign magic tag, an unknown
    /// version, a metadata region past the end of the buffer, or metadata
    /// that is not a UTF-8 JSON object.
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        Deserializer::deserialize(bytes)
    }

    pub const fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }

    pub const fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Raw metadata bytes exactly as stored; these are the associated data.
    pub const fn metadata_bytes(&self) -> &'a [u8] {
        self.metadata_bytes
    }

    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }

    pub const fn ciphertext(&self) -> &'a [u8] {
        self.ciphertext
    }
}
