use crate::config::{CURRENT_VERSION, HEADER_SIZE, MAGIC_BYTES, NONCE_SIZE, SALT_SIZE};
use crate::error::{Error, Result};

pub struct SerializeParams<'a> {
    pub salt: &'a [u8; SALT_SIZE],

    pub nonce: &'a [u8; NONCE_SIZE],

    pub metadata: &'a [u8],

    pub ciphertext: &'a [u8],
}

pub struct Serializer;

impl Serializer {
    /// Lays out magic · version · salt · nonce · metadata length · metadata · ciphertext.
    ///
    /// No padding and no checksum; integrity comes from the GCM tag at the
    /// end of the ciphertext.
    pub fn serialize(params: &SerializeParams<'_>) -> Result<Vec<u8>> {
        let metadata_length = u16::try_from(params.metadata.len()).map_err(|_| Error::MetadataTooLarge(params.metadata.len()))?;

        let mut result = Vec::with_capacity(HEADER_SIZE + params.metadata.len() + params.ciphertext.len());

        result.extend_from_slice(MAGIC_BYTES);

        result.push(CURRENT_VERSION);

        result.extend_from_slice(params.salt);

        result.extend_from_slice(params.nonce);

        result.extend_from_slice(&metadata_length.to_be_bytes());

        result.extend_from_slice(params.metadata);

        result.extend_from_slice(params.ciphertext);

        Ok(result)
    }
}
