//! Container parsing.
//!
//! Reads the fixed header, then the length-prefixed metadata, and leaves
//! whatever follows as ciphertext. Nothing is copied except the fixed-size
//! salt and nonce; metadata and ciphertext are borrowed from the input.
//!
//! # Deserialization Process
//!
//! 1. Check there are at least [`HEADER_SIZE`] bytes
//! 2. Match the magic tag exactly
//! 3. Reject any version other than [`CURRENT_VERSION`]
//! 4. Read salt, nonce and the big-endian metadata length
//! 5. Bound the metadata region by the buffer and parse it

use crate::config::{CURRENT_VERSION, HEADER_SIZE, MAGIC_BYTES, MAGIC_SIZE, METADATA_LENGTH_SIZE, NONCE_SIZE, SALT_SIZE, VERSION_SIZE};
use crate::container::Container;
use crate::container::metadata::Metadata;
use crate::error::{Error, Result};

/// Forward-only reader over the container bytes.
struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8]> {
        let end = self.offset.checked_add(len).filter(|end| *end <= self.bytes.len()).ok_or_else(|| Error::format(format!("truncated {field}")))?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, field: &str) -> Result<[u8; N]> {
        self.take(N, field)?.try_into().map_err(|_| Error::format(format!("truncated {field}")))
    }

    fn rest(self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }
}

pub struct Deserializer;

impl Deserializer {
    pub fn deserialize(bytes: &[u8]) -> Result<Container<'_>> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::format(format!("need at least {HEADER_SIZE} bytes, got {}", bytes.len())));
        }

        let mut cursor = Cursor::new(bytes);

        let magic = cursor.take(MAGIC_SIZE, "magic")?;
        if magic != MAGIC_BYTES {
            return Err(Error::format("bad magic"));
        }

        let version = cursor.take(VERSION_SIZE, "version")?[0];
        if version != CURRENT_VERSION {
            return Err(Error::format(format!("unsupported version {version}")));
        }

        let salt: [u8; SALT_SIZE] = cursor.take_array("salt")?;
        let nonce: [u8; NONCE_SIZE] = cursor.take_array("nonce")?;
        let metadata_length = u16::from_be_bytes(cursor.take_array::<METADATA_LENGTH_SIZE>("metadata length")?);

        let metadata_bytes = cursor.take(usize::from(metadata_length), "metadata")?;
        let metadata = Metadata::from_bytes(metadata_bytes)?;

        Ok(Container { salt, nonce, metadata_bytes, metadata, ciphertext: cursor.rest() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::serializer::{SerializeParams, Serializer};

    fn sample() -> Vec<u8> {
        let metadata = br#"{"name":"a.pdf","mime":"application/pdf","ts":1}"#;
        Serializer::serialize(&SerializeParams { salt: &[1; SALT_SIZE], nonce: &[2; NONCE_SIZE], metadata, ciphertext: b"ciphertext-and-tag" }).unwrap()
    }

    #[test]
    fn test_deserialize() {
        let bytes = sample();
        let container = Deserializer::deserialize(&bytes).unwrap();

        assert_eq!(container.salt(), &[1; SALT_SIZE]);
        assert_eq!(container.nonce(), &[2; NONCE_SIZE]);
        assert_eq!(container.metadata().name(), Some("a.pdf"));
        assert_eq!(container.ciphertext(), b"ciphertext-and-tag");
    }

    #[test]
    fn test_truncated_header() {
        let bytes = sample();
        for len in [0, 1, 8, 9, HEADER_SIZE - 1] {
            assert!(matches!(Deserializer::deserialize(&bytes[..len]), Err(Error::Format(_))), "len {len}");
        }
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = sample();
        bytes[0] ^= 0xFF;
        assert!(matches!(Deserializer::deserialize(&bytes), Err(Error::Format(_))));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = sample();
        bytes[MAGIC_SIZE] = 2;
        assert!(matches!(Deserializer::deserialize(&bytes), Err(Error::Format(_))));
    }

    #[test]
    fn test_metadata_past_end() {
        let mut bytes = sample();
        bytes[37] = 0xFF;
        bytes[38] = 0xFF;
        assert!(matches!(Deserializer::deserialize(&bytes), Err(Error::Format(_))));
    }

    #[test]
    fn test_invalid_metadata() {
        let bytes = Serializer::serialize(&SerializeParams { salt: &[0; SALT_SIZE], nonce: &[0; NONCE_SIZE], metadata: b"not json", ciphertext: b"" }).unwrap();
        assert!(matches!(Deserializer::deserialize(&bytes), Err(Error::Format(_))));
    }

    #[test]
    fn test_empty_ciphertext_region_is_accepted() {
        let bytes = Serializer::serialize(&SerializeParams { salt: &[0; SALT_SIZE], nonce: &[0; NONCE_SIZE], metadata: b"{}", ciphertext: b"" }).unwrap();
        assert!(Deserializer::deserialize(&bytes).unwrap().ciphertext().is_empty());
    }

    #[test]
    fn test_input_untouched() {
        let bytes = sample();
        let copy = bytes.clone();
        let _ = Deserializer::deserialize(&bytes).unwrap();
        assert_eq!(bytes, copy);
    }
}
