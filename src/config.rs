//! Global Configuration Constants
//!
//! Every width, tag and work factor of the container format lives here and
//! only here. The encrypt and decrypt paths both read these values, so a
//! container written by one build is readable by any other build that agrees
//! on this file.
//!
//! ## Compatibility
//!
//! Changing any of the format constants (magic, version, field widths,
//! iteration count) invalidates every container already written.

/// Application name used in user interfaces.
pub const APP_NAME: &str = "docgate";

/// File extension appended to every encrypted container.
pub const FILE_EXTENSION: &str = ".enc";

// === Container Layout ===

/// Magic tag at offset 0 of every container.
pub const MAGIC_BYTES: &[u8; MAGIC_SIZE] = b"JSPDFENC";

/// Width of the magic tag.
pub const MAGIC_SIZE: usize = 8;

/// Current (and only) container format version.
pub const CURRENT_VERSION: u8 = 0x01;

/// Width of the version byte.
pub const VERSION_SIZE: usize = 1;

/// Length of the PBKDF2 salt stored in each container.
pub const SALT_SIZE: usize = 16;

/// Length of the AES-GCM nonce stored in each container.
///
/// 96 bits is the nonce size AES-GCM is specified for. A (key, nonce) pair
/// must never repeat.
pub const NONCE_SIZE: usize = 12;

/// Width of the big-endian metadata length prefix.
pub const METADATA_LENGTH_SIZE: usize = 2;

/// Largest metadata block the two-byte length prefix can describe.
pub const MAX_METADATA_SIZE: usize = u16::MAX as usize;

/// Fixed header: magic · version · salt · nonce · metadata length.
pub const HEADER_SIZE: usize = MAGIC_SIZE + VERSION_SIZE + SALT_SIZE + NONCE_SIZE + METADATA_LENGTH_SIZE;

/// Length of the GCM authentication tag appended to the ciphertext.
pub const TAG_SIZE: usize = 16;

// === Key Derivation ===

/// PBKDF2-HMAC-SHA256 iteration count.
///
/// This is a format constant, not a tuning knob: encrypt and decrypt must
/// agree on it or every container becomes unreadable.
pub const PBKDF2_ITERATIONS: u32 = 250_000;

/// Size of the derived AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

// === Metadata ===

/// Content-type label written by the producer and assumed when absent.
pub const DEFAULT_MIME: &str = "application/pdf";

// === Password Verification ===

/// Expected plaintext of the sentinel container after trimming.
pub const SENTINEL_PLAINTEXT: &str = "OK";

/// Original filename recorded in the sentinel container's metadata.
pub const SENTINEL_NAME: &str = "check.txt";

/// Name under which the sentinel container is distributed.
pub const SENTINEL_FILE: &str = "check.txt.enc";

/// Name of the manifest listing the protected containers.
pub const MANIFEST_FILE: &str = "manifest.json";

// === Environment ===

/// Environment variable consulted when no password argument is given.
pub const PASSWORD_ENV: &str = "DOCGATE_PASSWORD";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size() {
        assert_eq!(HEADER_SIZE, 39);
    }

    #[test]
    fn test_magic_is_ascii() {
        assert!(MAGIC_BYTES.is_ascii());
        assert_eq!(MAGIC_BYTES.len(), MAGIC_SIZE);
    }
}
