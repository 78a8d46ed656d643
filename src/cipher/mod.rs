//! # Cryptographic Operations
//!
//! Key derivation and authenticated encryption for the container format:
//! PBKDF2-HMAC-SHA256 turns the shared password into an AES-256 key, and
//! AES-256-GCM seals the document with the container metadata bound as
//! associated data.
//!
//! Nonces are supplied by the caller rather than generated inside the
//! cipher, because the container stores them in a fixed header slot rather
//! than prefixed to the ciphertext.

mod aes_gcm;
mod derive;

pub use self::aes_gcm::AesGcm;
pub use derive::Derive;
