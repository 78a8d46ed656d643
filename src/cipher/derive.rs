//! # Key Derivation with PBKDF2-HMAC-SHA256
//!
//! Turns the shared password and a per-container salt into an AES-256 key.
//! The iteration count is the only thing standing between a leaked container
//! and a cheap offline guess, so it is fixed high and shared by both
//! pipelines through [`PBKDF2_ITERATIONS`].
//!
//! Keys are never cached: every encrypt, decrypt and verification attempt
//! re-derives from scratch and drops the key when it returns.

use aes_gcm::aead::OsRng;
use aes_gcm::aead::rand_core::RngCore;
use hmac::Hmac;
use sha2::Sha256;

use crate::config::{KEY_SIZE, PBKDF2_ITERATIONS};
use crate::error::{Error, Result};
use crate::secret::{Key, Password};

/// Key derivation bound to one password.
pub struct Derive<'a> {
    password: &'a Password,
}

impl<'a> Derive<'a> {
    pub const fn new(password: &'a Password) -> Self {
        Self { password }
    }

    /// Derives the 256-bit key for `salt`.
    ///
    /// Deterministic: the same password and salt always give the same key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Kdf`] only if the PRF rejects its key, which HMAC
    /// never does.
    pub fn derive_key(&self, salt: &[u8]) -> Result<Key> {
        let mut key = [0u8; KEY_SIZE];
        pbkdf2::pbkdf2::<Hmac<Sha256>>(self.password.expose_secret().as_bytes(), salt, PBKDF2_ITERATIONS, &mut key).map_err(|_| Error::Kdf)?;

        Ok(Key::new(key))
    }

    /// Fills `N` bytes from the operating system CSPRNG.
    ///
    /// Salt and nonce each get their own call; neither is ever computed
    /// from the other.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rng`] if the OS random source is unavailable.
    pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| Error::Rng(e.to_string()))?;

        Ok(bytes)
    }
}
