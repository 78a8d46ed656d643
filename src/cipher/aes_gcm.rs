use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key as AesKey, Nonce};

use crate::config::NONCE_SIZE;
use crate::error::{Error, Result};
use crate::secret::Key;

pub struct AesGcm {
    inner: Aes256Gcm,
}

impl AesGcm {
    #[inline]
    pub fn new(key: &Key) -> Self {
        Self { inner: Aes256Gcm::new(AesKey::<Aes256Gcm>::from_slice(key.expose_secret())) }
    }

    /// Seals `plaintext` and binds `aad` to the returned ciphertext‖tag.
    #[inline]
    pub fn encrypt(&self, nonce: &[u8; NONCE_SIZE], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        self.inner.encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad }).map_err(|_| Error::Encryption)
    }

    /// Opens ciphertext‖tag. Any tag mismatch is [`Error::Authentication`].
    #[inline]
    pub fn decrypt(&self, nonce: &[u8; NONCE_SIZE], ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        self.inner.decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad }).map_err(|_| Error::Authentication)
    }
}
