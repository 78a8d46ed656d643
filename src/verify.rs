//! Password verification against the sentinel container.
//!
//! A password is correct iff the sentinel opens under it and its trimmed
//! plaintext is exactly [`SENTINEL_PLAINTEXT`]. Every failure, whatever its
//! kind, is reported as `false`; callers learn nothing more than that.

use subtle::ConstantTimeEq;
use tracing::debug;

use crate::config::{SENTINEL_NAME, SENTINEL_PLAINTEXT};
use crate::error::Result;
use crate::processor::Processor;
use crate::secret::Password;

/// Checks `password` against the sentinel container bytes.
pub fn verify(sentinel: &[u8], password: &Password) -> bool {
    match Processor::new(password.clone()).decrypt(sentinel) {
        Ok(opened) => is_sentinel(&opened.plaintext),
        Err(e) => {
            debug!("verify failed: {e}");
            false
        }
    }
}

/// [`verify`] on the blocking pool.
pub async fn verify_blocking(sentinel: Vec<u8>, password: &Password) -> bool {
    let password = password.clone();
    tokio::task::spawn_blocking(move || verify(&sentinel, &password)).await.unwrap_or(false)
}

/// Builds the sentinel container for `password`.
///
/// # Errors
///
/// Propagates encryption failures (only the RNG can fail here).
pub fn create_sentinel(password: &Password) -> Result<Vec<u8>> {
    Processor::new(password.clone()).encrypt(SENTINEL_PLAINTEXT.as_bytes(), SENTINEL_NAME)
}

fn is_sentinel(plaintext: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(plaintext) else {
        return false;
    };

    bool::from(text.trim().as_bytes().ct_eq(SENTINEL_PLAINTEXT.as_bytes()))
}
