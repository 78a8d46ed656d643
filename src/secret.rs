use secrecy::{ExposeSecret, SecretBox, SecretString};

use crate::config::KEY_SIZE;

/// A derived AES-256 key. Zeroized when dropped.
pub struct Key {
    inner: SecretBox<[u8; KEY_SIZE]>,
}

impl Key {
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self { inner: SecretBox::new(Box::new(key)) }
    }

    pub fn expose_secret(&self) -> &[u8; KEY_SIZE] {
        self.inner.expose_secret()
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Key([REDACTED])")
    }
}

/// The shared password, kept out of logs and zeroized on drop.
pub struct Password {
    inner: SecretString,
}

impl Password {
    pub fn new(password: &str) -> Self {
        Self { inner: SecretString::from(password.to_owned()) }
    }

    pub fn from_string(password: String) -> Self {
        Self { inner: SecretString::from(password) }
    }

    pub fn expose_secret(&self) -> &str {
        self.inner.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }
}

impl Clone for Password {
    fn clone(&self) -> Self {
        Self::new(self.expose_secret())
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts() {
        let password = Password::new("letmein");
        let key = Key::new([7u8; KEY_SIZE]);

        assert!(!format!("{password:?}").contains("letmein"));
        assert!(!format!("{key:?}").contains('7'));
    }

    #[test]
    fn test_expose() {
        let password = Password::from_string("hunter2".to_owned());
        assert_eq!(password.expose_secret(), "hunter2");
        assert!(!password.is_empty());
        assert!(Password::new("").is_empty());
    }
}
