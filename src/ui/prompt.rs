//! Interactive password input.

use anyhow::{Result, anyhow};
use inquire::{Password as PasswordPrompt, PasswordDisplayMode};

use crate::secret::Password;

/// Asks for the shared password with masked input.
///
/// No confirmation is asked for: a typo simply fails verification.
pub fn password(message: &str) -> Result<Password> {
    PasswordPrompt::new(message)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .map(Password::from_string)
        .map_err(|e| anyhow!("password input failed: {e}"))
}
