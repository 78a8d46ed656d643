//! Common type definitions.
//!
//! - [`Status`]: the consumer's password check state as shown to the user
//! - [`FileOutcome`]: per-file result of a batch encrypt or unlock

use std::path::PathBuf;

use strum::Display;

/// State of a password check, as rendered in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Status {
    #[strum(to_string = "Verifying…")]
    Checking,

    #[strum(to_string = "Correct! Files unlocked.")]
    Correct,

    #[strum(to_string = "Incorrect password. Try again.")]
    Incorrect,

    #[strum(to_string = "Error.")]
    Error,
}

impl Status {
    #[inline]
    pub const fn from_verified(ok: bool) -> Self {
        if ok { Self::Correct } else { Self::Incorrect }
    }

    /// Final state of an unlock that saved `saved` of `total` files.
    #[inline]
    pub const fn from_unlocked(saved: usize, total: usize) -> Self {
        if total == 0 || saved > 0 { Self::Correct } else { Self::Error }
    }
}

/// What happened to one file in a batch.
#[derive(Debug)]
pub enum FileOutcome {
    /// Written to this path.
    Written(PathBuf),

    /// Not processed; the reason is logged.
    Skipped(PathBuf),

    /// Processing failed with this message.
    Failed(PathBuf, String),
}

impl FileOutcome {
    #[inline]
    pub const fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::Checking.to_string(), "Verifying…");
        assert_eq!(Status::from_verified(true), Status::Correct);
        assert_eq!(Status::from_verified(false), Status::Incorrect);
        assert_eq!(Status::Error.to_string(), "Error.");
    }

    #[test]
    fn test_status_from_unlocked() {
        assert_eq!(Status::from_unlocked(0, 0), Status::Correct);
        assert_eq!(Status::from_unlocked(1, 3), Status::Correct);
        assert_eq!(Status::from_unlocked(0, 2), Status::Error);
    }
}
