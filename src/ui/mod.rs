//! Terminal output for the command line.
//!
//! - [`display`]: status lines, per-file results and the `inspect` table
//! - [`progress`]: spinner shown while a password is checked
//! - [`prompt`]: masked password input

pub mod display;
pub mod progress;
pub mod prompt;
