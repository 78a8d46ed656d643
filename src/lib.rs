//! docgate - password-gated document containers.
//!
//! A producer seals documents into self-describing containers:
//! - PBKDF2-HMAC-SHA256 (250,000 rounds) derives a fresh key per container
//! - AES-256-GCM encrypts the payload with the cleartext metadata as
//!   associated data
//! - a small sentinel container lets a consumer check a password before
//!   fetching anything else

pub mod app;
pub mod cipher;
pub mod config;
pub mod consumer;
pub mod container;
pub mod error;
pub mod manifest;
pub mod processor;
pub mod producer;
pub mod secret;
pub mod source;
pub mod types;
pub mod ui;
pub mod verify;

pub use error::{Error, Result};
