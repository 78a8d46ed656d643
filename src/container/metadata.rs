use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{DEFAULT_MIME, MAX_METADATA_SIZE};
use crate::error::{Error, Result};

/// Cleartext description of the sealed document.
///
/// Stored as a JSON object and bound to the ciphertext as associated data,
/// so it can be read without the password but not altered without breaking
/// authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(default = "default_mime")]
    mime: String,

    /// Milliseconds since the Unix epoch.
    #[serde(default, alias = "timestamp", skip_serializing_if = "Option::is_none")]
    ts: Option<i64>,
}

fn default_mime() -> String {
    DEFAULT_MIME.to_owned()
}

impl Metadata {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, ts: i64) -> Self {
        Self { name: Some(name.into()), mime: mime.into(), ts: Some(ts) }
    }

    /// Metadata for a document sealed now, labelled with the default MIME type.
    pub fn now(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_MIME, chrono::Utc::now().timestamp_millis())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub const fn timestamp(&self) -> Option<i64> {
        self.ts
    }

    /// Serializes to the exact bytes that go on the wire and into the AAD.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let bytes = serde_json::to_vec(self).map_err(|e| Error::format(format!("metadata encoding failed: {e}")))?;
        if bytes.len() > MAX_METADATA_SIZE {
            return Err(Error::MetadataTooLarge(bytes.len()));
        }

        Ok(bytes)
    }

    /// Parses a metadata region. It must be UTF-8 and a JSON object.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|_| Error::format("metadata is not valid UTF-8"))?;
        let value: Value = serde_json::from_str(text).map_err(|e| Error::format(format!("metadata is not valid JSON: {e}")))?;
        if !value.is_object() {
            return Err(Error::format("metadata is not a key-value object"));
        }

        serde_json::from_value(value).map_err(|e| Error::format(format!("metadata has invalid fields: {e}")))
    }
}
