use serde::{Deserialize, Serialize};

use crate::config::SENTINEL_FILE;
use crate::error::{Error, Result};

/// The list of containers a consumer offers, published next to them as
/// `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_sentinel")]
    pub sentinel: String,

    #[serde(default)]
    pub files: Vec<String>,
}

fn default_sentinel() -> String {
    SENTINEL_FILE.to_owned()
}

impl Manifest {
    pub fn new(files: Vec<String>) -> Self {
        Self { sentinel: default_sentinel(), files }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::format(format!("invalid manifest: {e}")))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| Error::format(format!("manifest encoding failed: {e}")))
    }
}
