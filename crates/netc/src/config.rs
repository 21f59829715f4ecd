//! Client configuration
//!
//! A [`ClientConfig`] describes where a client connects to and how large its
//! reads are. It can be written by hand or loaded from a TOML document:
//!
//! ```toml
//! network = "tcp"
//! address = "127.0.0.1:7000"
//! max_read_bytes = 4096
//! ```
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_MAX_READ_BYTES, Error, Network, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub network: Network,
    pub address: String,
    #[serde(default = "default_max_read_bytes")]
    pub max_read_bytes: i64,
}

fn default_max_read_bytes() -> i64 {
    DEFAULT_MAX_READ_BYTES
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::Unix,
            address: "/tmp/mysocket".to_string(),
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
        }
    }
}

impl ClientConfig {
    /// Parse a configuration from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading client configuration");
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }
}
