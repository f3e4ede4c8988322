use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::limits::DEFAULT_MAX_BODY_BYTES;

/// Cached LINDAS endpoint the explorer queries (the path suffix selects the cache partition).
pub const DEFAULT_ENDPOINT: &str =
    "https://lindas-cached.cluster.ldbar.ch/query/https://environment.ld.admin.ch/foen/nfi/nfi_C-96/cube/2024-1";

/// Settings of [`crate::LindasClient`]. Every field may be omitted in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// SPARQL endpoint receiving the POSTed queries.
    pub endpoint: String,
    /// Whole-request timeout, connect through last body byte.
    pub timeout_secs: u64,
    /// Largest response body accepted.
    pub max_body_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
