use std::path::Path;

use lfi_lindas::ClientConfig;
use lfi_model::{ExplorerSettings, Lang};
use serde::{Deserialize, Serialize};

use crate::boot::BootError;

/// Everything a host needs to boot a session. Every field may be omitted in a config file.
///
/// ```json
/// { "lang": "fr", "client": { "timeoutSecs": 10 }, "settings": { "defaultTopic": "..." } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Explicit language; wins over the `lang` key of the fragment.
    pub lang: Option<Lang>,
    pub client: ClientConfig,
    pub settings: ExplorerSettings,
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self, BootError> {
        serde_json::from_str(text).map_err(BootError::Config)
    }

    pub fn from_path(path: &Path) -> Result<Self, BootError> {
        let text = std::fs::read_to_string(path).map_err(|source| BootError::ConfigFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }
}
