use serde::{Deserialize, Serialize};

use crate::vocab;

const NFI: &str = "https://environment.ld.admin.ch/foen/nfi";

/// Tunables of the explorer that are not derived from fetched data.
///
/// `Default` reproduces the production NFI deployment. Hosts typically load this from a JSON
/// config file where every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExplorerSettings {
    /// Topic (measure dimension path) selected on a fresh session.
    pub default_topic: String,
    /// Cubes tried in order when a topic spans several cubes.
    pub default_classifications: Vec<String>,
    /// Topics never offered in the topic control.
    pub topics_to_ignore: Vec<String>,
    /// Classification cubes never offered in the classification control.
    pub classifications_to_ignore: Vec<String>,
    /// Region group whose first member is the initial region.
    pub default_region_group: String,
    /// Region type selected on a fresh session.
    pub default_region_type: String,
    /// Origin of the embedded visualize.admin.ch renderer (default: the integration instance).
    pub visualize_url: String,
    /// Prefix of the "open on visualize.admin.ch" link; the cube IRI is appended.
    pub visualize_cube_link_start: String,
    /// SPARQL endpoint written into `dataSource.url` of derived documents.
    pub data_endpoint: String,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        let ignored_topics = [
            "47", "47r", "48", "48r", "397", "397r", "19", "19r", "70", "70r", "69", "69r", "72",
            "72r", "49", "49r", "50", "50r", "125", "214", "214r", "215", "215r", "417", "417r",
            "395", "395r", "210", "210r",
        ];
        Self {
            default_topic: format!("{NFI}/Topic/44"),
            default_classifications: ["nfi_C-94", "nfi_C-96", "nfi_C-20", "nfi_C-2632"]
                .iter()
                .map(|c| format!("{NFI}/{c}/cube/2024-1"))
                .collect(),
            topics_to_ignore: ignored_topics
                .iter()
                .map(|t| format!("{NFI}/Topic/{t}"))
                .collect(),
            classifications_to_ignore: vec![format!("{NFI}/nfi_C-2207/cube/2024-1")],
            default_region_group: vocab::COUNTRY_REGION_TYPE.to_string(),
            default_region_type: vocab::CANTONS_REGION_TYPE.to_string(),
            visualize_url: "https://int.visualize.admin.ch".to_string(),
            visualize_cube_link_start: "https://visualize.admin.ch/create/new?cube=".to_string(),
            data_endpoint: "https://lindas-cached.cluster.ldbar.ch/query".to_string(),
        }
    }
}

impl ExplorerSettings {
    /// URL of the renderer preview page for a language.
    pub fn preview_url(&self, lang: &str) -> String {
        format!(
            "{}/{lang}/preview?flag__debug=true",
            self.visualize_url.trim_end_matches('/')
        )
    }

    pub fn cube_link(&self, cube: &str) -> String {
        format!("{}{cube}", self.visualize_cube_link_start)
    }
}
