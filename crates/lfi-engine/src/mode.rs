use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::Session;
use crate::store::keys;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Chart,
    Map,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Chart => "chart",
            Mode::Map => "map",
        }
    }
}

/// A persisted mode that is neither `chart` nor `map`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode `{0}` (expected: chart|map)")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chart" => Ok(Mode::Chart),
            "map" => Ok(Mode::Map),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted booleans are the literals `true`/`false`; anything else is "unset".
pub fn parse_boolean(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Chart/map mode and the two segmentation toggles.
///
/// The toggles are independent here. Keeping them mutually exclusive, and forcing chart mode for
/// classification segments, is the coordinator's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualizationState {
    mode: Mode,
    grouped_region: bool,
    grouped_classification: bool,
}

impl VisualizationState {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn grouped_region(&self) -> bool {
        self.grouped_region
    }

    pub fn grouped_classification(&self) -> bool {
        self.grouped_classification
    }

    /// Whether the region-type control is shown instead of the region control.
    pub fn display_region_types(&self) -> bool {
        self.grouped_region || self.mode == Mode::Map
    }

    /// Whether the classification control is shown.
    pub fn display_classification_types(&self) -> bool {
        self.grouped_classification || self.mode != Mode::Map
    }

    /// Set the mode from its persisted spelling. Unknown values purge the persisted key and
    /// leave the mode unchanged.
    pub fn set_mode(&mut self, session: &mut Session, value: &str) -> bool {
        let mode = match value.parse::<Mode>() {
            Ok(mode) => mode,
            Err(err) => {
                log::debug!("{err}");
                session.remove(keys::MODE);
                return false;
            }
        };
        self.mode = mode;
        session.put(keys::MODE, mode.as_str());
        session.request_render();
        true
    }

    /// `None` (an unparsable persisted value) counts as `false`.
    pub fn set_grouped_classification(&mut self, session: &mut Session, value: Option<bool>) {
        self.grouped_classification = value.unwrap_or(false);
        session.put(
            keys::GROUPED_CLASSIFICATION,
            bool_str(self.grouped_classification),
        );
        session.request_render();
    }

    /// `None` (an unparsable persisted value) counts as `false`.
    pub fn set_grouped_region(&mut self, session: &mut Session, value: Option<bool>) {
        self.grouped_region = value.unwrap_or(false);
        session.put(keys::GROUPED_REGION, bool_str(self.grouped_region));
        session.request_render();
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
