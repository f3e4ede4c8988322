use serde::{Deserialize, Serialize};

use crate::{Binding, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub value: String,
    pub value_name: String,
    /// IRI of the region type (group) the region belongs to.
    pub region_type: String,
    pub type_name: String,
}

impl Region {
    /// Build from a `?value ?valueName ?type ?typeName` row.
    pub fn from_binding(row: &Binding) -> Result<Self> {
        Ok(Self {
            value: row.value("value")?.to_string(),
            value_name: row.value("valueName")?.to_string(),
            region_type: row.value("type")?.to_string(),
            type_name: row.value("typeName")?.to_string(),
        })
    }
}

/// Regions sharing a region type, in fetch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionGroup {
    pub region_type: String,
    /// Display name of the group (the `typeName` of its first row).
    pub name: String,
    pub regions: Vec<Region>,
}
