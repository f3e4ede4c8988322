use serde::{Deserialize, Serialize};

use crate::{vocab, Binding, Result};

/// cube.link dimension kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DimType {
    Key,
    Measure,
    /// Any other `rdf:type` the shape declares; ignored by the catalog.
    Other(String),
}

impl DimType {
    pub fn from_iri(iri: &str) -> Self {
        match iri {
            vocab::KEY_DIMENSION => DimType::Key,
            vocab::MEASURE_DIMENSION => DimType::Measure,
            other => DimType::Other(other.to_string()),
        }
    }
}

/// A selectable member of a key dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimOption {
    /// Path of the dimension the option row was published under.
    pub dim_path: String,
    /// Localized name of that dimension; options are attached to properties by this name.
    pub dim_name: String,
    pub value: String,
    pub value_name: String,
}

impl DimOption {
    /// Build from a `?dimPath ?dimName ?value ?valueName` row.
    pub fn from_binding(row: &Binding) -> Result<Self> {
        Ok(Self {
            dim_path: row.value("dimPath")?.to_string(),
            dim_name: row.value("dimName")?.to_string(),
            value: row.value("value")?.to_string(),
            value_name: row.value("valueName")?.to_string(),
        })
    }

    pub fn is_total(&self) -> bool {
        self.value_name == "Total"
    }
}

/// A key or measure dimension of one cube.
///
/// Key dimensions use their cube IRI as `id` (several key dimensions of a cube share it);
/// measures use their dimension path, so one topic id spans every cube publishing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionProperty {
    pub id: String,
    pub cube: String,
    pub cube_name: String,
    pub dim_name: String,
    pub dim_path: String,
    pub dim_type: DimType,
    #[serde(default)]
    pub options: Vec<DimOption>,
}

impl DimensionProperty {
    /// Build from a `?cube ?cubeName ?dimName ?dimPath ?dimType` row.
    pub fn from_binding(row: &Binding) -> Result<Self> {
        let cube = row.value("cube")?.to_string();
        let dim_path = row.value("dimPath")?.to_string();
        let dim_type = DimType::from_iri(row.value("dimType")?);
        let id = match dim_type {
            DimType::Key => cube.clone(),
            _ => dim_path.clone(),
        };
        Ok(Self {
            id,
            cube,
            cube_name: row.value("cubeName")?.to_string(),
            dim_name: row.value("dimName")?.to_string(),
            dim_path,
            dim_type,
            options: Vec::new(),
        })
    }

    pub fn is_classification_unit(&self) -> bool {
        self.dim_path == vocab::CLASSIFICATION_UNIT
    }

    pub fn option(&self, value: &str) -> Option<&DimOption> {
        self.options.iter().find(|o| o.value == value)
    }
}
