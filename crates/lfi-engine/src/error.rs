use lfi_model::ModelError;
use thiserror::Error;

/// Failure to build a catalog from fetched rows. Fatal for the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("malformed row: {0}")]
    Model(#[from] ModelError),
    #[error("catalog contains no measure dimensions")]
    NoMeasures,
    #[error("region hierarchy is empty")]
    NoRegions,
    #[error("region hierarchy has no group `{0}`")]
    MissingRegionGroup(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
