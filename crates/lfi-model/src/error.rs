use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("binding is missing column `{column}`")]
    MissingField { column: String },
    #[error("invalid sparql results json: {0}")]
    InvalidResults(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
