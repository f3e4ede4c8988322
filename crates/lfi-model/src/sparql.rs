//! SPARQL 1.1 JSON results (`application/sparql-results+json`).
//!
//! Only the parts the explorer reads are modelled: each row ("binding") maps a column name to an
//! RDF term carrying a lexical `value`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ModelError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<ResultHead>,
    pub results: ResultSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// A single RDF term as it appears in a result row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdfTerm {
    /// `uri`, `literal`, `bnode`, ...
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub value: String,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

/// One result row: column name -> term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Binding(BTreeMap<String, RdfTerm>);

impl SparqlResults {
    pub fn from_rows(bindings: Vec<Binding>) -> Self {
        Self {
            head: None,
            results: ResultSet { bindings },
        }
    }

    /// Decode a response body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ModelError::InvalidResults(e.to_string()))
    }

    pub fn rows(&self) -> &[Binding] {
        &self.results.bindings
    }
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by fixtures and tests.
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.0.insert(
            column.to_string(),
            RdfTerm {
                kind: Some("literal".to_string()),
                value: value.to_string(),
                lang: None,
                datatype: None,
            },
        );
        self
    }

    pub fn get(&self, column: &str) -> Option<&RdfTerm> {
        self.0.get(column)
    }

    /// Lexical value of a required column.
    pub fn value(&self, column: &str) -> Result<&str> {
        self.0
            .get(column)
            .map(|term| term.value.as_str())
            .ok_or_else(|| ModelError::MissingField {
                column: column.to_string(),
            })
    }
}
