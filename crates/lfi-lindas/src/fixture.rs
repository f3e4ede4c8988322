use std::path::PathBuf;

use async_trait::async_trait;
use lfi_model::{Lang, SparqlResults};

use crate::error::{LindasError, Result};
use crate::query::Query;
use crate::source::SparqlSource;

/// Offline source answering from `<dir>/{properties,options,regions}.json`.
///
/// The files hold recorded SPARQL JSON results; the language is ignored.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, query: Query) -> PathBuf {
        self.dir.join(format!("{}.json", query.name()))
    }
}

#[async_trait]
impl SparqlSource for FixtureSource {
    async fn fetch(&self, query: Query, _lang: Lang) -> Result<SparqlResults> {
        let path = self.path(query);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| LindasError::Fixture {
                path: path.display().to_string(),
                source,
            })?;
        Ok(SparqlResults::from_slice(&bytes)?)
    }
}
