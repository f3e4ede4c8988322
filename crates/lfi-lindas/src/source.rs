use async_trait::async_trait;
use lfi_model::{Lang, SparqlResults};

use crate::error::Result;
use crate::query::Query;

/// Anything that can answer the explorer's metadata queries.
#[async_trait]
pub trait SparqlSource: Send + Sync {
    async fn fetch(&self, query: Query, lang: Lang) -> Result<SparqlResults>;
}
