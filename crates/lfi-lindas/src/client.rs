use async_trait::async_trait;
use lfi_model::{Lang, SparqlResults};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::{LindasError, Result};
use crate::limits::read_response_body_with_limit;
use crate::query::Query;
use crate::source::SparqlSource;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// POST-and-parse client for the LINDAS SPARQL endpoint.
#[derive(Debug, Clone)]
pub struct LindasClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl LindasClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(LindasError::Client)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run one SELECT query and decode the JSON results.
    pub async fn select(&self, sparql: &str) -> Result<SparqlResults> {
        let endpoint = self.config.endpoint.as_str();
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("query", sparql)
            .finish();

        let mut response = self
            .http
            .post(endpoint)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .header(CONTENT_TYPE, FORM_URLENCODED)
            .body(body)
            .send()
            .await
            .map_err(|source| self.request_error(source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LindasError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = read_response_body_with_limit(
            &mut response,
            self.config.max_body_bytes,
            "SPARQL results",
        )
        .await
        .map_err(|err| match err {
            LindasError::Request { source, .. } => self.request_error(source),
            other => other,
        })?;
        Ok(SparqlResults::from_slice(&bytes)?)
    }

    fn request_error(&self, source: reqwest::Error) -> LindasError {
        if source.is_timeout() {
            LindasError::Timeout {
                endpoint: self.config.endpoint.clone(),
                seconds: self.config.timeout_secs,
            }
        } else {
            LindasError::Request {
                endpoint: self.config.endpoint.clone(),
                source,
            }
        }
    }
}

#[async_trait]
impl SparqlSource for LindasClient {
    async fn fetch(&self, query: Query, lang: Lang) -> Result<SparqlResults> {
        log::debug!("querying {} for {query} ({lang})", self.config.endpoint);
        let results = self.select(&query.sparql(lang)).await?;
        log::debug!("{query}: {} rows", results.rows().len());
        Ok(results)
    }
}
