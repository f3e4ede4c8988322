use thiserror::Error;

#[derive(Debug, Error)]
pub enum LindasError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {endpoint} timed out after {seconds}s")]
    Timeout { endpoint: String, seconds: u64 },
    #[error("{endpoint} answered {status}")]
    Status { endpoint: String, status: u16 },
    #[error("response body too large for {context} (limit {limit} bytes, {observed})")]
    BodyTooLarge {
        context: String,
        limit: usize,
        observed: String,
    },
    #[error("invalid SPARQL results: {0}")]
    Model(#[from] lfi_model::ModelError),
    #[error("failed to read fixture {path}: {source}")]
    Fixture {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, LindasError>;
