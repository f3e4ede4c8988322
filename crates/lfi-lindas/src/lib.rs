//! Remote data source of the NFI data-cube explorer.
//!
//! [`LindasClient`] POSTs the three metadata queries in [`Query`] to the LINDAS SPARQL endpoint
//! with a request timeout and a response size cap. [`FixtureSource`] answers the same queries
//! from recorded JSON files. Both implement [`SparqlSource`].

mod client;
mod config;
mod error;
mod fixture;
pub mod limits;
mod query;
mod source;

pub use client::LindasClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use error::{LindasError, Result};
pub use fixture::FixtureSource;
pub use query::Query;
pub use source::SparqlSource;
