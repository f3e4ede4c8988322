//! `lfi-model` defines the data shared by the NFI data-cube explorer crates.
//!
//! The crate is I/O free so it can be reused by:
//! - the synchronization engine (`lfi-engine`)
//! - the LINDAS SPARQL client (`lfi-lindas`)
//! - hosts that load fixtures from disk
//!
//! It covers the SPARQL JSON result schema, the dimension/option/region records built from
//! result rows, the fixed NFI vocabulary, explorer settings, filter-key sanitization and option
//! ordering, colour palettes and the small label table used by hosts.

mod dimension;
mod error;
pub mod i18n;
pub mod keys;
pub mod palette;
mod region;
mod settings;
pub mod sparql;
pub mod vocab;

pub use dimension::{DimOption, DimType, DimensionProperty};
pub use error::{ModelError, Result};
pub use i18n::{Label, Lang};
pub use region::{Region, RegionGroup};
pub use settings::ExplorerSettings;
pub use sparql::{Binding, RdfTerm, SparqlResults};
