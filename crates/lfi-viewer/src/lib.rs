//! Host side of the NFI data-cube explorer.
//!
//! [`Viewer::boot`] fetches the three metadata queries from a [`lfi_lindas::SparqlSource`],
//! builds the catalogs, replays the persisted fragment and dispatches the first render. The
//! `lfi-viewer` binary drives one such session from the command line.

mod boot;
pub mod cli;
mod config;

pub use boot::{resolve_lang, BootError, Viewer};
pub use config::ViewerConfig;
