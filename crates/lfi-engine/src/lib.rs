//! Filter/state synchronization engine of the NFI data-cube explorer.
//!
//! The crate is synchronous and I/O free. A host fetches SPARQL rows (see `lfi-lindas`), builds
//! the two catalogs from them and hands everything to a [`FilterCoordinator`]. It exposes:
//! - the persisted state (URL fragment) and the per-session [`Session`] context
//! - the dimension and region catalogs
//! - chart/map mode with the two segmentation toggles
//! - replay of persisted filters in dependency order
//! - derivation of the visualize.admin.ch chart and map documents
//! - the render and control surfaces a host implements

pub mod catalog;
pub mod controls;
pub mod coordinator;
pub mod derive;
pub mod document;
mod error;
pub mod mode;
pub mod regions;
pub mod render;
mod session;
pub mod store;

pub use catalog::{evaluate_cube, DimensionCatalog};
pub use controls::{ControlOption, ControlSpec, ControlSurface, NullControls, RecordingControls};
pub use coordinator::{FilterCoordinator, FilterKey, SelectedFilter, SelectionSnapshot};
pub use derive::{derive_chart_config, derive_config, derive_map_config, Selection};
pub use document::{Filter, VisualizeConfig};
pub use error::{CatalogError, Result};
pub use mode::{Mode, ParseModeError, VisualizationState};
pub use regions::RegionCatalog;
pub use render::{RecordingSurface, RenderMessage, RenderSurface, WatchSurface};
pub use session::Session;
pub use store::{FragmentCarrier, MemoryFragment, PersistedState};
