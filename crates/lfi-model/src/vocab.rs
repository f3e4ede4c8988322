//! Fixed IRIs of the NFI cubes and the cube.link vocabulary.

pub const KEY_DIMENSION: &str = "https://cube.link/KeyDimension";
pub const MEASURE_DIMENSION: &str = "https://cube.link/MeasureDimension";

/// Dimension path of the classification axis.
pub const CLASSIFICATION_UNIT: &str = "https://environment.ld.admin.ch/foen/nfi/classificationUnit";
/// The "Total" member of the classification axis.
pub const CLASSIFICATION_TOTAL: &str =
    "https://environment.ld.admin.ch/foen/nfi/ClassificationUnit/Total";
/// Dimension path of the region axis.
pub const UNIT_OF_REFERENCE: &str = "https://environment.ld.admin.ch/foen/nfi/unitOfReference";
/// Dimension path of the time axis.
pub const INVENTORY: &str = "https://environment.ld.admin.ch/foen/nfi/inventory";

/// Region group that holds the whole country.
pub const COUNTRY_REGION_TYPE: &str = "http://schema.org/Country";
pub const CANTONS_REGION_TYPE: &str = "https://environment.ld.admin.ch/foen/nfi/Cantons";

/// Separator visualize.admin.ch uses between an unversioned cube IRI and a component IRI.
pub const COMPONENT_ID_SEPARATOR: &str = "(VISUALIZE.ADMIN_COMPONENT_ID_SEPARATOR)";

/// Trailing path segment of an IRI (`.../ClassificationUnit/5` -> `5`).
pub fn trailing_segment(iri: &str) -> &str {
    iri.rsplit('/').next().unwrap_or(iri)
}

/// Cube IRI without its version segment (`.../nfi_C-96/cube/2024-1` -> `.../nfi_C-96/cube`).
pub fn unversioned_cube(cube: &str) -> &str {
    match cube.rfind('/') {
        Some(idx) => &cube[..idx],
        None => cube,
    }
}
