//! Colour assignments for segmented charts.

use std::collections::BTreeMap;

/// d3 `category10`, used for region segments.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Chart colours for classification segments, by segment index.
const CLASSIFICATION_RGB: [(u8, u8, u8); 19] = [
    (0, 98, 104),
    (0, 98, 104),
    (152, 39, 41),
    (128, 128, 128),
    (153, 204, 204),
    (51, 102, 204),
    (153, 204, 153),
    (51, 153, 51),
    (255, 153, 153),
    (204, 51, 51),
    (255, 204, 102),
    (255, 102, 0),
    (204, 153, 204),
    (102, 51, 153),
    (0, 153, 102),
    (153, 102, 51),
    (204, 204, 204),
    (102, 102, 102),
    (51, 51, 51),
];

/// Regions that get a fixed colour when the chart is segmented by region, in IRI order.
const SEGMENT_REGIONS: [&str; 51] = [
    "https://ld.admin.ch/canton/1",
    "https://ld.admin.ch/canton/10",
    "https://ld.admin.ch/canton/11",
    "https://ld.admin.ch/canton/14",
    "https://ld.admin.ch/canton/15",
    "https://ld.admin.ch/canton/16",
    "https://ld.admin.ch/canton/17",
    "https://ld.admin.ch/canton/18",
    "https://ld.admin.ch/canton/19",
    "https://ld.admin.ch/canton/2",
    "https://ld.admin.ch/canton/20",
    "https://ld.admin.ch/canton/21",
    "https://ld.admin.ch/canton/22",
    "https://ld.admin.ch/canton/23",
    "https://ld.admin.ch/canton/24",
    "https://ld.admin.ch/canton/25",
    "https://ld.admin.ch/canton/26",
    "https://ld.admin.ch/canton/3",
    "https://ld.admin.ch/canton/4",
    "https://ld.admin.ch/canton/5",
    "https://ld.admin.ch/canton/6",
    "https://ld.admin.ch/canton/7",
    "https://ld.admin.ch/canton/8",
    "https://ld.admin.ch/canton/9",
    "https://ld.admin.ch/country/CHE",
    "https://ld.admin.ch/dimension/bgdi/biota/cantonregions/13",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/1",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/10",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/11",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/12",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/13",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/14",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/2",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/3",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/4",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/5",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/6",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/7",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/8",
    "https://ld.admin.ch/dimension/bgdi/biota/economicregions/9",
    "https://ld.admin.ch/dimension/bgdi/biota/productionregions/1",
    "https://ld.admin.ch/dimension/bgdi/biota/productionregions/2",
    "https://ld.admin.ch/dimension/bgdi/biota/productionregions/3",
    "https://ld.admin.ch/dimension/bgdi/biota/productionregions/4",
    "https://ld.admin.ch/dimension/bgdi/biota/productionregions/5",
    "https://ld.admin.ch/dimension/bgdi/biota/protectionforestregions/1",
    "https://ld.admin.ch/dimension/bgdi/biota/protectionforestregions/2",
    "https://ld.admin.ch/dimension/bgdi/biota/protectionforestregions/3",
    "https://ld.admin.ch/dimension/bgdi/biota/protectionforestregions/4",
    "https://ld.admin.ch/dimension/bgdi/biota/protectionforestregions/5",
    "https://ld.admin.ch/dimension/bgdi/biota/protectionforestregions/6",
];

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Colour of the classification segment at `index`.
///
/// Indices past the end of the palette reuse the first colour and log a warning; the renderer
/// still gets a complete mapping.
pub fn classification_color(index: usize) -> String {
    match CLASSIFICATION_RGB.get(index) {
        Some(rgb) => hex(*rgb),
        None => {
            log::warn!(
                "classification palette exhausted at index {index} (size {}), reusing first colour",
                CLASSIFICATION_RGB.len()
            );
            hex(CLASSIFICATION_RGB[0])
        }
    }
}

/// Value -> colour mapping for classification segments, assigned by position.
pub fn classification_color_mapping<'a>(
    values: impl IntoIterator<Item = &'a str>,
) -> BTreeMap<String, String> {
    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| (value.to_string(), classification_color(idx)))
        .collect()
}

/// Fixed region -> colour mapping for region segments (`category10`, cycled in IRI order).
pub fn region_color_mapping() -> BTreeMap<String, String> {
    SEGMENT_REGIONS
        .iter()
        .enumerate()
        .map(|(idx, iri)| (iri.to_string(), CATEGORY10[idx % CATEGORY10.len()].to_string()))
        .collect()
}
