//! Derivation of the renderer document from a selection snapshot.
//!
//! Both derivations are pure: the same [`Selection`] always yields the same document.

use std::collections::BTreeMap;

use lfi_model::palette::{classification_color_mapping, region_color_mapping};
use lfi_model::vocab::{
    unversioned_cube, CLASSIFICATION_TOTAL, CLASSIFICATION_UNIT, COMPONENT_ID_SEPARATOR, INVENTORY,
    UNIT_OF_REFERENCE,
};
use lfi_model::ExplorerSettings;

use crate::coordinator::SelectedFilter;
use crate::document::*;
use crate::mode::{Mode, VisualizationState};
use crate::regions::RegionCatalog;

const CHART_KEY: &str = "zTuhSfYsiB7W";
const MAP_KEY: &str = "jEASF-9qEqaC";
const CONFIGURING_CHART: &str = "CONFIGURING_CHART";

/// Everything a derivation reads, borrowed from the live components.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub settings: &'a ExplorerSettings,
    pub cube: &'a str,
    pub y_axis: &'a str,
    /// Option values of the cube's classification dimension.
    pub classification_values: &'a [String],
    pub filters: &'a BTreeMap<String, SelectedFilter>,
    pub regions: &'a RegionCatalog,
    pub view: &'a VisualizationState,
}

/// Document for the current mode.
pub fn derive_config(selection: &Selection<'_>) -> VisualizeConfig {
    match selection.view.mode() {
        Mode::Chart => derive_chart_config(selection),
        Mode::Map => derive_map_config(selection),
    }
}

/// Column chart over the inventory axis.
pub fn derive_chart_config(selection: &Selection<'_>) -> VisualizeConfig {
    let view = selection.view;
    let mut filters = BTreeMap::new();
    for selected in selection.filters.values() {
        let filter = if selected.dim_path == CLASSIFICATION_UNIT && view.grouped_classification() {
            Filter::multi(
                selection
                    .classification_values
                    .iter()
                    .map(String::as_str)
                    .filter(|v| *v != CLASSIFICATION_TOTAL),
            )
        } else {
            Filter::single(selected.option.value.as_str())
        };
        filters.insert(selected.dim_path.clone(), filter);
    }
    filters.insert(
        UNIT_OF_REFERENCE.to_string(),
        region_filter(selection.regions, view.grouped_region()),
    );

    let mut segment = None;
    if view.grouped_region() {
        segment = Some(region_segment());
    }
    if view.grouped_classification() {
        segment = Some(classification_segment(selection));
    }

    VisualizeConfig {
        version: "4.0.0".to_string(),
        state: CONFIGURING_CHART.to_string(),
        data_source: data_source(selection.settings),
        layout: Layout {
            kind: "tab".to_string(),
            meta: empty_meta(true),
        },
        chart_configs: vec![ChartConfig {
            key: CHART_KEY.to_string(),
            version: "3.2.0".to_string(),
            meta: empty_meta(true),
            cubes: vec![cube_selection(selection.cube, filters)],
            active_field: None,
            chart_type: "column".to_string(),
            interactive_filters_config: interactive_filters(),
            base_layer: None,
            fields: Fields::Chart(ChartFields {
                x: AxisField {
                    component_iri: INVENTORY.to_string(),
                    sorting: Some(Sorting::auto_ascending()),
                },
                y: AxisField {
                    component_iri: selection.y_axis.to_string(),
                    sorting: None,
                },
                segment,
            }),
        }],
        active_chart_key: CHART_KEY.to_string(),
        dashboard_filters: None,
    }
}

/// Choropleth over every region of the selected region type, animated over inventories.
pub fn derive_map_config(selection: &Selection<'_>) -> VisualizeConfig {
    let mut filters = BTreeMap::new();
    filters.insert(
        UNIT_OF_REFERENCE.to_string(),
        region_filter(selection.regions, true),
    );
    for selected in selection.filters.values() {
        filters.insert(
            selected.dim_path.clone(),
            Filter::single(selected.option.value.as_str()),
        );
    }

    VisualizeConfig {
        version: "3.4.0".to_string(),
        state: CONFIGURING_CHART.to_string(),
        data_source: data_source(selection.settings),
        layout: Layout {
            kind: "tab".to_string(),
            meta: empty_meta(false),
        },
        chart_configs: vec![ChartConfig {
            key: MAP_KEY.to_string(),
            version: "3.3.0".to_string(),
            meta: empty_meta(false),
            cubes: vec![cube_selection(selection.cube, filters)],
            active_field: Some("animation".to_string()),
            chart_type: "map".to_string(),
            interactive_filters_config: interactive_filters(),
            base_layer: Some(BaseLayer {
                show: true,
                locked: false,
            }),
            fields: Fields::Map(MapFields {
                area_layer: AreaLayer {
                    component_iri: UNIT_OF_REFERENCE.to_string(),
                    color: AreaColor {
                        kind: "numerical".to_string(),
                        component_iri: selection.y_axis.to_string(),
                        palette: "oranges".to_string(),
                        scale_type: "continuous".to_string(),
                        interpolation_type: "linear".to_string(),
                        opacity: 100,
                    },
                },
                animation: Animation {
                    component_iri: INVENTORY.to_string(),
                    show_play_button: true,
                    duration: 10,
                    kind: "stepped".to_string(),
                    dynamic_scales: false,
                },
            }),
        }],
        active_chart_key: MAP_KEY.to_string(),
        dashboard_filters: Some(DashboardFilters::default()),
    }
}

/// Every region of the selected type (`multi`) or the selected region alone.
fn region_filter(regions: &RegionCatalog, multi: bool) -> Filter {
    if multi {
        Filter::multi(
            regions
                .selected_type_members()
                .iter()
                .map(|r| r.value.as_str()),
        )
    } else {
        Filter::single(regions.selected_region().value.as_str())
    }
}

fn region_segment() -> Segment {
    Segment {
        component_iri: Some(UNIT_OF_REFERENCE.to_string()),
        component_id: None,
        palette: "category10".to_string(),
        sorting: Sorting::auto_ascending(),
        color_mapping: region_color_mapping(),
        kind: "grouped".to_string(),
        use_abbreviations: Some(true),
    }
}

fn classification_segment(selection: &Selection<'_>) -> Segment {
    let component_id = format!(
        "{}{COMPONENT_ID_SEPARATOR}{CLASSIFICATION_UNIT}",
        unversioned_cube(selection.cube)
    );
    Segment {
        component_iri: None,
        component_id: Some(component_id),
        palette: "category10".to_string(),
        sorting: Sorting::auto_ascending(),
        color_mapping: classification_color_mapping(
            selection.classification_values.iter().map(String::as_str),
        ),
        kind: "stacked".to_string(),
        use_abbreviations: None,
    }
}

fn data_source(settings: &ExplorerSettings) -> DataSource {
    DataSource {
        kind: "sparql".to_string(),
        url: settings.data_endpoint.clone(),
    }
}

fn cube_selection(cube: &str, filters: BTreeMap<String, Filter>) -> CubeSelection {
    CubeSelection {
        iri: cube.to_string(),
        publish_iri: cube.to_string(),
        filters,
    }
}

fn empty_meta(with_label: bool) -> Meta {
    Meta {
        title: LocalizedText::default(),
        description: LocalizedText::default(),
        label: with_label.then(LocalizedText::default),
    }
}

fn interactive_filters() -> InteractiveFiltersConfig {
    InteractiveFiltersConfig {
        legend: LegendFilter {
            active: false,
            component_iri: String::new(),
        },
        time_range: TimeRangeFilter {
            active: false,
            component_iri: INVENTORY.to_string(),
            presets: TimeRangePresets {
                kind: "range".to_string(),
                from: String::new(),
                to: String::new(),
            },
        },
        data_filters: DataFilters {
            active: false,
            component_iris: Vec::new(),
        },
        calculation: Calculation {
            active: false,
            kind: "identity".to_string(),
        },
    }
}
