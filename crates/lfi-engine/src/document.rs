//! Configuration document consumed by the visualize.admin.ch renderer.
//!
//! The schema mirrors the renderer's persisted chart state. Only the parts the explorer fills in
//! are modelled; fields with fixed values are set by the constructors in `derive`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizeConfig {
    pub version: String,
    pub state: String,
    pub data_source: DataSource,
    pub layout: Layout,
    pub chart_configs: Vec<ChartConfig>,
    pub active_chart_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_filters: Option<DashboardFilters>,
}

impl VisualizeConfig {
    /// The single chart config of a derived document.
    pub fn chart(&self) -> Option<&ChartConfig> {
        self.chart_configs.first()
    }

    /// Filters of the first cube of the chart config.
    pub fn filters(&self) -> Option<&BTreeMap<String, Filter>> {
        self.chart()
            .and_then(|chart| chart.cubes.first())
            .map(|cube| &cube.filters)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(rename = "type")]
    pub kind: String,
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub title: LocalizedText,
    pub description: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LocalizedText>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub de: String,
    pub en: String,
    pub fr: String,
    pub it: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub key: String,
    pub version: String,
    pub meta: Meta,
    pub cubes: Vec<CubeSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_field: Option<String>,
    pub chart_type: String,
    pub interactive_filters_config: InteractiveFiltersConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_layer: Option<BaseLayer>,
    pub fields: Fields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeSelection {
    pub iri: String,
    pub publish_iri: String,
    pub filters: BTreeMap<String, Filter>,
}

/// Filter on one dimension, keyed by dimension path in [`CubeSelection::filters`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Filter {
    Single { value: String },
    Multi { values: BTreeMap<String, bool> },
}

impl Filter {
    pub fn single(value: impl Into<String>) -> Self {
        Filter::Single {
            value: value.into(),
        }
    }

    pub fn multi<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        Filter::Multi {
            values: values.into_iter().map(|v| (v.to_string(), true)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveFiltersConfig {
    pub legend: LegendFilter,
    pub time_range: TimeRangeFilter,
    pub data_filters: DataFilters,
    pub calculation: Calculation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendFilter {
    pub active: bool,
    pub component_iri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeFilter {
    pub active: bool,
    pub component_iri: String,
    pub presets: TimeRangePresets,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRangePresets {
    #[serde(rename = "type")]
    pub kind: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFilters {
    pub active: bool,
    pub component_iris: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    pub active: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseLayer {
    pub show: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardFilters {
    pub filters: Vec<serde_json::Value>,
}

/// Encodings of a chart config; the variant follows the chart type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fields {
    Map(MapFields),
    Chart(ChartFields),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartFields {
    pub x: AxisField,
    pub y: AxisField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisField {
    pub component_iri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorting: Option<Sorting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sorting {
    pub sorting_type: String,
    pub sorting_order: String,
}

impl Sorting {
    pub fn auto_ascending() -> Self {
        Self {
            sorting_type: "byAuto".to_string(),
            sorting_order: "asc".to_string(),
        }
    }
}

/// Colour segmentation of a column chart.
///
/// Region segments address the component by IRI, classification segments by the renderer's
/// composite component id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_iri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    pub palette: String,
    pub sorting: Sorting,
    pub color_mapping: BTreeMap<String, String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_abbreviations: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFields {
    pub area_layer: AreaLayer,
    pub animation: Animation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaLayer {
    pub component_iri: String,
    pub color: AreaColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaColor {
    #[serde(rename = "type")]
    pub kind: String,
    pub component_iri: String,
    pub palette: String,
    pub scale_type: String,
    pub interpolation_type: String,
    pub opacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub component_iri: String,
    pub show_play_button: bool,
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub dynamic_scales: bool,
}
