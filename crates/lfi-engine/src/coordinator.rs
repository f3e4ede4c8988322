//! Filter coordinator: owns every component of a session and keeps them, the persisted state and
//! the rendered document in agreement.
//!
//! Each public mutator is a batch. Component setters only *request* a render; when the outermost
//! batch returns, the document is derived and dispatched at most once. Replaying a fragment with
//! twenty keys therefore renders once.
//!
//! Replay order matters: `measure` and `classification` rebuild the ad-hoc filters from defaults,
//! so they run before any other key (see [`PRIORITY_KEYS`](crate::store::PRIORITY_KEYS)).

use std::collections::BTreeMap;

use lfi_model::keys::{classification_filter_order, sanitize_filter_key};
use lfi_model::vocab::CLASSIFICATION_UNIT;
use lfi_model::{DimOption, DimensionProperty, ExplorerSettings, Label, Lang};
use serde::Serialize;

use crate::catalog::DimensionCatalog;
use crate::controls::{
    filter_control_id, ControlOption, ControlSpec, ControlSurface, CLASSIFICATION_CONTROL,
    REGION_CONTROL, REGION_TYPE_CONTROL, TOPIC_CONTROL,
};
use crate::derive::{derive_config, Selection};
use crate::document::VisualizeConfig;
use crate::mode::{parse_boolean, Mode, VisualizationState};
use crate::regions::RegionCatalog;
use crate::render::{RenderMessage, RenderSurface};
use crate::session::Session;
use crate::store::keys;

/// Keys `set_selected_filter` never treats as dimension filters.
const RESERVED_KEYS: [&str; 2] = [keys::LANG, keys::MODE];

/// Chosen option of one ad-hoc key-dimension filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFilter {
    /// Path of the key dimension the filter applies to.
    pub dim_path: String,
    pub option: DimOption,
}

/// Persisted keys, classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Mode,
    GroupedClassification,
    GroupedRegion,
    RegionType,
    Region,
    Measure,
    Classification,
    /// A key-dimension filter (sanitized dimension path), or anything unrecognised.
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Replaying the persisted state.
    Replay,
    /// A single user change.
    User,
}

type Handler = fn(&mut FilterCoordinator, &str, &str) -> bool;

impl FilterKey {
    pub fn parse(key: &str) -> Self {
        match key {
            keys::MODE => FilterKey::Mode,
            keys::GROUPED_CLASSIFICATION => FilterKey::GroupedClassification,
            keys::GROUPED_REGION => FilterKey::GroupedRegion,
            keys::REGION_TYPE => FilterKey::RegionType,
            keys::REGION => FilterKey::Region,
            keys::MEASURE => FilterKey::Measure,
            keys::CLASSIFICATION => FilterKey::Classification,
            other => FilterKey::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterKey::Mode => keys::MODE,
            FilterKey::GroupedClassification => keys::GROUPED_CLASSIFICATION,
            FilterKey::GroupedRegion => keys::GROUPED_REGION,
            FilterKey::RegionType => keys::REGION_TYPE,
            FilterKey::Region => keys::REGION,
            FilterKey::Measure => keys::MEASURE,
            FilterKey::Classification => keys::CLASSIFICATION,
            FilterKey::Other(key) => key,
        }
    }

    fn handler(&self, origin: Origin) -> Handler {
        match (self, origin) {
            (FilterKey::Mode, _) => |c, _, v| c.change_mode(v),
            (FilterKey::GroupedClassification, _) => |c, _, v| {
                c.change_grouped_classification(parse_boolean(v).unwrap_or(false));
                true
            },
            (FilterKey::GroupedRegion, _) => |c, _, v| {
                c.change_grouped_region(parse_boolean(v).unwrap_or(false));
                true
            },
            (FilterKey::RegionType, _) => |c, _, v| c.change_region_type(v),
            (FilterKey::Region, _) => |c, _, v| c.change_region(v),
            (FilterKey::Measure, Origin::Replay) => |c, _, v| c.change_measure(v, true),
            (FilterKey::Measure, Origin::User) => |c, _, v| c.change_measure(v, false),
            (FilterKey::Classification, Origin::Replay) => {
                |c, _, v| c.change_classification(v, true)
            }
            (FilterKey::Classification, Origin::User) => {
                |c, _, v| c.change_classification(v, false)
            }
            (FilterKey::Other(_), _) => |c, k, v| c.select_filter(k, v),
        }
    }
}

/// Diagnostic view of the live selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSnapshot {
    pub measure: String,
    pub cube: String,
    pub y_axis: String,
    pub classification: Option<String>,
    pub region: String,
    pub region_type: String,
    pub mode: Mode,
    pub grouped_region: bool,
    pub grouped_classification: bool,
    /// Filter key -> selected option value.
    pub filters: BTreeMap<String, String>,
}

pub struct FilterCoordinator {
    settings: ExplorerSettings,
    lang: Lang,
    session: Session,
    catalog: DimensionCatalog,
    regions: RegionCatalog,
    view: VisualizationState,
    filters: BTreeMap<String, SelectedFilter>,
    render: Box<dyn RenderSurface>,
    controls: Box<dyn ControlSurface>,
    depth: usize,
    renders: usize,
}

impl std::fmt::Debug for FilterCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCoordinator")
            .field("lang", &self.lang)
            .field("session", &self.session)
            .field("view", &self.view)
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

impl FilterCoordinator {
    pub fn new(
        settings: ExplorerSettings,
        lang: Lang,
        session: Session,
        catalog: DimensionCatalog,
        regions: RegionCatalog,
        render: Box<dyn RenderSurface>,
        controls: Box<dyn ControlSurface>,
    ) -> Self {
        Self {
            settings,
            lang,
            session,
            catalog,
            regions,
            view: VisualizationState::default(),
            filters: BTreeMap::new(),
            render,
            controls,
            depth: 0,
            renders: 0,
        }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Encoded persisted state.
    pub fn fragment(&self) -> String {
        self.session.state().encode()
    }

    pub fn catalog(&self) -> &DimensionCatalog {
        &self.catalog
    }

    pub fn regions(&self) -> &RegionCatalog {
        &self.regions
    }

    pub fn view(&self) -> &VisualizationState {
        &self.view
    }

    pub fn selected_filters(&self) -> &BTreeMap<String, SelectedFilter> {
        &self.filters
    }

    /// Number of documents dispatched so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// "Open on visualize.admin.ch" link for the current cube.
    pub fn visualize_link(&self) -> String {
        self.settings.cube_link(self.catalog.cube())
    }

    pub fn selection(&self) -> Selection<'_> {
        Selection {
            settings: &self.settings,
            cube: self.catalog.cube(),
            y_axis: self.catalog.y_axis(),
            classification_values: self.catalog.classification_values(),
            filters: &self.filters,
            regions: &self.regions,
            view: &self.view,
        }
    }

    /// Document for the current selection.
    pub fn current_config(&self) -> VisualizeConfig {
        derive_config(&self.selection())
    }

    pub fn debug_state(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            measure: self.catalog.measure().id.clone(),
            cube: self.catalog.cube().to_string(),
            y_axis: self.catalog.y_axis().to_string(),
            classification: self.catalog.classification().map(|k| k.id.clone()),
            region: self.regions.selected_region().value.clone(),
            region_type: self.regions.selected_region_type().to_string(),
            mode: self.view.mode(),
            grouped_region: self.view.grouped_region(),
            grouped_classification: self.view.grouped_classification(),
            filters: self
                .filters
                .iter()
                .map(|(k, f)| (k.clone(), f.option.value.clone()))
                .collect(),
        }
    }

    /// Boot sequence after the catalogs are loaded: populate controls, seed filters, replay the
    /// persisted state. Dispatches exactly one document.
    pub fn initialize(&mut self) {
        self.batch(|c| {
            c.populate_controls();
            c.reset_filters();
            c.replay();
            c.sync_visibility();
        });
    }

    pub fn set_measure(&mut self, id: &str) -> bool {
        self.batch(|c| c.change_measure(id, false))
    }

    pub fn set_classification(&mut self, id: &str) -> bool {
        self.batch(|c| c.change_classification(id, false))
    }

    pub fn set_region(&mut self, value: &str) -> bool {
        self.batch(|c| c.change_region(value))
    }

    pub fn set_region_type(&mut self, region_type: &str) -> bool {
        self.batch(|c| c.change_region_type(region_type))
    }

    /// Switch between `chart` and `map`. Map mode turns classification segments off.
    pub fn set_mode(&mut self, mode: &str) -> bool {
        self.batch(|c| c.change_mode(mode))
    }

    /// Classification segments force chart mode and turn region segments off.
    pub fn set_grouped_classification(&mut self, on: bool) {
        self.batch(|c| c.change_grouped_classification(on));
    }

    /// Region segments turn classification segments off.
    pub fn set_grouped_region(&mut self, on: bool) {
        self.batch(|c| c.change_grouped_region(on));
    }

    /// Select `value` for the key-dimension filter `key`.
    ///
    /// Fails without side effects for reserved keys. A key that is not a filter of the current
    /// cube is purged from the persisted state and the selection. A value that is not an option
    /// of the filter is purged from the persisted state only; the previous in-memory choice
    /// stays.
    pub fn set_selected_filter(&mut self, key: &str, value: &str) -> bool {
        self.batch(|c| c.select_filter(key, value))
    }

    /// Apply one persisted-style `key=value` change as if the user made it.
    pub fn apply(&mut self, key: &str, value: &str) -> bool {
        let tag = FilterKey::parse(key);
        let handler = tag.handler(Origin::User);
        self.batch(|c| handler(c, tag.as_str(), value))
    }

    /// Drop every tracked filter from the persisted state and reseed all filters of the current
    /// cube with their first option, then fill persisted defaults.
    pub fn reset_selected_filters(&mut self) {
        self.batch(|c| c.reset_filters());
    }

    /// Persist a default for every possible key that has no persisted value.
    pub fn fill_default_filters(&mut self) {
        self.batch(|c| c.fill_defaults());
    }

    /// Fill defaults, then replay every persisted pair in priority order.
    pub fn apply_filters_from_url(&mut self) {
        self.batch(|c| c.replay());
    }

    /// Keys the persisted state holds once defaults are filled.
    pub fn possible_filter_keys(&self) -> Vec<String> {
        let mut out: Vec<String> = [
            keys::MODE,
            keys::GROUPED_CLASSIFICATION,
            keys::GROUPED_REGION,
            keys::REGION_TYPE,
            keys::REGION,
            keys::MEASURE,
            keys::CLASSIFICATION,
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();
        out.extend(
            self.catalog
                .key_dimensions_for_cube(None)
                .iter()
                .map(|dim| sanitize_filter_key(&dim.dim_path)),
        );
        out
    }

    fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        if self.depth == 0 && self.session.take_render_request() {
            self.dispatch();
        }
        out
    }

    fn dispatch(&mut self) {
        let message = RenderMessage {
            target_origin: self.settings.visualize_url.clone(),
            document: self.current_config(),
        };
        self.renders += 1;
        log::debug!(
            "render #{} ({} mode, cube {})",
            self.renders,
            self.view.mode(),
            self.catalog.cube()
        );
        self.render.render(message);
    }

    fn replay(&mut self) {
        self.fill_defaults();
        for (key, value) in self.session.state().sorted() {
            let tag = FilterKey::parse(&key);
            let applied = (tag.handler(Origin::Replay))(self, &key, &value);
            log::debug!("replay {key}={value}: {}", if applied { "applied" } else { "rejected" });
        }
        self.session.request_render();
    }

    fn reset_filters(&mut self) {
        let tracked: Vec<String> = self.filters.keys().cloned().collect();
        for key in &tracked {
            self.session.remove(key);
        }
        self.filters.clear();
        for dim in self.catalog.key_dimensions_for_cube(None) {
            let Some(first) = dim.options.first() else {
                log::warn!("key dimension `{}` has no options", dim.dim_path);
                continue;
            };
            self.filters.insert(
                sanitize_filter_key(&dim.dim_path),
                SelectedFilter {
                    dim_path: dim.dim_path.clone(),
                    option: first.clone(),
                },
            );
        }
        self.fill_defaults();
        self.populate_filter_controls();
    }

    fn fill_defaults(&mut self) {
        let mut defaults: Vec<(String, String)> = vec![
            (keys::MODE.into(), Mode::Chart.as_str().into()),
            (keys::GROUPED_CLASSIFICATION.into(), "false".into()),
            (keys::GROUPED_REGION.into(), "false".into()),
            (
                keys::REGION_TYPE.into(),
                self.regions.selected_region_type().into(),
            ),
            (
                keys::REGION.into(),
                self.regions.selected_region().value.clone(),
            ),
            (keys::MEASURE.into(), self.catalog.y_axis().into()),
            (keys::CLASSIFICATION.into(), self.catalog.cube().into()),
        ];
        for dim in self.catalog.key_dimensions_for_cube(None) {
            if let Some(first) = dim.options.first() {
                defaults.push((sanitize_filter_key(&dim.dim_path), first.value.clone()));
            }
        }
        for (key, value) in defaults {
            if !self.session.state().contains(&key) {
                self.session.put(&key, &value);
            }
        }
    }

    fn change_mode(&mut self, value: &str) -> bool {
        if value.parse::<Mode>() == Ok(Mode::Map) {
            self.view
                .set_grouped_classification(&mut self.session, Some(false));
        }
        let ok = self.view.set_mode(&mut self.session, value);
        self.sync_visibility();
        ok
    }

    fn change_grouped_classification(&mut self, on: bool) {
        if on {
            self.view.set_grouped_region(&mut self.session, Some(false));
            self.view.set_mode(&mut self.session, Mode::Chart.as_str());
        }
        self.view
            .set_grouped_classification(&mut self.session, Some(on));
        self.sync_visibility();
    }

    fn change_grouped_region(&mut self, on: bool) {
        if on {
            self.view
                .set_grouped_classification(&mut self.session, Some(false));
        }
        self.view.set_grouped_region(&mut self.session, Some(on));
        self.sync_visibility();
    }

    /// Region types replace the region control when regions are segmented or in map mode. A
    /// segmented classification has no single value to filter on.
    fn sync_visibility(&mut self) {
        let region_types = self.view.display_region_types();
        self.controls.set_visible(REGION_CONTROL, !region_types);
        self.controls.set_visible(REGION_TYPE_CONTROL, region_types);
        self.controls.set_visible(
            CLASSIFICATION_CONTROL,
            self.view.display_classification_types(),
        );
        self.controls.set_visible(
            &filter_control_id(&sanitize_filter_key(CLASSIFICATION_UNIT)),
            !self.view.grouped_classification(),
        );
    }

    fn change_region(&mut self, value: &str) -> bool {
        let ok = self.regions.set_region(&mut self.session, value);
        if ok {
            self.controls.select(REGION_CONTROL, value);
        }
        ok
    }

    fn change_region_type(&mut self, region_type: &str) -> bool {
        let ok = self.regions.set_region_type(&mut self.session, region_type);
        if ok {
            self.controls.select(REGION_TYPE_CONTROL, region_type);
        }
        ok
    }

    /// Replays always rebuild the filters; user changes only when the cube moved.
    fn change_measure(&mut self, id: &str, replaying: bool) -> bool {
        let before = self.catalog.cube().to_string();
        let ok = self.catalog.set_measure(&mut self.session, id);
        if ok {
            self.controls.select(TOPIC_CONTROL, id);
            self.populate_classification_control();
        }
        if replaying || self.catalog.cube() != before {
            self.reset_filters();
        }
        ok
    }

    fn change_classification(&mut self, id: &str, replaying: bool) -> bool {
        let before = self.catalog.cube().to_string();
        let ok = self.catalog.set_classification(&mut self.session, id);
        let cube = self.catalog.cube().to_string();
        // A rejected classification may still have moved to the fallback cube.
        if ok || cube != before {
            self.controls.select(CLASSIFICATION_CONTROL, &cube);
        }
        if replaying || cube != before {
            self.reset_filters();
        }
        ok
    }

    fn select_filter(&mut self, key: &str, value: &str) -> bool {
        if RESERVED_KEYS.contains(&key) {
            return false;
        }
        let property = self
            .catalog
            .key_dimensions_for_cube(None)
            .into_iter()
            .find(|dim| sanitize_filter_key(&dim.dim_path) == key)
            .cloned();
        let Some(property) = property else {
            log::debug!("`{key}` is not a filter of {}", self.catalog.cube());
            self.session.remove(key);
            self.filters.remove(key);
            return false;
        };
        let Some(option) = property.option(value).cloned() else {
            log::debug!("`{value}` is not an option of `{key}`");
            self.session.remove(key);
            return false;
        };

        self.filters.insert(
            key.to_string(),
            SelectedFilter {
                dim_path: property.dim_path,
                option,
            },
        );
        self.session.put(key, value);
        self.controls.select(&filter_control_id(key), value);
        self.session.request_render();
        true
    }

    /// Describe every control to the control surface.
    pub fn populate_controls(&mut self) {
        let topics = ControlSpec::new(
            TOPIC_CONTROL,
            Label::Topic.text(self.lang),
            self.catalog
                .topics()
                .into_iter()
                .map(|m| option(&m.id, &m.dim_name))
                .collect(),
        )
        .searchable()
        .with_selected(self.catalog.measure().id.clone());
        self.controls.populate(topics);

        self.populate_classification_control();
        self.populate_filter_controls();
        self.populate_region_controls();
        self.sync_visibility();
    }

    fn populate_classification_control(&mut self) {
        let spec = ControlSpec::new(
            CLASSIFICATION_CONTROL,
            Label::Classification.text(self.lang),
            self.catalog
                .classification_choices()
                .into_iter()
                .map(|k| option(&k.id, &k.dim_name))
                .collect(),
        )
        .searchable()
        .with_selected(self.catalog.cube().to_string());
        self.controls.populate(spec);
    }

    fn populate_filter_controls(&mut self) {
        let specs: Vec<ControlSpec> = self
            .catalog
            .key_dimensions_for_cube(None)
            .into_iter()
            .map(|dim| self.filter_control(dim))
            .collect();
        for spec in specs {
            self.controls.populate(spec);
        }
    }

    fn filter_control(&self, dim: &DimensionProperty) -> ControlSpec {
        let key = sanitize_filter_key(&dim.dim_path);
        let options: Vec<&DimOption> = if dim.is_classification_unit() {
            classification_filter_order(&dim.options)
        } else {
            dim.options.iter().collect()
        };
        let spec = ControlSpec::new(
            filter_control_id(&key),
            dim.dim_name.clone(),
            options
                .into_iter()
                .map(|o| option(&o.value, &o.value_name))
                .collect(),
        );
        match self.filters.get(&key) {
            Some(selected) => spec.with_selected(selected.option.value.clone()),
            None => spec,
        }
    }

    fn populate_region_controls(&mut self) {
        let groups = self.regions.groups();
        let mut regions = ControlSpec::new(
            REGION_CONTROL,
            Label::Region.text(self.lang),
            groups
                .iter()
                .flat_map(|g| {
                    g.regions.iter().map(|r| ControlOption {
                        value: r.value.clone(),
                        label: r.value_name.clone(),
                        group: Some(g.name.clone()),
                    })
                })
                .collect(),
        )
        .searchable()
        .with_selected(self.regions.selected_region().value.clone());
        regions.disabled = groups.len() <= 1;

        let region_types = ControlSpec::new(
            REGION_TYPE_CONTROL,
            Label::RegionType.text(self.lang),
            groups
                .iter()
                .map(|g| option(&g.region_type, &g.name))
                .collect(),
        )
        .with_selected(self.regions.selected_region_type().to_string());

        self.controls.populate(regions);
        self.controls.populate(region_types);
    }
}

fn option(value: &str, label: &str) -> ControlOption {
    ControlOption {
        value: value.to_string(),
        label: label.to_string(),
        group: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_classify_into_tags() {
        assert_eq!(FilterKey::parse("regionType"), FilterKey::RegionType);
        assert_eq!(
            FilterKey::parse("https://x/grid"),
            FilterKey::Other("https://x/grid".to_string())
        );
        for key in crate::store::PRIORITY_KEYS {
            assert_eq!(FilterKey::parse(key).as_str(), key);
        }
    }
}
