use lfi_engine::controls::{
    filter_control_id, CLASSIFICATION_CONTROL, REGION_CONTROL, REGION_TYPE_CONTROL, TOPIC_CONTROL,
};
use lfi_engine::store::keys;
use lfi_engine::{
    DimensionCatalog, Filter, FilterCoordinator, MemoryFragment, Mode, PersistedState,
    RecordingControls, RecordingSurface, RegionCatalog, Session,
};
use lfi_model::vocab::{CANTONS_REGION_TYPE, CLASSIFICATION_UNIT, UNIT_OF_REFERENCE};
use lfi_model::{Binding, ExplorerSettings, Lang, SparqlResults};
use pretty_assertions::assert_eq;
use url::form_urlencoded;

const NFI: &str = "https://environment.ld.admin.ch/foen/nfi";
const CHE: &str = "https://ld.admin.ch/country/CHE";

fn cube(name: &str) -> String {
    format!("{NFI}/{name}/cube/2024-1")
}

fn topic(id: u32) -> String {
    format!("{NFI}/Topic/{id}")
}

fn grid() -> String {
    format!("{NFI}/grid")
}

fn rows(json: &str) -> Vec<Binding> {
    SparqlResults::from_slice(json.as_bytes())
        .expect("fixture parses")
        .results
        .bindings
}

fn encode(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

struct Harness {
    coordinator: FilterCoordinator,
    carrier: MemoryFragment,
    render: RecordingSurface,
    controls: RecordingControls,
}

fn boot(fragment: &str) -> Harness {
    let settings = ExplorerSettings::default();
    let mut catalog = DimensionCatalog::from_bindings(
        &settings,
        &rows(include_str!("../../../fixtures/nfi-sample/properties.json")),
    )
    .expect("catalog loads");
    catalog
        .load_options(&rows(include_str!("../../../fixtures/nfi-sample/options.json")))
        .expect("options load");
    let regions = RegionCatalog::from_bindings(
        &settings,
        &rows(include_str!("../../../fixtures/nfi-sample/regions.json")),
    )
    .expect("regions load");

    let carrier = MemoryFragment::new(fragment);
    let render = RecordingSurface::new();
    let controls = RecordingControls::new();
    let mut coordinator = FilterCoordinator::new(
        settings,
        Lang::De,
        Session::new(PersistedState::load(Box::new(carrier.clone()))),
        catalog,
        regions,
        Box::new(render.clone()),
        Box::new(controls.clone()),
    );
    coordinator.initialize();
    Harness {
        coordinator,
        carrier,
        render,
        controls,
    }
}

fn persisted<'a>(harness: &'a Harness, key: &str) -> Option<&'a str> {
    harness.coordinator.session().state().get(key)
}

#[test]
fn fresh_load_fills_every_default() {
    let harness = boot("");

    assert_eq!(persisted(&harness, keys::MODE), Some("chart"));
    assert_eq!(persisted(&harness, keys::GROUPED_CLASSIFICATION), Some("false"));
    assert_eq!(persisted(&harness, keys::GROUPED_REGION), Some("false"));
    assert_eq!(persisted(&harness, keys::MEASURE), Some(topic(44).as_str()));
    assert_eq!(
        persisted(&harness, keys::CLASSIFICATION),
        Some(cube("nfi_C-94").as_str())
    );
    assert_eq!(persisted(&harness, keys::REGION), Some(CHE));
    assert_eq!(persisted(&harness, keys::REGION_TYPE), Some(CANTONS_REGION_TYPE));
    assert_eq!(
        persisted(&harness, CLASSIFICATION_UNIT),
        Some(format!("{NFI}/ClassificationUnit/Total").as_str())
    );
    assert_eq!(persisted(&harness, &grid()), Some(format!("{NFI}/Grid/1").as_str()));

    for key in harness.coordinator.possible_filter_keys() {
        assert!(
            harness.coordinator.session().state().contains(&key),
            "missing default for {key}"
        );
    }
    assert_eq!(harness.render.count(), 1, "boot renders exactly once");
    assert_eq!(harness.carrier.fragment(), harness.coordinator.fragment());
}

#[test]
fn unknown_measure_is_purged_and_nothing_moves() {
    let mut harness = boot("");

    assert!(!harness.coordinator.set_measure("badId"));

    assert_eq!(persisted(&harness, keys::MEASURE), None);
    assert_eq!(harness.coordinator.catalog().cube(), cube("nfi_C-94"));
    assert_eq!(harness.coordinator.catalog().y_axis(), topic(44));
    assert_eq!(harness.render.count(), 1);
}

#[test]
fn incompatible_classification_falls_back_to_first_cube_of_measure() {
    let mut harness = boot("");
    assert!(harness.coordinator.set_classification(&cube("nfi_C-96")));
    assert_eq!(harness.coordinator.catalog().cube(), cube("nfi_C-96"));

    assert!(!harness.coordinator.set_classification(&cube("nfi_C-20")));

    assert_eq!(harness.coordinator.catalog().cube(), cube("nfi_C-94"));
    assert_eq!(
        persisted(&harness, keys::CLASSIFICATION),
        Some(cube("nfi_C-94").as_str())
    );
    assert_eq!(
        harness.controls.current(CLASSIFICATION_CONTROL),
        Some(cube("nfi_C-94"))
    );
}

#[test]
fn chart_region_filter_is_single_without_region_segments() {
    let harness = boot("");
    let config = harness.coordinator.current_config();
    let filters = config.filters().expect("chart has filters");
    assert_eq!(filters[UNIT_OF_REFERENCE], Filter::single(CHE));
}

#[test]
fn map_region_filter_covers_the_selected_region_type() {
    let mut harness = boot("");
    assert!(harness.coordinator.set_mode("map"));

    let expected = Filter::multi(["https://ld.admin.ch/canton/2", "https://ld.admin.ch/canton/1"]);
    for grouped in [false, true, false] {
        harness.coordinator.set_grouped_region(grouped);
        let config = harness.coordinator.current_config();
        assert_eq!(config.filters().expect("filters")[UNIT_OF_REFERENCE], expected);
    }
    assert_eq!(harness.coordinator.view().mode(), Mode::Map);
}

#[test]
fn classification_filter_control_hides_undeterminable_members() {
    let harness = boot("");
    let spec = harness
        .controls
        .spec(&filter_control_id(CLASSIFICATION_UNIT))
        .expect("classification filter control");
    let values: Vec<String> = spec.options.iter().map(|o| o.value.clone()).collect();
    assert_eq!(
        values,
        vec![
            format!("{NFI}/ClassificationUnit/Total"),
            format!("{NFI}/ClassificationUnit/Eigentum/1"),
            format!("{NFI}/ClassificationUnit/Eigentum/2"),
        ]
    );
    assert_eq!(
        spec.selected.as_deref(),
        Some(format!("{NFI}/ClassificationUnit/Total").as_str())
    );
}

#[test]
fn boot_populates_every_control() {
    let harness = boot("");
    let topics = harness.controls.spec(TOPIC_CONTROL).expect("topic control");
    let labels: Vec<&str> = topics.options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Holzvorrat", "Waldfläche"]);
    assert_eq!(topics.label, "Thema");
    assert!(topics.searchable);

    let regions = harness.controls.spec(REGION_CONTROL).expect("region control");
    assert_eq!(regions.options.len(), 5);
    assert_eq!(regions.options[1].group.as_deref(), Some("Kantone"));
    assert!(!regions.disabled);

    let grid_control = harness
        .controls
        .spec(&filter_control_id(&grid()))
        .expect("grid control");
    assert_eq!(grid_control.options.len(), 2);
}

#[test]
fn replay_applies_ad_hoc_filters_after_the_cube_is_chosen() {
    let grid_value = format!("{NFI}/Grid/2");
    let c96 = cube("nfi_C-96");
    let fragment = encode(&[
        (grid().as_str(), grid_value.as_str()),
        (keys::CLASSIFICATION, c96.as_str()),
        (keys::REGION, "https://ld.admin.ch/canton/1"),
        (keys::MODE, "chart"),
    ]);

    let harness = boot(&fragment);

    let state = harness.coordinator.debug_state();
    assert_eq!(state.cube, c96);
    assert_eq!(state.region, "https://ld.admin.ch/canton/1");
    assert_eq!(state.filters[&grid()], grid_value);
    assert_eq!(
        harness.controls.current(&filter_control_id(&grid())),
        Some(grid_value.clone())
    );
    assert_eq!(harness.render.count(), 1);
}

// Covers the view and cube keys; an invalid ad-hoc filter value stays unpersisted.
#[test]
fn hand_edited_fragment_settles_complete() {
    let fragment = encode(&[
        (keys::MODE, "table"),
        (keys::REGION, "nowhere"),
        (keys::MEASURE, "badId"),
    ]);

    let harness = boot(&fragment);

    assert_eq!(persisted(&harness, keys::MODE), Some("chart"));
    assert_eq!(persisted(&harness, keys::REGION), Some(CHE));
    assert_eq!(persisted(&harness, keys::MEASURE), Some(topic(44).as_str()));
    for key in harness.coordinator.possible_filter_keys() {
        assert!(
            harness.coordinator.session().state().contains(&key),
            "missing {key} after replay"
        );
    }
}

#[test]
fn invalid_filter_value_in_fragment_is_not_repersisted() {
    let harness = boot(&encode(&[(grid().as_str(), "nope")]));

    assert_eq!(persisted(&harness, &grid()), None);
    let kept = &harness.coordinator.selected_filters()[&grid()];
    assert_eq!(kept.option.value, format!("{NFI}/Grid/1"));
    let missing: Vec<String> = harness
        .coordinator
        .possible_filter_keys()
        .into_iter()
        .filter(|key| !harness.coordinator.session().state().contains(key))
        .collect();
    assert_eq!(missing, vec![grid()]);
}

#[test]
fn control_visibility_follows_mode_and_grouping() {
    let mut harness = boot("");
    let classification_filter = filter_control_id(CLASSIFICATION_UNIT);
    let visible = |harness: &Harness, id: &str| harness.controls.is_visible(id);

    assert_eq!(visible(&harness, REGION_CONTROL), Some(true));
    assert_eq!(visible(&harness, REGION_TYPE_CONTROL), Some(false));
    assert_eq!(visible(&harness, CLASSIFICATION_CONTROL), Some(true));
    assert_eq!(visible(&harness, &classification_filter), Some(true));

    assert!(harness.coordinator.set_mode("map"));
    assert_eq!(visible(&harness, REGION_CONTROL), Some(false));
    assert_eq!(visible(&harness, REGION_TYPE_CONTROL), Some(true));
    assert_eq!(visible(&harness, CLASSIFICATION_CONTROL), Some(false));

    harness.coordinator.set_grouped_classification(true);
    assert_eq!(harness.coordinator.view().mode(), Mode::Chart);
    assert_eq!(visible(&harness, REGION_CONTROL), Some(true));
    assert_eq!(visible(&harness, REGION_TYPE_CONTROL), Some(false));
    assert_eq!(visible(&harness, CLASSIFICATION_CONTROL), Some(true));
    assert_eq!(visible(&harness, &classification_filter), Some(false));

    harness.coordinator.set_grouped_region(true);
    assert_eq!(visible(&harness, REGION_CONTROL), Some(false));
    assert_eq!(visible(&harness, REGION_TYPE_CONTROL), Some(true));
    assert_eq!(visible(&harness, &classification_filter), Some(true));
}

#[test]
fn replayed_map_mode_reports_region_types() {
    let harness = boot(&encode(&[(keys::MODE, "map")]));

    assert_eq!(harness.controls.is_visible(REGION_CONTROL), Some(false));
    assert_eq!(harness.controls.is_visible(REGION_TYPE_CONTROL), Some(true));
    assert_eq!(harness.controls.is_visible(CLASSIFICATION_CONTROL), Some(false));
}

#[test]
fn reserved_keys_are_never_filters() {
    let mut harness = boot("lang=fr");
    let before = harness.coordinator.fragment();

    assert!(!harness.coordinator.set_selected_filter(keys::LANG, "it"));
    assert!(!harness.coordinator.set_selected_filter(keys::MODE, "map"));

    assert_eq!(harness.coordinator.fragment(), before);
    assert_eq!(persisted(&harness, keys::LANG), Some("fr"));
    assert_eq!(harness.coordinator.view().mode(), Mode::Chart);
}

#[test]
fn stale_filter_key_is_purged_everywhere() {
    let mut harness = boot("");
    assert!(harness.coordinator.set_measure(&topic(10)));
    assert!(harness.coordinator.set_classification(&cube("nfi_C-20")));

    assert!(!harness
        .coordinator
        .set_selected_filter(&grid(), &format!("{NFI}/Grid/2")));

    assert_eq!(persisted(&harness, &grid()), None);
    assert!(!harness.coordinator.selected_filters().contains_key(&grid()));
}

#[test]
fn invalid_value_purges_only_the_persisted_key() {
    let mut harness = boot("");

    assert!(!harness.coordinator.set_selected_filter(&grid(), "nope"));

    assert_eq!(persisted(&harness, &grid()), None);
    let kept = &harness.coordinator.selected_filters()[&grid()];
    assert_eq!(kept.option.value, format!("{NFI}/Grid/1"));
}

#[test]
fn selecting_a_filter_twice_is_idempotent() {
    let mut harness = boot("");
    let value = format!("{NFI}/Grid/2");

    assert!(harness.coordinator.set_selected_filter(&grid(), &value));
    let once = (harness.coordinator.debug_state(), harness.coordinator.fragment());
    assert!(harness.coordinator.set_selected_filter(&grid(), &value));
    let twice = (harness.coordinator.debug_state(), harness.coordinator.fragment());

    assert_eq!(once, twice);
}

#[test]
fn selected_filters_track_the_key_dimensions_of_the_cube() {
    let mut harness = boot("");

    for (measure, classification) in [
        (topic(44), cube("nfi_C-96")),
        (topic(10), cube("nfi_C-20")),
        (topic(10), cube("nfi_C-94")),
    ] {
        harness.coordinator.set_measure(&measure);
        assert!(harness.coordinator.set_classification(&classification));

        let mut expected: Vec<String> = harness
            .coordinator
            .catalog()
            .key_dimensions_for_cube(None)
            .iter()
            .map(|dim| lfi_model::keys::sanitize_filter_key(&dim.dim_path))
            .collect();
        expected.sort();
        let actual: Vec<String> = harness.coordinator.selected_filters().keys().cloned().collect();
        assert_eq!(actual, expected, "filters of {classification}");
    }
    assert_eq!(persisted(&harness, &grid()), Some(format!("{NFI}/Grid/1").as_str()));
}

#[test]
fn segment_toggles_stay_mutually_exclusive() {
    let mut harness = boot("");

    harness.coordinator.set_grouped_region(true);
    assert!(harness.coordinator.set_mode("map"));
    harness.coordinator.set_grouped_classification(true);
    let view = harness.coordinator.view();
    assert_eq!(view.mode(), Mode::Chart);
    assert!(!view.grouped_region());
    assert!(view.grouped_classification());

    harness.coordinator.set_grouped_region(true);
    assert!(!harness.coordinator.view().grouped_classification());

    harness.coordinator.set_grouped_classification(true);
    assert!(harness.coordinator.set_mode("map"));
    assert!(!harness.coordinator.view().grouped_classification());
    assert_eq!(persisted(&harness, keys::GROUPED_CLASSIFICATION), Some("false"));
}

#[test]
fn replayed_fragment_cannot_break_exclusivity() {
    let fragment = encode(&[
        (keys::MODE, "map"),
        (keys::GROUPED_REGION, "true"),
        (keys::GROUPED_CLASSIFICATION, "true"),
    ]);
    let harness = boot(&fragment);

    // grouped-region replays last and wins.
    let view = harness.coordinator.view();
    assert!(view.grouped_region());
    assert!(!view.grouped_classification());
    assert_eq!(view.mode(), Mode::Chart);
    assert_eq!(persisted(&harness, keys::GROUPED_CLASSIFICATION), Some("false"));
}

#[test]
fn one_render_per_user_change() {
    let mut harness = boot("");
    assert_eq!(harness.render.count(), 1);

    harness.coordinator.set_grouped_classification(true);
    assert_eq!(harness.render.count(), 2);

    harness.coordinator.set_measure(&topic(10));
    assert_eq!(harness.render.count(), 3);

    harness.coordinator.set_region("nowhere");
    assert_eq!(harness.render.count(), 3, "rejected change does not render");

    let last = harness.render.last().expect("rendered");
    assert_eq!(last.target_origin, "https://int.visualize.admin.ch");
    assert_eq!(last.document, harness.coordinator.current_config());
}

#[test]
fn apply_dispatches_like_a_user_change() {
    let mut harness = boot("");
    assert!(harness.coordinator.apply(keys::MODE, "map"));
    assert!(harness.coordinator.apply(keys::REGION_TYPE, &format!("{NFI}/ProductionRegions")));
    assert!(harness.coordinator.apply(&grid(), &format!("{NFI}/Grid/2")));
    assert!(!harness.coordinator.apply("unknown", "x"));

    let state = harness.coordinator.debug_state();
    assert_eq!(state.mode, Mode::Map);
    assert_eq!(state.region_type, format!("{NFI}/ProductionRegions"));
    assert_eq!(state.filters[&grid()], format!("{NFI}/Grid/2"));
    assert_eq!(harness.render.count(), 4);
}

#[test]
fn visualize_link_follows_the_cube() {
    let mut harness = boot("");
    harness.coordinator.set_classification(&cube("nfi_C-96"));
    assert_eq!(
        harness.coordinator.visualize_link(),
        format!("https://visualize.admin.ch/create/new?cube={}", cube("nfi_C-96"))
    );
}
