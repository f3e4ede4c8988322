use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lfi_engine::store::keys;
use lfi_engine::{CatalogError, MemoryFragment, RecordingControls, RecordingSurface};
use lfi_lindas::{FixtureSource, Query, SparqlSource};
use lfi_model::{Lang, SparqlResults};
use lfi_viewer::{BootError, Viewer, ViewerConfig};
use pretty_assertions::assert_eq;

const CANTON_1: &str = "https://ld.admin.ch/canton/1";

fn sample_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/nfi-sample")
}

/// Fixture source that remembers every query it answered.
#[derive(Clone)]
struct Logged {
    inner: FixtureSource,
    calls: Arc<Mutex<Vec<(Query, Lang)>>>,
}

impl Logged {
    fn new(dir: PathBuf) -> Self {
        Self {
            inner: FixtureSource::new(dir),
            calls: Arc::default(),
        }
    }

    fn calls(&self) -> Vec<(Query, Lang)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SparqlSource for Logged {
    async fn fetch(&self, query: Query, lang: Lang) -> lfi_lindas::Result<SparqlResults> {
        self.calls.lock().unwrap().push((query, lang));
        self.inner.fetch(query, lang).await
    }
}

struct Session {
    viewer: Viewer<MemoryFragment, RecordingSurface, RecordingControls>,
    carrier: MemoryFragment,
    render: RecordingSurface,
}

async fn boot_with(source: Box<dyn SparqlSource>, config: ViewerConfig, fragment: &str) -> Session {
    let carrier = MemoryFragment::new(fragment);
    let render = RecordingSurface::new();
    let viewer = Viewer::boot(
        source,
        &config,
        carrier.clone(),
        render.clone(),
        RecordingControls::new(),
    )
    .await
    .expect("session boots");
    Session {
        viewer,
        carrier,
        render,
    }
}

async fn boot(fragment: &str) -> Session {
    boot_with(
        Box::new(FixtureSource::new(sample_dir())),
        ViewerConfig::default(),
        fragment,
    )
    .await
}

fn persisted(session: &Session, key: &str) -> Option<String> {
    session
        .viewer
        .coordinator()
        .session()
        .state()
        .get(key)
        .map(str::to_owned)
}

#[tokio::test]
async fn fresh_session_renders_once_in_german() {
    let session = boot("").await;

    assert_eq!(session.viewer.lang(), Lang::De);
    assert_eq!(persisted(&session, keys::LANG).as_deref(), Some("de"));
    assert_eq!(session.render.count(), 1);
    assert_eq!(session.carrier.fragment(), session.viewer.coordinator().fragment());
    assert_eq!(
        session.viewer.preview_url(),
        "https://int.visualize.admin.ch/de/preview?flag__debug=true"
    );
    let message = session.render.last().expect("first render");
    assert_eq!(message.target_origin, "https://int.visualize.admin.ch");
}

#[tokio::test]
async fn options_are_fetched_after_catalog_and_regions() {
    let source = Logged::new(sample_dir());
    let _session = boot_with(Box::new(source.clone()), ViewerConfig::default(), "lang=fr").await;

    let calls = source.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2], (Query::PropertiesOptions, Lang::Fr));
    assert!(calls[..2].contains(&(Query::PropertiesForCubes, Lang::Fr)));
    assert!(calls[..2].contains(&(Query::RegionHierarchy, Lang::Fr)));
}

#[tokio::test]
async fn configured_language_wins_over_the_fragment() {
    let config = ViewerConfig {
        lang: Some(Lang::It),
        ..ViewerConfig::default()
    };
    let session = boot_with(
        Box::new(FixtureSource::new(sample_dir())),
        config,
        "lang=fr",
    )
    .await;

    assert_eq!(session.viewer.lang(), Lang::It);
    assert_eq!(persisted(&session, keys::LANG).as_deref(), Some("it"));
}

#[tokio::test]
async fn switching_language_keeps_the_selection() {
    let mut session = boot("").await;
    assert!(session.viewer.coordinator_mut().set_region(CANTON_1));
    let renders = session.render.count();

    assert!(session.viewer.switch_language("fr").await.expect("reboots"));

    assert_eq!(session.viewer.lang(), Lang::Fr);
    assert_eq!(session.viewer.coordinator().lang(), Lang::Fr);
    assert_eq!(persisted(&session, keys::LANG).as_deref(), Some("fr"));
    assert_eq!(persisted(&session, keys::REGION).as_deref(), Some(CANTON_1));
    assert_eq!(session.render.count(), renders + 1);
}

#[tokio::test]
async fn unsupported_language_is_ignored() {
    let mut session = boot("").await;
    let before = session.carrier.fragment();

    assert!(!session.viewer.switch_language("rm").await.expect("no-op"));

    assert_eq!(session.viewer.lang(), Lang::De);
    assert_eq!(session.carrier.fragment(), before);
    assert_eq!(session.render.count(), 1);
}

#[tokio::test]
async fn reset_forgets_the_persisted_selection() {
    let mut session = boot("lang=en").await;
    assert!(session.viewer.coordinator_mut().set_mode("map"));
    assert!(session.viewer.coordinator_mut().set_region(CANTON_1));

    session.viewer.reset().await.expect("reboots");

    assert_eq!(session.viewer.lang(), Lang::En);
    assert_eq!(persisted(&session, keys::MODE).as_deref(), Some("chart"));
    assert_eq!(
        persisted(&session, keys::REGION).as_deref(),
        Some("https://ld.admin.ch/country/CHE")
    );
    assert_eq!(persisted(&session, keys::LANG).as_deref(), Some("en"));
}

#[tokio::test]
async fn missing_fixtures_fail_with_the_localized_message() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Viewer::boot(
        Box::new(FixtureSource::new(dir.path())),
        &ViewerConfig::default(),
        MemoryFragment::default(),
        RecordingSurface::new(),
        RecordingControls::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, BootError::Fetch { .. }), "got {err:?}");
    assert_eq!(
        err.user_message(Lang::En),
        "Something went wrong. Please try again later."
    );
}

#[tokio::test]
async fn empty_region_hierarchy_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    for name in ["properties.json", "options.json"] {
        std::fs::copy(sample_dir().join(name), dir.path().join(name)).expect("copy fixture");
    }
    std::fs::write(
        dir.path().join("regions.json"),
        r#"{"head":{"vars":["value","valueName","type","typeName"]},"results":{"bindings":[]}}"#,
    )
    .expect("write fixture");

    let err = Viewer::boot(
        Box::new(FixtureSource::new(dir.path())),
        &ViewerConfig::default(),
        MemoryFragment::default(),
        RecordingSurface::new(),
        RecordingControls::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, BootError::Catalog(CatalogError::NoRegions)), "got {err:?}");
}
