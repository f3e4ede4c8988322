use std::path::{Path, PathBuf};

use clap::Parser;
use lfi_viewer::cli::{render_report, Args};
use serde_json::Value;

fn sample_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/nfi-sample")
}

fn args(extra: &[&str]) -> Args {
    let dir = sample_dir();
    let mut argv = vec!["lfi-viewer", "--fixtures", dir.to_str().expect("utf-8 path")];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).expect("valid arguments")
}

#[tokio::test]
async fn json_output_is_the_chart_document() {
    let report = render_report(&args(&[])).await.expect("report");
    let document: Value = serde_json::from_str(&report).expect("json output");

    assert_eq!(document["chartConfigs"][0]["chartType"], "column");
    assert_eq!(
        document["chartConfigs"][0]["fields"]["y"]["componentIri"],
        "https://environment.ld.admin.ch/foen/nfi/Topic/44"
    );
}

#[tokio::test]
async fn replayed_fragment_selects_the_map() {
    let report = render_report(&args(&["--fragment", "mode=map"]))
        .await
        .expect("report");
    let document: Value = serde_json::from_str(&report).expect("json output");

    assert_eq!(document["chartConfigs"][0]["chartType"], "map");
}

#[tokio::test]
async fn set_applies_user_changes_in_order() {
    let report = render_report(&args(&[
        "--set",
        "mode=map",
        "--set",
        "mode=chart",
        "--set",
        "grouped-region=true",
        "--format",
        "summary",
    ]))
    .await
    .expect("report");

    assert!(report.contains("mode: chart\n"), "{report}");
    assert!(report.contains("groupedRegion: true\n"), "{report}");
    assert!(report.contains("renders: 4\n"), "{report}");
}

#[tokio::test]
async fn fragment_output_persists_the_language() {
    let report = render_report(&args(&["--lang", "fr", "--format", "fragment"]))
        .await
        .expect("report");

    assert!(report.starts_with("lang=fr&"), "{report}");
    assert!(report.contains("mode=chart"), "{report}");
    assert!(report.ends_with('\n'));
}

#[tokio::test]
async fn summary_names_the_preview_page() {
    let report = render_report(&args(&["--lang", "it", "--format", "summary"]))
        .await
        .expect("report");

    assert!(report.starts_with("lang: it\n"), "{report}");
    assert!(
        report.contains("preview: https://int.visualize.admin.ch/it/preview?flag__debug=true\n"),
        "{report}"
    );
    assert!(report.contains("renders: 1\n"), "{report}");
}

#[tokio::test]
async fn config_file_sets_the_language() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("viewer.json");
    std::fs::write(&path, r#"{ "lang": "en" }"#).expect("write config");

    let report = render_report(&args(&[
        "--config",
        path.to_str().expect("utf-8 path"),
        "--format",
        "summary",
    ]))
    .await
    .expect("report");

    assert!(report.starts_with("lang: en\n"), "{report}");
}

#[tokio::test]
async fn malformed_assignment_is_rejected() {
    let err = render_report(&args(&["--set", "mode"])).await.unwrap_err();
    assert!(err.to_string().contains("expected: key=value"), "{err}");
}

#[tokio::test]
async fn boot_failure_leads_with_the_localized_message() {
    let dir = tempfile::tempdir().expect("temp dir");
    let args = Args::try_parse_from([
        "lfi-viewer",
        "--fixtures",
        dir.path().to_str().expect("utf-8 path"),
        "--fragment",
        "lang=fr",
    ])
    .expect("valid arguments");

    let err = render_report(&args).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Une erreur est survenue. Veuillez réessayer plus tard."
    );
    assert!(format!("{err:#}").contains("failed to fetch"), "{err:#}");
}
