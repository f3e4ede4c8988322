use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lfi_engine::store::keys;
use lfi_engine::{MemoryFragment, NullControls, PersistedState, RecordingSurface};
use lfi_lindas::{FixtureSource, LindasClient, SparqlSource};
use lfi_model::Lang;

use crate::boot::{resolve_lang, Viewer};
use crate::config::ViewerConfig;

type CliViewer = Viewer<MemoryFragment, RecordingSurface, NullControls>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The derived configuration document.
    Json,
    /// The settled persisted fragment.
    Fragment,
    /// One line per selection field.
    Summary,
}

/// Boot one explorer session headlessly, optionally apply filter changes, and print the result.
#[derive(Debug, Parser)]
#[command(
    name = "lfi-viewer",
    about = "Replay an NFI explorer selection and print the settled state."
)]
pub struct Args {
    /// Display language (de, fr, it, en). Anything else falls back to German.
    #[arg(long)]
    pub lang: Option<String>,

    /// Persisted fragment to replay, e.g. `mode=map&grouped-region=true`.
    #[arg(long, default_value = "")]
    pub fragment: String,

    /// SPARQL endpoint to query. Overrides the config file.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Answer the metadata queries from `properties.json`, `options.json` and `regions.json`
    /// in this directory instead of querying LINDAS.
    #[arg(long, value_name = "DIR", conflicts_with = "endpoint")]
    pub fixtures: Option<PathBuf>,

    /// JSON viewer config (`lang`, `client`, `settings`; every field optional).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds. Overrides the config file.
    #[arg(long, value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Filter change applied after boot as if the user made it (repeatable, applied in order).
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

pub async fn run() -> Result<()> {
    let args = Args::parse();
    run_with_args(args).await
}

/// Parse CLI arguments.
pub fn parse_args() -> Args {
    Args::parse()
}

pub async fn run_with_args(args: Args) -> Result<()> {
    let report = render_report(&args).await?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match handle
        .write_all(report.as_bytes())
        .and_then(|()| handle.flush())
    {
        // Downstream consumer exited early (`lfi-viewer ... | head`).
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("failed to write to stdout"),
    }
}

/// Boot the session described by `args` and format the requested output.
pub async fn render_report(args: &Args) -> Result<String> {
    let config = load_config(args)?;
    let source: Box<dyn SparqlSource> = match &args.fixtures {
        Some(dir) => Box::new(FixtureSource::new(dir)),
        None => Box::new(
            LindasClient::new(config.client.clone()).context("failed to build the LINDAS client")?,
        ),
    };

    let carrier = MemoryFragment::new(args.fragment.clone());
    let persisted_lang = PersistedState::load(Box::new(carrier.clone()))
        .get(keys::LANG)
        .map(str::to_owned);
    let fallback_lang = resolve_lang(config.lang, persisted_lang.as_deref());

    let mut viewer: CliViewer = Viewer::boot(
        source,
        &config,
        carrier,
        RecordingSurface::new(),
        NullControls,
    )
    .await
    .map_err(|err| {
        let message = err.user_message(fallback_lang);
        anyhow::Error::new(err).context(message)
    })?;

    for assignment in &args.set {
        let (key, value) = parse_assignment(assignment)?;
        if !viewer.coordinator_mut().apply(key, value) {
            log::warn!("filter change `{key}={value}` was rejected");
        }
    }

    format_report(&viewer, args.format)
}

fn load_config(args: &Args) -> Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(lang) = args.lang.as_deref() {
        config.lang = Some(Lang::parse_or_default(lang));
    }
    if let Some(endpoint) = &args.endpoint {
        config.client.endpoint = endpoint.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.client.timeout_secs = timeout_secs;
    }
    Ok(config)
}

fn parse_assignment(input: &str) -> Result<(&str, &str)> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => anyhow::bail!("invalid --set '{input}' (expected: key=value)"),
    }
}

fn format_report(viewer: &CliViewer, format: OutputFormat) -> Result<String> {
    let coordinator = viewer.coordinator();
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(&coordinator.current_config())
                .context("failed to serialize the configuration document")?;
            out.push('\n');
        }
        OutputFormat::Fragment => {
            writeln!(out, "{}", coordinator.fragment())?;
        }
        OutputFormat::Summary => {
            let state = coordinator.debug_state();
            writeln!(out, "lang: {}", viewer.lang())?;
            writeln!(out, "measure: {}", state.measure)?;
            writeln!(out, "cube: {}", state.cube)?;
            writeln!(
                out,
                "classification: {}",
                state.classification.as_deref().unwrap_or("-")
            )?;
            writeln!(out, "mode: {}", state.mode.as_str())?;
            writeln!(out, "region: {}", state.region)?;
            writeln!(out, "regionType: {}", state.region_type)?;
            writeln!(out, "groupedRegion: {}", state.grouped_region)?;
            writeln!(out, "groupedClassification: {}", state.grouped_classification)?;
            for (key, value) in &state.filters {
                writeln!(out, "filter {key}: {value}")?;
            }
            writeln!(out, "visualize: {}", coordinator.visualize_link())?;
            writeln!(out, "preview: {}", viewer.preview_url())?;
            writeln!(out, "renders: {}", coordinator.render_count())?;
        }
    }
    Ok(out)
}
