//! Session bootstrap: fetch the metadata, build the catalogs and settle the first render.

use lfi_engine::store::keys;
use lfi_engine::{
    CatalogError, ControlSurface, DimensionCatalog, FilterCoordinator, FragmentCarrier,
    PersistedState, RegionCatalog, RenderSurface, Session,
};
use lfi_lindas::{LindasError, Query, SparqlSource};
use lfi_model::{ExplorerSettings, Label, Lang, SparqlResults};
use thiserror::Error;

use crate::config::ViewerConfig;

/// Anything that stops a session from starting. The user only ever sees
/// [`BootError::user_message`].
#[derive(Debug, Error)]
pub enum BootError {
    #[error("failed to fetch {query}: {source}")]
    Fetch {
        query: Query,
        #[source]
        source: LindasError,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("invalid viewer config: {0}")]
    Config(#[source] serde_json::Error),
    #[error("failed to read viewer config {path}: {source}")]
    ConfigFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl BootError {
    pub fn user_message(&self, lang: Lang) -> &'static str {
        Label::Error.text(lang)
    }
}

/// Explicit language, else the persisted one, else German.
pub fn resolve_lang(explicit: Option<Lang>, persisted: Option<&str>) -> Lang {
    explicit
        .or_else(|| persisted.map(Lang::parse_or_default))
        .unwrap_or_default()
}

/// A running explorer session bound to one fragment carrier and one pair of UI surfaces.
///
/// The carrier and surfaces are cloned into every (re)initialized coordinator, so they must
/// share state across clones the way [`lfi_engine::MemoryFragment`] and the recording surfaces do.
pub struct Viewer<C, R, K> {
    source: Box<dyn SparqlSource>,
    settings: ExplorerSettings,
    lang: Lang,
    carrier: C,
    render: R,
    controls: K,
    coordinator: FilterCoordinator,
}

impl<C, R, K> std::fmt::Debug for Viewer<C, R, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("lang", &self.lang)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

impl<C, R, K> Viewer<C, R, K>
where
    C: FragmentCarrier + Clone + 'static,
    R: RenderSurface + Clone + 'static,
    K: ControlSurface + Clone + 'static,
{
    pub async fn boot(
        source: Box<dyn SparqlSource>,
        config: &ViewerConfig,
        carrier: C,
        render: R,
        controls: K,
    ) -> Result<Self, BootError> {
        let state = PersistedState::load(Box::new(carrier.clone()));
        let lang = resolve_lang(config.lang, state.get(keys::LANG));
        let coordinator = start(
            source.as_ref(),
            &config.settings,
            lang,
            state,
            Box::new(render.clone()),
            Box::new(controls.clone()),
        )
        .await?;

        Ok(Self {
            source,
            settings: config.settings.clone(),
            lang,
            carrier,
            render,
            controls,
            coordinator,
        })
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn coordinator(&self) -> &FilterCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut FilterCoordinator {
        &mut self.coordinator
    }

    /// Page the renderer frame loads for the current language.
    pub fn preview_url(&self) -> String {
        self.settings.preview_url(self.lang.code())
    }

    /// Re-initialize everything in `code`, keeping the persisted selection.
    ///
    /// Returns `Ok(false)` without touching the session when `code` is not a supported language.
    pub async fn switch_language(&mut self, code: &str) -> Result<bool, BootError> {
        let Ok(lang) = code.parse::<Lang>() else {
            log::debug!("ignoring unsupported language `{code}`");
            return Ok(false);
        };
        self.restart(lang).await?;
        Ok(true)
    }

    /// Forget the persisted selection and start over in the current language.
    pub async fn reset(&mut self) -> Result<(), BootError> {
        self.carrier.write("");
        self.restart(self.lang).await
    }

    async fn restart(&mut self, lang: Lang) -> Result<(), BootError> {
        let state = PersistedState::load(Box::new(self.carrier.clone()));
        self.coordinator = start(
            self.source.as_ref(),
            &self.settings,
            lang,
            state,
            Box::new(self.render.clone()),
            Box::new(self.controls.clone()),
        )
        .await?;
        self.lang = lang;
        Ok(())
    }
}

async fn start(
    source: &dyn SparqlSource,
    settings: &ExplorerSettings,
    lang: Lang,
    state: PersistedState,
    render: Box<dyn RenderSurface>,
    controls: Box<dyn ControlSurface>,
) -> Result<FilterCoordinator, BootError> {
    let mut session = Session::new(state);
    session.put(keys::LANG, lang.code());
    log::info!("starting explorer session in `{lang}`");

    let (properties, hierarchy) = tokio::try_join!(
        fetch(source, Query::PropertiesForCubes, lang),
        fetch(source, Query::RegionHierarchy, lang),
    )?;
    let options = fetch(source, Query::PropertiesOptions, lang).await?;

    let mut catalog = DimensionCatalog::from_bindings(settings, properties.rows())?;
    catalog.load_options(options.rows())?;
    let regions = RegionCatalog::from_bindings(settings, hierarchy.rows())?;
    log::info!(
        "catalog loaded: {} measures, {} key dimensions, {} region groups",
        catalog.measures().len(),
        catalog.keys().len(),
        regions.groups().len()
    );

    let mut coordinator = FilterCoordinator::new(
        settings.clone(),
        lang,
        session,
        catalog,
        regions,
        render,
        controls,
    );
    coordinator.initialize();
    log::info!("session settled at `{}`", coordinator.fragment());
    Ok(coordinator)
}

async fn fetch(
    source: &dyn SparqlSource,
    query: Query,
    lang: Lang,
) -> Result<SparqlResults, BootError> {
    source
        .fetch(query, lang)
        .await
        .map_err(|source| BootError::Fetch { query, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_language_wins() {
        assert_eq!(resolve_lang(Some(Lang::It), Some("fr")), Lang::It);
        assert_eq!(resolve_lang(None, Some("fr")), Lang::Fr);
        assert_eq!(resolve_lang(None, None), Lang::De);
    }

    #[test]
    fn unsupported_persisted_language_falls_back_to_german() {
        assert_eq!(resolve_lang(None, Some("rm")), Lang::De);
    }

    #[test]
    fn every_failure_shows_the_localized_message() {
        let err = BootError::Catalog(CatalogError::NoRegions);
        assert_eq!(
            err.user_message(Lang::Fr),
            "Une erreur est survenue. Veuillez réessayer plus tard."
        );
        assert_eq!(err.to_string(), "region hierarchy is empty");
    }
}
