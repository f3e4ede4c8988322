//! Dimension catalog: measures, key dimensions, their options and the current measure/cube.
//!
//! Measure and classification are two axes over the same set of cubes. Picking a measure picks a
//! cube through the default classification priority list; picking a classification picks a cube
//! directly and must then find the measure of that cube with the same name. When the chosen
//! classification does not publish the current measure, the catalog falls back to the first cube
//! that does.

use std::collections::HashSet;

use lfi_model::keys::total_first;
use lfi_model::{Binding, DimOption, DimType, DimensionProperty, ExplorerSettings};

use crate::error::{CatalogError, Result};
use crate::session::Session;
use crate::store::keys;

#[derive(Debug, Clone)]
pub struct DimensionCatalog {
    settings: ExplorerSettings,
    keys: Vec<DimensionProperty>,
    measures: Vec<DimensionProperty>,
    /// Current measure. `cube` and `y_axis` are read from it so they can never drift apart.
    measure: DimensionProperty,
    /// Option values of the current cube's classification dimension, for segmentation.
    classification_values: Vec<String>,
}

/// Pick the candidate whose cube ranks highest in `priorities`, else the first candidate.
pub fn evaluate_cube<'a>(
    candidates: &[&'a DimensionProperty],
    priorities: &[String],
) -> Option<&'a DimensionProperty> {
    let preferred = priorities
        .iter()
        .find_map(|cube| candidates.iter().find(|m| m.cube == *cube));
    match preferred {
        Some(measure) => Some(*measure),
        None => {
            let first = candidates.first().copied();
            if let Some(measure) = first {
                log::warn!(
                    "no default classification cube publishes `{}`, using {}",
                    measure.dim_path,
                    measure.cube
                );
            }
            first
        }
    }
}

impl DimensionCatalog {
    /// Build the catalog from `?cube ?cubeName ?dimName ?dimPath ?dimType` rows and pick the
    /// initial measure from the default topic.
    pub fn from_bindings(settings: &ExplorerSettings, rows: &[Binding]) -> Result<Self> {
        let mut keys = Vec::new();
        let mut measures: Vec<DimensionProperty> = Vec::new();
        for row in rows {
            let property = DimensionProperty::from_binding(row)?;
            match property.dim_type {
                DimType::Key => keys.push(property),
                DimType::Measure => {
                    let duplicate = measures
                        .iter()
                        .any(|m| m.id == property.id && m.cube == property.cube);
                    if !duplicate {
                        measures.push(property);
                    }
                }
                DimType::Other(_) => {}
            }
        }
        keys.sort_by(|a, b| a.dim_path.cmp(&b.dim_path));
        measures.sort_by(|a, b| a.dim_path.cmp(&b.dim_path));

        let mut candidates: Vec<&DimensionProperty> = measures
            .iter()
            .filter(|m| m.dim_path == settings.default_topic)
            .collect();
        if candidates.is_empty() {
            log::warn!(
                "default topic `{}` not in catalog, choosing among all measures",
                settings.default_topic
            );
            candidates = measures.iter().collect();
        }
        let measure = evaluate_cube(&candidates, &settings.default_classifications)
            .cloned()
            .ok_or(CatalogError::NoMeasures)?;

        let mut catalog = Self {
            settings: settings.clone(),
            keys,
            measures,
            measure,
            classification_values: Vec::new(),
        };
        catalog.refresh_classification_values();
        log::info!(
            "catalog loaded: {} key dimensions, {} measures, initial cube {}",
            catalog.keys.len(),
            catalog.measures.len(),
            catalog.cube()
        );
        Ok(catalog)
    }

    /// Attach `?dimPath ?dimName ?value ?valueName` rows to every key dimension with the same
    /// dimension name. "Total" options come first; fetch order is kept otherwise.
    pub fn load_options(&mut self, rows: &[Binding]) -> Result<()> {
        let mut options = rows
            .iter()
            .map(DimOption::from_binding)
            .collect::<lfi_model::Result<Vec<_>>>()?;
        total_first(&mut options);
        for option in options {
            for key in self.keys.iter_mut().filter(|k| k.dim_name == option.dim_name) {
                key.options.push(option.clone());
            }
        }
        self.refresh_classification_values();
        Ok(())
    }

    pub fn keys(&self) -> &[DimensionProperty] {
        &self.keys
    }

    pub fn measures(&self) -> &[DimensionProperty] {
        &self.measures
    }

    pub fn measure(&self) -> &DimensionProperty {
        &self.measure
    }

    pub fn cube(&self) -> &str {
        &self.measure.cube
    }

    pub fn y_axis(&self) -> &str {
        &self.measure.dim_path
    }

    pub fn classification_values(&self) -> &[String] {
        &self.classification_values
    }

    /// Classification dimension of the current cube, if it has one.
    pub fn classification(&self) -> Option<&DimensionProperty> {
        self.keys
            .iter()
            .find(|k| k.cube == self.measure.cube && k.is_classification_unit())
    }

    /// Select the measure with id `id`, preferring the default classification cubes.
    pub fn set_measure(&mut self, session: &mut Session, id: &str) -> bool {
        let candidates: Vec<&DimensionProperty> =
            self.measures.iter().filter(|m| m.id == id).collect();
        let Some(measure) =
            evaluate_cube(&candidates, &self.settings.default_classifications).cloned()
        else {
            log::debug!("unknown measure `{id}`");
            session.remove(keys::MEASURE);
            return false;
        };

        self.measure = measure;
        self.refresh_classification_values();
        session.put(keys::MEASURE, &self.measure.dim_path);
        // Persisted classification follows the cube the measure resolved to.
        session.put(keys::CLASSIFICATION, &self.measure.cube);
        session.request_render();
        true
    }

    /// Select the classification (key dimension id, i.e. cube IRI) `id`.
    ///
    /// Returns `false` when `id` is unknown or when the cube does not publish the current
    /// measure. In the latter case the first cube of [`Self::cubes_for_measure`] is selected
    /// instead.
    pub fn set_classification(&mut self, session: &mut Session, id: &str) -> bool {
        self.select_classification(session, id, true)
    }

    fn select_classification(&mut self, session: &mut Session, id: &str, retry: bool) -> bool {
        let Some(cube) = self.keys.iter().find(|k| k.id == id).map(|k| k.cube.clone()) else {
            log::debug!("unknown classification `{id}`");
            session.remove(keys::CLASSIFICATION);
            return false;
        };

        let parent = self
            .measures
            .iter()
            .find(|m| m.cube == cube && m.dim_name == self.measure.dim_name)
            .cloned();
        let Some(parent) = parent else {
            log::debug!(
                "classification `{cube}` does not publish `{}`",
                self.measure.dim_name
            );
            session.remove(keys::CLASSIFICATION);
            if retry {
                if let Some(fallback) = self.cubes_for_measure().into_iter().next() {
                    if fallback != cube {
                        self.select_classification(session, &fallback, false);
                    }
                }
            }
            return false;
        };

        self.measure = parent;
        self.refresh_classification_values();
        session.put(keys::CLASSIFICATION, &cube);
        session.request_render();
        true
    }

    /// Cubes of every measure sharing the current measure's name, in catalog order.
    pub fn cubes_for_measure(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.measures
            .iter()
            .filter(|m| m.dim_name == self.measure.dim_name)
            .filter(|m| seen.insert(m.cube.as_str()))
            .map(|m| m.cube.clone())
            .collect()
    }

    /// Key dimensions of `cube` (default: the current cube), classification dimension first,
    /// the rest by dimension path.
    pub fn key_dimensions_for_cube(&self, cube: Option<&str>) -> Vec<&DimensionProperty> {
        let cube = cube.unwrap_or(self.measure.cube.as_str());
        let mut dims: Vec<&DimensionProperty> =
            self.keys.iter().filter(|k| k.cube == cube).collect();
        dims.sort_by(|a, b| {
            b.is_classification_unit()
                .cmp(&a.is_classification_unit())
                .then_with(|| a.dim_path.cmp(&b.dim_path))
        });
        dims
    }

    /// Measure dimensions of the current cube.
    pub fn measure_dimensions(&self) -> Vec<&DimensionProperty> {
        self.measures
            .iter()
            .filter(|m| m.cube == self.measure.cube)
            .collect()
    }

    /// Topic choices: one measure per name, without ignored topics, sorted by name.
    pub fn topics(&self) -> Vec<&DimensionProperty> {
        let mut seen = HashSet::new();
        let mut topics: Vec<&DimensionProperty> = self
            .measures
            .iter()
            .filter(|m| !self.settings.topics_to_ignore.contains(&m.dim_path))
            .filter(|m| seen.insert(m.dim_name.as_str()))
            .collect();
        topics.sort_by(|a, b| a.dim_name.cmp(&b.dim_name));
        topics
    }

    /// Classification choices for the current measure, without ignored cubes, sorted by name.
    pub fn classification_choices(&self) -> Vec<&DimensionProperty> {
        let mut choices: Vec<&DimensionProperty> = self
            .cubes_for_measure()
            .iter()
            .flat_map(|cube| self.key_dimensions_for_cube(Some(cube.as_str())))
            .filter(|k| k.is_classification_unit())
            .filter(|k| !self.settings.classifications_to_ignore.contains(&k.cube))
            .collect();
        choices.sort_by(|a, b| a.dim_name.cmp(&b.dim_name));
        choices
    }

    fn refresh_classification_values(&mut self) {
        let values = self
            .key_dimensions_for_cube(None)
            .first()
            .map(|dim| {
                let mut seen = HashSet::new();
                dim.options
                    .iter()
                    .filter(|o| seen.insert(o.value.as_str()))
                    .map(|o| o.value.clone())
                    .collect()
            })
            .unwrap_or_default();
        self.classification_values = values;
    }
}
