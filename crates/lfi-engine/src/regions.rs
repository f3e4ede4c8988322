use lfi_model::{Binding, ExplorerSettings, Region, RegionGroup};

use crate::error::{CatalogError, Result};
use crate::session::Session;
use crate::store::keys;

/// Region hierarchy grouped by region type, plus the selected region and region type.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    groups: Vec<RegionGroup>,
    selected_region: Region,
    selected_region_type: String,
}

impl RegionCatalog {
    /// Group `?value ?valueName ?type ?typeName` rows by type (first appearance order) and select
    /// the first member of the default region group and the default region type.
    pub fn from_bindings(settings: &ExplorerSettings, rows: &[Binding]) -> Result<Self> {
        let mut groups: Vec<RegionGroup> = Vec::new();
        for row in rows {
            let region = Region::from_binding(row)?;
            match groups
                .iter_mut()
                .find(|g| g.region_type == region.region_type)
            {
                Some(group) => group.regions.push(region),
                None => groups.push(RegionGroup {
                    region_type: region.region_type.clone(),
                    name: region.type_name.clone(),
                    regions: vec![region],
                }),
            }
        }
        if groups.is_empty() {
            return Err(CatalogError::NoRegions);
        }

        let selected_region = groups
            .iter()
            .find(|g| g.region_type == settings.default_region_group)
            .and_then(|g| g.regions.first())
            .cloned()
            .ok_or_else(|| CatalogError::MissingRegionGroup(settings.default_region_group.clone()))?;

        let selected_region_type = if groups
            .iter()
            .any(|g| g.region_type == settings.default_region_type)
        {
            settings.default_region_type.clone()
        } else {
            log::warn!(
                "default region type `{}` not in hierarchy, using `{}`",
                settings.default_region_type,
                groups[0].region_type
            );
            groups[0].region_type.clone()
        };

        Ok(Self {
            groups,
            selected_region,
            selected_region_type,
        })
    }

    pub fn groups(&self) -> &[RegionGroup] {
        &self.groups
    }

    pub fn selected_region(&self) -> &Region {
        &self.selected_region
    }

    pub fn selected_region_type(&self) -> &str {
        &self.selected_region_type
    }

    /// Members of the selected region type.
    pub fn selected_type_members(&self) -> &[Region] {
        self.groups
            .iter()
            .find(|g| g.region_type == self.selected_region_type)
            .map(|g| g.regions.as_slice())
            .unwrap_or_default()
    }

    pub fn set_region(&mut self, session: &mut Session, value: &str) -> bool {
        let found = self
            .groups
            .iter()
            .flat_map(|g| g.regions.iter())
            .find(|r| r.value == value)
            .cloned();
        let Some(region) = found else {
            log::debug!("unknown region `{value}`");
            session.remove(keys::REGION);
            return false;
        };
        self.selected_region = region;
        session.put(keys::REGION, value);
        session.request_render();
        true
    }

    pub fn set_region_type(&mut self, session: &mut Session, region_type: &str) -> bool {
        if !self.groups.iter().any(|g| g.region_type == region_type) {
            log::debug!("unknown region type `{region_type}`");
            session.remove(keys::REGION_TYPE);
            return false;
        }
        self.selected_region_type = region_type.to_string();
        session.put(keys::REGION_TYPE, region_type);
        session.request_render();
        true
    }
}
