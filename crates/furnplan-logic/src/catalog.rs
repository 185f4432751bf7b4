//! Furniture catalog: the static schema table keyed by building id.
//!
//! `data/furniture.json` is embedded with `include_str!()` and parsed on
//! demand. Buildings name their furniture set by id, so several buildings can
//! share one set while keeping their own per-group stat vectors.
//! [`Catalog::validate`] reports table problems as audit findings.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::audit::{Finding, Severity};
use crate::error::PlannerError;
use crate::rotation;
use crate::schema::{Building, FurnitureSet, TileLookup};

const BUILTIN_JSON: &str = include_str!("../../../data/furniture.json");

/// Every furniture set and building the planner knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub version: u32,
    pub furniture: BTreeMap<String, FurnitureSet>,
    pub buildings: Vec<Building>,
}

impl Catalog {
    /// The table shipped with the crate.
    pub fn builtin() -> Result<Self, PlannerError> {
        Self::from_json(BUILTIN_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, PlannerError> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| PlannerError::Schema(e.to_string()))?;
        log::info!(
            "loaded furniture catalog v{}: {} sets, {} buildings",
            catalog.version,
            catalog.furniture.len(),
            catalog.buildings.len()
        );
        Ok(catalog)
    }

    pub fn building(&self, id: &str) -> Result<&Building, PlannerError> {
        self.buildings
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| PlannerError::UnknownBuilding(id.to_string()))
    }

    pub fn furniture_for(&self, building: &Building) -> Result<&FurnitureSet, PlannerError> {
        self.furniture
            .get(&building.furniture)
            .ok_or_else(|| PlannerError::MissingFurniture {
                building: building.id.clone(),
                furniture: building.furniture.clone(),
            })
    }

    /// Building and its furniture set in one lookup.
    pub fn resolve(&self, id: &str) -> Result<(&Building, &FurnitureSet), PlannerError> {
        let building = self.building(id)?;
        Ok((building, self.furniture_for(building)?))
    }

    pub fn building_ids(&self) -> impl Iterator<Item = &str> {
        self.buildings.iter().map(|b| b.id.as_str())
    }

    /// Self-check of the table. Errors make a set unusable; warnings flag
    /// data that is tolerated (missing stat entries count as zero).
    pub fn validate(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        for (key, set) in &self.furniture {
            findings.extend(check_set(key, set));
        }

        let mut seen = HashSet::new();
        for b in &self.buildings {
            if !seen.insert(b.id.as_str()) {
                findings.push(error("building", format!("building id '{}' is declared twice", b.id)));
            }
            let Some(set) = self.furniture.get(&b.furniture) else {
                findings.push(error(
                    "building",
                    format!("{} uses undefined furniture '{}'", b.id, b.furniture),
                ));
                continue;
            };
            if b.group_stats.len() > set.groups.len() {
                findings.push(warning(
                    "stats",
                    format!(
                        "{} lists stats for {} groups, furniture '{}' has {}",
                        b.id,
                        b.group_stats.len(),
                        b.furniture,
                        set.groups.len()
                    ),
                ));
            }
            for (g, row) in b.group_stats.iter().enumerate() {
                if row.len() != set.stats.len() {
                    findings.push(warning(
                        "stats",
                        format!(
                            "{} group {} has {} stat values, expected {}",
                            b.id,
                            g,
                            row.len(),
                            set.stats.len()
                        ),
                    ));
                }
            }
        }
        findings
    }
}

fn error(category: &'static str, message: String) -> Finding {
    Finding {
        category,
        severity: Severity::Error,
        message,
    }
}

fn warning(category: &'static str, message: String) -> Finding {
    Finding {
        category,
        severity: Severity::Warning,
        message,
    }
}

fn check_set(key: &str, set: &FurnitureSet) -> Vec<Finding> {
    let mut findings = Vec::new();
    if set.must_be_indoors && set.must_be_outdoors {
        findings.push(warning(
            "furniture",
            format!("'{}' must be both indoors and outdoors", key),
        ));
    }
    if set.groups.len() > u8::MAX as usize + 1 {
        findings.push(error(
            "furniture",
            format!("'{}' has {} groups; plans address at most 256", key, set.groups.len()),
        ));
    }

    for (g, group) in set.groups.iter().enumerate() {
        let label = format!("'{}' {}", key, group.label(g));
        if rotation::legal_rotations(group.rotations).is_empty() {
            findings.push(error(
                "group",
                format!("{}: rotation mode {} is not 0, 1 or 3", label, group.rotations),
            ));
        }
        if let Some(max) = group.max {
            if group.min > max {
                findings.push(error(
                    "group",
                    format!("{}: min {} exceeds max {}", label, group.min, max),
                ));
            }
        }
        if group.items.is_empty() {
            findings.push(error("group", format!("{}: no items", label)));
        }
        if group.items.len() > u8::MAX as usize + 1 {
            findings.push(error(
                "group",
                format!("{}: {} items; plans address at most 256", label, group.items.len()),
            ));
        }

        for (i, item) in group.items.iter().enumerate() {
            if !item.is_rectangular() {
                findings.push(error(
                    "item",
                    format!("{} item {}: tile grid is empty or ragged", label, i),
                ));
            }
            for key in item.tiles.iter().flatten() {
                if set.tile(key.as_deref()) == TileLookup::Missing {
                    findings.push(error(
                        "item",
                        format!(
                            "{} item {}: tile key '{}' is not in the catalog",
                            label,
                            i,
                            key.as_deref().unwrap_or_default()
                        ),
                    ));
                }
            }
            if set.solid_cell_count(item) == 0 && item.is_rectangular() {
                findings.push(warning(
                    "item",
                    format!("{} item {}: footprint is all holes", label, i),
                ));
            }
        }
    }
    findings
}
