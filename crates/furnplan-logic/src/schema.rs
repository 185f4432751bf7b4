//! Furniture schema: tile catalog, placement groups, item variants, stats.
//!
//! Plain serde data mirroring the static furniture table (`data/furniture.json`).
//! The engine only ever reads these values; nothing here is mutated after load.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a tile interacts with movement through the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    /// Open floor.
    Room,
    /// Floor that also occupies space.
    RoomSolid,
    /// Impassable structure.
    Solid,
    /// Passable, but routing avoids it.
    AvoidPass,
    /// Passable with a movement penalty.
    Penalty4,
    /// Never walkable.
    NotAccessible,
    /// Defender-only terrain.
    Enemy,
    /// Strong avoid (beds, altars).
    AvoidLikeFuck,
}

impl Availability {
    pub const ALL: [Availability; 8] = [
        Availability::Room,
        Availability::RoomSolid,
        Availability::Solid,
        Availability::AvoidPass,
        Availability::Penalty4,
        Availability::NotAccessible,
        Availability::Enemy,
        Availability::AvoidLikeFuck,
    ];

    /// Whether a cell carrying this tile stops movement entirely.
    pub fn blocks_movement(self) -> bool {
        matches!(self, Availability::Solid | Availability::NotAccessible)
    }

    /// Passable but flagged to the pathfinder as a cell to route around.
    pub fn discouraged(self) -> bool {
        matches!(
            self,
            Availability::AvoidPass | Availability::Penalty4 | Availability::AvoidLikeFuck
        )
    }

    /// Name as written in the furniture table.
    pub fn name(self) -> &'static str {
        match self {
            Availability::Room => "ROOM",
            Availability::RoomSolid => "ROOM_SOLID",
            Availability::Solid => "SOLID",
            Availability::AvoidPass => "AVOID_PASS",
            Availability::Penalty4 => "PENALTY4",
            Availability::NotAccessible => "NOT_ACCESSIBLE",
            Availability::Enemy => "ENEMY",
            Availability::AvoidLikeFuck => "AVOID_LIKE_FUCK",
        }
    }
}

/// One entry of a building's tile catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileType {
    pub availability: Availability,
    #[serde(default)]
    pub must_be_reachable: bool,
    #[serde(default)]
    pub can_go_candle: bool,
    /// Building-specific usage code. Opaque to the engine.
    #[serde(default)]
    pub data: i32,
    /// Visual key. Opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
}

impl TileType {
    pub fn new(availability: Availability) -> Self {
        Self {
            availability,
            must_be_reachable: false,
            can_go_candle: false,
            data: 0,
            sprite: None,
        }
    }

    pub fn reachable(mut self) -> Self {
        self.must_be_reachable = true;
        self
    }

    pub fn blocks_movement(&self) -> bool {
        self.availability.blocks_movement()
    }
}

/// Tile key → tile type. A `null` value is a declared hole, which is not the
/// same thing as a key that is absent from the map.
pub type TileCatalog = BTreeMap<String, Option<TileType>>;

/// Result of resolving a tile key against a catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileLookup<'a> {
    Tile(&'a TileType),
    Hole,
    Missing,
}

/// A single placeable furniture variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Footprint at rotation 0: rows of tile keys, `null` for holes.
    pub tiles: Vec<Vec<Option<String>>>,
    pub multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier_stats: Option<f64>,
}

impl Item {
    /// Multiplier applied to stat contributions (falls back to `multiplier`).
    pub fn stats_multiplier(&self) -> f64 {
        self.multiplier_stats.unwrap_or(self.multiplier)
    }

    pub fn height(&self) -> usize {
        self.tiles.len()
    }

    pub fn width(&self) -> usize {
        self.tiles.first().map(|r| r.len()).unwrap_or(0)
    }

    /// True when every row has the same length and the grid is non-empty.
    pub fn is_rectangular(&self) -> bool {
        let w = self.width();
        w > 0 && self.tiles.iter().all(|r| r.len() == w)
    }
}

/// Interchangeable items sharing cardinality and orientation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub min: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    /// 0 = fixed, 1 = one alternate orientation, 3 = four-way.
    #[serde(default)]
    pub rotations: u8,
    /// With `rotations == 1`, the alternate orientation is a left-right
    /// mirror instead of a quarter turn.
    #[serde(default)]
    pub mirror: bool,
    pub items: Vec<Item>,
}

impl Group {
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("group {}", index),
        }
    }

    /// Whether `count` placements already exhaust this group's cap.
    pub fn is_full(&self, count: u32) -> bool {
        self.max.is_some_and(|max| count >= max)
    }
}

/// Kind of a declared building statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatType {
    Employees,
    Services,
    Efficiency,
    Relative,
    Production,
    Integer,
    Irrigation,
    EmployeesRelative,
    Custom,
}

/// A declared statistic. Index `i` lines up with `Building::group_stats[g][i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StatType,
}

impl Stat {
    pub fn new(name: &str, kind: StatType) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }

    /// Custom stats literally named "workers" or "men" count as headcounts.
    pub fn is_headcount(&self) -> bool {
        self.kind == StatType::Custom && (self.name == "workers" || self.name == "men")
    }

    /// Displayed as whole numbers.
    pub fn is_integer_like(&self) -> bool {
        matches!(
            self.kind,
            StatType::Employees | StatType::Services | StatType::Integer
        ) || self.is_headcount()
    }

    /// Ratios derived from other totals rather than counts of their own.
    pub fn is_ratio(&self) -> bool {
        matches!(
            self.kind,
            StatType::Efficiency | StatType::Relative | StatType::EmployeesRelative
        )
    }
}

/// Complete furniture definition for one building family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FurnitureSet {
    pub tiles: TileCatalog,
    pub groups: Vec<Group>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub uses_area: bool,
    #[serde(default)]
    pub must_be_indoors: bool,
    #[serde(default)]
    pub must_be_outdoors: bool,
}

impl FurnitureSet {
    /// Resolve a tile key. `None` (a hole written directly in the item grid)
    /// resolves to a hole as well.
    pub fn tile(&self, key: Option<&str>) -> TileLookup<'_> {
        let Some(key) = key else {
            return TileLookup::Hole;
        };
        match self.tiles.get(key) {
            Some(Some(tile)) => TileLookup::Tile(tile),
            Some(None) => TileLookup::Hole,
            None => TileLookup::Missing,
        }
    }

    pub fn group(&self, group: usize) -> Option<&Group> {
        self.groups.get(group)
    }

    pub fn item(&self, group: usize, item: usize) -> Option<&Item> {
        self.groups.get(group).and_then(|g| g.items.get(item))
    }

    /// Number of non-hole cells of an item (0 if any key is missing).
    pub fn solid_cell_count(&self, item: &Item) -> usize {
        item.tiles
            .iter()
            .flatten()
            .filter(|key| matches!(self.tile(key.as_deref()), TileLookup::Tile(_)))
            .count()
    }
}

/// Per-building stat table, keyed by the furniture set's group order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: String,
    pub name: String,
    /// Key of the furniture set this building uses.
    pub furniture: String,
    /// `group_stats[g][i]`: contribution of one group-`g` item to stat `i`
    /// before the item's stats multiplier.
    #[serde(default)]
    pub group_stats: Vec<Vec<f64>>,
}

impl Building {
    /// Per-item contribution of `group` to `stat`; missing entries are zero.
    pub fn contribution(&self, group: usize, stat: usize) -> f64 {
        self.group_stats
            .get(group)
            .and_then(|row| row.get(stat))
            .copied()
            .unwrap_or(0.0)
    }
}
