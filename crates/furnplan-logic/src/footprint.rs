//! Resolved footprints: an item's tile grid, oriented and looked up in the
//! tile catalog, so placement checks never touch string keys.

use crate::error::PlacementRejected;
use crate::rotation;
use crate::schema::{FurnitureSet, TileLookup, TileType};

/// An oriented item with its tiles resolved. `None` cells are holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub height: usize,
    pub width: usize,
    cells: Vec<Option<TileType>>,
}

impl Footprint {
    /// Orient item `item` of group `group` and resolve its tiles.
    pub fn resolve(
        set: &FurnitureSet,
        group: usize,
        item: usize,
        rotation: u8,
    ) -> Result<Self, PlacementRejected> {
        let g = set.group(group).ok_or(PlacementRejected::UnknownGroup)?;
        let it = g.items.get(item).ok_or(PlacementRejected::UnknownItem)?;
        let grid = rotation::orient(&it.tiles, g.rotations, g.mirror, rotation)
            .ok_or(PlacementRejected::IllegalRotation)?;

        let height = grid.len();
        let width = grid.first().map(|r| r.len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(height * width);
        for row in &grid {
            for key in row.iter().take(width) {
                match set.tile(key.as_deref()) {
                    TileLookup::Tile(t) => cells.push(Some(t.clone())),
                    TileLookup::Hole => cells.push(None),
                    TileLookup::Missing => {
                        return Err(PlacementRejected::UnknownTile(
                            key.clone().unwrap_or_default(),
                        ))
                    }
                }
            }
            // ragged rows are padded with holes
            for _ in row.len()..width {
                cells.push(None);
            }
        }

        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Tile at offset `(dr, dc)` from the anchor, `None` for holes.
    pub fn get(&self, dr: usize, dc: usize) -> Option<&TileType> {
        if dr >= self.height || dc >= self.width {
            return None;
        }
        self.cells[dr * self.width + dc].as_ref()
    }

    /// Non-hole cells as `(dr, dc, tile)`.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, &TileType)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.as_ref().map(|t| (i / self.width.max(1), i % self.width.max(1), t))
        })
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Every `(group, item, rotation)` footprint of a set, resolved once.
///
/// Indexed `[group][item][rotation]`; illegal orientations store the reason.
#[derive(Debug, Clone)]
pub struct FootprintCache {
    entries: Vec<Vec<Vec<Result<Footprint, PlacementRejected>>>>,
}

impl FootprintCache {
    pub fn build(set: &FurnitureSet) -> Self {
        let entries = set
            .groups
            .iter()
            .enumerate()
            .map(|(g, group)| {
                (0..group.items.len())
                    .map(|i| (0..4u8).map(|r| Footprint::resolve(set, g, i, r)).collect())
                    .collect()
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, group: usize, item: usize, rotation: u8) -> Result<&Footprint, PlacementRejected> {
        let items = self
            .entries
            .get(group)
            .ok_or(PlacementRejected::UnknownGroup)?;
        let rotations = items.get(item).ok_or(PlacementRejected::UnknownItem)?;
        match rotations.get(rotation as usize) {
            Some(Ok(fp)) => Ok(fp),
            Some(Err(e)) => Err(e.clone()),
            None => Err(PlacementRejected::IllegalRotation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Availability, Group, Item};
    use std::collections::BTreeMap;

    fn set() -> FurnitureSet {
        let mut tiles = BTreeMap::new();
        tiles.insert("a".to_string(), Some(TileType::new(Availability::Solid)));
        tiles.insert("s".to_string(), Some(TileType::new(Availability::Room).reachable()));
        tiles.insert("_".to_string(), None);
        FurnitureSet {
            tiles,
            groups: vec![Group {
                name: None,
                min: 0,
                max: None,
                rotations: 3,
                mirror: false,
                items: vec![
                    Item {
                        tiles: vec![
                            vec![Some("a".into()), Some("a".into())],
                            vec![Some("s".into()), Some("_".into())],
                        ],
                        multiplier: 1.0,
                        multiplier_stats: None,
                    },
                    Item {
                        tiles: vec![vec![Some("q".into())]],
                        multiplier: 1.0,
                        multiplier_stats: None,
                    },
                ],
            }],
            stats: vec![],
            uses_area: false,
            must_be_indoors: false,
            must_be_outdoors: false,
        }
    }

    #[test]
    fn test_resolve_rotation_zero() {
        let fp = Footprint::resolve(&set(), 0, 0, 0).unwrap();
        assert_eq!((fp.height, fp.width), (2, 2));
        assert_eq!(fp.solid_count(), 3);
        assert!(fp.get(1, 1).is_none());
        assert!(fp.get(1, 0).unwrap().must_be_reachable);
    }

    #[test]
    fn test_resolve_rotated_hole_moves() {
        // a a      s a
        // s _  ->  _ a
        let fp = Footprint::resolve(&set(), 0, 0, 1).unwrap();
        assert!(fp.get(0, 0).unwrap().must_be_reachable);
        assert!(fp.get(1, 0).is_none());
        let cells: Vec<(usize, usize)> = fp.tiles().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_missing_key_rejected() {
        let err = Footprint::resolve(&set(), 0, 1, 0).unwrap_err();
        assert_eq!(err, PlacementRejected::UnknownTile("q".into()));
    }

    #[test]
    fn test_cache_matches_resolve() {
        let s = set();
        let cache = FootprintCache::build(&s);
        for r in 0..4 {
            assert_eq!(
                cache.get(0, 0, r).unwrap(),
                &Footprint::resolve(&s, 0, 0, r).unwrap()
            );
        }
        assert_eq!(cache.get(2, 0, 0).unwrap_err(), PlacementRejected::UnknownGroup);
        assert_eq!(cache.get(0, 9, 0).unwrap_err(), PlacementRejected::UnknownItem);
        assert_eq!(cache.get(0, 0, 7).unwrap_err(), PlacementRejected::IllegalRotation);
    }
}
