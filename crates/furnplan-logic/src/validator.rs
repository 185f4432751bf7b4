//! Placement validator: decides whether a candidate piece may be placed.
//!
//! Checks run in a fixed order and stop at the first failure:
//! group cap, bounds, coverage, overlap, walkway preservation, reachability,
//! door exclusivity. Nothing is mutated on rejection.

use crate::error::PlacementRejected;
use crate::footprint::{Footprint, FootprintCache};
use crate::plan::{Occupancy, Placement, Plan};
use crate::schema::FurnitureSet;

/// Extra facts about an accepted placement, for callers that route agents or
/// decorate the room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assessment {
    /// Cells the pathfinder should treat as discouraged.
    pub discouraged: Vec<(u16, u16)>,
    /// Cells a candle accessory may be layered on.
    pub candle_slots: Vec<(u16, u16)>,
}

const NEIGHBOURS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

fn neighbours(row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
    NEIGHBOURS.iter().filter_map(move |&(dr, dc)| {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        Some((r, c))
    })
}

/// Tile the candidate would put at `(row, col)`, if any.
fn candidate_tile<'a>(
    placement: &Placement,
    fp: &'a Footprint,
    row: usize,
    col: usize,
) -> Option<&'a crate::schema::TileType> {
    let (r0, c0) = (placement.row as usize, placement.col as usize);
    if row < r0 || col < c0 {
        return None;
    }
    fp.get(row - r0, col - c0)
}

/// Walkability of a cell as it would be after the candidate is placed.
fn walkable_after(occ: &Occupancy, placement: &Placement, fp: &Footprint, row: usize, col: usize) -> bool {
    if occ.is_door(row, col) {
        return true;
    }
    match candidate_tile(placement, fp, row, col) {
        Some(tile) => occ.is_usable(row, col) && !tile.blocks_movement(),
        None => occ.is_walkable(row, col),
    }
}

/// Validate a candidate against an occupancy snapshot.
///
/// This is the hot path used by the optimizer; `fp` must be the footprint of
/// `placement` (group, item, rotation).
pub fn check(
    set: &FurnitureSet,
    occ: &Occupancy,
    placement: &Placement,
    fp: &Footprint,
) -> Result<(), PlacementRejected> {
    let group = set
        .group(placement.group as usize)
        .ok_or(PlacementRejected::UnknownGroup)?;
    if group.is_full(occ.count(placement.group as usize)) {
        return Err(PlacementRejected::GroupFull);
    }

    let (r0, c0) = (placement.row as usize, placement.col as usize);

    // 1. bounds
    if r0 + fp.height > occ.height() || c0 + fp.width > occ.width() {
        return Err(PlacementRejected::OutOfBounds);
    }

    // 2. coverage
    if fp.tiles().any(|(dr, dc, _)| !occ.is_usable(r0 + dr, c0 + dc)) {
        return Err(PlacementRejected::NotRoomFloor);
    }

    // 3. overlap
    if fp.tiles().any(|(dr, dc, _)| occ.cell(r0 + dr, c0 + dc).is_some()) {
        return Err(PlacementRejected::Overlap);
    }

    // 4. blocking tiles must not strand a reachable tile or a door
    for (dr, dc, tile) in fp.tiles() {
        if !tile.blocks_movement() {
            continue;
        }
        for (nr, nc) in neighbours(r0 + dr, c0 + dc) {
            let needs_walkway = occ.is_door(nr, nc)
                || occ.cell(nr, nc).is_some_and(|c| c.must_be_reachable);
            if !needs_walkway {
                continue;
            }
            let before = neighbours(nr, nc).any(|(mr, mc)| occ.is_walkable(mr, mc));
            let after = neighbours(nr, nc).any(|(mr, mc)| walkable_after(occ, placement, fp, mr, mc));
            if before && !after {
                return Err(PlacementRejected::BlocksRequiredWalkway);
            }
        }
    }

    // 5. reachability of the candidate's own tiles
    for (dr, dc, tile) in fp.tiles() {
        if !tile.must_be_reachable {
            continue;
        }
        let reachable = neighbours(r0 + dr, c0 + dc)
            .any(|(nr, nc)| walkable_after(occ, placement, fp, nr, nc));
        if !reachable {
            return Err(PlacementRejected::Unreachable);
        }
    }

    // 6. doors
    if fp.tiles().any(|(dr, dc, _)| occ.is_door(r0 + dr, c0 + dc)) {
        return Err(PlacementRejected::DoorBlocked);
    }

    Ok(())
}

fn assess(placement: &Placement, fp: &Footprint) -> Assessment {
    let mut a = Assessment::default();
    for (dr, dc, tile) in fp.tiles() {
        let cell = (placement.row + dr as u16, placement.col + dc as u16);
        if tile.availability.discouraged() {
            a.discouraged.push(cell);
        }
        if tile.can_go_candle {
            a.candle_slots.push(cell);
        }
    }
    a
}

/// Whether `placement` may be added to `plan` as it stands.
pub fn can_place(
    plan: &Plan,
    set: &FurnitureSet,
    placement: &Placement,
) -> Result<Assessment, PlacementRejected> {
    let fp = Footprint::resolve(
        set,
        placement.group as usize,
        placement.item as usize,
        placement.rotation,
    )?;
    let cache = FootprintCache::build(set);
    let occ = Occupancy::from_plan(plan, &cache, set.groups.len());
    check(set, &occ, placement, &fp)?;
    Ok(assess(placement, &fp))
}

/// Validate and, if legal, append `placement` to the plan.
pub fn place(
    plan: &mut Plan,
    set: &FurnitureSet,
    placement: Placement,
) -> Result<Assessment, PlacementRejected> {
    let assessment = can_place(plan, set, &placement)?;
    plan.placements.push(placement);
    Ok(assessment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Availability, Group, Item, TileType};
    use std::collections::BTreeMap;

    fn item(rows: &[&str]) -> Item {
        Item {
            tiles: rows
                .iter()
                .map(|r| {
                    r.chars()
                        .map(|c| if c == '_' { None } else { Some(c.to_string()) })
                        .collect()
                })
                .collect(),
            multiplier: 1.0,
            multiplier_stats: None,
        }
    }

    fn group(items: Vec<Item>, rotations: u8, max: Option<u32>) -> Group {
        Group {
            name: None,
            min: 0,
            max,
            rotations,
            mirror: false,
            items,
        }
    }

    /// x = solid, o = floor, r = floor that must be reachable,
    /// w = solid that must be reachable, b = avoid (bed), c = candle spot.
    fn test_set() -> FurnitureSet {
        let mut tiles = BTreeMap::new();
        tiles.insert("x".to_string(), Some(TileType::new(Availability::Solid)));
        tiles.insert("o".to_string(), Some(TileType::new(Availability::Room)));
        tiles.insert("r".to_string(), Some(TileType::new(Availability::Room).reachable()));
        tiles.insert("w".to_string(), Some(TileType::new(Availability::Solid).reachable()));
        tiles.insert("b".to_string(), Some(TileType::new(Availability::AvoidLikeFuck)));
        let mut candle = TileType::new(Availability::RoomSolid);
        candle.can_go_candle = true;
        tiles.insert("c".to_string(), Some(candle));
        FurnitureSet {
            tiles,
            groups: vec![
                group(vec![item(&["xx"])], 3, Some(2)), // 0: solid bar
                group(vec![item(&["w"])], 0, None),     // 1: workstation
                group(vec![item(&["x_", "_x"])], 0, None), // 2: diagonal with holes
                group(vec![item(&["bc"])], 1, None),    // 3: bed + candle
                group(vec![item(&["o"])], 0, None),     // 4: floor marker
            ],
            stats: vec![],
            uses_area: false,
            must_be_indoors: false,
            must_be_outdoors: false,
        }
    }

    #[test]
    fn test_accepts_simple_placement() {
        let plan = Plan::new("X", 3, 3);
        assert!(can_place(&plan, &test_set(), &Placement::new(0, 0, 0, 0, 0)).is_ok());
    }

    #[test]
    fn test_unknown_indices() {
        let plan = Plan::new("X", 3, 3);
        let set = test_set();
        assert_eq!(
            can_place(&plan, &set, &Placement::new(9, 0, 0, 0, 0)),
            Err(PlacementRejected::UnknownGroup)
        );
        assert_eq!(
            can_place(&plan, &set, &Placement::new(0, 4, 0, 0, 0)),
            Err(PlacementRejected::UnknownItem)
        );
    }

    #[test]
    fn test_illegal_rotation() {
        let plan = Plan::new("X", 3, 3);
        assert_eq!(
            can_place(&plan, &test_set(), &Placement::new(1, 0, 1, 0, 0)),
            Err(PlacementRejected::IllegalRotation)
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let plan = Plan::new("X", 3, 3);
        assert_eq!(
            can_place(&plan, &test_set(), &Placement::new(0, 0, 0, 0, 2)),
            Err(PlacementRejected::OutOfBounds)
        );
        // rotated bar is 2 tall
        assert_eq!(
            can_place(&plan, &test_set(), &Placement::new(0, 0, 1, 2, 0)),
            Err(PlacementRejected::OutOfBounds)
        );
    }

    #[test]
    fn test_coverage_requires_floor() {
        let plan = Plan::from_rows("X", &[".#.", "...", "..."]);
        assert_eq!(
            can_place(&plan, &test_set(), &Placement::new(0, 0, 0, 0, 0)),
            Err(PlacementRejected::NotRoomFloor)
        );
    }

    #[test]
    fn test_holes_are_transparent() {
        // diagonal piece over unusable cells at its holes
        let plan = Plan::from_rows("X", &[".#", "#."]);
        assert!(can_place(&plan, &test_set(), &Placement::new(2, 0, 0, 0, 0)).is_ok());
    }

    #[test]
    fn test_interlocking_through_holes() {
        let mut plan = Plan::new("X", 2, 2);
        let set = test_set();
        place(&mut plan, &set, Placement::new(4, 0, 0, 0, 1)).unwrap();
        place(&mut plan, &set, Placement::new(4, 0, 0, 1, 0)).unwrap();
        assert!(can_place(&plan, &set, &Placement::new(2, 0, 0, 0, 0)).is_ok());
    }

    #[test]
    fn test_overlap_rejected() {
        let mut plan = Plan::new("X", 3, 3);
        let set = test_set();
        place(&mut plan, &set, Placement::new(0, 0, 0, 0, 0)).unwrap();
        assert_eq!(
            can_place(&plan, &set, &Placement::new(0, 0, 1, 0, 1)),
            Err(PlacementRejected::Overlap)
        );
    }

    #[test]
    fn test_group_max() {
        let mut plan = Plan::new("X", 4, 4);
        let set = test_set();
        place(&mut plan, &set, Placement::new(0, 0, 0, 0, 0)).unwrap();
        place(&mut plan, &set, Placement::new(0, 0, 0, 2, 0)).unwrap();
        assert_eq!(
            can_place(&plan, &set, &Placement::new(0, 0, 0, 3, 2)),
            Err(PlacementRejected::GroupFull)
        );
    }

    #[test]
    fn test_unreachable_workstation() {
        // 1x1 room: workstation has no neighbour at all
        let plan = Plan::new("X", 1, 1);
        assert_eq!(
            can_place(&plan, &test_set(), &Placement::new(1, 0, 0, 0, 0)),
            Err(PlacementRejected::Unreachable)
        );
        // 1x2 room: the other cell is floor
        let plan = Plan::new("X", 2, 1);
        assert!(can_place(&plan, &test_set(), &Placement::new(1, 0, 0, 0, 0)).is_ok());
    }

    #[test]
    fn test_cannot_wall_in_workstation() {
        let set = test_set();
        // . w . .  -- a bar on the right still leaves (0,0) free
        let mut plan = Plan::new("X", 4, 1);
        place(&mut plan, &set, Placement::new(1, 0, 0, 0, 1)).unwrap();
        assert!(can_place(&plan, &set, &Placement::new(0, 0, 0, 0, 2)).is_ok());

        // w . .  -- the bar would take the only walkable neighbour
        let mut plan = Plan::new("X", 3, 1);
        place(&mut plan, &set, Placement::new(1, 0, 0, 0, 0)).unwrap();
        assert_eq!(
            can_place(&plan, &set, &Placement::new(0, 0, 0, 0, 1)),
            Err(PlacementRejected::BlocksRequiredWalkway)
        );
    }

    #[test]
    fn test_cannot_seal_door() {
        // door at (0,0); only interior neighbour is (0,1)
        let plan = Plan::from_rows("X", &["D.."]);
        assert_eq!(
            can_place(&plan, &test_set(), &Placement::new(0, 0, 0, 0, 1)),
            Err(PlacementRejected::BlocksRequiredWalkway)
        );
    }

    #[test]
    fn test_door_blocked() {
        let plan = Plan::from_rows("X", &["...", ".D.", "..."]);
        assert_eq!(
            can_place(&plan, &test_set(), &Placement::new(4, 0, 0, 1, 1)),
            Err(PlacementRejected::DoorBlocked)
        );
    }

    #[test]
    fn test_reachable_via_door() {
        // the workstation's only walkable neighbour is the door, which keeps
        // its other exit at (0,1)
        let plan = Plan::from_rows("X", &["D.", ".#"]);
        assert!(can_place(&plan, &test_set(), &Placement::new(1, 0, 0, 1, 0)).is_ok());
    }

    #[test]
    fn test_assessment_flags() {
        let plan = Plan::new("X", 3, 3);
        let a = can_place(&plan, &test_set(), &Placement::new(3, 0, 0, 1, 1)).unwrap();
        assert_eq!(a.discouraged, vec![(1, 1)]);
        assert_eq!(a.candle_slots, vec![(1, 2)]);
    }

    #[test]
    fn test_rejection_leaves_plan_untouched() {
        let mut plan = Plan::new("X", 2, 1);
        let before = plan.clone();
        assert!(place(&mut plan, &test_set(), Placement::new(0, 0, 0, 0, 1)).is_err());
        assert_eq!(plan, before);
    }
}
