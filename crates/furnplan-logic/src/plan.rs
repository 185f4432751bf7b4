//! Room model: plan shape, doors, placements, and the occupancy arena used
//! by the validator and optimizer.

use serde::{Deserialize, Serialize};

use crate::footprint::{Footprint, FootprintCache};
use crate::schema::FurnitureSet;

/// One instantiated furniture piece. `(row, col)` is the top-left corner of
/// the oriented footprint's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub group: u8,
    pub item: u8,
    pub rotation: u8,
    pub row: u16,
    pub col: u16,
}

impl Placement {
    pub fn new(group: u8, item: u8, rotation: u8, row: u16, col: u16) -> Self {
        Self {
            group,
            item,
            rotation,
            row,
            col,
        }
    }
}

/// A door cell as `(row, col)`.
pub type Door = (u16, u16);

/// Complete, serializable state of one room's layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub building_id: String,
    pub width: u16,
    pub height: u16,
    /// `room[row][col]`: whether the cell is usable floor.
    pub room: Vec<Vec<bool>>,
    pub placements: Vec<Placement>,
    pub doors: Vec<Door>,
}

impl Plan {
    /// Fully usable `width × height` room with no furniture or doors.
    pub fn new(building_id: &str, width: u16, height: u16) -> Self {
        Self {
            building_id: building_id.to_string(),
            width,
            height,
            room: vec![vec![true; width as usize]; height as usize],
            placements: Vec::new(),
            doors: Vec::new(),
        }
    }

    /// Build a room from text rows: `.` usable, `D` usable door cell, anything
    /// else unusable. Rows shorter than the widest row are padded unusable.
    pub fn from_rows(building_id: &str, rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut plan = Self::new(building_id, width as u16, height as u16);
        for (r, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            for c in 0..width {
                let ch = chars.get(c).copied().unwrap_or(' ');
                plan.room[r][c] = ch == '.' || ch == 'D';
                if ch == 'D' {
                    plan.doors.push((r as u16, c as u16));
                }
            }
        }
        plan
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height as usize && col < self.width as usize
    }

    pub fn is_usable(&self, row: usize, col: usize) -> bool {
        self.room
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    pub fn set_usable(&mut self, row: usize, col: usize, usable: bool) {
        if let Some(cell) = self.room.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = usable;
        }
    }

    pub fn is_door(&self, row: usize, col: usize) -> bool {
        self.doors
            .iter()
            .any(|&(r, c)| r as usize == row && c as usize == col)
    }

    /// Add a door, ignoring duplicates and out-of-bounds cells.
    pub fn add_door(&mut self, row: u16, col: u16) {
        if self.in_bounds(row as usize, col as usize) && !self.is_door(row as usize, col as usize) {
            self.doors.push((row, col));
        }
    }

    /// Number of usable floor cells.
    pub fn usable_cells(&self) -> usize {
        self.room.iter().flatten().filter(|&&u| u).count()
    }

    pub fn group_count(&self, group: usize) -> u32 {
        self.placements
            .iter()
            .filter(|p| p.group as usize == group)
            .count() as u32
    }

    pub fn clear_placements(&mut self) {
        self.placements.clear();
    }

    /// Index of the placement whose non-hole footprint covers `(row, col)`.
    pub fn placement_at(&self, set: &FurnitureSet, row: usize, col: usize) -> Option<usize> {
        self.placements.iter().position(|p| {
            let Ok(fp) =
                Footprint::resolve(set, p.group as usize, p.item as usize, p.rotation)
            else {
                return false;
            };
            let (r0, c0) = (p.row as usize, p.col as usize);
            row >= r0 && col >= c0 && fp.get(row - r0, col - c0).is_some()
        })
    }

    /// Remove and return the placement covering `(row, col)`, if any.
    pub fn remove_at(&mut self, set: &FurnitureSet, row: usize, col: usize) -> Option<Placement> {
        let idx = self.placement_at(set, row, col)?;
        Some(self.placements.remove(idx))
    }
}

/// What covers an occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Arena slot of the owning placement.
    pub owner: usize,
    pub blocking: bool,
    pub must_be_reachable: bool,
}

/// Flat occupancy grid over a plan. Cells store arena slots rather than
/// references, so vacating a placement only touches its own cells.
#[derive(Debug, Clone)]
pub struct Occupancy {
    width: usize,
    height: usize,
    usable: Vec<bool>,
    doors: Vec<bool>,
    cells: Vec<Option<Cell>>,
    counts: Vec<u32>,
}

impl Occupancy {
    /// Empty occupancy for a plan's shape and doors (placements ignored).
    pub fn empty(plan: &Plan, group_count: usize) -> Self {
        let width = plan.width as usize;
        let height = plan.height as usize;
        let mut usable = vec![false; width * height];
        for r in 0..height {
            for c in 0..width {
                usable[r * width + c] = plan.is_usable(r, c);
            }
        }
        let mut doors = vec![false; width * height];
        for &(r, c) in &plan.doors {
            let (r, c) = (r as usize, c as usize);
            if r < height && c < width {
                doors[r * width + c] = true;
            }
        }
        Self {
            width,
            height,
            usable,
            doors,
            cells: vec![None; width * height],
            counts: vec![0; group_count],
        }
    }

    /// Occupancy with every resolvable placement of the plan applied, slot
    /// `i` owning `plan.placements[i]`. Where existing placements collide the
    /// earlier one keeps the cell.
    pub fn from_plan(plan: &Plan, footprints: &FootprintCache, group_count: usize) -> Self {
        let mut occ = Self::empty(plan, group_count);
        for (slot, p) in plan.placements.iter().enumerate() {
            match footprints.get(p.group as usize, p.item as usize, p.rotation) {
                Ok(fp) => occ.occupy(slot, p, fp),
                Err(e) => log::warn!("skipping placement {:?}: {}", p, e),
            }
        }
        occ
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    pub fn is_usable(&self, row: usize, col: usize) -> bool {
        self.index(row, col).map(|i| self.usable[i]).unwrap_or(false)
    }

    pub fn is_door(&self, row: usize, col: usize) -> bool {
        self.index(row, col).map(|i| self.doors[i]).unwrap_or(false)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).and_then(|i| self.cells[i])
    }

    /// Doors, and usable floor not covered by a blocking tile.
    pub fn is_walkable(&self, row: usize, col: usize) -> bool {
        let Some(i) = self.index(row, col) else {
            return false;
        };
        self.doors[i] || (self.usable[i] && !self.cells[i].is_some_and(|c| c.blocking))
    }

    /// Placements currently counted for `group`.
    pub fn count(&self, group: usize) -> u32 {
        self.counts.get(group).copied().unwrap_or(0)
    }

    /// Mark a placement's non-hole cells as owned by `slot`. Cells that are
    /// out of bounds or already owned are left alone.
    pub fn occupy(&mut self, slot: usize, placement: &Placement, fp: &Footprint) {
        let (r0, c0) = (placement.row as usize, placement.col as usize);
        for (dr, dc, tile) in fp.tiles() {
            if let Some(i) = self.index(r0 + dr, c0 + dc) {
                if self.cells[i].is_none() {
                    self.cells[i] = Some(Cell {
                        owner: slot,
                        blocking: tile.blocks_movement(),
                        must_be_reachable: tile.must_be_reachable,
                    });
                }
            }
        }
        if let Some(n) = self.counts.get_mut(placement.group as usize) {
            *n += 1;
        }
    }

    /// Undo [`Occupancy::occupy`] for `slot`.
    pub fn vacate(&mut self, slot: usize, placement: &Placement, fp: &Footprint) {
        let (r0, c0) = (placement.row as usize, placement.col as usize);
        for (dr, dc, _) in fp.tiles() {
            if let Some(i) = self.index(r0 + dr, c0 + dc) {
                if self.cells[i].is_some_and(|c| c.owner == slot) {
                    self.cells[i] = None;
                }
            }
        }
        if let Some(n) = self.counts.get_mut(placement.group as usize) {
            *n = n.saturating_sub(1);
        }
    }

    /// Number of usable cells nobody covers (doors excluded).
    pub fn free_cells(&self) -> usize {
        (0..self.cells.len())
            .filter(|&i| self.usable[i] && !self.doors[i] && self.cells[i].is_none())
            .count()
    }
}
