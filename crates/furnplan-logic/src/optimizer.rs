//! Auto-placement optimizer.
//!
//! Greedy and deterministic. Pass 1 walks the groups in declaration order and
//! packs each one with its items (best multiplier first), scanning anchors
//! row-major and rotations ascending. Pass 2 repairs groups left below their
//! minimum by evicting cheaper optimizer-placed pieces from groups that have
//! pieces to spare, then refills. A repair that cannot succeed is rolled back
//! and reported as a [`GroupMinimumUnmet`] warning.
//!
//! Placements live in an index arena (`slots`); occupancy cells store the slot
//! that owns them, so evicting one piece only touches that piece's cells.
//! After an eviction only anchors near the freed cells are rescanned: a
//! candidate's legality depends on its footprint plus two cells around it.

use crate::config::PlannerConfig;
use crate::error::GroupMinimumUnmet;
use crate::footprint::FootprintCache;
use crate::plan::{Occupancy, Placement, Plan};
use crate::rotation;
use crate::schema::{Building, FurnitureSet};
use crate::stats;
use crate::validator;

/// Optimizer knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeOptions {
    /// Start from an empty room instead of keeping existing placements.
    pub clear_existing: bool,
    /// Weight of the primary stat in the objective.
    pub primary_weight: f64,
    /// Run pass 2 for groups below their minimum.
    pub repair_minimums: bool,
    /// Optional upper bound on pieces added in one run.
    pub max_placements: Option<u32>,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self::from(&PlannerConfig::default())
    }
}

impl From<&PlannerConfig> for OptimizeOptions {
    fn from(config: &PlannerConfig) -> Self {
        Self {
            clear_existing: config.clear_existing,
            primary_weight: config.primary_weight,
            repair_minimums: config.repair_minimums,
            max_placements: config.max_optimizer_placements,
        }
    }
}

/// Result of one optimizer run. The plan is always returned, even when some
/// minimums could not be met.
#[derive(Debug, Clone)]
pub struct OptimizeOutcome {
    pub plan: Plan,
    pub warnings: Vec<GroupMinimumUnmet>,
    /// Raw stat totals of `plan`.
    pub stats: Vec<f64>,
    pub objective: f64,
    /// The run stopped at `max_placements`; the room may not be full.
    pub hit_placement_cap: bool,
}

/// Cells a validator check reads beyond the candidate's own footprint.
const CHECK_REACH: usize = 2;

/// Rectangle of anchor cells scanned row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
}

impl Window {
    fn full(occ: &Occupancy) -> Self {
        Self {
            row: 0,
            col: 0,
            rows: occ.height(),
            cols: occ.width(),
        }
    }

    /// Anchors whose footprint (at most `fp_h`×`fp_w`) could read any cell of
    /// the `h`×`w` block at `(row, col)`.
    fn around(
        occ: &Occupancy,
        (row, col): (usize, usize),
        (h, w): (usize, usize),
        (fp_h, fp_w): (usize, usize),
    ) -> Self {
        let top = row.saturating_sub(CHECK_REACH + fp_h.saturating_sub(1));
        let left = col.saturating_sub(CHECK_REACH + fp_w.saturating_sub(1));
        let bottom = (row + h + CHECK_REACH).min(occ.height());
        let right = (col + w + CHECK_REACH).min(occ.width());
        Self {
            row: top,
            col: left,
            rows: bottom.saturating_sub(top),
            cols: right.saturating_sub(left),
        }
    }

    fn len(&self) -> usize {
        self.rows * self.cols
    }

    fn cell(&self, index: usize) -> (usize, usize) {
        (self.row + index / self.cols, self.col + index % self.cols)
    }
}

/// Item indices of `group` in placement order: multiplier descending, then
/// non-hole cell count descending, then declaration order.
pub fn item_order(set: &FurnitureSet, group: usize) -> Vec<usize> {
    let Some(g) = set.group(group) else {
        return Vec::new();
    };
    let mut order: Vec<usize> = (0..g.items.len()).collect();
    order.sort_by(|&a, &b| {
        let (ia, ib) = (&g.items[a], &g.items[b]);
        ib.multiplier
            .total_cmp(&ia.multiplier)
            .then_with(|| set.solid_cell_count(ib).cmp(&set.solid_cell_count(ia)))
            .then_with(|| a.cmp(&b))
    });
    order
}

/// Working state of one run.
struct Arena<'a> {
    set: &'a FurnitureSet,
    building: &'a Building,
    options: &'a OptimizeOptions,
    cache: FootprintCache,
    occ: Occupancy,
    slots: Vec<Option<Placement>>,
    /// Slots below this index hold the plan's existing placements.
    fixed: usize,
    added: u32,
    hit_cap: bool,
    orders: Vec<Vec<usize>>,
}

/// Rollback point for a failed repair.
struct Snapshot {
    occ: Occupancy,
    slots: Vec<Option<Placement>>,
    added: u32,
}

impl<'a> Arena<'a> {
    fn new(
        set: &'a FurnitureSet,
        building: &'a Building,
        options: &'a OptimizeOptions,
        plan: &Plan,
    ) -> Self {
        let cache = FootprintCache::build(set);
        let occ = Occupancy::from_plan(plan, &cache, set.groups.len());
        let slots: Vec<Option<Placement>> = plan.placements.iter().copied().map(Some).collect();
        let fixed = slots.len();
        let orders = (0..set.groups.len()).map(|g| item_order(set, g)).collect();
        Self {
            set,
            building,
            options,
            cache,
            occ,
            slots,
            fixed,
            added: 0,
            hit_cap: false,
            orders,
        }
    }

    fn at_cap(&self) -> bool {
        self.options.max_placements.is_some_and(|cap| self.added >= cap)
    }

    /// First legal candidate for `(group, item)` in `window` at or after scan
    /// index `start`. Scan index enumerates window anchors row-major,
    /// rotations innermost.
    fn find_in(
        &self,
        occ: &Occupancy,
        group: usize,
        item: usize,
        window: Window,
        start: usize,
    ) -> Option<(usize, Placement)> {
        let g = self.set.group(group)?;
        let (g8, i8) = (u8::try_from(group).ok()?, u8::try_from(item).ok()?);
        let rots = rotation::legal_rotations(g.rotations);
        if rots.is_empty() {
            return None;
        }
        for k in start..window.len() * rots.len() {
            let rot = rots[k % rots.len()];
            let (r, c) = window.cell(k / rots.len());
            let Ok(fp) = self.cache.get(group, item, rot) else {
                continue;
            };
            let p = Placement::new(g8, i8, rot, r as u16, c as u16);
            if validator::check(self.set, occ, &p, fp).is_ok() {
                return Some((k, p));
            }
        }
        None
    }

    /// Largest oriented footprint of any item in `group`.
    fn max_extent(&self, group: usize) -> (usize, usize) {
        let Some(g) = self.set.group(group) else {
            return (0, 0);
        };
        let mut extent = (0, 0);
        for item in 0..g.items.len() {
            for &rot in rotation::legal_rotations(g.rotations) {
                if let Ok(fp) = self.cache.get(group, item, rot) {
                    extent = (extent.0.max(fp.height), extent.1.max(fp.width));
                }
            }
        }
        extent
    }

    /// Whether any piece of `group` fits once every optimizer-placed piece is
    /// gone. If not, no eviction can help.
    fn fits_without_spares(&self, group: usize) -> bool {
        let mut base = self.occ.clone();
        for (slot, p) in self.slots.iter().enumerate().skip(self.fixed) {
            let Some(p) = p else {
                continue;
            };
            if let Ok(fp) = self.cache.get(p.group as usize, p.item as usize, p.rotation) {
                base.vacate(slot, p, fp);
            }
        }
        let window = Window::full(&base);
        self.orders[group]
            .iter()
            .any(|&item| self.find_in(&base, group, item, window, 0).is_some())
    }

    fn insert(&mut self, p: Placement) {
        let slot = self.slots.len();
        if let Ok(fp) = self.cache.get(p.group as usize, p.item as usize, p.rotation) {
            self.occ.occupy(slot, &p, fp);
        }
        self.slots.push(Some(p));
        self.added += 1;
    }

    fn remove(&mut self, slot: usize) {
        let Some(p) = self.slots.get_mut(slot).and_then(Option::take) else {
            return;
        };
        if let Ok(fp) = self.cache.get(p.group as usize, p.item as usize, p.rotation) {
            self.occ.vacate(slot, &p, fp);
        }
        self.added = self.added.saturating_sub(1);
    }

    /// Pack `group` into `window` until nothing fits, the group is full, or
    /// `limit` placements are counted for it. Returns the number placed.
    fn fill_group(&mut self, group: usize, limit: Option<u32>, window: Window) -> u32 {
        let set = self.set;
        let Some(g) = set.group(group) else {
            return 0;
        };
        let order = self.orders[group].clone();
        let mut placed = 0;
        for item in order {
            // legality only shrinks as pieces are added, so the scan resumes
            // after the last hit instead of restarting
            let mut cursor = 0;
            loop {
                let count = self.occ.count(group);
                if g.is_full(count) || limit.is_some_and(|l| count >= l) {
                    return placed;
                }
                if self.at_cap() {
                    self.hit_cap = true;
                    return placed;
                }
                match self.find_in(&self.occ, group, item, window, cursor) {
                    Some((k, p)) => {
                        self.insert(p);
                        placed += 1;
                        cursor = k + 1;
                    }
                    None => break,
                }
            }
        }
        placed
    }

    fn fill_all(&mut self) -> u32 {
        let window = Window::full(&self.occ);
        (0..self.set.groups.len())
            .map(|g| self.fill_group(g, None, window))
            .sum()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            occ: self.occ.clone(),
            slots: self.slots.clone(),
            added: self.added,
        }
    }

    fn restore(&mut self, snap: Snapshot) {
        self.occ = snap.occ;
        self.slots = snap.slots;
        self.added = snap.added;
    }

    /// Optimizer-placed slots of other groups, cheapest first; ties go to the
    /// most recently placed.
    fn eviction_order(&self, group: usize) -> Vec<usize> {
        let mut candidates: Vec<(f64, usize)> = self
            .slots
            .iter()
            .enumerate()
            .skip(self.fixed)
            .filter_map(|(slot, p)| {
                let p = p.as_ref()?;
                (p.group as usize != group).then(|| {
                    let score = stats::placement_score(
                        self.building,
                        self.set,
                        p.group as usize,
                        p.item as usize,
                        self.options.primary_weight,
                    );
                    (score, slot)
                })
            })
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| b.1.cmp(&a.1)));
        candidates.into_iter().map(|(_, slot)| slot).collect()
    }

    /// Try to bring `group` up to its minimum. On failure the arena is left
    /// exactly as it was.
    ///
    /// Before each eviction `group` is saturated, so afterwards only anchors
    /// near the freed cells can have become legal.
    fn repair(&mut self, group: usize) -> bool {
        let min = self.set.groups[group].min;
        if self.occ.count(group) >= min {
            return true;
        }
        if !self.fits_without_spares(group) {
            log::debug!("repair: group {} does not fit around the fixed pieces", group);
            return false;
        }
        let snap = self.snapshot();
        self.fill_group(group, Some(min), Window::full(&self.occ));
        let extent = self.max_extent(group);

        for slot in self.eviction_order(group) {
            if self.occ.count(group) >= min {
                break;
            }
            let Some(p) = self.slots[slot] else {
                continue;
            };
            let owner = p.group as usize;
            if self.occ.count(owner) <= self.set.groups[owner].min {
                continue;
            }
            let Ok(fp) = self.cache.get(owner, p.item as usize, p.rotation) else {
                continue;
            };
            let freed = (fp.height, fp.width);
            log::debug!("repair: evicting {:?} to make room for group {}", p, group);
            self.remove(slot);
            let anchor = (p.row as usize, p.col as usize);
            let window = Window::around(&self.occ, anchor, freed, extent);
            self.fill_group(group, Some(min), window);
        }

        if self.occ.count(group) >= min {
            let refilled = self.fill_all();
            log::debug!("repair: group {} satisfied, refilled {} pieces", group, refilled);
            true
        } else {
            self.restore(snap);
            false
        }
    }

    fn into_plan(self, template: &Plan) -> Plan {
        Plan {
            placements: self.slots.into_iter().flatten().collect(),
            ..template.clone()
        }
    }
}

/// Fill `plan` with furniture for `building`. Deterministic: the same inputs
/// always produce the same plan.
pub fn optimize(
    building: &Building,
    set: &FurnitureSet,
    plan: &Plan,
    options: &OptimizeOptions,
) -> OptimizeOutcome {
    let mut start = plan.clone();
    if options.clear_existing {
        start.clear_placements();
    }

    let mut arena = Arena::new(set, building, options, &start);
    let placed = arena.fill_all();
    log::debug!(
        "pass 1: placed {} pieces in {}×{} room for {}",
        placed,
        start.width,
        start.height,
        building.id
    );

    if options.repair_minimums {
        for g in 0..set.groups.len() {
            if arena.occ.count(g) < set.groups[g].min && !arena.repair(g) {
                log::debug!("pass 2: could not repair group {}", g);
            }
        }
    }
    let hit_placement_cap = arena.hit_cap;
    if let (true, Some(cap)) = (hit_placement_cap, options.max_placements) {
        log::warn!("optimizer stopped at the cap of {} placements", cap);
    }

    let warnings: Vec<GroupMinimumUnmet> = set
        .groups
        .iter()
        .enumerate()
        .filter_map(|(g, group)| {
            let placed = arena.occ.count(g);
            (placed < group.min).then_some(GroupMinimumUnmet {
                group: g,
                placed,
                min: group.min,
            })
        })
        .collect();
    for w in &warnings {
        log::warn!("{} ({})", w, set.groups[w.group].label(w.group));
    }

    let plan = arena.into_plan(&start);
    let totals = stats::compute_stats(&plan, building, set);
    let objective = stats::objective(&set.stats, &totals, options.primary_weight);
    OptimizeOutcome {
        plan,
        warnings,
        stats: totals,
        objective,
        hit_placement_cap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{audit_plan, is_consistent};
    use crate::schema::{Availability, Group, Item, Stat, StatType, TileType};
    use std::collections::BTreeMap;

    fn item(rows: &[&str], multiplier: f64) -> Item {
        Item {
            tiles: rows
                .iter()
                .map(|r| {
                    r.chars()
                        .map(|c| if c == '_' { None } else { Some(c.to_string()) })
                        .collect()
                })
                .collect(),
            multiplier,
            multiplier_stats: None,
        }
    }

    fn group(items: Vec<Item>, min: u32, max: Option<u32>, rotations: u8) -> Group {
        Group {
            name: None,
            min,
            max,
            rotations,
            mirror: false,
            items,
        }
    }

    fn set(groups: Vec<Group>) -> FurnitureSet {
        let mut tiles = BTreeMap::new();
        tiles.insert("x".to_string(), Some(TileType::new(Availability::Solid)));
        tiles.insert("o".to_string(), Some(TileType::new(Availability::Room)));
        tiles.insert("w".to_string(), Some(TileType::new(Availability::Solid).reachable()));
        FurnitureSet {
            tiles,
            groups,
            stats: vec![
                Stat::new("workers", StatType::Employees),
                Stat::new("storage", StatType::Integer),
            ],
            uses_area: false,
            must_be_indoors: false,
            must_be_outdoors: false,
        }
    }

    fn building(group_stats: Vec<Vec<f64>>) -> Building {
        Building {
            id: "TEST".into(),
            name: "Test".into(),
            furniture: "test".into(),
            group_stats,
        }
    }

    #[test]
    fn test_minimal_room() {
        let set = set(vec![group(vec![item(&["o"], 1.0)], 1, None, 0)]);
        let plan = Plan::new("TEST", 1, 1);
        let out = optimize(&building(vec![vec![1.0, 0.0]]), &set, &plan, &OptimizeOptions::default());
        assert_eq!(out.plan.placements, vec![Placement::new(0, 0, 0, 0, 0)]);
        assert!(out.warnings.is_empty());
        assert_eq!(out.stats, vec![1.0, 0.0]);
    }

    #[test]
    fn test_door_exclusion() {
        let set = set(vec![group(vec![item(&["o"], 1.0)], 0, None, 0)]);
        let mut plan = Plan::new("TEST", 3, 3);
        plan.add_door(1, 1);
        let out = optimize(&building(vec![]), &set, &plan, &OptimizeOptions::default());
        assert_eq!(out.plan.placements.len(), 8);
        assert!(out.plan.placements.iter().all(|p| (p.row, p.col) != (1, 1)));
    }

    #[test]
    fn test_unreachable_minimum_is_warning() {
        let set = set(vec![group(vec![item(&["xx", "xx"], 1.0)], 1, None, 0)]);
        let plan = Plan::from_rows("TEST", &[".#", "#."]);
        let out = optimize(&building(vec![]), &set, &plan, &OptimizeOptions::default());
        assert!(out.plan.placements.is_empty());
        assert_eq!(
            out.warnings,
            vec![GroupMinimumUnmet {
                group: 0,
                placed: 0,
                min: 1
            }]
        );
    }

    #[test]
    fn test_item_order_tie_break() {
        let set = set(vec![group(
            vec![
                item(&["o"], 1.0),
                item(&["oo"], 2.0),
                item(&["o_o"], 2.0),
                item(&["ooo"], 2.0),
            ],
            0,
            None,
            0,
        )]);
        // multiplier desc, then size desc, then declaration order
        assert_eq!(item_order(&set, 0), vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_respects_group_max_and_rotation() {
        let set = set(vec![group(vec![item(&["xx"], 1.0)], 0, Some(2), 3)]);
        let plan = Plan::new("TEST", 1, 4);
        let out = optimize(&building(vec![]), &set, &plan, &OptimizeOptions::default());
        // 1 wide: only the vertical orientation fits
        assert_eq!(out.plan.placements.len(), 2);
        assert!(out.plan.placements.iter().all(|p| p.rotation == 1));
    }

    #[test]
    fn test_existing_placements_are_fixed() {
        let set = set(vec![group(vec![item(&["o"], 1.0)], 0, None, 0)]);
        let mut plan = Plan::new("TEST", 2, 1);
        plan.placements.push(Placement::new(0, 0, 0, 0, 1));
        let out = optimize(&building(vec![]), &set, &plan, &OptimizeOptions::default());
        assert_eq!(out.plan.placements[0], Placement::new(0, 0, 0, 0, 1));
        assert_eq!(out.plan.placements[1], Placement::new(0, 0, 0, 0, 0));
    }

    #[test]
    fn test_clear_existing() {
        let set = set(vec![group(vec![item(&["oo"], 1.0)], 0, None, 0)]);
        let mut plan = Plan::new("TEST", 3, 1);
        plan.placements.push(Placement::new(0, 0, 0, 0, 1));
        let options = OptimizeOptions {
            clear_existing: true,
            ..Default::default()
        };
        let out = optimize(&building(vec![]), &set, &plan, &options);
        assert_eq!(out.plan.placements, vec![Placement::new(0, 0, 0, 0, 0)]);
    }

    #[test]
    fn test_repair_evicts_cheaper_pieces() {
        // group 0 (storage) floods the room first; group 1 needs one 1x2 desk
        let set = set(vec![
            group(vec![item(&["o"], 1.0)], 0, None, 0),
            group(vec![item(&["oo"], 1.0)], 1, None, 0),
        ]);
        let b = building(vec![vec![0.0, 1.0], vec![5.0, 0.0]]);
        let plan = Plan::new("TEST", 3, 1);
        let out = optimize(&b, &set, &plan, &OptimizeOptions::default());
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert_eq!(out.plan.group_count(1), 1);
        assert_eq!(out.plan.group_count(0), 1);
        assert!(is_consistent(&audit_plan(&out.plan, &set)));
    }

    #[test]
    fn test_repair_disabled_reports_warning() {
        let set = set(vec![
            group(vec![item(&["o"], 1.0)], 0, None, 0),
            group(vec![item(&["oo"], 1.0)], 1, None, 0),
        ]);
        let options = OptimizeOptions {
            repair_minimums: false,
            ..Default::default()
        };
        let out = optimize(&building(vec![]), &set, &Plan::new("TEST", 3, 1), &options);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.plan.group_count(0), 3);
    }

    #[test]
    fn test_failed_repair_rolls_back() {
        let set = set(vec![
            group(vec![item(&["o"], 1.0)], 0, None, 0),
            group(vec![item(&["oooo"], 1.0)], 1, None, 0),
        ]);
        let out = optimize(&building(vec![]), &set, &Plan::new("TEST", 3, 1), &OptimizeOptions::default());
        assert_eq!(out.plan.group_count(0), 3);
        assert_eq!(out.warnings[0].group, 1);
    }

    #[test]
    fn test_repair_never_breaks_other_minimum() {
        let set = set(vec![
            group(vec![item(&["oo"], 1.0)], 1, None, 0),
            group(vec![item(&["oo"], 1.0)], 1, None, 0),
        ]);
        let out = optimize(&building(vec![]), &set, &Plan::new("TEST", 3, 1), &OptimizeOptions::default());
        assert_eq!(out.plan.group_count(0), 1);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].group, 1);
    }

    #[test]
    fn test_reoptimize_is_idempotent() {
        let set = set(vec![
            group(vec![item(&["xw"], 2.0), item(&["x"], 1.0)], 1, Some(3), 3),
            group(vec![item(&["oo"], 1.0)], 2, None, 0),
        ]);
        let b = building(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let plan = Plan::from_rows("TEST", &["D....", ".....", "..#..", "....."]);
        let options = OptimizeOptions::default();
        let once = optimize(&b, &set, &plan, &options);
        let twice = optimize(&b, &set, &once.plan, &options);
        assert_eq!(once.plan, twice.plan);
        assert_eq!(once.warnings, twice.warnings);
        assert!(is_consistent(&audit_plan(&once.plan, &set)));
    }

    #[test]
    fn test_placement_cap() {
        let set = set(vec![group(vec![item(&["o"], 1.0)], 0, None, 0)]);
        let options = OptimizeOptions {
            max_placements: Some(3),
            ..Default::default()
        };
        let out = optimize(&building(vec![]), &set, &Plan::new("TEST", 4, 4), &options);
        assert_eq!(out.plan.placements.len(), 3);
        assert!(out.hit_placement_cap);

        let uncapped = optimize(&building(vec![]), &set, &Plan::new("TEST", 4, 4), &OptimizeOptions::default());
        assert_eq!(uncapped.plan.placements.len(), 16);
        assert!(!uncapped.hit_placement_cap);
    }

    #[test]
    fn test_large_room_fills_completely_and_is_idempotent() {
        let set = set(vec![group(vec![item(&["o"], 1.0)], 0, None, 0)]);
        let room = Plan::new("TEST", 70, 70);
        let options = OptimizeOptions::default();
        let once = optimize(&building(vec![]), &set, &room, &options);
        assert_eq!(once.plan.placements.len(), 4900);
        assert!(!once.hit_placement_cap);
        let twice = optimize(&building(vec![]), &set, &once.plan, &options);
        assert_eq!(once.plan, twice.plan);
    }

    #[test]
    fn test_repair_refills_only_freed_area() {
        // 1x1 crates flood a 3x3 room; the desk fits once two neighbours in
        // the bottom row are evicted, latest first
        let set = set(vec![
            group(vec![item(&["o"], 1.0)], 0, None, 0),
            group(vec![item(&["oo"], 1.0)], 1, None, 0),
        ]);
        let out = optimize(&building(vec![]), &set, &Plan::new("TEST", 3, 3), &OptimizeOptions::default());
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert_eq!(out.plan.group_count(0), 7);
        assert_eq!(out.plan.group_count(1), 1);
        assert!(out.plan.placements.contains(&Placement::new(1, 0, 0, 2, 1)));
        assert!(is_consistent(&audit_plan(&out.plan, &set)));
    }

    #[test]
    fn test_repair_skips_group_that_never_fits() {
        // checkerboard floor: a 1x2 desk has no legal anchor at all
        let rows: Vec<String> = (0..40)
            .map(|r| (0..40).map(|c| if (r + c) % 2 == 0 { '.' } else { '#' }).collect())
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let room = Plan::from_rows("TEST", &rows);
        let set = set(vec![
            group(vec![item(&["o"], 1.0)], 0, None, 0),
            group(vec![item(&["oo"], 1.0)], 1, None, 0),
        ]);
        let out = optimize(&building(vec![]), &set, &room, &OptimizeOptions::default());
        assert_eq!(out.plan.group_count(0), 800);
        assert_eq!(
            out.warnings,
            vec![GroupMinimumUnmet {
                group: 1,
                placed: 0,
                min: 1
            }]
        );
    }

    #[test]
    fn test_window_around_is_clamped() {
        let occ = Occupancy::empty(&Plan::new("TEST", 10, 6), 1);
        let w = Window::around(&occ, (0, 8), (1, 2), (2, 3));
        assert_eq!(w, Window { row: 0, col: 4, rows: 3, cols: 6 });
        assert_eq!(w.cell(7), (1, 5));
        assert_eq!(Window::full(&occ).len(), 60);
    }

    #[test]
    fn test_objective_reported() {
        let set = set(vec![group(vec![item(&["o"], 1.0)], 0, None, 0)]);
        let b = building(vec![vec![1.0, 2.0]]);
        let out = optimize(&b, &set, &Plan::new("TEST", 2, 1), &OptimizeOptions::default());
        // 2 workers × 10 + 4 storage
        assert_eq!(out.objective, 24.0);
    }
}
