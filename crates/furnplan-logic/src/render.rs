//! Plain-text rendering of a plan: ASCII grid and the decode report.
//!
//! Grid legend: `A`..`Z` furniture by group index (mod 26), `D` door,
//! `.` empty floor, blank for cells outside the room.

use crate::audit::{audit_plan, Severity};
use crate::footprint::FootprintCache;
use crate::plan::Plan;
use crate::schema::{Building, FurnitureSet};
use crate::stats::{compute_stats, format_stats};

/// Letter used for a group on the grid.
pub fn group_letter(group: usize) -> char {
    (b'A' + (group % 26) as u8) as char
}

/// Character grid, one string per row. Unresolvable placements are skipped.
pub fn render_grid(plan: &Plan, set: &FurnitureSet) -> Vec<String> {
    let (w, h) = (plan.width as usize, plan.height as usize);
    let mut grid: Vec<Vec<char>> = (0..h)
        .map(|r| {
            (0..w)
                .map(|c| if plan.is_usable(r, c) { '.' } else { ' ' })
                .collect()
        })
        .collect();

    let cache = FootprintCache::build(set);
    let mut covered = vec![false; w * h];
    for p in &plan.placements {
        let Ok(fp) = cache.get(p.group as usize, p.item as usize, p.rotation) else {
            continue;
        };
        for (dr, dc, _) in fp.tiles() {
            let (r, c) = (p.row as usize + dr, p.col as usize + dc);
            if r < h && c < w && !covered[r * w + c] {
                covered[r * w + c] = true;
                grid[r][c] = group_letter(p.group as usize);
            }
        }
    }
    for &(r, c) in &plan.doors {
        if let Some(cell) = grid.get_mut(r as usize).and_then(|row| row.get_mut(c as usize)) {
            *cell = 'D';
        }
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

/// Full text report as printed by `decode-plan`.
pub fn render_report(plan: &Plan, building: &Building, set: &FurnitureSet, verbose: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Building:   {} ({})", plan.building_id, building.name));
    lines.push(format!("Size:       {}×{}", plan.width, plan.height));
    lines.push(format!("Room tiles: {}", plan.usable_cells()));
    lines.push(format!("Placements: {}", plan.placements.len()));
    lines.push(format!("Doors:      {}", plan.doors.len()));
    lines.push(String::new());

    let border = format!("+{}+", "-".repeat(plan.width as usize));
    lines.push(border.clone());
    for row in render_grid(plan, set) {
        lines.push(format!("|{}|", row));
    }
    lines.push(border);
    lines.push(String::new());

    let totals = compute_stats(plan, building, set);
    lines.push("Stats:".to_string());
    for stat in format_stats(&set.stats, &totals) {
        lines.push(format!("  {:<16} {}", stat.name, stat.display));
    }

    if verbose {
        lines.push(String::new());
        lines.push("Groups:".to_string());
        for (g, group) in set.groups.iter().enumerate() {
            let max = group
                .max
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!(
                "  {} {:<16} {} placed (min {}, max {}, rotations {})",
                group_letter(g),
                group.label(g),
                plan.group_count(g),
                group.min,
                max,
                group.rotations
            ));
        }

        lines.push(String::new());
        lines.push("Placements:".to_string());
        let cache = FootprintCache::build(set);
        for (i, p) in plan.placements.iter().enumerate() {
            let size = match cache.get(p.group as usize, p.item as usize, p.rotation) {
                Ok(fp) => format!("{}×{}", fp.width, fp.height),
                Err(e) => format!("unresolved: {}", e),
            };
            lines.push(format!(
                "  #{:<3} group {} item {} rot {} at ({}, {}) {}",
                i, p.group, p.item, p.rotation, p.row, p.col, size
            ));
        }

        let findings = audit_plan(plan, set);
        if !findings.is_empty() {
            lines.push(String::new());
            lines.push("Audit:".to_string());
            for f in &findings {
                let tag = match f.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                };
                lines.push(format!("  [{}] {}: {}", tag, f.category, f.message));
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Placement;
    use crate::schema::{Availability, Group, Item, Stat, StatType, TileType};
    use std::collections::BTreeMap;

    fn set() -> FurnitureSet {
        let mut tiles = BTreeMap::new();
        tiles.insert("x".to_string(), Some(TileType::new(Availability::Solid)));
        let group = |rows: Vec<Vec<Option<String>>>| Group {
            name: Some("bench".into()),
            min: 1,
            max: None,
            rotations: 0,
            mirror: false,
            items: vec![Item {
                tiles: rows,
                multiplier: 1.0,
                multiplier_stats: None,
            }],
        };
        FurnitureSet {
            tiles,
            groups: vec![
                group(vec![vec![Some("x".into()), Some("x".into())]]),
                group(vec![vec![Some("x".into()), None], vec![None, Some("x".into())]]),
            ],
            stats: vec![Stat::new("workers", StatType::Employees)],
            uses_area: false,
            must_be_indoors: false,
            must_be_outdoors: false,
        }
    }

    fn building() -> Building {
        Building {
            id: "SMITHY".into(),
            name: "Smithy".into(),
            furniture: "workshop".into(),
            group_stats: vec![vec![1.0], vec![2.0]],
        }
    }

    #[test]
    fn test_grid_legend() {
        let mut plan = Plan::from_rows("SMITHY", &["D...", "..#.", "...."]);
        plan.placements.push(Placement::new(0, 0, 0, 0, 1));
        plan.placements.push(Placement::new(1, 0, 0, 1, 0));
        let grid = render_grid(&plan, &set());
        assert_eq!(grid, vec!["DAA.", "B. .", ".B.."]);
    }

    #[test]
    fn test_group_letter_wraps() {
        assert_eq!(group_letter(0), 'A');
        assert_eq!(group_letter(25), 'Z');
        assert_eq!(group_letter(27), 'B');
    }

    #[test]
    fn test_report_contents() {
        let mut plan = Plan::new("SMITHY", 3, 2);
        plan.placements.push(Placement::new(0, 0, 0, 0, 0));
        let report = render_report(&plan, &building(), &set(), false);
        assert!(report.contains("SMITHY (Smithy)"));
        assert!(report.contains("3×2"));
        assert!(report.contains("Room tiles: 6"));
        assert!(report.contains("|AA.|"));
        assert!(report.contains("workers"));
        assert!(!report.contains("Groups:"));
    }

    #[test]
    fn test_verbose_report_lists_placements_and_audit() {
        let mut plan = Plan::new("SMITHY", 3, 2);
        plan.placements.push(Placement::new(0, 0, 0, 0, 0));
        let report = render_report(&plan, &building(), &set(), true);
        assert!(report.contains("Groups:"));
        assert!(report.contains("group 0 item 0 rot 0 at (0, 0) 2×1"));
        // group 1 has min 1 and nothing placed
        assert!(report.contains("[warning] cardinality"));
    }
}
