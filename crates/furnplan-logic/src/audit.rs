//! Whole-plan audit.
//!
//! The validator answers "may this one piece go here"; the audit re-checks a
//! finished plan (decoded from a link, edited by hand) against every layout
//! invariant and reports all findings instead of stopping at the first.

use std::collections::HashSet;

use crate::footprint::FootprintCache;
use crate::plan::Plan;
use crate::schema::FurnitureSet;

/// A single audit finding.
#[derive(Debug, Clone)]
pub struct Finding {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

// ── A. Shape ────────────────────────────────────────────────────────────

/// Room bitmap must be `height` rows of `width` cells.
pub fn check_shape(plan: &Plan) -> Vec<Finding> {
    let mut findings = Vec::new();
    if plan.room.len() != plan.height as usize {
        findings.push(Finding {
            category: "shape",
            severity: Severity::Error,
            message: format!(
                "room has {} rows but height is {}",
                plan.room.len(),
                plan.height
            ),
        });
    }
    for (r, row) in plan.room.iter().enumerate() {
        if row.len() != plan.width as usize {
            findings.push(Finding {
                category: "shape",
                severity: Severity::Error,
                message: format!("row {} has {} cells but width is {}", r, row.len(), plan.width),
            });
        }
    }
    findings
}

/// Doors must lie inside the grid and appear once.
pub fn check_doors(plan: &Plan) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut seen = HashSet::new();
    for &(r, c) in &plan.doors {
        if !plan.in_bounds(r as usize, c as usize) {
            findings.push(Finding {
                category: "doors",
                severity: Severity::Error,
                message: format!("door at ({}, {}) is outside the room", r, c),
            });
        }
        if !seen.insert((r, c)) {
            findings.push(Finding {
                category: "doors",
                severity: Severity::Warning,
                message: format!("door at ({}, {}) listed twice", r, c),
            });
        }
    }
    findings
}

// ── B. Placements ───────────────────────────────────────────────────────

/// Footprints resolve, stay in bounds, cover usable floor, avoid doors, and
/// never share a cell.
pub fn check_placements(plan: &Plan, set: &FurnitureSet) -> Vec<Finding> {
    let mut findings = Vec::new();
    let cache = FootprintCache::build(set);
    let mut owner: Vec<Option<usize>> = vec![None; plan.width as usize * plan.height as usize];

    for (i, p) in plan.placements.iter().enumerate() {
        let fp = match cache.get(p.group as usize, p.item as usize, p.rotation) {
            Ok(fp) => fp,
            Err(e) => {
                findings.push(Finding {
                    category: "placement",
                    severity: Severity::Error,
                    message: format!("placement #{} ({:?}): {}", i, p, e),
                });
                continue;
            }
        };
        let (r0, c0) = (p.row as usize, p.col as usize);
        if r0 + fp.height > plan.height as usize || c0 + fp.width > plan.width as usize {
            findings.push(Finding {
                category: "placement",
                severity: Severity::Error,
                message: format!(
                    "placement #{} at ({}, {}) extends outside the {}×{} room",
                    i, r0, c0, plan.width, plan.height
                ),
            });
            continue;
        }
        for (dr, dc, _) in fp.tiles() {
            let (r, c) = (r0 + dr, c0 + dc);
            if !plan.is_usable(r, c) {
                findings.push(Finding {
                    category: "placement",
                    severity: Severity::Error,
                    message: format!("placement #{} covers non-floor cell ({}, {})", i, r, c),
                });
            }
            if plan.is_door(r, c) {
                findings.push(Finding {
                    category: "placement",
                    severity: Severity::Error,
                    message: format!("placement #{} covers door ({}, {})", i, r, c),
                });
            }
            let idx = r * plan.width as usize + c;
            match owner[idx] {
                Some(other) => findings.push(Finding {
                    category: "overlap",
                    severity: Severity::Error,
                    message: format!(
                        "placements #{} and #{} both cover ({}, {})",
                        other, i, r, c
                    ),
                }),
                None => owner[idx] = Some(i),
            }
        }
    }
    findings
}

/// Group minimums (warning) and maximums (error).
pub fn check_group_bounds(plan: &Plan, set: &FurnitureSet) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (g, group) in set.groups.iter().enumerate() {
        let count = plan.group_count(g);
        if count < group.min {
            findings.push(Finding {
                category: "cardinality",
                severity: Severity::Warning,
                message: format!(
                    "{} has {} placements, needs at least {}",
                    group.label(g),
                    count,
                    group.min
                ),
            });
        }
        if let Some(max) = group.max {
            if count > max {
                findings.push(Finding {
                    category: "cardinality",
                    severity: Severity::Error,
                    message: format!(
                        "{} has {} placements, allows at most {}",
                        group.label(g),
                        count,
                        max
                    ),
                });
            }
        }
    }
    findings
}

// ── Master audit ────────────────────────────────────────────────────────

/// Run every check and return the combined findings.
pub fn audit_plan(plan: &Plan, set: &FurnitureSet) -> Vec<Finding> {
    let mut all = Vec::new();
    all.extend(check_shape(plan));
    all.extend(check_doors(plan));
    all.extend(check_placements(plan, set));
    all.extend(check_group_bounds(plan, set));
    all
}

/// True when the audit found no errors (warnings allowed).
pub fn is_consistent(findings: &[Finding]) -> bool {
    findings.iter().all(|f| f.severity != Severity::Error)
}
