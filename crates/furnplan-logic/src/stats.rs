//! Stat aggregation: turns a set of placements into building statistics.
//!
//! Accumulation is a plain sum over placements (order independent). The
//! ratio stats (efficiency, relative) are only derived at display time.

use serde::Serialize;

use crate::plan::Plan;
use crate::schema::{Building, FurnitureSet, Stat, StatType};

/// Raw per-stat totals, one entry per declared stat.
pub fn compute_stats(plan: &Plan, building: &Building, set: &FurnitureSet) -> Vec<f64> {
    let mut totals = vec![0.0; set.stats.len()];
    for p in &plan.placements {
        let Some(item) = set.item(p.group as usize, p.item as usize) else {
            log::warn!("placement {:?} references an unknown item", p);
            continue;
        };
        let mult = item.stats_multiplier();
        for (i, total) in totals.iter_mut().enumerate() {
            *total += building.contribution(p.group as usize, i) * mult;
        }
    }
    totals
}

/// Index of the stat used as the denominator for relative displays.
///
/// First `services`; else first `employees`; else first custom headcount
/// (`workers`/`men`); else 0.
pub fn primary_stat(stats: &[Stat]) -> usize {
    stats
        .iter()
        .position(|s| s.kind == StatType::Services)
        .or_else(|| stats.iter().position(|s| s.kind == StatType::Employees))
        .or_else(|| stats.iter().position(|s| s.is_headcount()))
        .unwrap_or(0)
}

/// Total of the first `employees` stat, 0 if none is declared.
pub fn employees_total(stats: &[Stat], totals: &[f64]) -> f64 {
    stats
        .iter()
        .position(|s| s.kind == StatType::Employees)
        .and_then(|i| totals.get(i).copied())
        .unwrap_or(0.0)
}

/// Efficiency fraction in `[0.5, 1.0]`; 0 when nothing contributes.
pub fn efficiency(value: f64, employees: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    0.5 + 0.5 * (value / employees.max(1.0)).min(1.0)
}

/// `value / primary`, 0 when the primary total is 0.
pub fn relative(value: f64, primary: f64) -> f64 {
    if primary == 0.0 {
        0.0
    } else {
        value / primary
    }
}

/// A stat ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedStat {
    pub name: String,
    pub kind: StatType,
    /// Accumulated total.
    pub raw: f64,
    /// Displayed number (fraction for ratio stats).
    pub value: f64,
    pub display: String,
}

/// Apply the display rules to a set of totals.
pub fn format_stats(stats: &[Stat], totals: &[f64]) -> Vec<FormattedStat> {
    let primary = totals.get(primary_stat(stats)).copied().unwrap_or(0.0);
    let employees = employees_total(stats, totals);

    stats
        .iter()
        .enumerate()
        .map(|(i, stat)| {
            let raw = totals.get(i).copied().unwrap_or(0.0);
            let (value, display) = match stat.kind {
                StatType::Efficiency => {
                    let v = efficiency(raw, employees);
                    (v, format!("{:.1}%", v * 100.0))
                }
                StatType::Relative | StatType::EmployeesRelative => {
                    let v = relative(raw, primary);
                    (v, format!("{:.1}%", v * 100.0))
                }
                _ if stat.is_integer_like() => {
                    let v = raw.round();
                    (v, format!("{:.0}", v))
                }
                _ => {
                    let v = (raw * 10.0).round() / 10.0;
                    (v, format!("{:.1}", v))
                }
            };
            FormattedStat {
                name: stat.name.clone(),
                kind: stat.kind,
                raw,
                value,
                display,
            }
        })
        .collect()
}

/// Scalar the optimizer maximizes: the primary total weighted by
/// `primary_weight`, plus every other non-ratio total.
pub fn objective(stats: &[Stat], totals: &[f64], primary_weight: f64) -> f64 {
    let primary = primary_stat(stats);
    stats
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_ratio())
        .map(|(i, _)| {
            let v = totals.get(i).copied().unwrap_or(0.0);
            if i == primary {
                v * primary_weight
            } else {
                v
            }
        })
        .sum()
}

/// Objective contribution of one placement of `(group, item)`.
pub fn placement_score(
    building: &Building,
    set: &FurnitureSet,
    group: usize,
    item: usize,
    primary_weight: f64,
) -> f64 {
    let Some(it) = set.item(group, item) else {
        return 0.0;
    };
    let totals: Vec<f64> = (0..set.stats.len())
        .map(|i| building.contribution(group, i) * it.stats_multiplier())
        .collect();
    objective(&set.stats, &totals, primary_weight)
}
