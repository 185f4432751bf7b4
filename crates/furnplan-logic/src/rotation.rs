//! Rotation transform: maps an item's tile grid to its effective orientation.
//!
//! Grids are row-major `Vec<Vec<T>>` and are assumed rectangular (the catalog
//! validator rejects ragged items). All functions are pure.

/// Rotations legal for a group's orientation mode.
pub fn legal_rotations(rotations: u8) -> &'static [u8] {
    match rotations {
        0 => &[0],
        1 => &[0, 1],
        3 => &[0, 1, 2, 3],
        _ => &[],
    }
}

/// Whether `rotation` is allowed under orientation mode `rotations`.
pub fn is_legal(rotations: u8, rotation: u8) -> bool {
    legal_rotations(rotations).contains(&rotation)
}

/// Turn a grid clockwise by `quarter_turns` × 90°.
pub fn rotate<T: Clone>(grid: &[Vec<T>], quarter_turns: u8) -> Vec<Vec<T>> {
    let mut out: Vec<Vec<T>> = grid.to_vec();
    for _ in 0..(quarter_turns % 4) {
        out = rotate_once(&out);
    }
    out
}

fn rotate_once<T: Clone>(grid: &[Vec<T>]) -> Vec<Vec<T>> {
    let h = grid.len();
    let w = grid.first().map(|r| r.len()).unwrap_or(0);
    // new[r][c] = old[h - 1 - c][r]
    (0..w)
        .map(|r| (0..h).map(|c| grid[h - 1 - c][r].clone()).collect())
        .collect()
}

/// Flip a grid left-right.
pub fn mirror<T: Clone>(grid: &[Vec<T>]) -> Vec<Vec<T>> {
    grid.iter()
        .map(|row| row.iter().rev().cloned().collect())
        .collect()
}

/// Effective grid for `rotation` under a group's orientation rules.
///
/// Returns `None` when the rotation is not legal for the mode. With
/// `rotations == 1`, orientation 1 is a mirror when `mirror` is set and a
/// quarter turn otherwise.
pub fn orient<T: Clone>(
    grid: &[Vec<T>],
    rotations: u8,
    mirror_alt: bool,
    rotation: u8,
) -> Option<Vec<Vec<T>>> {
    if !is_legal(rotations, rotation) {
        return None;
    }
    match (rotations, rotation) {
        (_, 0) => Some(grid.to_vec()),
        (1, 1) if mirror_alt => Some(mirror(grid)),
        _ => Some(rotate(grid, rotation)),
    }
}

/// `(height, width)` of an item after orientation, without building the grid.
pub fn oriented_dims(height: usize, width: usize, rotations: u8, mirror_alt: bool, rotation: u8) -> (usize, usize) {
    if rotation % 2 == 1 && !(rotations == 1 && mirror_alt) {
        (width, height)
    } else {
        (height, width)
    }
}
