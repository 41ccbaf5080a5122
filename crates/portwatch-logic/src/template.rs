//! The canonical cargo-hold template and its priority-based trimming.
//!
//! Every ship's hold is laid out from one fixed 17×9 architectural
//! template. Smaller ships drop whole rows and columns, chosen by
//! per-axis priority vectors, until the template matches the ship's
//! tile dimensions. Low priority values are removed first; ties are
//! resolved in ascending index order.

use serde::{Deserialize, Serialize};

/// Native template size, in tiles. Ship dimensions may not exceed these.
pub const NATIVE_LENGTH: usize = 17;
pub const NATIVE_WIDTH: usize = 9;

/// What kind of cargo a template cell calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CargoCategory {
    /// Neutral filler clutter along the hold edges.
    Filler,
    /// A large container, or a small one half the time.
    Large,
    /// A small container.
    Small,
    /// A long double-width container.
    Double,
    /// Nothing placed here (aisle space).
    Empty,
}

const N: CargoCategory = CargoCategory::Filler;
const L: CargoCategory = CargoCategory::Large;
const S: CargoCategory = CargoCategory::Small;
const D: CargoCategory = CargoCategory::Double;
const E: CargoCategory = CargoCategory::Empty;

/// The full-size hold layout: aisles along the bow and stern, large
/// containers outboard, small containers stacked around the mast.
const CARGO_TEMPLATE: [[CargoCategory; NATIVE_WIDTH]; NATIVE_LENGTH] = [
    [N, N, L, L, L, L, L, N, N],
    [N, N, S, S, S, S, S, N, N],
    [L, S, E, E, E, E, E, S, L],
    [L, S, E, S, S, S, E, S, L],
    [L, S, E, S, S, S, E, S, L],
    [L, S, E, S, E, S, E, S, L],
    [L, S, E, S, D, S, E, S, L],
    [L, S, E, S, E, S, E, S, L],
    [L, S, E, S, E, S, E, S, L],
    [L, S, E, S, D, S, E, S, L],
    [L, S, E, S, E, S, E, S, L],
    [L, S, E, S, E, S, E, S, L],
    [L, S, E, S, S, S, E, S, L],
    [L, S, E, S, S, S, E, S, L],
    [L, S, E, E, E, E, E, S, L],
    [N, N, E, E, E, E, E, N, N],
    [N, N, E, E, E, E, E, N, N],
];

/// Row removal priority, bow to stern. Lower values are dropped first.
pub const LENGTH_PRIORITY: [u8; NATIVE_LENGTH] =
    [3, 2, 4, 1, 0, 4, 4, 4, 4, 4, 4, 4, 0, 1, 4, 2, 3];

/// Column removal priority, port to starboard.
pub const WIDTH_PRIORITY: [u8; NATIVE_WIDTH] = [1, 0, 4, 4, 4, 4, 4, 0, 1];

/// A trimmed per-ship copy of the cargo template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoGrid {
    cells: Vec<CargoCategory>,
    length_count: usize,
    width_count: usize,
}

impl CargoGrid {
    pub fn length_count(&self) -> usize {
        self.length_count
    }

    pub fn width_count(&self) -> usize {
        self.width_count
    }

    pub fn cell(&self, row: usize, col: usize) -> CargoCategory {
        self.cells[row * self.width_count + col]
    }
}

/// Indices to drop when `remove_count` rows/columns must go: ascending
/// priority value, ties in ascending index order, stopping exactly at
/// the removal count.
pub fn indices_to_remove(priority: &[u8], remove_count: usize) -> Vec<usize> {
    let remove_count = remove_count.min(priority.len());
    let mut removed = Vec::with_capacity(remove_count);
    let mut current = 0u8;
    while removed.len() < remove_count {
        for (i, &p) in priority.iter().enumerate() {
            if p == current {
                removed.push(i);
            }
            if removed.len() == remove_count {
                break;
            }
        }
        current += 1;
    }
    removed
}

/// Derive a `length_count × width_count` template by removing the
/// lowest-priority rows and columns from the native template.
///
/// Survivors keep their relative order and are copied right-aligned
/// (filled from the highest index down). Requests larger than the
/// native size clamp to it; callers keep dimensions in range by
/// construction.
pub fn trim_template(length_count: usize, width_count: usize) -> CargoGrid {
    let length_count = length_count.min(NATIVE_LENGTH).max(1);
    let width_count = width_count.min(NATIVE_WIDTH).max(1);

    let removed_rows = indices_to_remove(&LENGTH_PRIORITY, NATIVE_LENGTH - length_count);
    let removed_cols = indices_to_remove(&WIDTH_PRIORITY, NATIVE_WIDTH - width_count);

    let mut cells = vec![CargoCategory::Empty; length_count * width_count];

    let mut l_index = length_count as isize - 1;
    for i in (0..NATIVE_LENGTH).rev() {
        if l_index < 0 {
            break;
        }
        if removed_rows.contains(&i) {
            continue;
        }
        let mut w_index = width_count as isize - 1;
        for j in (0..NATIVE_WIDTH).rev() {
            if w_index < 0 {
                break;
            }
            if removed_cols.contains(&j) {
                continue;
            }
            cells[l_index as usize * width_count + w_index as usize] = CARGO_TEMPLATE[i][j];
            w_index -= 1;
        }
        l_index -= 1;
    }

    CargoGrid {
        cells,
        length_count,
        width_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_template_is_square_with_priorities() {
        assert_eq!(LENGTH_PRIORITY.len(), NATIVE_LENGTH);
        assert_eq!(WIDTH_PRIORITY.len(), NATIVE_WIDTH);
    }

    #[test]
    fn remove_none_removes_nothing() {
        assert!(indices_to_remove(&LENGTH_PRIORITY, 0).is_empty());
    }

    #[test]
    fn removal_follows_priority_then_index() {
        // Width priorities [1,0,4,4,4,4,4,0,1]: the two 0s go first
        // (indices 1 and 7), then the two 1s (0 and 8).
        assert_eq!(indices_to_remove(&WIDTH_PRIORITY, 2), vec![1, 7]);
        assert_eq!(indices_to_remove(&WIDTH_PRIORITY, 4), vec![1, 7, 0, 8]);
    }

    #[test]
    fn removal_stops_mid_tier() {
        // Only one of the two priority-0 columns is needed: the lower
        // index wins the tie and index 7 survives.
        assert_eq!(indices_to_remove(&WIDTH_PRIORITY, 1), vec![1]);
    }

    #[test]
    fn removal_clamps_to_axis_length() {
        let all = indices_to_remove(&WIDTH_PRIORITY, 99);
        assert_eq!(all.len(), NATIVE_WIDTH);
    }

    #[test]
    fn trimmed_grid_has_requested_dimensions() {
        for length in (9..=17).step_by(2) {
            for width in (5..=9).step_by(2) {
                let grid = trim_template(length, width);
                assert_eq!(grid.length_count(), length);
                assert_eq!(grid.width_count(), width);
            }
        }
    }

    #[test]
    fn full_size_trim_is_identity() {
        let grid = trim_template(NATIVE_LENGTH, NATIVE_WIDTH);
        for i in 0..NATIVE_LENGTH {
            for j in 0..NATIVE_WIDTH {
                assert_eq!(grid.cell(i, j), CARGO_TEMPLATE[i][j]);
            }
        }
    }

    #[test]
    fn trimmed_cells_come_from_the_native_alphabet() {
        let grid = trim_template(9, 5);
        for i in 0..9 {
            for j in 0..5 {
                // Every surviving cell is a real template category.
                let c = grid.cell(i, j);
                assert!(matches!(
                    c,
                    CargoCategory::Filler
                        | CargoCategory::Large
                        | CargoCategory::Small
                        | CargoCategory::Double
                        | CargoCategory::Empty
                ));
            }
        }
    }

    #[test]
    fn narrow_trim_drops_outboard_columns() {
        // At width 5 the four outboard columns (priorities 0 and 1) are
        // gone, so the trimmed grid's columns map to native columns
        // 2..=6. Native row 2 is empty across that span.
        let grid = trim_template(NATIVE_LENGTH, 5);
        for j in 0..5 {
            assert_eq!(grid.cell(2, j), CargoCategory::Empty);
        }
    }

    #[test]
    fn oversize_request_clamps_to_native() {
        let grid = trim_template(99, 99);
        assert_eq!(grid.length_count(), NATIVE_LENGTH);
        assert_eq!(grid.width_count(), NATIVE_WIDTH);
    }

    #[test]
    fn double_containers_survive_mid_size_trims() {
        // The two Double cells sit in high-priority center rows and the
        // center column; they survive any valid trim.
        for length in (9..=17).step_by(2) {
            let grid = trim_template(length, 5);
            let doubles = (0..length)
                .flat_map(|i| (0..5).map(move |j| (i, j)))
                .filter(|&(i, j)| grid.cell(i, j) == CargoCategory::Double)
                .count();
            assert_eq!(doubles, 2, "length {length}");
        }
    }
}
