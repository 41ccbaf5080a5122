//! Center-out structural layout of a ship's cargo hold.
//!
//! The hold is a tile grid walked outward from its center row in both
//! directions. Row kinds alternate by parity of a running counter reset
//! at the center: "window rows" carry hull walls, floors and widthwise
//! beams; "post rows" carry column walls and floors. Two special rows
//! three tiles either side of center carry the lengthwise cross-beam
//! assembly that braces the hull, with a support column at its middle.
//! Cells on the absolute grid boundary always resolve to wall, corner
//! or end-wall pieces, never to beams.
//!
//! The walk is fully deterministic: the same dimensions always produce
//! the same grid. Randomness lives upstream (dimension choice) and
//! downstream (cargo placement), never here.

use serde::{Deserialize, Serialize};

/// The structural part a grid cell calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    /// Side hull wall with a porthole cutout.
    Wall,
    /// One of the four grid corners.
    CornerWall,
    /// Plain deck floor.
    Floor,
    /// Widthwise overhead beam.
    WidthBeam,
    /// Lengthwise overhead beam (cross-beam rows only).
    LengthBeam,
    /// Beam crossing piece where width and length beams meet.
    CrossBeam,
    /// Support column at the middle of a cross-beam row.
    Column,
    /// End wall segment on the bow/stern boundary.
    FinalWall,
    /// Boundary wall rotated to face along the ship's axis.
    RotatedWall,
    /// Side wall with a thick structural column (cross-beam rows).
    ThickColumnWall,
    /// Side wall with a thin structural column (other post rows).
    ThinColumnWall,
}

impl PartKind {
    pub const ALL: [PartKind; 11] = [
        PartKind::Wall,
        PartKind::CornerWall,
        PartKind::Floor,
        PartKind::WidthBeam,
        PartKind::LengthBeam,
        PartKind::CrossBeam,
        PartKind::Column,
        PartKind::FinalWall,
        PartKind::RotatedWall,
        PartKind::ThickColumnWall,
        PartKind::ThinColumnWall,
    ];

    pub fn is_beam(self) -> bool {
        matches!(
            self,
            PartKind::WidthBeam | PartKind::LengthBeam | PartKind::CrossBeam
        )
    }
}

/// One grid cell: the part to place and its yaw in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureCell {
    pub kind: PartKind,
    pub y_rotation: f32,
}

/// A finished `length_count × width_count` structural grid, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureLayout {
    cells: Vec<StructureCell>,
    length_count: usize,
    width_count: usize,
}

impl StructureLayout {
    pub fn length_count(&self) -> usize {
        self.length_count
    }

    pub fn width_count(&self) -> usize {
        self.width_count
    }

    pub fn length_center(&self) -> usize {
        self.length_count / 2
    }

    pub fn width_center(&self) -> usize {
        (self.width_count - 1) / 2
    }

    pub fn cell(&self, row: usize, col: usize) -> StructureCell {
        self.cells[row * self.width_count + col]
    }

    fn set(&mut self, row: usize, col: usize, kind: PartKind, y_rotation: f32) {
        self.cells[row * self.width_count + col] = StructureCell { kind, y_rotation };
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, StructureCell)> + '_ {
        let width = self.width_count;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (i / width, i % width, c))
    }
}

/// Which half of the grid a row belongs to, relative to the center row.
#[derive(Clone, Copy, PartialEq)]
enum Half {
    /// Center row toward the stern (increasing row index).
    Aft,
    /// Rows above the center toward the bow (decreasing row index).
    Fore,
}

/// Build the structural grid for the given tile dimensions.
pub fn build_layout(length_count: usize, width_count: usize) -> StructureLayout {
    let mut layout = StructureLayout {
        cells: vec![
            StructureCell {
                kind: PartKind::Floor,
                y_rotation: 90.0,
            };
            length_count * width_count
        ],
        length_count,
        width_count,
    };

    let l_center = length_count / 2;

    // Aft half, center row first: the row counter starts even so the
    // center row is a window row.
    for (l_iter, i) in (l_center..length_count).enumerate() {
        fill_row(&mut layout, i, l_iter, Half::Aft);
    }

    // Fore half, walking away from center: the counter starts at 1 so
    // the alternation continues seamlessly across the center.
    for (step, i) in (0..l_center).rev().enumerate() {
        fill_row(&mut layout, i, step + 1, Half::Fore);
    }

    layout
}

fn fill_row(layout: &mut StructureLayout, row: usize, l_iter: usize, half: Half) {
    let length = layout.length_count();
    let width = layout.width_count();
    let l_center = layout.length_center();
    let w_center = layout.width_center();

    let boundary = match half {
        Half::Aft => row == length - 1,
        Half::Fore => row == 0,
    };
    let cross_row = match half {
        Half::Aft => row == l_center + 3 && !boundary,
        Half::Fore => row + 3 == l_center && !boundary,
    };

    // Boundary pieces face outward: aft boundary keeps the base yaw,
    // fore boundary is flipped half a turn.
    let (corner_first, corner_last, end_rotation) = match half {
        Half::Aft => (0.0, -90.0, 0.0),
        Half::Fore => (90.0, 180.0, 180.0),
    };

    // Whether the width axis starts on an aisle or a beam column.
    let w_start = if w_center % 2 == 0 { 0 } else { 1 };

    for j in 0..width {
        let w_iter = w_start + j;

        if l_iter % 2 == 0 {
            // Window row: hull walls at the sides, floor/beam interior.
            if j == 0 {
                if boundary {
                    layout.set(row, j, PartKind::CornerWall, corner_first);
                } else {
                    layout.set(row, j, PartKind::Wall, 90.0);
                }
            } else if j == width - 1 {
                if boundary {
                    layout.set(row, j, PartKind::CornerWall, corner_last);
                } else {
                    layout.set(row, j, PartKind::Wall, -90.0);
                }
            } else if w_iter % 2 == 0 {
                if boundary {
                    layout.set(row, j, PartKind::RotatedWall, end_rotation);
                } else {
                    layout.set(row, j, PartKind::Floor, 90.0);
                }
            } else if boundary {
                layout.set(row, j, PartKind::FinalWall, end_rotation);
            } else {
                layout.set(row, j, PartKind::WidthBeam, 90.0);
            }
        } else {
            // Post row: column walls at the sides; cross-beam rows
            // override the interior with the bracing assembly.
            if j == 0 {
                if boundary {
                    layout.set(row, j, PartKind::CornerWall, corner_first);
                } else if cross_row {
                    layout.set(row, j, PartKind::ThickColumnWall, 90.0);
                } else {
                    layout.set(row, j, PartKind::ThinColumnWall, 90.0);
                }
            } else if j == width - 1 {
                if boundary {
                    layout.set(row, j, PartKind::CornerWall, corner_last);
                } else if cross_row {
                    layout.set(row, j, PartKind::ThickColumnWall, -90.0);
                } else {
                    layout.set(row, j, PartKind::ThinColumnWall, -90.0);
                }
            } else if w_iter % 2 == 0 {
                if boundary {
                    layout.set(row, j, PartKind::RotatedWall, end_rotation);
                } else if cross_row {
                    if j == w_center {
                        layout.set(row, j, PartKind::Column, 90.0);
                    } else {
                        layout.set(row, j, PartKind::LengthBeam, 90.0);
                    }
                } else {
                    layout.set(row, j, PartKind::Floor, 90.0);
                }
            } else if boundary {
                layout.set(row, j, PartKind::FinalWall, end_rotation);
            } else if cross_row {
                layout.set(row, j, PartKind::CrossBeam, 90.0);
            } else {
                layout.set(row, j, PartKind::WidthBeam, 90.0);
            }
        }
    }
}

/// Required part instances per kind, derived from a finished grid.
///
/// A pure function of the grid (and therefore of the dimensions), kept
/// separate from grid construction so allocation sizes can be tested
/// without a scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartTally {
    pub walls: usize,
    pub corner_walls: usize,
    pub floors: usize,
    pub width_beams: usize,
    pub length_beams: usize,
    pub cross_beams: usize,
    pub columns: usize,
    pub final_walls: usize,
    pub rotated_walls: usize,
    pub thick_column_walls: usize,
    pub thin_column_walls: usize,
}

impl PartTally {
    pub fn of(layout: &StructureLayout) -> Self {
        let mut tally = Self::default();
        for (_, _, cell) in layout.cells() {
            match cell.kind {
                PartKind::Wall => tally.walls += 1,
                PartKind::CornerWall => tally.corner_walls += 1,
                PartKind::Floor => tally.floors += 1,
                PartKind::WidthBeam => tally.width_beams += 1,
                PartKind::LengthBeam => tally.length_beams += 1,
                PartKind::CrossBeam => tally.cross_beams += 1,
                PartKind::Column => tally.columns += 1,
                PartKind::FinalWall => tally.final_walls += 1,
                PartKind::RotatedWall => tally.rotated_walls += 1,
                PartKind::ThickColumnWall => tally.thick_column_walls += 1,
                PartKind::ThinColumnWall => tally.thin_column_walls += 1,
            }
        }
        tally
    }

    pub fn count(&self, kind: PartKind) -> usize {
        match kind {
            PartKind::Wall => self.walls,
            PartKind::CornerWall => self.corner_walls,
            PartKind::Floor => self.floors,
            PartKind::WidthBeam => self.width_beams,
            PartKind::LengthBeam => self.length_beams,
            PartKind::CrossBeam => self.cross_beams,
            PartKind::Column => self.columns,
            PartKind::FinalWall => self.final_walls,
            PartKind::RotatedWall => self.rotated_walls,
            PartKind::ThickColumnWall => self.thick_column_walls,
            PartKind::ThinColumnWall => self.thin_column_walls,
        }
    }

    pub fn total(&self) -> usize {
        PartKind::ALL.iter().map(|&k| self.count(k)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dimensions() -> impl Iterator<Item = (usize, usize)> {
        (9..=17)
            .step_by(2)
            .flat_map(|l| (5..=9).step_by(2).map(move |w| (l, w)))
    }

    #[test]
    fn layout_matches_requested_dimensions() {
        for (length, width) in valid_dimensions() {
            let layout = build_layout(length, width);
            assert_eq!(layout.length_count(), length);
            assert_eq!(layout.width_count(), width);
            assert_eq!(layout.cells().count(), length * width);
        }
    }

    #[test]
    fn layout_is_deterministic() {
        for (length, width) in valid_dimensions() {
            assert_eq!(build_layout(length, width), build_layout(length, width));
        }
    }

    #[test]
    fn exactly_four_corners_at_the_grid_corners() {
        for (length, width) in valid_dimensions() {
            let layout = build_layout(length, width);
            for &(i, j) in &[
                (0, 0),
                (0, width - 1),
                (length - 1, 0),
                (length - 1, width - 1),
            ] {
                assert_eq!(layout.cell(i, j).kind, PartKind::CornerWall);
            }
            let tally = PartTally::of(&layout);
            assert_eq!(tally.corner_walls, 4, "{length}×{width}");
        }
    }

    #[test]
    fn boundary_rows_never_carry_beams() {
        for (length, width) in valid_dimensions() {
            let layout = build_layout(length, width);
            for j in 0..width {
                assert!(!layout.cell(0, j).kind.is_beam());
                assert!(!layout.cell(length - 1, j).kind.is_beam());
            }
        }
    }

    #[test]
    fn center_row_is_a_window_row() {
        for (length, width) in valid_dimensions() {
            let layout = build_layout(length, width);
            let center = layout.length_center();
            assert_eq!(layout.cell(center, 0).kind, PartKind::Wall);
            assert_eq!(layout.cell(center, width - 1).kind, PartKind::Wall);
        }
    }

    #[test]
    fn rows_alternate_symmetrically_around_center() {
        let layout = build_layout(13, 7);
        let center = layout.length_center();
        // Both neighbours of the center row are post rows.
        assert_eq!(layout.cell(center + 1, 0).kind, PartKind::ThinColumnWall);
        assert_eq!(layout.cell(center - 1, 0).kind, PartKind::ThinColumnWall);
        // Two out, both window rows again.
        assert_eq!(layout.cell(center + 2, 0).kind, PartKind::Wall);
        assert_eq!(layout.cell(center - 2, 0).kind, PartKind::Wall);
    }

    #[test]
    fn cross_beam_rows_sit_three_out_from_center() {
        for (length, width) in valid_dimensions() {
            let layout = build_layout(length, width);
            let center = layout.length_center();
            let w_center = layout.width_center();
            for row in [center + 3, center - 3] {
                assert_eq!(
                    layout.cell(row, 0).kind,
                    PartKind::ThickColumnWall,
                    "{length}×{width} row {row}"
                );
                assert_eq!(layout.cell(row, w_center).kind, PartKind::Column);
                // Odd-parity interior cells carry the crossing pieces.
                let tally_row: Vec<_> =
                    (1..width - 1).map(|j| layout.cell(row, j).kind).collect();
                assert!(tally_row.contains(&PartKind::CrossBeam));
            }
        }
    }

    #[test]
    fn no_cross_beams_outside_their_rows() {
        let layout = build_layout(17, 9);
        let center = layout.length_center();
        for (i, _, cell) in layout.cells() {
            if cell.kind == PartKind::CrossBeam || cell.kind == PartKind::LengthBeam {
                assert!(i == center + 3 || i == center - 3, "row {i}");
            }
        }
    }

    #[test]
    fn column_parity_is_center_relative() {
        // Width 5: center column 2 is even-parity (aisle); width 7:
        // center column 3 is also aisle because parity resets from the
        // center, not from column zero.
        for width in [5, 7, 9] {
            let layout = build_layout(9, width);
            let center_row = layout.length_center();
            let w_center = layout.width_center();
            assert_eq!(layout.cell(center_row, w_center).kind, PartKind::Floor);
        }
    }

    #[test]
    fn tally_accounts_for_every_cell() {
        for (length, width) in valid_dimensions() {
            let layout = build_layout(length, width);
            let tally = PartTally::of(&layout);
            assert_eq!(tally.total(), length * width);
        }
    }

    #[test]
    fn side_walls_face_opposite_directions() {
        let layout = build_layout(9, 5);
        let center = layout.length_center();
        assert_eq!(layout.cell(center, 0).y_rotation, 90.0);
        assert_eq!(layout.cell(center, 4).y_rotation, -90.0);
    }
}
