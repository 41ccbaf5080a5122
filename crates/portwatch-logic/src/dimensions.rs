//! Ship dimension generation and validation.
//!
//! A ship's hold is a `length_count × width_count` tile grid. Both
//! counts are odd so the grid has a true center row and column, and
//! both stay within the native template bounds by construction.
//! Out-of-range dimensions are a programming error, not a runtime
//! condition, so generation clamps rather than fails.

use crate::template::{NATIVE_LENGTH, NATIVE_WIDTH};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tile-grid size and per-tile world extents for one ship.
///
/// Generated once per spawn and immutable for the ship's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipDimensions {
    /// Tiles bow to stern. Odd, 9..=17.
    pub length_count: usize,
    /// Tiles port to starboard. Odd, 5..=9.
    pub width_count: usize,
    /// World length of one tile.
    pub body_length: f32,
    /// World width of one tile.
    pub body_width: f32,
}

impl ShipDimensions {
    pub fn new(length_count: usize, width_count: usize) -> Self {
        Self {
            length_count,
            width_count,
            body_length: 1.0,
            body_width: 1.0,
        }
    }

    /// Center row index (the mast row).
    pub fn length_center(&self) -> usize {
        self.length_count / 2
    }

    /// Center column index.
    pub fn width_center(&self) -> usize {
        (self.width_count - 1) / 2
    }

    pub fn validate(&self) -> Vec<DimensionError> {
        let mut errors = Vec::new();
        if !(9..=NATIVE_LENGTH).contains(&self.length_count) {
            errors.push(DimensionError::LengthOutOfRange(self.length_count));
        }
        if !(5..=NATIVE_WIDTH).contains(&self.width_count) {
            errors.push(DimensionError::WidthOutOfRange(self.width_count));
        }
        if self.length_count % 2 == 0 {
            errors.push(DimensionError::LengthNotOdd(self.length_count));
        }
        if self.width_count % 2 == 0 {
            errors.push(DimensionError::WidthNotOdd(self.width_count));
        }
        errors
    }
}

/// Dimension validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    LengthOutOfRange(usize),
    WidthOutOfRange(usize),
    LengthNotOdd(usize),
    WidthNotOdd(usize),
}

/// Draw random dimensions for a new ship: length 9..=17, width 5..=9,
/// even draws rounded down to the nearest odd value.
pub fn random_dimensions(rng: &mut impl Rng) -> ShipDimensions {
    let mut length_count = rng.gen_range(9..18);
    if length_count % 2 == 0 {
        length_count -= 1;
    }
    let mut width_count = rng.gen_range(5..10);
    if width_count % 2 == 0 {
        width_count -= 1;
    }
    ShipDimensions::new(length_count, width_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_dimensions_are_always_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let dims = random_dimensions(&mut rng);
            assert!(
                dims.validate().is_empty(),
                "invalid dimensions generated: {dims:?}"
            );
        }
    }

    #[test]
    fn random_dimensions_cover_the_full_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut lengths = std::collections::HashSet::new();
        let mut widths = std::collections::HashSet::new();
        for _ in 0..500 {
            let dims = random_dimensions(&mut rng);
            lengths.insert(dims.length_count);
            widths.insert(dims.width_count);
        }
        assert_eq!(lengths, [9, 11, 13, 15, 17].into_iter().collect());
        assert_eq!(widths, [5, 7, 9].into_iter().collect());
    }

    #[test]
    fn centers_are_exact_middles() {
        let dims = ShipDimensions::new(9, 5);
        assert_eq!(dims.length_center(), 4);
        assert_eq!(dims.width_center(), 2);
        let dims = ShipDimensions::new(17, 9);
        assert_eq!(dims.length_center(), 8);
        assert_eq!(dims.width_center(), 4);
    }

    #[test]
    fn validation_flags_bad_dimensions() {
        let too_long = ShipDimensions::new(19, 5);
        assert!(too_long
            .validate()
            .contains(&DimensionError::LengthOutOfRange(19)));

        let even = ShipDimensions::new(10, 6);
        let errors = even.validate();
        assert!(errors.contains(&DimensionError::LengthNotOdd(10)));
        assert!(errors.contains(&DimensionError::WidthNotOdd(6)));

        let too_narrow = ShipDimensions::new(9, 3);
        assert!(too_narrow
            .validate()
            .contains(&DimensionError::WidthOutOfRange(3)));
    }
}
