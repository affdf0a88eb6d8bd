//! Shared test utilities for the fisheye-rectify test suite.
//!
//! Provides small synthetic source rasters so projector and pipeline tests
//! don't need image files on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = marked_raster(4, 4, [255, 255, 255], (2, 2), [255, 0, 0]);
//! let output = rectify(&source, Rounding::Nearest).unwrap();
//! ```

use crate::imaging::{Raster, Rgb};

// =========================================================================
// Raster fixtures
// =========================================================================

/// Every pixel set to `color`.
pub fn solid_raster(width: u32, height: u32, color: Rgb) -> Raster {
    Raster::from_fn(width, height, |_, _| color)
}

/// `background` everywhere except a single `mark` pixel at `at = (x, y)`.
pub fn marked_raster(width: u32, height: u32, background: Rgb, at: (u32, u32), mark: Rgb) -> Raster {
    Raster::from_fn(width, height, |x, y| if (x, y) == at { mark } else { background })
}

/// A raster where neighbouring pixels differ, so a wrong lookup shows up as a
/// wrong color rather than a coincidental match.
pub fn gradient_raster(width: u32, height: u32) -> Raster {
    Raster::from_fn(width, height, |x, y| {
        [
            (x.wrapping_mul(7) % 256) as u8,
            (y.wrapping_mul(13) % 256) as u8,
            ((x + y * 3) % 251) as u8,
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_raster_has_one_mark() {
        let raster = marked_raster(5, 5, [0, 0, 0], (3, 1), [9, 9, 9]);
        let marks = raster.pixels().iter().filter(|p| **p == [9, 9, 9]).count();
        assert_eq!(marks, 1);
        assert_eq!(raster.get(3, 1), [9, 9, 9]);
    }

    #[test]
    fn gradient_neighbours_differ() {
        let raster = gradient_raster(10, 10);
        assert_ne!(raster.get(4, 4), raster.get(5, 4));
        assert_ne!(raster.get(4, 4), raster.get(4, 5));
    }
}
