//! The polar-to-rectilinear transform.
//!
//! For output pixel `(x, y)` the projector looks up the source pixel at
//!
//! ```text
//! theta   = -x / max_radius
//! mag     = max_radius - y
//! target  = (mid_x + mag·sin θ, mid_y + mag·cos θ)   snapped by Rounding
//! ```
//!
//! and copies it, or writes black when `target` lies outside the source.
//! Sampling is nearest-neighbor; no two source pixels are ever blended.
//!
//! Output rows are independent, so [`Projector::render`] hands disjoint row
//! slices to rayon. The result is identical to [`Projector::render_sequential`].
//! Each row also counts its in-bounds lookups, so the coverage figure in the
//! run report comes out of the same pass.

use super::calculations::{Geometry, column_angles};
use super::params::Rounding;
use super::raster::{BLACK, Raster, Rgb};
use rayon::prelude::*;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("Invalid source dimensions {width}x{height}: need a radius of at least one pixel")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Pixel buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("Source is {}x{}, projector was built for {}x{}", actual.0, actual.1, expected.0, expected.1)]
    SourceMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// A configured transform for one source size.
#[derive(Debug, Clone)]
pub struct Projector {
    geometry: Geometry,
    rounding: Rounding,
    /// `(sin θ, cos θ)` per output column.
    angles: Vec<(f64, f64)>,
}

impl Projector {
    /// Prepare a projector for a `width × height` source.
    ///
    /// Rejects sources with a zero dimension, and sources so small that the
    /// radius is zero (1×1), since both would yield an empty output.
    pub fn new(width: u32, height: u32, rounding: Rounding) -> Result<Self, ProjectionError> {
        let geometry = Geometry::for_source(width, height);
        if width == 0 || height == 0 || geometry.max_radius == 0 {
            return Err(ProjectionError::InvalidDimensions { width, height });
        }
        Ok(Self {
            angles: column_angles(&geometry),
            geometry,
            rounding,
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Integer source coordinate for output pixel `(x, y)`, or `None` when
    /// it falls outside the source or `x` is past the last column.
    #[inline]
    pub fn source_coordinate(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        let &(sin_t, cos_t) = self.angles.get(x as usize)?;
        let (fx, fy) = self.geometry.source_point(sin_t, cos_t, y);
        let tx = self.rounding.apply(fx);
        let ty = self.rounding.apply(fy);
        self.geometry
            .contains(tx, ty)
            .then_some((tx as u32, ty as u32))
    }

    /// Render the full output raster, rows in parallel.
    pub fn render(&self, source: &Raster) -> Result<Raster, ProjectionError> {
        self.render_counted(source).map(|(output, _)| output)
    }

    /// Render rows in parallel and return the raster together with the
    /// number of output pixels whose lookup landed inside the source.
    pub fn render_counted(&self, source: &Raster) -> Result<(Raster, u64), ProjectionError> {
        self.check_source(source)?;
        let (out_w, out_h) = self.geometry.output_dimensions();
        let mut output = Raster::new(out_w, out_h);
        let sampled = output
            .pixels_mut()
            .par_chunks_mut(out_w as usize)
            .enumerate()
            .map(|(y, row)| self.render_row(source, y as u32, row))
            .sum::<u64>();
        Ok((output, sampled))
    }

    /// Same as [`render_counted`](Self::render_counted), on the calling thread.
    pub fn render_sequential(&self, source: &Raster) -> Result<(Raster, u64), ProjectionError> {
        self.check_source(source)?;
        let (out_w, out_h) = self.geometry.output_dimensions();
        let mut output = Raster::new(out_w, out_h);
        let mut sampled = 0;
        for (y, row) in output.pixels_mut().chunks_mut(out_w as usize).enumerate() {
            sampled += self.render_row(source, y as u32, row);
        }
        Ok((output, sampled))
    }

    /// Fill one output row; returns how many of its pixels were sampled.
    fn render_row(&self, source: &Raster, y: u32, row: &mut [Rgb]) -> u64 {
        let mut sampled = 0;
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = match self.source_coordinate(x as u32, y) {
                Some((sx, sy)) => {
                    sampled += 1;
                    source.get(sx, sy)
                }
                None => BLACK,
            };
        }
        sampled
    }

    fn check_source(&self, source: &Raster) -> Result<(), ProjectionError> {
        let expected = (self.geometry.width, self.geometry.height);
        let actual = source.dimensions();
        if actual != expected {
            return Err(ProjectionError::SourceMismatch { expected, actual });
        }
        Ok(())
    }
}

/// Unroll `source` into a rectilinear strip of `circumference × max_radius`.
pub fn rectify(source: &Raster, rounding: Rounding) -> Result<Raster, ProjectionError> {
    Projector::new(source.width(), source.height(), rounding)?.render(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_raster, marked_raster, solid_raster};

    const WHITE: Rgb = [255, 255, 255];
    const RED: Rgb = [255, 0, 0];

    /// Straight transcription of the per-pixel formula, independent of the
    /// projector's column tables.
    fn reference_target(g: &Geometry, rounding: Rounding, x: u32, y: u32) -> (i64, i64) {
        let theta = -(x as f64) / g.max_radius as f64;
        let mag = (g.max_radius - y) as f64;
        let ty = rounding.apply(g.mid_y as f64 + mag * theta.cos());
        let tx = rounding.apply(g.mid_x as f64 + mag * theta.sin());
        (tx, ty)
    }

    // =========================================================================
    // Dimensions and rejection
    // =========================================================================

    #[test]
    fn four_by_four_yields_twelve_by_two() {
        let source = marked_raster(4, 4, WHITE, (2, 2), RED);
        let output = rectify(&source, Rounding::Nearest).unwrap();
        assert_eq!(output.dimensions(), (12, 2));
    }

    #[test]
    fn four_by_four_pixels_match_formula() {
        let source = marked_raster(4, 4, WHITE, (2, 2), RED);
        let output = rectify(&source, Rounding::Nearest).unwrap();
        let g = Geometry::for_source(4, 4);
        for y in 0..2 {
            for x in 0..12 {
                let (tx, ty) = reference_target(&g, Rounding::Nearest, x, y);
                let expected = if g.contains(tx, ty) {
                    if (tx, ty) == (2, 2) { RED } else { WHITE }
                } else {
                    BLACK
                };
                assert_eq!(output.get(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn four_by_four_first_column_of_rim_is_off_image() {
        // x = 0, y = 0: theta = 0, mag = 2 → target (2, 4), one row below the image.
        let source = solid_raster(4, 4, WHITE);
        let output = rectify(&source, Rounding::Nearest).unwrap();
        assert_eq!(output.get(0, 0), BLACK);
        // Innermost ring, x = 0: target (2, 3).
        assert_eq!(output.get(0, 1), WHITE);
    }

    #[test]
    fn one_by_one_is_rejected() {
        let source = solid_raster(1, 1, WHITE);
        let err = rectify(&source, Rounding::Nearest).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::InvalidDimensions {
                width: 1,
                height: 1
            }
        );
    }

    #[test]
    fn zero_sized_source_is_rejected() {
        assert!(matches!(
            Projector::new(0, 10, Rounding::Nearest),
            Err(ProjectionError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Projector::new(10, 0, Rounding::Nearest),
            Err(ProjectionError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn thin_sources_are_accepted() {
        let output = rectify(&solid_raster(2, 1, WHITE), Rounding::Nearest).unwrap();
        assert_eq!(output.dimensions(), (6, 1));
        let output = rectify(&solid_raster(1, 9, WHITE), Rounding::Truncate).unwrap();
        assert_eq!(output.dimensions(), (25, 4));
    }

    #[test]
    fn render_rejects_mismatched_source() {
        let projector = Projector::new(10, 10, Rounding::Nearest).unwrap();
        let err = projector.render(&solid_raster(8, 10, WHITE)).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::SourceMismatch {
                expected: (10, 10),
                actual: (8, 10)
            }
        );
        assert_eq!(err.to_string(), "Source is 8x10, projector was built for 10x10");
    }

    #[test]
    fn column_past_circumference_has_no_source() {
        let projector = Projector::new(4, 4, Rounding::Nearest).unwrap();
        let g = *projector.geometry();
        assert_eq!(projector.source_coordinate(g.circumference, 1), None);
        assert_eq!(projector.source_coordinate(u32::MAX, 0), None);
    }

    #[test]
    fn output_dimensions_follow_geometry() {
        for (w, h) in [(3, 3), (10, 4), (5, 17), (64, 48), (101, 99)] {
            let output = rectify(&gradient_raster(w, h), Rounding::Nearest).unwrap();
            assert_eq!(
                output.dimensions(),
                Geometry::for_source(w, h).output_dimensions()
            );
        }
    }

    // =========================================================================
    // Sampling laws
    // =========================================================================

    #[test]
    fn sampled_pixels_copy_source_and_misses_are_black() {
        for rounding in [Rounding::Nearest, Rounding::Truncate] {
            let source = gradient_raster(37, 23);
            let output = rectify(&source, rounding).unwrap();
            let g = Geometry::for_source(37, 23);
            for y in 0..g.max_radius {
                for x in 0..g.circumference {
                    let (tx, ty) = reference_target(&g, rounding, x, y);
                    let expected = if g.contains(tx, ty) {
                        source.get(tx as u32, ty as u32)
                    } else {
                        BLACK
                    };
                    assert_eq!(output.get(x, y), expected, "{rounding} at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn innermost_ring_stays_near_pole() {
        let projector = Projector::new(50, 30, Rounding::Nearest).unwrap();
        let g = *projector.geometry();
        let y = g.max_radius - 1;
        for x in 0..g.circumference {
            let (sx, sy) = projector.source_coordinate(x, y).unwrap();
            assert!((sx as i64 - g.mid_x as i64).abs() <= 1);
            assert!((sy as i64 - g.mid_y as i64).abs() <= 1);
        }
    }

    #[test]
    fn rim_row_lies_on_outer_circle() {
        let projector = Projector::new(40, 40, Rounding::Nearest).unwrap();
        let g = *projector.geometry();
        let r = g.max_radius as f64;
        for x in 0..g.circumference {
            if let Some((sx, sy)) = projector.source_coordinate(x, 0) {
                let dx = sx as f64 - g.mid_x as f64;
                let dy = sy as f64 - g.mid_y as f64;
                let dist = (dx * dx + dy * dy).sqrt();
                assert!((dist - r).abs() <= 1.0, "column {x}: distance {dist}");
            }
        }
    }

    #[test]
    fn rounding_policies_differ_by_at_most_one_pixel() {
        let g = Geometry::for_source(61, 45);
        for y in 0..g.max_radius {
            for x in 0..g.circumference {
                let (nx, ny) = reference_target(&g, Rounding::Nearest, x, y);
                let (tx, ty) = reference_target(&g, Rounding::Truncate, x, y);
                assert!((nx - tx).abs() <= 1 && (ny - ty).abs() <= 1);
            }
        }
    }

    #[test]
    fn render_counts_in_bounds_lookups() {
        let source = solid_raster(4, 4, WHITE);
        let projector = Projector::new(4, 4, Rounding::Nearest).unwrap();
        let g = *projector.geometry();
        let mut expected = 0;
        for y in 0..g.max_radius {
            for x in 0..g.circumference {
                let (tx, ty) = reference_target(&g, Rounding::Nearest, x, y);
                if g.contains(tx, ty) {
                    expected += 1;
                }
            }
        }
        let (output, sampled) = projector.render_counted(&source).unwrap();
        assert_eq!(sampled, expected);
        assert!(expected > 0 && expected < 24);
        // A white source makes every black output pixel a miss.
        let black = output.pixels().iter().filter(|p| **p == BLACK).count() as u64;
        assert_eq!(black, 24 - sampled);
    }

    #[test]
    fn single_marked_pixel_never_spreads() {
        let source = marked_raster(21, 21, BLACK, (10, 10), WHITE);
        let output = rectify(&source, Rounding::Nearest).unwrap();
        assert!(
            output
                .pixels()
                .iter()
                .all(|p| *p == BLACK || *p == WHITE)
        );
    }

    // =========================================================================
    // Determinism
    // =========================================================================

    #[test]
    fn repeated_runs_are_identical() {
        let source = gradient_raster(80, 60);
        let a = rectify(&source, Rounding::Nearest).unwrap();
        let b = rectify(&source, Rounding::Nearest).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parallel_matches_sequential() {
        let source = gradient_raster(97, 71);
        for rounding in [Rounding::Nearest, Rounding::Truncate] {
            let projector = Projector::new(97, 71, rounding).unwrap();
            assert_eq!(
                projector.render_counted(&source).unwrap(),
                projector.render_sequential(&source).unwrap()
            );
        }
    }

    #[test]
    fn input_is_not_mutated() {
        let source = gradient_raster(16, 16);
        let before = source.clone();
        rectify(&source, Rounding::Truncate).unwrap();
        assert_eq!(source, before);
    }
}
