//! Pure calculation functions for the polar unrolling geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! The source image is treated as a disc centered on its midpoint (the
//! *pole*). Output column `x` is an angle, output row `y` is a distance from
//! the pole: row 0 is the outer rim, the last row is one pixel away from the
//! center.

use serde::Serialize;
use std::f64::consts::PI;

/// Derived scalars for one source size. Computed once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Geometry {
    /// Source width in pixels.
    pub width: u32,
    /// Source height in pixels.
    pub height: u32,
    /// `floor(width / 2)`.
    pub mid_x: u32,
    /// `floor(height / 2)`.
    pub mid_y: u32,
    /// `max(mid_x, mid_y)`; also the output height.
    pub max_radius: u32,
    /// `floor(2π · max_radius)`; also the output width.
    pub circumference: u32,
}

impl Geometry {
    /// Compute the geometry for a `width × height` source.
    ///
    /// # Examples
    /// ```
    /// # use fisheye_rectify::imaging::Geometry;
    /// let g = Geometry::for_source(4, 4);
    /// assert_eq!((g.mid_x, g.mid_y, g.max_radius), (2, 2, 2));
    /// assert_eq!(g.output_dimensions(), (12, 2));
    /// ```
    pub fn for_source(width: u32, height: u32) -> Self {
        let mid_x = width / 2;
        let mid_y = height / 2;
        let max_radius = mid_x.max(mid_y);
        Self {
            width,
            height,
            mid_x,
            mid_y,
            max_radius,
            circumference: circumference(max_radius),
        }
    }

    /// `(width, height)` of the output raster.
    pub fn output_dimensions(&self) -> (u32, u32) {
        (self.circumference, self.max_radius)
    }

    /// Angle swept by output column `x`, in radians.
    ///
    /// One radian per `max_radius` columns, negated so the sweep runs
    /// clockwise in image coordinates.
    #[inline]
    pub fn theta(&self, x: u32) -> f64 {
        -(x as f64) / self.max_radius as f64
    }

    /// Distance from the pole sampled by output row `y`.
    #[inline]
    pub fn magnitude(&self, y: u32) -> f64 {
        (self.max_radius - y) as f64
    }

    /// Fractional source `(x, y)` for output pixel `(x, y)`, given the
    /// column's precomputed `sin(theta)` and `cos(theta)`.
    #[inline]
    pub fn source_point(&self, sin_theta: f64, cos_theta: f64, y: u32) -> (f64, f64) {
        let mag = self.magnitude(y);
        (
            self.mid_x as f64 + mag * sin_theta,
            self.mid_y as f64 + mag * cos_theta,
        )
    }

    /// Whether integer pixel coordinates fall inside the source.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }
}

/// `floor(2π · radius)`.
pub fn circumference(radius: u32) -> u32 {
    (2.0 * PI * radius as f64) as u32
}

/// `(sin θ, cos θ)` for every output column, in column order.
pub fn column_angles(geometry: &Geometry) -> Vec<(f64, f64)> {
    (0..geometry.circumference)
        .map(|x| geometry.theta(x).sin_cos())
        .collect()
}
