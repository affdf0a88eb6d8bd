//! # fisheye-rectify
//!
//! Unrolls a circular (fisheye-style) image into a rectilinear panoramic strip.
//! Each output column is an angle around the source's center, each output row
//! a distance from it: row 0 is the outer rim, the last row hugs the center.
//!
//! # Pipeline
//!
//! ```text
//! 1. Decode   input file  →  Raster             (image crate, RGB8)
//! 2. Rectify  Raster      →  Raster             (pure, rows in parallel)
//! 3. Encode   Raster      →  output file        (JPEG / PNG / TIFF)
//! ```
//!
//! Only stage 2 has any math in it, and it never touches the filesystem. A
//! decode failure or a degenerate source aborts before anything is written;
//! the output is encoded only after every pixel has been computed.
//!
//! # Geometry
//!
//! For a `width × height` source:
//!
//! | Quantity | Value |
//! |---|---|
//! | pole | `(floor(width/2), floor(height/2))` |
//! | `max_radius` | `max` of the pole's coordinates; output height |
//! | `circumference` | `floor(2π · max_radius)`; output width |
//!
//! Output pixel `(x, y)` samples the source at angle `-x / max_radius` and
//! distance `max_radius - y` from the pole, nearest-neighbor, black when the
//! point falls off the image. See [`imaging::projector`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Raster type, geometry, projector, image I/O backend, pipeline |
//! | [`config`] | `rectify.toml` loading, validation, merging |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## Round Half to Even by Default
//!
//! Fractional source coordinates snap with [`imaging::Rounding::Nearest`]
//! (`round_ties_even`), which matches array-based renderers built on `rint`.
//! [`imaging::Rounding::Truncate`] is available for output that must match
//! scalar renderers that cast with `int()`. The two never differ by more than
//! one pixel per axis.
//!
//! ## Flat Pixel Buffer
//!
//! The projector reads and writes [`imaging::Raster`], a row-major `Vec` of
//! RGB triples, instead of calling per-pixel accessors on an image-library
//! type. Rows split into disjoint `&mut` slices, which is what lets rayon
//! render them in parallel without locks.

pub mod config;
pub mod imaging;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
