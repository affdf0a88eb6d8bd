//! Image processing in pure Rust, with no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Decode** | `image::ImageReader` → RGB8 [`Raster`] |
//! | **Rectify** | [`Projector`], rows in parallel via rayon |
//! | **Encode** | JPEG (quality), PNG, TIFF via `image` |
//!
//! The module is split into:
//! - **Raster**: Flat row-major RGB buffer shared by source and output
//! - **Calculations**: Pure functions for the polar geometry (unit testable)
//! - **Parameters**: Data structures describing a run
//! - **Projector**: The per-pixel transform
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining backend + projector

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod projector;
mod raster;
pub mod rust_backend;

pub use backend::{Dimensions, ImageBackend, ImageIoError};
pub use calculations::{Geometry, circumference, column_angles};
pub use operations::{
    RectifyError, RectifyReport, get_dimensions, plan_rectify, rectify_file,
};
pub use params::{Quality, RectifyParams, Rounding};
pub use projector::{ProjectionError, Projector, rectify};
pub use raster::{BLACK, Raster, Rgb};
pub use rust_backend::RustBackend;
