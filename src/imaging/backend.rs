//! Image I/O backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the pipeline needs
//! from an image library: identify, decode, and encode. The projector itself
//! never calls it; only [`operations`](super::operations) does, strictly
//! before and after the transform.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on
//! the `image` crate.

use super::params::Quality;
use super::raster::Raster;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image I/O backends.
pub trait ImageBackend: Sync {
    /// Read image dimensions without decoding pixels.
    fn identify(&self, path: &Path) -> Result<Dimensions, ImageIoError>;

    /// Decode an image into an opaque RGB raster. Alpha is discarded.
    fn decode(&self, path: &Path) -> Result<Raster, ImageIoError>;

    /// Encode a raster to `path`. `quality` applies to lossy formats.
    fn encode(&self, raster: &Raster, path: &Path, quality: Quality) -> Result<(), ImageIoError>;
}
