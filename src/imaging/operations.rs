//! High-level image operations.
//!
//! These functions combine the backend with the projector: decode the source,
//! unroll it, encode the strip. Failures before the transform (decode,
//! degenerate size) leave the destination untouched; the destination is only
//! written once the whole output raster exists.

use super::backend::{ImageBackend, ImageIoError};
use super::calculations::Geometry;
use super::params::{RectifyParams, Rounding};
use super::projector::{ProjectionError, Projector};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RectifyError {
    #[error(transparent)]
    Io(#[from] ImageIoError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, RectifyError>;

/// Summary of one completed rectification.
#[derive(Debug, Clone, Serialize)]
pub struct RectifyReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub geometry: Geometry,
    pub rounding: Rounding,
    /// Output pixels copied from the source.
    pub sampled_pixels: u64,
    /// Output pixels filled black because their lookup left the source.
    pub black_pixels: u64,
}

impl RectifyReport {
    pub fn output_dimensions(&self) -> (u32, u32) {
        self.geometry.output_dimensions()
    }
}

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Plan a run without decoding pixels: identify the source and compute the
/// output geometry. Fails on the same degenerate sizes [`rectify_file`] does.
pub fn plan_rectify(backend: &impl ImageBackend, source: &Path) -> Result<Geometry> {
    let (width, height) = get_dimensions(backend, source)?;
    let projector = Projector::new(width, height, Rounding::default())?;
    Ok(*projector.geometry())
}

/// Decode `params.source`, unroll it, and write the strip to `params.output`.
pub fn rectify_file(backend: &impl ImageBackend, params: &RectifyParams) -> Result<RectifyReport> {
    let source = backend.decode(&params.source)?;
    let projector = Projector::new(source.width(), source.height(), params.rounding)?;
    let geometry = *projector.geometry();
    info!(
        source = %params.source.display(),
        width = geometry.width,
        height = geometry.height,
        max_radius = geometry.max_radius,
        circumference = geometry.circumference,
        rounding = %params.rounding,
        "rectifying"
    );

    let started = Instant::now();
    let (output, sampled_pixels) = projector.render_counted(&source)?;
    let total = output.pixels().len() as u64;
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        sampled_pixels,
        "projection complete"
    );

    backend.encode(&output, &params.output, params.quality)?;
    info!(output = %params.output.display(), "rectified image saved");

    Ok(RectifyReport {
        source: params.source.clone(),
        output: params.output.clone(),
        geometry,
        rounding: params.rounding,
        sampled_pixels,
        black_pixels: total - sampled_pixels,
    })
}
