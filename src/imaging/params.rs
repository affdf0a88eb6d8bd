//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the CLI/config layer (which decides what to rectify and how to round) and
//! the [`operations`](super::operations) module (which drives the backend and
//! the projector).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Rounding`]: How fractional source coordinates snap to pixel indices.
//! - [`RectifyParams`]: Full specification for one run: source, output, quality, rounding.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Policy for turning a fractional source coordinate into a pixel index.
///
/// - `Nearest`: round half to even. Matches array-based renderers that use
///   `rint`, and is the default.
/// - `Truncate`: drop the fractional part (toward zero). Matches scalar
///   renderers that cast with `int()`.
///
/// The two disagree by at most one pixel per axis.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    #[default]
    Nearest,
    Truncate,
}

impl Rounding {
    /// Snap `value` to an integer pixel index.
    #[inline]
    pub fn apply(self, value: f64) -> i64 {
        match self {
            Rounding::Nearest => value.round_ties_even() as i64,
            Rounding::Truncate => value.trunc() as i64,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rounding::Nearest => "nearest",
            Rounding::Truncate => "truncate",
        }
    }
}

impl std::fmt::Display for Rounding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for one rectification run.
#[derive(Debug, Clone, PartialEq)]
pub struct RectifyParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub quality: Quality,
    pub rounding: Rounding,
}
