//! Pure Rust image I/O backend built on the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode (JPEG, PNG, TIFF, WebP) | `ImageReader` with content sniffing, then `to_rgb8` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → PNG / TIFF | `RgbImage::write_to` |
//!
//! Encoders write into a temporary file next to the destination, which is
//! renamed over it only once encoding succeeds. A failed encode leaves the
//! destination as it was.

use super::backend::{Dimensions, ImageBackend, ImageIoError};
use super::params::Quality;
use super::raster::Raster;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Formats the encoder writes. Anything not recognised by extension is JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Tiff,
}

impl OutputFormat {
    /// Choose the output format from the destination's extension.
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "png" => OutputFormat::Png,
            "tif" | "tiff" => OutputFormat::Tiff,
            _ => OutputFormat::Jpeg,
        }
    }
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, ImageIoError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| ImageIoError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn encode_error(path: &Path, err: image::ImageError) -> ImageIoError {
    match err {
        image::ImageError::IoError(io) => ImageIoError::Io(io),
        other => ImageIoError::Encode {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

/// Create a temporary file in the destination's directory, so the final
/// rename stays on one filesystem.
fn staging_file(path: &Path) -> Result<NamedTempFile, ImageIoError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(NamedTempFile::new_in(dir)?)
}

/// Encode `rgb` into a staging file and move it to `path` on success.
/// On any error the staging file is dropped, which deletes it.
fn save_image(
    rgb: RgbImage,
    path: &Path,
    format: OutputFormat,
    quality: Quality,
) -> Result<(), ImageIoError> {
    let mut staged = staging_file(path)?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        match format {
            OutputFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut writer, quality.value() as u8);
                DynamicImage::ImageRgb8(rgb)
                    .write_with_encoder(encoder)
                    .map_err(|e| encode_error(path, e))?;
            }
            OutputFormat::Png => rgb
                .write_to(&mut writer, ImageFormat::Png)
                .map_err(|e| encode_error(path, e))?,
            OutputFormat::Tiff => rgb
                .write_to(&mut writer, ImageFormat::Tiff)
                .map_err(|e| encode_error(path, e))?,
        }
        writer.flush()?;
    }
    staged.persist(path).map_err(|e| ImageIoError::Io(e.error))?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, ImageIoError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| ImageIoError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<Raster, ImageIoError> {
        let img = load_image(path)?;
        debug!(
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "decoded source image"
        );
        Ok(Raster::from(img.to_rgb8()))
    }

    fn encode(&self, raster: &Raster, path: &Path, quality: Quality) -> Result<(), ImageIoError> {
        let rgb = raster.to_rgb_image();
        let format = OutputFormat::for_path(path);
        debug!(path = %path.display(), ?format, "encoding output image");

        save_image(rgb, path, format, quality)
    }
}
