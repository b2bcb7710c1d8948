//! Image resampling collaborator.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;

use crate::error::{io_err, OpsError};

/// JPEG quality used for every re-encoded JPEG.
pub const JPEG_QUALITY: u8 = 95;

/// Writes a resized copy of an image.
pub trait Resampler {
    /// Write `source` to `destination` with its long side equal to `target`.
    /// Returns the dimensions actually written.
    fn resize(&self, source: &Path, destination: &Path, target: u32) -> Result<(u32, u32), OpsError>;
}

/// Long side becomes `target`; the short side is scaled by the same factor
/// and floored (never below 1).
pub fn scaled_dimensions(width: u32, height: u32, target: u32) -> (u32, u32) {
    let scale = |short: u32, long: u32| {
        let scaled = u64::from(short) * u64::from(target) / u64::from(long.max(1));
        (scaled as u32).max(1)
    };
    if width >= height {
        (target, scale(height, width))
    } else {
        (scale(width, height), target)
    }
}

/// `image`-crate backed resampler using a Lanczos3 filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageResampler;

impl Resampler for ImageResampler {
    fn resize(&self, source: &Path, destination: &Path, target: u32) -> Result<(u32, u32), OpsError> {
        let image_err = |source_err| OpsError::Image {
            path: source.to_path_buf(),
            source: source_err,
        };
        let img = image::open(source).map_err(image_err)?;
        let (width, height) = img.dimensions();
        let (new_width, new_height) = scaled_dimensions(width, height, target);

        if (new_width, new_height) == (width, height) {
            std::fs::copy(source, destination).map_err(|e| io_err(destination, e))?;
            tracing::debug!("{} already {target}px; copied", source.display());
            return Ok((width, height));
        }

        let resized = img.resize_exact(new_width, new_height, FilterType::Lanczos3);
        let is_jpeg = source
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|e| e == "jpg" || e == "jpeg");

        let write_err = |source_err| OpsError::Image {
            path: destination.to_path_buf(),
            source: source_err,
        };
        if is_jpeg {
            let file = File::create(destination).map_err(|e| io_err(destination, e))?;
            let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
            resized.to_rgb8().write_with_encoder(encoder).map_err(write_err)?;
        } else {
            resized.save(destination).map_err(write_err)?;
        }
        Ok((new_width, new_height))
    }
}
