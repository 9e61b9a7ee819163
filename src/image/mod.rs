//! Raster to 8-bit bitmap conversion
//!
//! One straight pipeline: pick the bands to show, stretch each one to 8 bits
//! with its own min/max, then pack them into a gray or interleaved buffer.

mod normalization;
mod packing;

pub use normalization::{DEGENERATE_RANGE, Stretch, find_min_max, normalize};
pub use packing::{NormalizedPlanes, pack};

use crate::config::ConversionConfig;
use crate::raster::{RasterHandle, Result};
use crate::types::{BandStats, Dimensions, PixelLayout, RasterInfo};
use anyhow::Context;
use image::{DynamicImage, GrayImage, ImageBuffer, RgbImage};
use std::path::Path;
use tracing::debug;

/// Bands selected for display, resolved once from the band count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandSource {
    Grayscale { band: usize },
    Color { bands: [usize; 3] },
}

impl BandSource {
    /// Rasters with three or more bands are shown in color, anything smaller
    /// in grayscale. A two-band raster (typically gray + alpha) shows its
    /// gray band.
    #[must_use]
    pub fn resolve(band_count: usize, config: &ConversionConfig) -> Self {
        if band_count >= 3 {
            Self::Color {
                bands: config.rgb_bands,
            }
        } else {
            Self::Grayscale {
                band: config.gray_band,
            }
        }
    }
}

/// A raster converted to a displayable 8-bit buffer
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedImage {
    /// Exactly `width * height * layout.bytes_per_pixel()` bytes, row-major
    pub buffer: Vec<u8>,
    pub dimensions: Dimensions,
    pub layout: PixelLayout,
    pub info: RasterInfo,
    /// Stretch range of every band used, in display order (R, G, B or gray)
    pub band_stats: Vec<BandStats>,
}

impl ConvertedImage {
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    /// Bytes per row
    #[inline]
    #[must_use]
    pub fn stride(&self) -> usize {
        self.dimensions.width as usize * self.layout.bytes_per_pixel()
    }

    /// Copy the buffer into a `DynamicImage`, reordering BGR pixels to RGB.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer does not match the dimensions
    pub fn to_dynamic_image(&self) -> anyhow::Result<DynamicImage> {
        match self.layout {
            PixelLayout::Grayscale8 => {
                let gray: GrayImage =
                    ImageBuffer::from_raw(self.width(), self.height(), self.buffer.clone())
                        .context("Failed to create grayscale image buffer")?;
                Ok(DynamicImage::ImageLuma8(gray))
            }
            PixelLayout::Interleaved24Rgb => {
                let rgb: RgbImage =
                    ImageBuffer::from_raw(self.width(), self.height(), self.buffer.clone())
                        .context("Failed to create RGB image buffer")?;
                Ok(DynamicImage::ImageRgb8(rgb))
            }
            PixelLayout::Interleaved24Bgr => {
                let rgb_pixels: Vec<u8> = self
                    .buffer
                    .chunks_exact(3)
                    .flat_map(|bgr| [bgr[2], bgr[1], bgr[0]])
                    .collect();
                let rgb: RgbImage = ImageBuffer::from_raw(self.width(), self.height(), rgb_pixels)
                    .context("Failed to create RGB image buffer from BGR")?;
                Ok(DynamicImage::ImageRgb8(rgb))
            }
        }
    }
}

/// Open `path` and convert it.
///
/// # Errors
///
/// Returns [`crate::raster::RasterError::Open`] if the file cannot be opened
/// and [`crate::raster::RasterError::BandRead`] if a selected band cannot be read.
pub fn convert_file(path: impl AsRef<Path>, config: &ConversionConfig) -> Result<ConvertedImage> {
    let handle = RasterHandle::open(path)?;
    convert_raster(handle, config)
}

/// Convert an open raster. The handle is consumed and released before
/// returning, whether or not the conversion succeeds.
///
/// # Errors
///
/// Returns [`crate::raster::RasterError::BandRead`] if a selected band is out
/// of range or cannot be read. No partial output is produced.
pub fn convert_raster(mut handle: RasterHandle, config: &ConversionConfig) -> Result<ConvertedImage> {
    let info = handle.info().clone();
    let source = BandSource::resolve(info.band_count, config);
    debug!(raster = %info, ?source, "converting raster");

    let mut band_stats = Vec::with_capacity(3);
    let planes = match source {
        BandSource::Grayscale { band } => {
            NormalizedPlanes::Gray(read_normalized(&mut handle, band, &mut band_stats)?)
        }
        BandSource::Color { bands: [r, g, b] } => NormalizedPlanes::Color([
            read_normalized(&mut handle, r, &mut band_stats)?,
            read_normalized(&mut handle, g, &mut band_stats)?,
            read_normalized(&mut handle, b, &mut band_stats)?,
        ]),
    };
    drop(handle);

    let (buffer, layout) = pack(planes, config.channel_order);
    debug_assert_eq!(buffer.len(), info.dimensions.pixel_count() * layout.bytes_per_pixel());

    Ok(ConvertedImage {
        buffer,
        dimensions: info.dimensions,
        layout,
        info,
        band_stats,
    })
}

fn read_normalized(
    handle: &mut RasterHandle,
    band: usize,
    band_stats: &mut Vec<BandStats>,
) -> Result<Vec<u8>> {
    let plane = handle.read_band_f64(band)?;
    let stretch = Stretch::from_samples(&plane);

    let stats = BandStats {
        band,
        min: stretch.min,
        max: stretch.max,
        degenerate: stretch.is_degenerate(),
    };
    debug!(%stats, "band stretched");
    band_stats.push(stats);

    Ok(stretch.normalize(&plane))
}
