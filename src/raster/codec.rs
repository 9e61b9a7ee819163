//! Driver for the common image formats decoded by the `image` crate
//!
//! Each color channel becomes one band: gray images have one band, RGB
//! images three, RGBA images four.

use super::error::{RasterError, Result};
use super::{RasterDataset, RasterDriver};
use crate::types::{Dimensions, RasterInfo};
use image::{DynamicImage, ImageReader};
use std::path::Path;

const DRIVER_NAME: &str = "Image";

pub struct ImageDriver;

impl RasterDriver for ImageDriver {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn identify(&self, header: &[u8], _path: &Path) -> bool {
        image::guess_format(header).is_ok()
    }

    fn open(&self, path: &Path) -> Result<Box<dyn RasterDataset>> {
        let image = ImageReader::open(path)
            .map_err(|e| RasterError::open(path, e.to_string()))?
            .with_guessed_format()
            .map_err(|e| RasterError::open(path, e.to_string()))?
            .decode()
            .map_err(|e| RasterError::open(path, format!("Image decode error: {e}")))?;

        Ok(Box::new(ImageDataset::new(image)))
    }
}

struct ImageDataset {
    image: DynamicImage,
    info: RasterInfo,
}

impl ImageDataset {
    fn new(image: DynamicImage) -> Self {
        let color = image.color();
        let channels = color.channel_count();
        let info = RasterInfo {
            driver: DRIVER_NAME,
            dimensions: Dimensions::new(image.width(), image.height()),
            band_count: usize::from(channels),
            bits_per_sample: color.bits_per_pixel() / u16::from(channels.max(1)),
        };

        Self { image, info }
    }
}

impl RasterDataset for ImageDataset {
    fn info(&self) -> &RasterInfo {
        &self.info
    }

    fn read_band(&mut self, band: usize) -> Result<Vec<f64>> {
        let channels = self.info.band_count;
        let offset = band - 1;

        let plane = match &self.image {
            DynamicImage::ImageLuma8(buf) => channel_samples(buf.as_raw(), channels, offset),
            DynamicImage::ImageLumaA8(buf) => channel_samples(buf.as_raw(), channels, offset),
            DynamicImage::ImageRgb8(buf) => channel_samples(buf.as_raw(), channels, offset),
            DynamicImage::ImageRgba8(buf) => channel_samples(buf.as_raw(), channels, offset),
            DynamicImage::ImageLuma16(buf) => channel_samples(buf.as_raw(), channels, offset),
            DynamicImage::ImageLumaA16(buf) => channel_samples(buf.as_raw(), channels, offset),
            DynamicImage::ImageRgb16(buf) => channel_samples(buf.as_raw(), channels, offset),
            DynamicImage::ImageRgba16(buf) => channel_samples(buf.as_raw(), channels, offset),
            DynamicImage::ImageRgb32F(buf) => channel_samples(buf.as_raw(), channels, offset),
            DynamicImage::ImageRgba32F(buf) => channel_samples(buf.as_raw(), channels, offset),
            other => {
                return Err(RasterError::band_read(
                    band,
                    format!("Unsupported pixel type: {:?}", other.color()),
                ));
            }
        };

        Ok(plane)
    }
}

#[inline]
fn channel_samples<T: Copy + Into<f64>>(raw: &[T], channels: usize, offset: usize) -> Vec<f64> {
    raw.iter()
        .skip(offset)
        .step_by(channels)
        .map(|&v| v.into())
        .collect()
}
