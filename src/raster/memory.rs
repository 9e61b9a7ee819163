use super::error::{RasterError, Result};
use super::RasterDataset;
use crate::types::{Dimensions, RasterInfo};

/// Dataset backed by band planes already in memory
#[derive(Debug, Clone)]
pub struct MemoryDataset {
    info: RasterInfo,
    bands: Vec<Vec<f64>>,
}

impl MemoryDataset {
    /// # Errors
    ///
    /// Returns [`RasterError::Open`] if there are no bands or a band does not
    /// hold exactly `width * height` samples.
    pub fn new(dimensions: Dimensions, bands: Vec<Vec<f64>>) -> Result<Self> {
        if bands.is_empty() {
            return Err(RasterError::open("<memory>", "raster has no bands"));
        }

        let expected = dimensions.pixel_count();
        if let Some((idx, band)) = bands.iter().enumerate().find(|(_, b)| b.len() != expected) {
            return Err(RasterError::open(
                "<memory>",
                format!(
                    "band {} has {} samples, expected {expected} for {dimensions}",
                    idx + 1,
                    band.len()
                ),
            ));
        }

        Ok(Self {
            info: RasterInfo {
                driver: "MEM",
                dimensions,
                band_count: bands.len(),
                bits_per_sample: 64,
            },
            bands,
        })
    }
}

impl RasterDataset for MemoryDataset {
    fn info(&self) -> &RasterInfo {
        &self.info
    }

    fn read_band(&mut self, band: usize) -> Result<Vec<f64>> {
        band.checked_sub(1)
            .and_then(|idx| self.bands.get(idx))
            .cloned()
            .ok_or_else(|| RasterError::band_read(band, "band index out of range"))
    }
}
