//! Raster access layer
//!
//! Opens raster datasets through registered drivers and hands out their bands
//! as dense row-major `f64` planes. Everything above this module works on
//! plain planes and never sees a file format.

mod codec;
mod driver;
mod error;
mod geotiff;
mod memory;

pub use codec::ImageDriver;
pub use driver::{DriverRegistry, RasterDriver, register_all_drivers, registry};
pub use error::{RasterError, Result};
pub use geotiff::GeoTiffDriver;
pub use memory::MemoryDataset;

use crate::types::RasterInfo;
use std::path::{Path, PathBuf};
use tracing::trace;

/// An open dataset as seen by a driver
pub trait RasterDataset: Send {
    fn info(&self) -> &RasterInfo;

    /// Read one full band plane. `band` is 1-based and already range-checked
    /// by [`RasterHandle`].
    fn read_band(&mut self, band: usize) -> Result<Vec<f64>>;
}

/// Exclusive ownership of an open dataset.
///
/// The dataset is closed when the handle is dropped, so every exit path of a
/// conversion releases it.
pub struct RasterHandle {
    dataset: Box<dyn RasterDataset>,
    path: PathBuf,
}

impl RasterHandle {
    /// Open `path` with the process-wide driver registry.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Open`] if no drivers are registered, the file
    /// cannot be read, or no driver understands its format.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let registry = registry().ok_or_else(|| {
            RasterError::open(path, "no raster drivers registered (call register_all_drivers first)")
        })?;
        registry.open(path)
    }

    /// Wrap a dataset that is already open, e.g. a [`MemoryDataset`].
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Open`] if the dataset reports empty dimensions
    /// or no bands.
    pub fn from_dataset(dataset: impl RasterDataset + 'static) -> Result<Self> {
        Self::new(Box::new(dataset), PathBuf::from("<memory>"))
    }

    pub(crate) fn new(dataset: Box<dyn RasterDataset>, path: PathBuf) -> Result<Self> {
        let info = dataset.info();
        if !info.dimensions.is_valid() {
            return Err(RasterError::open(
                path,
                format!("invalid raster dimensions {}", info.dimensions),
            ));
        }
        if info.band_count == 0 {
            return Err(RasterError::open(path, "raster has no bands"));
        }

        trace!(path = %path.display(), info = %info, "raster opened");
        Ok(Self { dataset, path })
    }

    #[inline]
    #[must_use]
    pub fn info(&self) -> &RasterInfo {
        self.dataset.info()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `(width, height, band_count)`
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32, usize) {
        let info = self.info();
        (info.dimensions.width, info.dimensions.height, info.band_count)
    }

    /// Read band `band` (1-based) as `width * height` samples in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::BandRead`] if the index is out of range, the
    /// driver fails, or the driver returns a plane of the wrong size.
    pub fn read_band_f64(&mut self, band: usize) -> Result<Vec<f64>> {
        let band_count = self.info().band_count;
        if band == 0 || band > band_count {
            return Err(RasterError::band_read(
                band,
                format!("band index out of range (raster has {band_count} band(s))"),
            ));
        }

        let expected = self.info().dimensions.pixel_count();
        let plane = self.dataset.read_band(band)?;
        if plane.len() != expected {
            return Err(RasterError::band_read(
                band,
                format!("expected {expected} samples, got {}", plane.len()),
            ));
        }

        Ok(plane)
    }
}

impl Drop for RasterHandle {
    fn drop(&mut self) {
        trace!(path = %self.path.display(), "raster released");
    }
}

impl std::fmt::Debug for RasterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterHandle")
            .field("path", &self.path)
            .field("info", self.info())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dimensions;
    use assert_matches::assert_matches;

    #[test]
    fn test_handle_reports_dimensions() {
        let dataset = MemoryDataset::new(
            Dimensions::new(3, 2),
            vec![vec![0.0; 6], vec![1.0; 6], vec![2.0; 6]],
        )
        .unwrap();
        let handle = RasterHandle::from_dataset(dataset).unwrap();

        assert_eq!(handle.dimensions(), (3, 2, 3));
        assert_eq!(handle.path(), Path::new("<memory>"));
    }

    #[test]
    fn test_band_index_is_one_based() {
        let dataset =
            MemoryDataset::new(Dimensions::new(2, 1), vec![vec![7.0, 8.0]]).unwrap();
        let mut handle = RasterHandle::from_dataset(dataset).unwrap();

        assert_eq!(handle.read_band_f64(1).unwrap(), vec![7.0, 8.0]);
        assert_matches!(handle.read_band_f64(0), Err(RasterError::BandRead { band: 0, .. }));
        assert_matches!(handle.read_band_f64(2), Err(RasterError::BandRead { band: 2, .. }));
    }

    struct ShortDataset {
        info: RasterInfo,
    }

    impl RasterDataset for ShortDataset {
        fn info(&self) -> &RasterInfo {
            &self.info
        }

        fn read_band(&mut self, _band: usize) -> Result<Vec<f64>> {
            Ok(vec![0.0])
        }
    }

    #[test]
    fn test_wrong_plane_size_is_band_read_error() {
        let mut handle = RasterHandle::from_dataset(ShortDataset {
            info: RasterInfo {
                driver: "Short",
                dimensions: Dimensions::new(2, 2),
                band_count: 1,
                bits_per_sample: 8,
            },
        })
        .unwrap();

        let err = handle.read_band_f64(1).unwrap_err();
        assert_matches!(err, RasterError::BandRead { band: 1, .. });
        assert!(err.to_string().contains("expected 4 samples, got 1"));
    }

    #[test]
    fn test_empty_dimensions_rejected() {
        let result = RasterHandle::from_dataset(ShortDataset {
            info: RasterInfo {
                driver: "Short",
                dimensions: Dimensions::new(0, 2),
                band_count: 1,
                bits_per_sample: 8,
            },
        });
        assert_matches!(result, Err(RasterError::Open { .. }));
    }
}
