//! Driver registry
//!
//! Drivers are registered once per process, before any raster is opened.

use super::error::{RasterError, Result};
use super::{GeoTiffDriver, ImageDriver, RasterDataset, RasterHandle};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Bytes read from the start of a file for format identification
const HEADER_LEN: u64 = 16;

static REGISTRY: OnceLock<DriverRegistry> = OnceLock::new();

/// A raster format backend
pub trait RasterDriver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this driver recognises the file from its leading bytes
    fn identify(&self, header: &[u8], path: &Path) -> bool;

    /// # Errors
    ///
    /// Returns [`RasterError::Open`] if the file cannot be parsed.
    fn open(&self, path: &Path) -> Result<Box<dyn RasterDataset>>;
}

/// Ordered set of drivers; the first one that identifies a file opens it
#[derive(Default)]
pub struct DriverRegistry {
    drivers: Vec<Box<dyn RasterDriver>>,
}

impl DriverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in driver, GeoTIFF first
    #[must_use]
    pub fn with_builtin_drivers() -> Self {
        Self::new()
            .with_driver(GeoTiffDriver)
            .with_driver(ImageDriver)
    }

    #[must_use]
    pub fn with_driver(mut self, driver: impl RasterDriver + 'static) -> Self {
        self.drivers.push(Box::new(driver));
        self
    }

    pub fn driver_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.drivers.iter().map(|d| d.name())
    }

    /// Open `path` with the first driver that identifies it.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Open`] if the file cannot be read, no driver
    /// identifies it, or the chosen driver fails to parse it.
    pub fn open(&self, path: &Path) -> Result<RasterHandle> {
        let header = read_header(path)?;

        let driver = self
            .drivers
            .iter()
            .find(|d| d.identify(&header, path))
            .ok_or_else(|| RasterError::open(path, "not a supported raster format"))?;

        debug!(path = %path.display(), driver = driver.name(), "opening raster");
        let dataset = driver.open(path)?;
        RasterHandle::new(dataset, path.to_path_buf())
    }
}

/// Register the built-in drivers for this process. Later calls are no-ops.
pub fn register_all_drivers() -> &'static DriverRegistry {
    REGISTRY.get_or_init(|| {
        let registry = DriverRegistry::with_builtin_drivers();
        info!(
            drivers = ?registry.driver_names().collect::<Vec<_>>(),
            "raster drivers registered"
        );
        registry
    })
}

/// The process-wide registry, if [`register_all_drivers`] has run
#[must_use]
pub fn registry() -> Option<&'static DriverRegistry> {
    REGISTRY.get()
}

fn read_header(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| RasterError::open(path, e.to_string()))?;

    let mut header = Vec::with_capacity(HEADER_LEN as usize);
    file.take(HEADER_LEN)
        .read_to_end(&mut header)
        .map_err(|e| RasterError::open(path, e.to_string()))?;

    Ok(header)
}
