use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    /// The dataset could not be opened: missing file, unknown or corrupt format
    #[error("Failed to open raster {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    /// A band index was out of range or its pixel data could not be decoded
    #[error("Failed to read band {band}: {reason}")]
    BandRead { band: usize, reason: String },
}

impl RasterError {
    pub(crate) fn open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn band_read(band: usize, reason: impl Into<String>) -> Self {
        Self::BandRead {
            band,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RasterError>;
