use crate::raster::RasterError;
use crate::types::RasterInfo;
use thiserror::Error;

/// Failure of one viewer run, keeping what was learnt about the raster
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The file could not be opened as a raster - nothing is known about it
    #[error(transparent)]
    OpenFailed(RasterError),

    /// Raster opened, but its bands could not be read or converted
    #[error("{error}")]
    ConversionFailed {
        info: Box<RasterInfo>,
        error: RasterError,
    },

    /// Image ready but display failed
    #[error("{error}")]
    DisplayFailed {
        info: Box<RasterInfo>,
        error: anyhow::Error,
    },
}

impl ProcessError {
    /// Returns raster info if available (for verbose display after an error)
    pub fn info(&self) -> Option<&RasterInfo> {
        match self {
            ProcessError::ConversionFailed { info, .. } => Some(info.as_ref()),
            ProcessError::DisplayFailed { info, .. } => Some(info.as_ref()),
            ProcessError::OpenFailed(_) => None,
        }
    }
}
