pub mod cli;
pub mod config;
pub mod display;
pub mod display_metadata;
pub mod error;
pub mod image;
pub mod logger;
pub mod raster;
pub mod types;

// Re-export commonly used items
pub use config::ConversionConfig;
pub use crate::image::{ConvertedImage, convert_file, convert_raster};
pub use display_metadata::{print_metadata, print_raster_info};
