use crate::config::ConversionConfig;
use clap::Parser;
use std::path::PathBuf;

/// A terminal-based raster image viewer
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Raster file (GeoTIFF, PNG, JPEG, ...) to display
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Output width in terminal columns
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Output height in terminal rows
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Bands shown as red, green and blue for rasters with 3+ bands
    #[arg(short, long, value_name = "R,G,B", value_parser = parse_band_triple)]
    pub bands: Option<[usize; 3]>,

    /// Band shown for rasters with fewer than 3 bands
    #[arg(short, long, value_name = "BAND", value_parser = clap::value_parser!(u16).range(1..))]
    pub gray_band: Option<u16>,

    /// Show raster metadata and band statistics
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    #[must_use]
    pub fn conversion_config(&self) -> ConversionConfig {
        let mut builder = ConversionConfig::builder();
        if let Some(bands) = self.bands {
            builder = builder.rgb_bands(bands);
        }
        if let Some(band) = self.gray_band {
            builder = builder.gray_band(usize::from(band));
        }
        builder.build()
    }
}

fn parse_band_triple(s: &str) -> Result<[usize; 3], String> {
    let bands = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .ok()
                .filter(|&band| band >= 1)
                .ok_or_else(|| format!("invalid band index '{}' (bands start at 1)", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    <[usize; 3]>::try_from(bands)
        .map_err(|bands| format!("expected 3 bands (R,G,B), got {}", bands.len()))
}
