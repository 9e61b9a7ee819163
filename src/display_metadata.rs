use crate::image::ConvertedImage;
use crate::types::RasterInfo;
use std::path::Path;

pub fn print_metadata(path: &Path, image: &ConvertedImage) {
    print_raster_info(path, &image.info);

    println!("{:20}: {}", "Layout", image.layout);

    for stats in &image.band_stats {
        let name = format!("Band {}", stats.band);
        let flat = if stats.degenerate { " (flat, shown black)" } else { "" };
        println!("{name:20}: {} .. {}{flat}", stats.min, stats.max);
    }

    println!();
}

/// Print what is known about a raster before its bands are read
pub fn print_raster_info(path: &Path, info: &RasterInfo) {
    println!("{:20}: {}", "File", path.display());
    println!("{:20}: {}", "Driver", info.driver);
    println!(
        "{:20}: {} [{} band(s)]",
        "Dimensions", info.dimensions, info.band_count
    );
    println!("{:20}: {}", "Bits Per Sample", info.bits_per_sample);
}
