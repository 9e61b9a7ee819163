use clap::{CommandFactory, Parser};
use rastv::cli::Args;
use rastv::display;
use rastv::error::ProcessError;
use rastv::image;
use rastv::logger;
use rastv::raster::{self, RasterHandle};

fn main() {
    let args = Args::parse();

    let Some(file_path) = args.file.as_deref() else {
        let _ = Args::command().print_help();
        println!();
        return;
    };

    logger::init();
    raster::register_all_drivers();

    if let Err(e) = process_file(file_path, &args) {
        if args.verbose
            && let Some(info) = e.info() {
                rastv::print_raster_info(file_path, info);
            }
        println!("Error: {e}");
        std::process::exit(1);
    }
}

/// Convert and display a single raster file
fn process_file(file_path: &std::path::Path, args: &Args) -> Result<(), ProcessError> {
    // Stage 1: Open raster
    let handle = RasterHandle::open(file_path).map_err(ProcessError::OpenFailed)?;
    let info = handle.info().clone();

    // Stage 2: Stretch and pack bands
    let image = image::convert_raster(handle, &args.conversion_config())
        .map_err(|e| ProcessError::ConversionFailed {
            info: Box::new(info.clone()),
            error: e,
        })?;

    // Stage 3: Verbose output
    if args.verbose {
        rastv::print_metadata(file_path, &image);
    }

    // Stage 4: Display
    display::print_image(&image, args)
        .map_err(|e| ProcessError::DisplayFailed {
            info: Box::new(info),
            error: e,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn args_for(file_path: &Path) -> Args {
        Args {
            file: Some(file_path.to_path_buf()),
            verbose: true,
            width: None,
            height: None,
            bands: None,
            gray_band: None,
        }
    }

    #[test]
    fn test_missing_file_returns_openfailed_error() {
        raster::register_all_drivers();
        let file_path = Path::new("/nonexistent/scene.tif");

        let result = process_file(file_path, &args_for(file_path));
        assert_matches::assert_matches!(result, Err(ProcessError::OpenFailed(_)));
    }

    #[test]
    fn test_bad_band_returns_conversionfailed_error() {
        use tiff::encoder::{TiffEncoder, colortype};

        raster::register_all_drivers();
        let dir = tempfile::TempDir::new().unwrap();
        let file_path = dir.path().join("gray.tif");
        let file = std::fs::File::create(&file_path).unwrap();
        TiffEncoder::new(file)
            .unwrap()
            .write_image::<colortype::Gray8>(2, 2, &[1, 2, 3, 4])
            .unwrap();

        let mut args = args_for(&file_path);
        args.gray_band = Some(5);

        let result = process_file(&file_path, &args);
        let err = result.unwrap_err();
        assert_eq!(err.info().map(|i| i.band_count), Some(1));
        assert_matches::assert_matches!(err, ProcessError::ConversionFailed { .. });
    }
}
