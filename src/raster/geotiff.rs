//! GeoTIFF driver backed by the `tiff` crate
//!
//! Only the pixel data is consumed; GeoKeys, nodata and overviews are ignored.
//! The header is parsed at open time, the pixel data on the first band read.
//!
//! Only pixel-interleaved (chunky) files are supported. Band-interleaved
//! files (PlanarConfiguration = 2) decode a single plane, so reading a band
//! from a multi-band planar file fails with `RasterError::BandRead`.

use super::error::{RasterError, Result};
use super::{RasterDataset, RasterDriver};
use crate::types::{Dimensions, RasterInfo};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

const DRIVER_NAME: &str = "GTiff";

pub struct GeoTiffDriver;

impl RasterDriver for GeoTiffDriver {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn identify(&self, header: &[u8], _path: &Path) -> bool {
        // Classic TIFF (42) and BigTIFF (43), both byte orders
        matches!(
            header.get(..4),
            Some(b"II*\0" | b"MM\0*" | b"II+\0" | b"MM\0+")
        )
    }

    fn open(&self, path: &Path) -> Result<Box<dyn RasterDataset>> {
        Ok(Box::new(GeoTiffDataset::open(path)?))
    }
}

struct GeoTiffDataset {
    decoder: Decoder<BufReader<File>>,
    info: RasterInfo,
    pixels: Option<DecodingResult>,
}

impl GeoTiffDataset {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| RasterError::open(path, e.to_string()))?;

        let mut decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| RasterError::open(path, format!("TIFF decode error: {e}")))?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| RasterError::open(path, format!("Cannot read dimensions: {e}")))?;

        let color = decoder
            .colortype()
            .map_err(|e| RasterError::open(path, format!("Cannot read color type: {e}")))?;

        let (band_count, bits) = band_layout(color)
            .ok_or_else(|| RasterError::open(path, format!("Unsupported TIFF color type: {color:?}")))?;

        debug!(path = %path.display(), width, height, ?color, "TIFF header parsed");

        Ok(Self {
            decoder,
            info: RasterInfo {
                driver: DRIVER_NAME,
                dimensions: Dimensions::new(width, height),
                band_count,
                bits_per_sample: u16::from(bits),
            },
            pixels: None,
        })
    }

    /// Decode the full image once; later band reads reuse the result.
    fn pixels(&mut self, band: usize) -> Result<&DecodingResult> {
        if self.pixels.is_none() {
            let decoded = self
                .decoder
                .read_image()
                .map_err(|e| RasterError::band_read(band, format!("Cannot read image data: {e}")))?;
            self.pixels = Some(decoded);
        }

        self.pixels
            .as_ref()
            .ok_or_else(|| RasterError::band_read(band, "image data unavailable"))
    }
}

impl RasterDataset for GeoTiffDataset {
    fn info(&self) -> &RasterInfo {
        &self.info
    }

    fn read_band(&mut self, band: usize) -> Result<Vec<f64>> {
        let bands = self.info.band_count;
        let expected = self.info.dimensions.pixel_count() * bands;
        let offset = band - 1;

        let pixels = self.pixels(band)?;
        let len = decoded_len(pixels);
        if len != Some(expected) {
            return Err(RasterError::band_read(
                band,
                format!(
                    "decoded {} samples, expected {expected} interleaved samples",
                    len.unwrap_or(0)
                ),
            ));
        }

        let plane = match pixels {
            DecodingResult::U8(buf) => band_samples(buf, bands, offset, f64::from),
            DecodingResult::U16(buf) => band_samples(buf, bands, offset, f64::from),
            DecodingResult::U32(buf) => band_samples(buf, bands, offset, f64::from),
            DecodingResult::U64(buf) => band_samples(buf, bands, offset, |v| v as f64),
            DecodingResult::I8(buf) => band_samples(buf, bands, offset, f64::from),
            DecodingResult::I16(buf) => band_samples(buf, bands, offset, f64::from),
            DecodingResult::I32(buf) => band_samples(buf, bands, offset, f64::from),
            DecodingResult::I64(buf) => band_samples(buf, bands, offset, |v| v as f64),
            DecodingResult::F32(buf) => band_samples(buf, bands, offset, f64::from),
            DecodingResult::F64(buf) => band_samples(buf, bands, offset, |v| v),
            #[allow(unreachable_patterns)]
            _ => {
                return Err(RasterError::band_read(band, "Unsupported TIFF sample format"));
            }
        };

        Ok(plane)
    }
}

/// Number of bands and bits per sample for a TIFF color type
fn band_layout(color: ColorType) -> Option<(usize, u8)> {
    match color {
        ColorType::Gray(bits) | ColorType::Palette(bits) => Some((1, bits)),
        ColorType::GrayA(bits) => Some((2, bits)),
        ColorType::RGB(bits) | ColorType::YCbCr(bits) => Some((3, bits)),
        ColorType::RGBA(bits) | ColorType::CMYK(bits) => Some((4, bits)),
        ColorType::Multiband {
            bit_depth,
            num_samples,
        } => Some((usize::from(num_samples), bit_depth)),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

fn decoded_len(pixels: &DecodingResult) -> Option<usize> {
    Some(match pixels {
        DecodingResult::U8(buf) => buf.len(),
        DecodingResult::U16(buf) => buf.len(),
        DecodingResult::U32(buf) => buf.len(),
        DecodingResult::U64(buf) => buf.len(),
        DecodingResult::I8(buf) => buf.len(),
        DecodingResult::I16(buf) => buf.len(),
        DecodingResult::I32(buf) => buf.len(),
        DecodingResult::I64(buf) => buf.len(),
        DecodingResult::F32(buf) => buf.len(),
        DecodingResult::F64(buf) => buf.len(),
        #[allow(unreachable_patterns)]
        _ => return None,
    })
}

/// Pick one band out of chunky (pixel-interleaved) samples
#[inline]
fn band_samples<T: Copy>(buf: &[T], bands: usize, offset: usize, to_f64: impl Fn(T) -> f64) -> Vec<f64> {
    buf.iter()
        .skip(offset)
        .step_by(bands)
        .map(|&v| to_f64(v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{DriverRegistry, RasterHandle};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tiff::encoder::{TiffEncoder, colortype};

    fn write_gray16(dir: &TempDir, name: &str, width: u32, height: u32, data: &[u16]) -> PathBuf {
        let path = dir.path().join(name);
        let file = File::create(&path).unwrap();
        TiffEncoder::new(file)
            .unwrap()
            .write_image::<colortype::Gray16>(width, height, data)
            .unwrap();
        path
    }

    fn open(path: &Path) -> RasterHandle {
        DriverRegistry::new()
            .with_driver(GeoTiffDriver)
            .open(path)
            .unwrap()
    }

    #[test]
    fn test_identify_tiff_magic() {
        let path = Path::new("x.tif");
        assert!(GeoTiffDriver.identify(b"II*\0\x08\0\0\0", path));
        assert!(GeoTiffDriver.identify(b"MM\0*\0\0\0\x08", path));
        assert!(GeoTiffDriver.identify(b"II+\0", path));
        assert!(!GeoTiffDriver.identify(b"\x89PNG\r\n\x1a\n", path));
        assert!(!GeoTiffDriver.identify(b"II", path));
    }

    #[test]
    fn test_read_single_band_u16() {
        let dir = TempDir::new().unwrap();
        let path = write_gray16(&dir, "gray.tif", 3, 2, &[0, 100, 200, 300, 400, 65535]);

        let mut handle = open(&path);
        assert_eq!(handle.dimensions(), (3, 2, 1));
        assert_eq!(handle.info().bits_per_sample, 16);
        assert_eq!(handle.info().driver, "GTiff");
        assert_eq!(
            handle.read_band_f64(1).unwrap(),
            vec![0.0, 100.0, 200.0, 300.0, 400.0, 65535.0]
        );
    }

    #[test]
    fn test_read_rgb_bands_deinterleaved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rgb.tif");
        let file = File::create(&path).unwrap();
        TiffEncoder::new(file)
            .unwrap()
            .write_image::<colortype::RGB8>(2, 1, &[10, 20, 30, 40, 50, 60])
            .unwrap();

        let mut handle = open(&path);
        assert_eq!(handle.dimensions(), (2, 1, 3));
        assert_eq!(handle.read_band_f64(1).unwrap(), vec![10.0, 40.0]);
        assert_eq!(handle.read_band_f64(2).unwrap(), vec![20.0, 50.0]);
        assert_eq!(handle.read_band_f64(3).unwrap(), vec![30.0, 60.0]);
    }

    #[test]
    fn test_read_float_band() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dem.tif");
        let file = File::create(&path).unwrap();
        TiffEncoder::new(file)
            .unwrap()
            .write_image::<colortype::Gray32Float>(2, 2, &[-12.5, 0.0, 1500.25, 8848.0])
            .unwrap();

        let mut handle = open(&path);
        assert_eq!(handle.info().bits_per_sample, 32);
        assert_eq!(
            handle.read_band_f64(1).unwrap(),
            vec![-12.5, 0.0, 1500.25, 8848.0]
        );
    }

    /// Little-endian 2x1 RGB8 TIFF with one strip per band
    fn planar_rgb8_bytes() -> Vec<u8> {
        fn entry(out: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
            out.extend_from_slice(&tag.to_le_bytes());
            out.extend_from_slice(&kind.to_le_bytes());
            out.extend_from_slice(&count.to_le_bytes());
            out.extend_from_slice(&value.to_le_bytes());
        }
        const SHORT: u16 = 3;
        const LONG: u16 = 4;
        // Header (8) + IFD with 10 entries (126)
        let bits_at = 134;
        let offsets_at = bits_at + 6;
        let counts_at = offsets_at + 12;
        let pixels_at = counts_at + 12;

        let mut out = b"II*\0".to_vec();
        out.extend_from_slice(&8u32.to_le_bytes());
        out.extend_from_slice(&10u16.to_le_bytes());
        entry(&mut out, 256, SHORT, 1, 2);
        entry(&mut out, 257, SHORT, 1, 1);
        entry(&mut out, 258, SHORT, 3, bits_at);
        entry(&mut out, 259, SHORT, 1, 1);
        entry(&mut out, 262, SHORT, 1, 2);
        entry(&mut out, 273, LONG, 3, offsets_at);
        entry(&mut out, 277, SHORT, 1, 3);
        entry(&mut out, 278, SHORT, 1, 1);
        entry(&mut out, 279, LONG, 3, counts_at);
        entry(&mut out, 284, SHORT, 1, 2);
        out.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(out.len(), bits_at as usize);

        for _ in 0..3 {
            out.extend_from_slice(&8u16.to_le_bytes());
        }
        for plane in 0..3 {
            out.extend_from_slice(&(pixels_at + plane * 2).to_le_bytes());
        }
        for _ in 0..3 {
            out.extend_from_slice(&2u32.to_le_bytes());
        }
        out.extend_from_slice(&[10, 40, 20, 50, 30, 60]);
        out
    }

    #[test]
    fn test_band_interleaved_tiff_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("planar.tif");
        std::fs::write(&path, planar_rgb8_bytes()).unwrap();

        let result = DriverRegistry::new()
            .with_driver(GeoTiffDriver)
            .open(&path)
            .and_then(|mut handle| handle.read_band_f64(2));
        assert!(result.is_err());
    }

    #[test]
    fn test_truncated_tiff_is_open_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.tif");
        std::fs::write(&path, b"II*\0\xff\xff\xff\xff").unwrap();

        let result = DriverRegistry::new().with_driver(GeoTiffDriver).open(&path);
        assert!(matches!(result, Err(RasterError::Open { .. })));
    }
}
