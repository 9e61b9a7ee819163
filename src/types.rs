//! Domain-specific types shared by the raster and image modules

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{width}x{height}", width = self.width, height = self.height)
    }
}

/// Order of the three color channels inside one interleaved pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// Blue, green, red
    #[default]
    Bgr,
    /// Red, green, blue
    Rgb,
}

impl ChannelOrder {
    /// For each output channel slot, the index of the source plane
    /// (0 = red band, 1 = green band, 2 = blue band) written there.
    #[inline]
    #[must_use]
    pub fn source_planes(self) -> [usize; 3] {
        match self {
            Self::Bgr => [2, 1, 0],
            Self::Rgb => [0, 1, 2],
        }
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bgr => write!(f, "BGR"),
            Self::Rgb => write!(f, "RGB"),
        }
    }
}

/// Pixel layout of a converted buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Grayscale8,
    Interleaved24Bgr,
    Interleaved24Rgb,
}

impl PixelLayout {
    #[must_use]
    pub fn interleaved(order: ChannelOrder) -> Self {
        match order {
            ChannelOrder::Bgr => Self::Interleaved24Bgr,
            ChannelOrder::Rgb => Self::Interleaved24Rgb,
        }
    }

    #[inline]
    #[must_use]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Grayscale8 => 1,
            Self::Interleaved24Bgr | Self::Interleaved24Rgb => 3,
        }
    }

    #[inline]
    #[must_use]
    pub fn channel_order(self) -> Option<ChannelOrder> {
        match self {
            Self::Grayscale8 => None,
            Self::Interleaved24Bgr => Some(ChannelOrder::Bgr),
            Self::Interleaved24Rgb => Some(ChannelOrder::Rgb),
        }
    }
}

impl fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grayscale8 => write!(f, "Gray8"),
            Self::Interleaved24Bgr => write!(f, "Bgr24"),
            Self::Interleaved24Rgb => write!(f, "Rgb24"),
        }
    }
}

/// Observed value range of one band, as used by the min-max stretch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStats {
    /// 1-based band index
    pub band: usize,
    pub min: f64,
    pub max: f64,
    /// True when the range was too narrow to stretch and the plane went black
    pub degenerate: bool,
}

impl fmt::Display for BandStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "band {band}: min={min}, max={max}",
            band = self.band,
            min = self.min,
            max = self.max
        )?;
        if self.degenerate {
            write!(f, " (flat)")?;
        }
        Ok(())
    }
}

/// What a driver reports about a dataset once it is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterInfo {
    pub driver: &'static str,
    pub dimensions: Dimensions,
    pub band_count: usize,
    pub bits_per_sample: u16,
}

impl fmt::Display for RasterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{dims} x {bands} band(s), {bits}-bit [{driver}]",
            dims = self.dimensions,
            bands = self.band_count,
            bits = self.bits_per_sample,
            driver = self.driver
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_pixel_count() {
        let dims = Dimensions::new(640, 480);
        assert_eq!(dims.pixel_count(), 307_200);
        assert!(dims.is_valid());
        assert!(!Dimensions::new(0, 10).is_valid());
        assert_eq!(dims.to_string(), "640x480");
    }

    #[test]
    fn test_channel_order_permutation() {
        assert_eq!(ChannelOrder::Bgr.source_planes(), [2, 1, 0]);
        assert_eq!(ChannelOrder::Rgb.source_planes(), [0, 1, 2]);
        assert_eq!(ChannelOrder::default(), ChannelOrder::Bgr);
    }

    #[test]
    fn test_pixel_layout_bytes_per_pixel() {
        assert_eq!(PixelLayout::Grayscale8.bytes_per_pixel(), 1);
        assert_eq!(PixelLayout::Interleaved24Bgr.bytes_per_pixel(), 3);
        assert_eq!(PixelLayout::interleaved(ChannelOrder::Rgb), PixelLayout::Interleaved24Rgb);
        assert_eq!(PixelLayout::Grayscale8.channel_order(), None);
    }

    #[test]
    fn test_band_stats_display() {
        let stats = BandStats { band: 2, min: 5.0, max: 5.0, degenerate: true };
        assert_eq!(stats.to_string(), "band 2: min=5, max=5 (flat)");
    }
}
