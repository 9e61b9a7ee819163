//! Assembling normalized planes into a display buffer

use crate::types::{ChannelOrder, PixelLayout};

/// Normalized 8-bit planes ready to be packed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedPlanes {
    Gray(Vec<u8>),
    /// Red, green and blue planes, in that order
    Color([Vec<u8>; 3]),
}

/// Pack planes into a tightly strided buffer (`stride = width * bytes_per_pixel`).
///
/// A gray plane is passed through unchanged. Color planes are interleaved
/// pixel by pixel in `order`; for [`ChannelOrder::Bgr`] pixel `i` becomes
/// `[blue[i], green[i], red[i]]`.
#[must_use]
pub fn pack(planes: NormalizedPlanes, order: ChannelOrder) -> (Vec<u8>, PixelLayout) {
    match planes {
        NormalizedPlanes::Gray(plane) => (plane, PixelLayout::Grayscale8),
        NormalizedPlanes::Color(rgb) => (interleave(&rgb, order), PixelLayout::interleaved(order)),
    }
}

fn interleave(rgb: &[Vec<u8>; 3], order: ChannelOrder) -> Vec<u8> {
    let pixel_count = rgb[0].len();
    debug_assert!(rgb.iter().all(|p| p.len() == pixel_count), "planes differ in size");

    let [first, second, third] = order.source_planes().map(|idx| rgb[idx].as_slice());

    let mut packed = vec![0u8; pixel_count * 3];
    for (i, pixel) in packed.chunks_exact_mut(3).enumerate() {
        pixel[0] = first[i];
        pixel[1] = second[i];
        pixel[2] = third[i];
    }

    packed
}
