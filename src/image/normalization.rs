//! Per-band min-max stretch to 8 bits

/// Ranges narrower than this are treated as flat and map to black
pub const DEGENERATE_RANGE: f64 = 1e-12;

/// Linear mapping of one band's observed `[min, max]` onto `[0, 255]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stretch {
    pub min: f64,
    pub max: f64,
    /// `255 / (max - min)`, or 0 for a flat band
    scale: f64,
}

impl Stretch {
    /// Compute the stretch from every sample of a band, nodata included.
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Self {
        let (min, max) = find_min_max(samples);
        Self::new(min, max)
    }

    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        // Also catches NaN and the inverted range of an empty band
        let scale = if max - min >= DEGENERATE_RANGE {
            255.0 / (max - min)
        } else {
            0.0
        };

        Self { min, max, scale }
    }

    /// True when every sample maps to 0
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.scale == 0.0
    }

    #[inline(always)]
    #[must_use]
    // Hot path: called for every sample of every band
    pub fn apply(&self, value: f64) -> u8 {
        if self.is_degenerate() {
            return 0;
        }
        // The cast truncates
        ((value - self.min) * self.scale).clamp(0.0, 255.0) as u8
    }

    #[must_use]
    pub fn normalize(&self, samples: &[f64]) -> Vec<u8> {
        samples.iter().map(|&v| self.apply(v)).collect()
    }
}

/// Exact minimum and maximum of a band. A single NaN sample makes both NaN,
/// which leaves the whole band flat.
#[inline]
#[must_use]
pub fn find_min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .try_fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &val| {
            if val.is_nan() {
                None
            } else {
                Some((min.min(val), max.max(val)))
            }
        })
        .unwrap_or((f64::NAN, f64::NAN))
}

/// Stretch a band plane to 8 bits using its own min and max
#[must_use]
pub fn normalize(plane: &[f64]) -> Vec<u8> {
    Stretch::from_samples(plane).normalize(plane)
}
