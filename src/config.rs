use crate::types::ChannelOrder;

/// Which bands to display and how to lay out the packed pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Channel order of interleaved color output
    pub channel_order: ChannelOrder,
    /// 1-based bands shown as red, green and blue when a raster has 3+ bands
    pub rgb_bands: [usize; 3],
    /// 1-based band shown when a raster has fewer than 3 bands
    pub gray_band: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            channel_order: ChannelOrder::Bgr,
            rgb_bands: [1, 2, 3],
            gray_band: 1,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct ConversionConfigBuilder {
    channel_order: Option<ChannelOrder>,
    rgb_bands: Option<[usize; 3]>,
    gray_band: Option<usize>,
}

impl ConversionConfigBuilder {
    pub fn channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = Some(order);
        self
    }

    pub fn rgb_bands(mut self, bands: [usize; 3]) -> Self {
        self.rgb_bands = Some(bands);
        self
    }

    pub fn gray_band(mut self, band: usize) -> Self {
        self.gray_band = Some(band);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            channel_order: self.channel_order.unwrap_or(default.channel_order),
            rgb_bands: self.rgb_bands.unwrap_or(default.rgb_bands),
            gray_band: self.gray_band.unwrap_or(default.gray_band),
        }
    }
}
