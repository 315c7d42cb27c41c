use crate::{
    data_types::{int16, uint16},
    decoder::{FromData, LazyArray, Stream},
};

#[allow(non_snake_case)]
pub struct HheaTable {
    pub majorVersion: uint16,
    pub minorVersion: uint16,
    pub ascender: int16,
    pub descender: int16,
    pub lineGap: int16,
    pub advanceWidthMax: uint16,
    pub minLeftSideBearing: int16,
    pub minRightSideBearing: int16,
    pub xMaxExtent: int16,
    pub caretSlopeRise: int16,
    pub caretSlopeRun: int16,
    pub caretOffset: int16,
    pub metricDataFormat: int16, // 0 for current format.
    pub numberOfHMetrics: uint16, // Number of hMetric entries in the hmtx table.
}

impl HheaTable {
    #[allow(non_snake_case)]
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let majorVersion = s.read()?;
        let minorVersion = s.read()?;
        let ascender = s.read()?;
        let descender = s.read()?;
        let lineGap = s.read()?;
        let advanceWidthMax = s.read()?;
        let minLeftSideBearing = s.read()?;
        let minRightSideBearing = s.read()?;
        let xMaxExtent = s.read()?;
        let caretSlopeRise = s.read()?;
        let caretSlopeRun = s.read()?;
        let caretOffset = s.read()?;
        s.skip(4 * 2)?; // reserved
        let metricDataFormat = s.read()?;
        let numberOfHMetrics = s.read()?;
        Some(Self {
            majorVersion,
            minorVersion,
            ascender,
            descender,
            lineGap,
            advanceWidthMax,
            minLeftSideBearing,
            minRightSideBearing,
            xMaxExtent,
            caretSlopeRise,
            caretSlopeRun,
            caretOffset,
            metricDataFormat,
            numberOfHMetrics,
        })
    }
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy)]
pub struct LongHorMetric {
    pub advanceWidth: uint16,
    pub lsb: int16,
}

impl FromData for LongHorMetric {
    const SIZE: usize = 4;
    #[allow(non_snake_case)]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let advanceWidth = s.read()?;
        let lsb = s.read()?;
        Some(Self { advanceWidth, lsb })
    }
}

#[allow(non_snake_case)]
pub struct HmtxTable<'a> {
    pub hMetrics: LazyArray<'a, LongHorMetric>, // [numberOfHMetrics]
}

impl<'a> HmtxTable<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8], number_of_h_metrics: u16) -> Option<Self> {
        let mut s = Stream::new(data);
        let hMetrics = s.read_array(number_of_h_metrics as usize)?;
        // The trailing leftSideBearings array is not consulted.
        Some(Self { hMetrics })
    }

    /// Advance width in design units. Glyphs past `numberOfHMetrics` share
    /// the last explicit width (a monospaced tail).
    pub fn get_advance_width(&self, glyph_id: usize) -> Option<uint16> {
        let index = glyph_id.min(self.hMetrics.len().checked_sub(1)?);
        self.hMetrics.get(index).map(|metric| metric.advanceWidth)
    }
}
