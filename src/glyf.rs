// The glyf table is a bare byte sequence; the loca table says which range
// belongs to a glyph. Only the header's bounding box is consulted here;
// outline data is someone else's concern.

use std::ops::Range;

use crate::{
    data_types::int16,
    decoder::{FromData, Stream},
};

pub struct GlyfTable<'a>(pub &'a [u8]);

impl<'a> GlyfTable<'a> {
    pub fn get_data(&self, range: Range<usize>) -> Option<&'a [u8]> {
        self.0.get(range)
    }

    /// The bounding box of the glyph stored in `range`, as
    /// `[xMin, yMin, xMax, yMax]` design units.
    pub fn get_bbox(&self, range: Range<usize>) -> Option<[i16; 4]> {
        let data = self.get_data(range)?;
        let header = GlyphHeader::parse(data)?;
        Some([header.xMin, header.yMin, header.xMax, header.yMax])
    }
}

#[allow(non_snake_case)]
pub struct GlyphHeader {
    pub numberOfContours: int16, // >= 0 for a simple glyph, negative for a composite.
    pub xMin: int16,
    pub yMin: int16,
    pub xMax: int16,
    pub yMax: int16,
}

impl FromData for GlyphHeader {
    const SIZE: usize = 2 * 5;
    #[allow(non_snake_case)]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let numberOfContours = s.read()?;
        let xMin = s.read()?;
        let yMin = s.read()?;
        let xMax = s.read()?;
        let yMax = s.read()?;
        Some(Self {
            numberOfContours,
            xMin,
            yMin,
            xMax,
            yMax,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::GlyfTable;

    #[test]
    fn test_bbox() {
        let data: Vec<u8> = [2_i16, -10, -20, 300, 400, 0]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        let glyf = GlyfTable(&data);
        assert_eq!(glyf.get_bbox(0..12), Some([-10, -20, 300, 400]));
    }

    #[test]
    fn test_bbox_out_of_range() {
        let glyf = GlyfTable(&[0_u8; 4]);
        assert_eq!(glyf.get_bbox(0..4), None);
        assert_eq!(glyf.get_bbox(2..20), None);
    }
}
