use std::ops::Range;

use crate::{
    data_types::{Offset16, Offset32},
    decoder::{LazyArray, Stream},
    head::LocaOffsetFormat,
};

pub enum LocaTable<'a> {
    Short(LazyArray<'a, Offset16>), // [numGlyphs + 1] Actual offset divided by 2.
    Long(LazyArray<'a, Offset32>),  // [numGlyphs + 1] Actual offset.
}

impl<'a> LocaTable<'a> {
    pub fn parse(data: &'a [u8], format: LocaOffsetFormat, num_glyphs: u16) -> Option<Self> {
        let mut s = Stream::new(data);
        match format {
            LocaOffsetFormat::Offset16 => {
                let offsets = s.read_array(num_glyphs as usize + 1)?;
                Some(Self::Short(offsets))
            }
            LocaOffsetFormat::Offset32 => {
                let offsets = s.read_array(num_glyphs as usize + 1)?;
                Some(Self::Long(offsets))
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Short(offsets) => offsets.len(),
            Self::Long(offsets) => offsets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The glyf byte range of `glyph_id`, or `None` for a glyph without an
    /// outline (equal consecutive offsets).
    pub fn get_glyf_range(&self, glyph_id: u16) -> Option<Range<usize>> {
        let glyph_id = glyph_id as usize;
        let next_glyph_id = glyph_id + 1;
        if next_glyph_id >= self.len() {
            return None;
        }

        let range = match self {
            Self::Short(offsets) => {
                let start = offsets.get(glyph_id)? as usize * 2;
                let end = offsets.get(next_glyph_id)? as usize * 2;
                start..end
            }
            Self::Long(offsets) => {
                let start = offsets.get(glyph_id)? as usize;
                let end = offsets.get(next_glyph_id)? as usize;
                start..end
            }
        };

        if range.start >= range.end {
            None
        } else {
            Some(range)
        }
    }
}
