use crate::{
    data_types::{uint16, Version16Dot16},
    decoder::Stream,
};

#[allow(non_snake_case)]
pub struct MaxpTable {
    pub version: Version16Dot16, // 0x00005000 for version 0.5, 0x00010000 for version 1.0.
    pub numGlyphs: uint16,       // The number of glyphs in the font.
}

impl MaxpTable {
    #[allow(non_snake_case)]
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let version = s.read()?;
        let numGlyphs = s.read()?;
        Some(Self { version, numGlyphs })
    }
}
