use crate::{
    data_types::{int16, uint16, Offset32},
    decoder::{FromData, LazyArray, Stream},
};

#[allow(non_snake_case)]
#[derive(Debug)]
pub struct CmapHeader<'a> {
    pub version: uint16,                                // Table version number (0).
    pub numTables: uint16,                              // Number of encoding tables that follow.
    pub encodingRecords: LazyArray<'a, EncodingRecord>, // [numTables]
}

impl<'a> CmapHeader<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let version = s.read()?;
        let numTables = s.read()?;
        let encodingRecords = s.read_array(numTables as usize)?;
        Some(Self {
            version,
            numTables,
            encodingRecords,
        })
    }
}

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct EncodingRecord {
    pub platformID: uint16,       // Platform ID.
    pub encodingID: uint16,       // Platform-specific encoding ID.
    pub subtableOffset: Offset32, // Byte offset from beginning of table to the subtable.
}

impl FromData for EncodingRecord {
    const SIZE: usize = 4 + 4;
    #[allow(non_snake_case)]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let platformID = s.read()?;
        let encodingID = s.read()?;
        let subtableOffset = s.read()?;
        Some(Self {
            platformID,
            encodingID,
            subtableOffset,
        })
    }
}

impl EncodingRecord {
    pub fn is_windows_unicode_bmp(&self) -> bool {
        self.platformID == 3 && self.encodingID == 1
    }
}

pub enum CmapSubtable<'a> {
    Format4(CmapSubtableFormat4<'a>),
}

impl<'a> CmapSubtable<'a> {
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let format: u16 = s.read()?;
        match format {
            4 => Some(Self::Format4(CmapSubtableFormat4::parse(data)?)),
            _ => {
                log::debug!("skipping cmap subtable format {}", format);
                None
            }
        }
    }
}

#[allow(non_snake_case)]
pub struct CmapSubtableFormat4<'a> {
    pub format: uint16,                 // Format number is set to 4.
    pub length: uint16,                 // Length in bytes of the subtable.
    pub language: uint16,               // Only meaningful for Macintosh platform subtables.
    pub segCountX2: uint16,             // 2 x segCount.
    pub searchRange: uint16,
    pub entrySelector: uint16,
    pub rangeShift: uint16,
    pub endCode: LazyArray<'a, uint16>, // [segCount] End character code for each segment, last = 0xFFFF.
    pub reservedPad: uint16,            // Set to 0.
    pub startCode: LazyArray<'a, uint16>, // [segCount] Start character code for each segment.
    pub idDelta: LazyArray<'a, int16>,  // [segCount] Delta for all character codes in segment.
    pub idRangeOffsets: LazyArray<'a, uint16>, // [segCount] Offsets into glyphIdArray or 0.
    data: &'a [u8],                     // the subtable, capped to `length`.
    id_range_offsets_pos: usize,        // byte offset of idRangeOffsets[0] within `data`.
}

impl<'a> CmapSubtableFormat4<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let format = s.read()?;
        let length: u16 = s.read()?;
        let _ = s.set_len(length as usize);
        let language = s.read()?;
        let segCountX2: u16 = s.read()?;
        let segCount = (segCountX2 / 2) as usize;
        let searchRange = s.read()?;
        let entrySelector = s.read()?;
        let rangeShift = s.read()?;
        let endCode = s.read_array(segCount)?;
        let reservedPad = s.read()?;
        let startCode = s.read_array(segCount)?;
        let idDelta = s.read_array(segCount)?;
        let id_range_offsets_pos = s.get_offset();
        let idRangeOffsets = s.read_array(segCount)?;
        let data = data.get(..data.len().min(length as usize))?;
        Some(Self {
            format,
            length,
            language,
            segCountX2,
            searchRange,
            entrySelector,
            rangeShift,
            endCode,
            reservedPad,
            startCode,
            idDelta,
            idRangeOffsets,
            data,
            id_range_offsets_pos,
        })
    }

    /// Records the code point of every mapped glyph into `codes`, indexed
    /// by glyph ID. Later segments overwrite earlier ones when several
    /// code points map to the same glyph.
    pub fn assign_code_points(&self, codes: &mut [u16]) {
        let seg_count = self.startCode.len();
        for i in 0..seg_count {
            let (Some(start), Some(end), Some(delta), Some(range_offset)) = (
                self.startCode.get(i),
                self.endCode.get(i),
                self.idDelta.get(i),
                self.idRangeOffsets.get(i),
            ) else {
                continue;
            };
            if start > end {
                continue;
            }
            for code in start..=end {
                let glyph_id = if range_offset == 0 {
                    code.wrapping_add(delta as u16)
                } else {
                    // The offset is measured from the address of
                    // idRangeOffsets[i] itself.
                    let pos = self.id_range_offsets_pos
                        + 2 * i
                        + range_offset as usize
                        + 2 * (code - start) as usize;
                    match self.data.get(pos..pos + 2).and_then(u16::parse) {
                        Some(glyph_id) => glyph_id,
                        None => continue,
                    }
                };
                if let Some(slot) = codes.get_mut(glyph_id as usize) {
                    *slot = code;
                }
            }
        }
    }
}

pub struct CmapTable<'a> {
    data: &'a [u8],
    pub header: CmapHeader<'a>,
}

impl<'a> CmapTable<'a> {
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let header = CmapHeader::parse(data)?;
        Some(Self { data, header })
    }

    pub fn get_subtable(&self, encoding_record: &EncodingRecord) -> Option<CmapSubtable<'a>> {
        let offset = encoding_record.subtableOffset as usize;
        let data = self.data.get(offset..)?;
        CmapSubtable::parse(data)
    }

    /// The first Windows Unicode BMP (platform 3, encoding 1) record with
    /// a format 4 subtable.
    pub fn get_unicode_format4(&self) -> Option<CmapSubtableFormat4<'a>> {
        self.header
            .encodingRecords
            .into_iter()
            .filter(EncodingRecord::is_windows_unicode_bmp)
            .find_map(|record| match self.get_subtable(&record) {
                Some(CmapSubtable::Format4(subtable)) => Some(subtable),
                _ => None,
            })
    }
}
