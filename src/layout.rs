// The GSUB and GPOS tables share everything above the lookup subtables:
// Script -> LangSys -> Feature -> Lookup, all addressed by offsets
// relative to the list that owns them. This module parses that tree and
// walks it in file order; the per-subtable handlers live in gsub/gpos.

use crate::{
    data_types::{uint16, Offset16, Offset32, Tag},
    decoder::{FromData, LazyArray, Stream},
};

pub const NO_REQUIRED_FEATURE: u16 = 0xFFFF;
const USE_MARK_FILTERING_SET: u16 = 0x0010;

#[allow(non_snake_case)]
#[derive(Debug)]
pub struct LayoutHeader {
    pub majorVersion: uint16,        // = 1
    pub minorVersion: uint16,        // = 0 or 1
    pub scriptListOffset: Offset16,  // From beginning of the GSUB/GPOS table.
    pub featureListOffset: Offset16,
    pub lookupListOffset: Offset16,
    pub featureVariationsOffset: Option<Offset32>, // Version 1.1 only.
}

impl LayoutHeader {
    #[allow(non_snake_case)]
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let majorVersion = s.read()?;
        let minorVersion = s.read()?;
        let scriptListOffset = s.read()?;
        let featureListOffset = s.read()?;
        let lookupListOffset = s.read()?;
        let featureVariationsOffset = if majorVersion == 1 && minorVersion == 1 {
            Some(s.read()?)
        } else {
            None
        };
        Some(Self {
            majorVersion,
            minorVersion,
            scriptListOffset,
            featureListOffset,
            lookupListOffset,
            featureVariationsOffset,
        })
    }
}

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct ScriptList<'a> {
    pub scriptCount: uint16,
    pub scriptRecords: LazyArray<'a, ScriptRecord>, // Listed alphabetically by script tag.
}

impl<'a> ScriptList<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let scriptCount: u16 = s.read()?;
        let scriptRecords = s.read_array(scriptCount as usize)?;
        Some(Self {
            scriptCount,
            scriptRecords,
        })
    }
}

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct ScriptRecord {
    pub scriptTag: Tag,         // 4-byte script tag identifier.
    pub scriptOffset: Offset16, // From beginning of ScriptList.
}

impl FromData for ScriptRecord {
    const SIZE: usize = Tag::SIZE + u16::SIZE;
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(Self {
            scriptTag: s.read()?,
            scriptOffset: s.read()?,
        })
    }
}

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct Script<'a> {
    pub defaultLangSysOffset: Offset16, // From beginning of Script table; may be NULL.
    pub langSysCount: uint16,
    pub langSysRecords: LazyArray<'a, LangSysRecord>,
}

impl<'a> Script<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let defaultLangSysOffset = s.read()?;
        let langSysCount: u16 = s.read()?;
        let langSysRecords = s.read_array(langSysCount as usize)?;
        Some(Self {
            defaultLangSysOffset,
            langSysCount,
            langSysRecords,
        })
    }
}

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct LangSysRecord {
    pub langSysTag: Tag,
    pub langSysOffset: Offset16, // From beginning of Script table.
}

impl FromData for LangSysRecord {
    const SIZE: usize = Tag::SIZE + u16::SIZE;
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(Self {
            langSysTag: s.read()?,
            langSysOffset: s.read()?,
        })
    }
}

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct LangSys<'a> {
    pub lookupOrderOffset: Offset16,  // = NULL (reserved).
    pub requiredFeatureIndex: uint16, // 0xFFFF if no required feature.
    pub featureIndexCount: uint16,
    pub featureIndices: LazyArray<'a, uint16>, // Indices into the FeatureList.
}

impl<'a> LangSys<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let lookupOrderOffset = s.read()?;
        let requiredFeatureIndex = s.read()?;
        let featureIndexCount: u16 = s.read()?;
        let featureIndices = s.read_array(featureIndexCount as usize)?;
        Some(Self {
            lookupOrderOffset,
            requiredFeatureIndex,
            featureIndexCount,
            featureIndices,
        })
    }
}

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct FeatureList<'a> {
    pub featureCount: uint16,
    pub featureRecords: LazyArray<'a, FeatureRecord>, // Listed alphabetically by feature tag.
}

impl<'a> FeatureList<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let featureCount: u16 = s.read()?;
        let featureRecords = s.read_array(featureCount as usize)?;
        Some(Self {
            featureCount,
            featureRecords,
        })
    }
}

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct FeatureRecord {
    pub featureTag: Tag,         // 4-byte feature identification tag.
    pub featureOffset: Offset16, // From beginning of FeatureList.
}

impl FromData for FeatureRecord {
    const SIZE: usize = Tag::SIZE + u16::SIZE;
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(Self {
            featureTag: s.read()?,
            featureOffset: s.read()?,
        })
    }
}

#[allow(non_snake_case)]
#[derive(Debug)]
pub struct Feature<'a> {
    pub featureParamsOffset: Offset16,
    pub lookupIndexCount: uint16,
    pub lookupListIndices: LazyArray<'a, uint16>, // Indices into the LookupList.
}

impl<'a> Feature<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let featureParamsOffset = s.read()?;
        let lookupIndexCount: u16 = s.read()?;
        let lookupListIndices = s.read_array(lookupIndexCount as usize)?;
        Some(Self {
            featureParamsOffset,
            lookupIndexCount,
            lookupListIndices,
        })
    }
}

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct LookupList<'a> {
    pub lookupCount: uint16,
    pub lookupOffsets: LazyArray<'a, Offset16>, // From beginning of LookupList.
}

impl<'a> LookupList<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let lookupCount: u16 = s.read()?;
        let lookupOffsets = s.read_array(lookupCount as usize)?;
        Some(Self {
            lookupCount,
            lookupOffsets,
        })
    }
}

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct Lookup<'a> {
    pub lookupType: uint16, // Different enumerations for GSUB and GPOS.
    pub lookupFlag: uint16,
    pub subTableCount: uint16,
    pub subtableOffsets: LazyArray<'a, Offset16>, // From beginning of Lookup table.
    pub markFilteringSet: Option<uint16>, // Present only with the USE_MARK_FILTERING_SET flag.
}

impl<'a> Lookup<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let lookupType = s.read()?;
        let lookupFlag: u16 = s.read()?;
        let subTableCount: u16 = s.read()?;
        let subtableOffsets = s.read_array(subTableCount as usize)?;
        let markFilteringSet = if lookupFlag & USE_MARK_FILTERING_SET != 0 {
            Some(s.read()?)
        } else {
            None
        };
        Some(Self {
            lookupType,
            lookupFlag,
            subTableCount,
            subtableOffsets,
            markFilteringSet,
        })
    }
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy)]
pub struct RangeRecord {
    pub startGlyphID: uint16,
    pub endGlyphID: uint16,
    pub startCoverageIndex: uint16,
}

impl FromData for RangeRecord {
    const SIZE: usize = 6;
    #[allow(non_snake_case)]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(Self {
            startGlyphID: s.read()?,
            endGlyphID: s.read()?,
            startCoverageIndex: s.read()?,
        })
    }
}

pub enum CoverageTable<'a> {
    Format1 {
        glyphArray: LazyArray<'a, uint16>, // In numerical order.
    },
    Format2 {
        rangeRecords: LazyArray<'a, RangeRecord>, // Ordered by startGlyphID.
    },
}

impl<'a> CoverageTable<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let format: u16 = s.read()?;
        let count: u16 = s.read()?;
        match format {
            1 => Some(Self::Format1 {
                glyphArray: s.read_array(count as usize)?,
            }),
            2 => Some(Self::Format2 {
                rangeRecords: s.read_array(count as usize)?,
            }),
            _ => {
                log::debug!("unknown coverage format {}", format);
                None
            }
        }
    }

    /// Expands the coverage into its glyph sequence; the position of a
    /// glyph in the result is its coverage index.
    pub fn glyphs(&self) -> Vec<u16> {
        // A coverage cannot legitimately hold more glyphs than there are
        // glyph IDs; cap the expansion so a bogus range list stays finite.
        const MAX: usize = u16::MAX as usize + 1;
        match self {
            Self::Format1 { glyphArray } => glyphArray.into_iter().collect(),
            Self::Format2 { rangeRecords } => {
                let mut out = Vec::new();
                for record in rangeRecords {
                    if record.startGlyphID > record.endGlyphID {
                        continue;
                    }
                    for glyph_id in record.startGlyphID..=record.endGlyphID {
                        if out.len() >= MAX {
                            return out;
                        }
                        out.push(glyph_id);
                    }
                }
                out
            }
        }
    }
}

/// Expands the coverage table at `offset` within a lookup subtable.
pub fn coverage_glyphs(subtable: &[u8], offset: u16) -> Option<Vec<u16>> {
    let data = subtable.get(offset as usize..)?;
    Some(CoverageTable::parse(data)?.glyphs())
}

pub struct LayoutTable<'a> {
    pub header: LayoutHeader,
    pub script_list: ScriptList<'a>,
    pub feature_list: FeatureList<'a>,
    pub lookup_list: LookupList<'a>,
    script_list_data: &'a [u8],
    feature_list_data: &'a [u8],
    lookup_list_data: &'a [u8],
}

impl<'a> LayoutTable<'a> {
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let header = LayoutHeader::parse(data)?;
        let script_list_data = data.get(header.scriptListOffset as usize..)?;
        let feature_list_data = data.get(header.featureListOffset as usize..)?;
        let lookup_list_data = data.get(header.lookupListOffset as usize..)?;
        let script_list = ScriptList::parse(script_list_data)?;
        let feature_list = FeatureList::parse(feature_list_data)?;
        let lookup_list = LookupList::parse(lookup_list_data)?;
        Some(Self {
            header,
            script_list,
            feature_list,
            lookup_list,
            script_list_data,
            feature_list_data,
            lookup_list_data,
        })
    }

    /// Walks every lookup subtable reachable from the script list, in file
    /// order: scripts, then each script's default and named LangSys, then
    /// the required feature followed by the feature list. A feature
    /// reachable through several scripts is visited each time.
    pub fn visit_subtables<F>(&self, mut visit: F)
    where
        F: FnMut(Tag, u16, &'a [u8]),
    {
        for script_record in &self.script_list.scriptRecords {
            let Some(script_data) = self
                .script_list_data
                .get(script_record.scriptOffset as usize..)
            else {
                continue;
            };
            let Some(script) = Script::parse(script_data) else {
                continue;
            };
            if script.defaultLangSysOffset != 0 {
                self.visit_lang_sys(script_data, script.defaultLangSysOffset, &mut visit);
            }
            for lang_sys_record in &script.langSysRecords {
                self.visit_lang_sys(script_data, lang_sys_record.langSysOffset, &mut visit);
            }
        }
    }

    fn visit_lang_sys<F>(&self, script_data: &'a [u8], offset: Offset16, visit: &mut F)
    where
        F: FnMut(Tag, u16, &'a [u8]),
    {
        let Some(data) = script_data.get(offset as usize..) else {
            return;
        };
        let Some(lang_sys) = LangSys::parse(data) else {
            return;
        };
        if lang_sys.requiredFeatureIndex != NO_REQUIRED_FEATURE {
            self.visit_feature(lang_sys.requiredFeatureIndex, visit);
        }
        for feature_index in &lang_sys.featureIndices {
            self.visit_feature(feature_index, visit);
        }
    }

    fn visit_feature<F>(&self, feature_index: u16, visit: &mut F)
    where
        F: FnMut(Tag, u16, &'a [u8]),
    {
        let Some(record) = self.feature_list.featureRecords.get(feature_index as usize) else {
            return;
        };
        let Some(data) = self.feature_list_data.get(record.featureOffset as usize..) else {
            return;
        };
        let Some(feature) = Feature::parse(data) else {
            return;
        };
        for lookup_index in &feature.lookupListIndices {
            let Some(lookup_offset) = self.lookup_list.lookupOffsets.get(lookup_index as usize)
            else {
                continue;
            };
            let Some(lookup_data) = self.lookup_list_data.get(lookup_offset as usize..) else {
                continue;
            };
            let Some(lookup) = Lookup::parse(lookup_data) else {
                continue;
            };
            for subtable_offset in &lookup.subtableOffsets {
                if let Some(subtable) = lookup_data.get(subtable_offset as usize..) {
                    visit(record.featureTag, lookup.lookupType, subtable);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{CoverageTable, LayoutTable};
    use crate::data_types::Tag;

    /// One DFLT script, one default LangSys, one feature with one lookup
    /// holding one subtable appended at the end.
    pub(crate) fn layout_bytes(feature_tag: &[u8; 4], lookup_type: u16, subtable: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0x00010000_u32.to_be_bytes());
        data.extend_from_slice(&10_u16.to_be_bytes()); // scriptListOffset
        data.extend_from_slice(&30_u16.to_be_bytes()); // featureListOffset
        data.extend_from_slice(&44_u16.to_be_bytes()); // lookupListOffset

        // ScriptList at 10
        data.extend_from_slice(&1_u16.to_be_bytes());
        data.extend_from_slice(b"DFLT");
        data.extend_from_slice(&8_u16.to_be_bytes()); // script at scriptList + 8
        data.extend_from_slice(&4_u16.to_be_bytes()); // defaultLangSysOffset
        data.extend_from_slice(&0_u16.to_be_bytes()); // langSysCount
        data.extend_from_slice(&0_u16.to_be_bytes()); // lookupOrderOffset
        data.extend_from_slice(&0xFFFF_u16.to_be_bytes()); // no required feature
        data.extend_from_slice(&1_u16.to_be_bytes());
        data.extend_from_slice(&0_u16.to_be_bytes()); // featureIndices[0]

        // FeatureList at 30
        data.extend_from_slice(&1_u16.to_be_bytes());
        data.extend_from_slice(feature_tag);
        data.extend_from_slice(&8_u16.to_be_bytes()); // feature at featureList + 8
        data.extend_from_slice(&0_u16.to_be_bytes()); // featureParamsOffset
        data.extend_from_slice(&1_u16.to_be_bytes());
        data.extend_from_slice(&0_u16.to_be_bytes()); // lookupListIndices[0]

        // LookupList at 44
        data.extend_from_slice(&1_u16.to_be_bytes());
        data.extend_from_slice(&4_u16.to_be_bytes()); // lookup at lookupList + 4
        data.extend_from_slice(&lookup_type.to_be_bytes());
        data.extend_from_slice(&0_u16.to_be_bytes()); // lookupFlag
        data.extend_from_slice(&1_u16.to_be_bytes());
        data.extend_from_slice(&8_u16.to_be_bytes()); // subtable at lookup + 8
        assert_eq!(data.len(), 56);
        data.extend_from_slice(subtable);
        data
    }

    pub(crate) fn coverage_format1(glyphs: &[u16]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&1_u16.to_be_bytes());
        data.extend_from_slice(&(glyphs.len() as u16).to_be_bytes());
        for &glyph_id in glyphs {
            data.extend_from_slice(&glyph_id.to_be_bytes());
        }
        data
    }

    #[test]
    fn test_coverage_formats_agree() {
        let format1 = coverage_format1(&[5, 6, 7, 9]);

        let mut format2 = Vec::new();
        format2.extend_from_slice(&2_u16.to_be_bytes());
        format2.extend_from_slice(&2_u16.to_be_bytes());
        for (start, end, index) in [(5_u16, 7_u16, 0_u16), (9, 9, 3)] {
            format2.extend_from_slice(&start.to_be_bytes());
            format2.extend_from_slice(&end.to_be_bytes());
            format2.extend_from_slice(&index.to_be_bytes());
        }

        let a = CoverageTable::parse(&format1).unwrap().glyphs();
        let b = CoverageTable::parse(&format2).unwrap().glyphs();
        assert_eq!(a, vec![5, 6, 7, 9]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_coverage_unknown_format() {
        let data = [0_u8, 3, 0, 0];
        assert!(CoverageTable::parse(&data).is_none());
    }

    #[test]
    fn test_visit_reaches_subtable() {
        let data = layout_bytes(b"liga", 4, &[0xAB, 0xCD]);
        let table = LayoutTable::parse(&data).unwrap();
        let mut seen = Vec::new();
        table.visit_subtables(|tag, lookup_type, subtable| {
            seen.push((tag, lookup_type, subtable.to_vec()));
        });
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, Tag::from_be_bytes(*b"liga"));
        assert_eq!(seen[0].1, 4);
        assert_eq!(seen[0].2, vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_visit_skips_dangling_feature_index() {
        // LangSys pointing at feature 7 of a one-entry feature list.
        let mut data = layout_bytes(b"kern", 1, &[]);
        data[28..30].copy_from_slice(&7_u16.to_be_bytes());
        let table = LayoutTable::parse(&data).unwrap();
        let mut count = 0;
        table.visit_subtables(|_, _, _| count += 1);
        assert_eq!(count, 0);
    }
}
