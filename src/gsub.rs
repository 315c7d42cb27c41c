use core::fmt::Write;

use num_enum::TryFromPrimitive;

use crate::{
    data_types::Tag,
    decoder::Stream,
    font::Font,
    layout::{self, LayoutTable},
    sink::Sink,
};

#[derive(Debug, TryFromPrimitive)]
#[repr(u16)]
pub enum GsubLookupType {
    SingleSubstitution = 1,
    MultipleSubstitution = 2,
    AlternateSubstitution = 3,
    LigatureSubstitution = 4,
    ContextSubstitution = 5,
    ChainingContextSubstitution = 6,
    ExtensionSubstitution = 7,
    ReverseChainingSingleSubstitution = 8,
}

pub(crate) fn decode(font: &Font, table: &LayoutTable, sink: &mut dyn Sink) {
    table.visit_subtables(|tag, lookup_type, subtable| {
        match GsubLookupType::try_from(lookup_type) {
            Ok(GsubLookupType::SingleSubstitution) => {
                let _ = single_substitution(font, tag, subtable, sink);
            }
            Ok(GsubLookupType::AlternateSubstitution) => {
                let _ = alternate_substitution(font, tag, subtable, sink);
            }
            Ok(GsubLookupType::LigatureSubstitution) => {
                let _ = ligature_substitution(font, tag, subtable, sink);
            }
            Ok(other) => log::debug!("unhandled GSUB lookup type {:?}", other),
            Err(_) => log::debug!("unknown GSUB lookup type {}", lookup_type),
        }
    });
}

fn emit_single(font: &Font, tag: Tag, from: u16, to: u16, sink: &mut dyn Sink) {
    sink.feature(&format!(
        "gsub {} 2 -{} +{}",
        tag,
        font.glyph_name(from),
        font.glyph_name(to)
    ));
}

fn single_substitution(font: &Font, tag: Tag, subtable: &[u8], sink: &mut dyn Sink) -> Option<()> {
    let mut s = Stream::new(subtable);
    let format: u16 = s.read()?;
    let coverage_offset: u16 = s.read()?;
    let coverage = layout::coverage_glyphs(subtable, coverage_offset)?;
    match format {
        1 => {
            let delta: i16 = s.read()?;
            for glyph_id in coverage {
                emit_single(font, tag, glyph_id, glyph_id.wrapping_add(delta as u16), sink);
            }
        }
        2 => {
            let glyph_count: u16 = s.read()?;
            let substitutes = s.read_array::<u16>(glyph_count as usize)?;
            for (i, &glyph_id) in coverage.iter().enumerate().take(glyph_count as usize) {
                let Some(substitute) = substitutes.get(i) else {
                    continue;
                };
                emit_single(font, tag, glyph_id, substitute, sink);
            }
        }
        _ => log::debug!("unhandled GSUB single substitution format {}", format),
    }
    Some(())
}

fn alternate_substitution(
    font: &Font,
    tag: Tag,
    subtable: &[u8],
    sink: &mut dyn Sink,
) -> Option<()> {
    let mut s = Stream::new(subtable);
    let format: u16 = s.read()?;
    let coverage_offset: u16 = s.read()?;
    if format != 1 {
        log::debug!("unhandled GSUB alternate substitution format {}", format);
        return None;
    }
    let alternate_set_count: u16 = s.read()?;
    let alternate_set_offsets = s.read_array::<u16>(alternate_set_count as usize)?;
    let coverage = layout::coverage_glyphs(subtable, coverage_offset)?;
    for (i, &glyph_id) in coverage.iter().enumerate().take(alternate_set_count as usize) {
        let Some(offset) = alternate_set_offsets.get(i) else {
            continue;
        };
        let Some(set_data) = subtable.get(offset as usize..) else {
            continue;
        };
        let mut set = Stream::new(set_data);
        let Some(glyph_count) = set.read::<u16>() else {
            continue;
        };
        for _ in 0..glyph_count {
            let Some(alternate) = set.read::<u16>() else {
                break;
            };
            emit_single(font, tag, glyph_id, alternate, sink);
        }
    }
    Some(())
}

fn ligature_substitution(
    font: &Font,
    tag: Tag,
    subtable: &[u8],
    sink: &mut dyn Sink,
) -> Option<()> {
    let mut s = Stream::new(subtable);
    let format: u16 = s.read()?;
    let coverage_offset: u16 = s.read()?;
    if format != 1 {
        log::debug!("unhandled GSUB ligature substitution format {}", format);
        return None;
    }
    let ligature_set_count: u16 = s.read()?;
    let ligature_set_offsets = s.read_array::<u16>(ligature_set_count as usize)?;
    let coverage = layout::coverage_glyphs(subtable, coverage_offset)?;
    for (i, &first_glyph) in coverage.iter().enumerate().take(ligature_set_count as usize) {
        let Some(set_offset) = ligature_set_offsets.get(i) else {
            continue;
        };
        let Some(set_data) = subtable.get(set_offset as usize..) else {
            continue;
        };
        let mut set = Stream::new(set_data);
        let Some(ligature_count) = set.read::<u16>() else {
            continue;
        };
        let Some(ligature_offsets) = set.read_array::<u16>(ligature_count as usize) else {
            continue;
        };
        for ligature_offset in &ligature_offsets {
            let Some(mut lig) = set_data.get(ligature_offset as usize..).map(Stream::new) else {
                continue;
            };
            let Some(ligature_glyph) = lig.read::<u16>() else {
                continue;
            };
            let Some(component_count) = lig.read::<u16>() else {
                continue;
            };
            // The count in the emitted rule covers every glyph operand:
            // the components consumed plus the ligature produced.
            let mut line = format!(
                "gsub {} {} -{}",
                tag,
                component_count as u32 + 1,
                font.glyph_name(first_glyph)
            );
            for _ in 1..component_count.max(1) {
                let Some(component) = lig.read::<u16>() else {
                    break;
                };
                let _ = write!(line, " -{}", font.glyph_name(component));
            }
            let _ = write!(line, " +{}", font.glyph_name(ligature_glyph));
            sink.feature(&line);
        }
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::decode;
    use crate::font::Font;
    use crate::layout::tests::{coverage_format1, layout_bytes};
    use crate::layout::LayoutTable;
    use crate::sink::tests::RecordingSink;

    fn test_font() -> Font<'static> {
        let names = (0..0x40).map(|i| format!("g{i}")).collect();
        Font::with_glyphs(names, 1000, 720)
    }

    #[test]
    fn test_single_substitution_delta() {
        let mut sub = Vec::new();
        sub.extend_from_slice(&1_u16.to_be_bytes()); // format
        sub.extend_from_slice(&6_u16.to_be_bytes()); // coverage offset
        sub.extend_from_slice(&1_i16.to_be_bytes()); // deltaGlyphID
        sub.extend_from_slice(&coverage_format1(&[0x30]));

        let data = layout_bytes(b"liga", 1, &sub);
        let table = LayoutTable::parse(&data).unwrap();
        let mut sink = RecordingSink::default();
        decode(&test_font(), &table, &mut sink);
        assert_eq!(sink.features, ["gsub liga 2 -g48 +g49"]);
    }

    #[test]
    fn test_single_substitution_delta_wraps() {
        let mut sub = Vec::new();
        sub.extend_from_slice(&1_u16.to_be_bytes());
        sub.extend_from_slice(&6_u16.to_be_bytes());
        sub.extend_from_slice(&(-2_i16).to_be_bytes());
        sub.extend_from_slice(&coverage_format1(&[0x10]));

        let data = layout_bytes(b"subs", 1, &sub);
        let table = LayoutTable::parse(&data).unwrap();
        let mut sink = RecordingSink::default();
        decode(&test_font(), &table, &mut sink);
        assert_eq!(sink.features, ["gsub subs 2 -g16 +g14"]);
    }

    #[test]
    fn test_single_substitution_list() {
        let mut sub = Vec::new();
        sub.extend_from_slice(&2_u16.to_be_bytes()); // format
        sub.extend_from_slice(&10_u16.to_be_bytes()); // coverage offset
        sub.extend_from_slice(&2_u16.to_be_bytes()); // glyphCount
        sub.extend_from_slice(&7_u16.to_be_bytes()); // substitutes
        sub.extend_from_slice(&8_u16.to_be_bytes());
        assert_eq!(sub.len(), 10);
        sub.extend_from_slice(&coverage_format1(&[2, 3]));

        let data = layout_bytes(b"smcp", 1, &sub);
        let table = LayoutTable::parse(&data).unwrap();
        let mut sink = RecordingSink::default();
        decode(&test_font(), &table, &mut sink);
        assert_eq!(sink.features, ["gsub smcp 2 -g2 +g7", "gsub smcp 2 -g3 +g8"]);
    }

    #[test]
    fn test_alternate_substitution() {
        let mut sub = Vec::new();
        sub.extend_from_slice(&1_u16.to_be_bytes()); // format
        sub.extend_from_slice(&8_u16.to_be_bytes()); // coverage offset
        sub.extend_from_slice(&1_u16.to_be_bytes()); // alternateSetCount
        sub.extend_from_slice(&14_u16.to_be_bytes()); // alternateSetOffsets[0]
        assert_eq!(sub.len(), 8);
        sub.extend_from_slice(&coverage_format1(&[4])); // 6 bytes
        sub.extend_from_slice(&2_u16.to_be_bytes()); // glyphCount
        sub.extend_from_slice(&11_u16.to_be_bytes());
        sub.extend_from_slice(&12_u16.to_be_bytes());

        let data = layout_bytes(b"aalt", 3, &sub);
        let table = LayoutTable::parse(&data).unwrap();
        let mut sink = RecordingSink::default();
        decode(&test_font(), &table, &mut sink);
        assert_eq!(sink.features, ["gsub aalt 2 -g4 +g11", "gsub aalt 2 -g4 +g12"]);
    }

    #[test]
    fn test_ligature_substitution() {
        // f + f + i -> ffi (glyphs 5, 5, 6 -> 20)
        let mut sub = Vec::new();
        sub.extend_from_slice(&1_u16.to_be_bytes()); // format
        sub.extend_from_slice(&8_u16.to_be_bytes()); // coverage offset
        sub.extend_from_slice(&1_u16.to_be_bytes()); // ligatureSetCount
        sub.extend_from_slice(&14_u16.to_be_bytes()); // ligatureSetOffsets[0]
        assert_eq!(sub.len(), 8);
        sub.extend_from_slice(&coverage_format1(&[5])); // 6 bytes
        // LigatureSet at 14
        sub.extend_from_slice(&1_u16.to_be_bytes()); // ligatureCount
        sub.extend_from_slice(&4_u16.to_be_bytes()); // ligatureOffsets[0], from set start
        // Ligature at set + 4
        sub.extend_from_slice(&20_u16.to_be_bytes()); // ligatureGlyph
        sub.extend_from_slice(&3_u16.to_be_bytes()); // componentCount
        sub.extend_from_slice(&5_u16.to_be_bytes()); // components[1]
        sub.extend_from_slice(&6_u16.to_be_bytes()); // components[2]

        let data = layout_bytes(b"liga", 4, &sub);
        let table = LayoutTable::parse(&data).unwrap();
        let mut sink = RecordingSink::default();
        decode(&test_font(), &table, &mut sink);
        assert_eq!(sink.features, ["gsub liga 4 -g5 -g5 -g6 +g20"]);
    }

    #[test]
    fn test_unknown_lookup_type_is_skipped() {
        let data = layout_bytes(b"ccmp", 2, &[0, 1, 0, 0]); // MultipleSubstitution
        let table = LayoutTable::parse(&data).unwrap();
        let mut sink = RecordingSink::default();
        decode(&test_font(), &table, &mut sink);
        assert!(sink.features.is_empty());
    }
}
