use core::fmt::Write;

use num_enum::TryFromPrimitive;

use crate::{
    data_types::{int16, Tag},
    decoder::Stream,
    font::Font,
    layout::{self, LayoutTable},
    sink::Sink,
};

#[derive(Debug, TryFromPrimitive)]
#[repr(u16)]
pub enum GposLookupType {
    SingleAdjustment = 1,
    PairAdjustment = 2,
    CursiveAttachment = 3,
    MarkToBaseAttachment = 4,
    MarkToLigatureAttachment = 5,
    MarkToMarkAttachment = 6,
    ContextPositioning = 7,
    ChainedContextPositioning = 8,
    ExtensionPositioning = 9,
}

/// A positioning adjustment, in design units. Which fields were present
/// is carried separately as the value format mask.
#[allow(non_snake_case)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ValueRecord {
    pub xPlacement: int16,
    pub yPlacement: int16,
    pub xAdvance: int16,
    pub yAdvance: int16,
}

/// Byte length of a ValueRecord with the given format mask: two bytes per
/// set bit, device-table bits included.
pub fn value_record_len(value_format: u16) -> usize {
    2 * (value_format & 0xFF).count_ones() as usize
}

impl ValueRecord {
    /// Reads the fields selected by `value_format` from the stream. The
    /// low four bits are xPlacement, yPlacement, xAdvance, yAdvance; the
    /// high four are device-table offsets, consumed and discarded.
    pub fn parse(s: &mut Stream, value_format: u16) -> Option<Self> {
        let mut record = Self::default();
        for bit in 0..8 {
            if value_format & (1 << bit) == 0 {
                continue;
            }
            let value: i16 = s.read()?;
            match bit {
                0 => record.xPlacement = value,
                1 => record.yPlacement = value,
                2 => record.xAdvance = value,
                3 => record.yAdvance = value,
                _ => {} // device table offset
            }
        }
        Some(record)
    }

    /// The `:±x±y±dx±dy` emission suffix in device units; empty when the
    /// format mask is zero.
    fn suffix(&self, value_format: u16, font: &Font) -> String {
        if value_format == 0 {
            return String::new();
        }
        format!(
            ":{:+}{:+}{:+}{:+}",
            font.uwid(self.xPlacement as i32),
            font.uwid(self.yPlacement as i32),
            font.uwid(self.xAdvance as i32),
            font.uwid(self.yAdvance as i32),
        )
    }
}

#[allow(non_snake_case)]
pub struct Anchor {
    pub xCoordinate: int16,
    pub yCoordinate: int16,
}

impl Anchor {
    #[allow(non_snake_case)]
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let _anchorFormat: u16 = s.read()?;
        let xCoordinate = s.read()?;
        let yCoordinate = s.read()?;
        // Formats 2 and 3 carry contour points or device tables after the
        // coordinates; only the coordinates matter here.
        Some(Self {
            xCoordinate,
            yCoordinate,
        })
    }
}

pub(crate) fn decode(font: &Font, table: &LayoutTable, sink: &mut dyn Sink) {
    table.visit_subtables(|tag, lookup_type, subtable| {
        match GposLookupType::try_from(lookup_type) {
            Ok(GposLookupType::SingleAdjustment) => {
                let _ = single_adjustment(font, tag, subtable, sink);
            }
            Ok(GposLookupType::PairAdjustment) => {
                let _ = pair_adjustment(font, tag, subtable, sink);
            }
            Ok(GposLookupType::CursiveAttachment) => {
                let _ = cursive_attachment(font, tag, subtable, sink);
            }
            Ok(other) => log::debug!("unhandled GPOS lookup type {:?}", other),
            Err(_) => log::debug!("unknown GPOS lookup type {}", lookup_type),
        }
    });
}

fn single_adjustment(font: &Font, tag: Tag, subtable: &[u8], sink: &mut dyn Sink) -> Option<()> {
    let mut s = Stream::new(subtable);
    let format: u16 = s.read()?;
    let coverage_offset: u16 = s.read()?;
    let value_format: u16 = s.read()?;
    let coverage = layout::coverage_glyphs(subtable, coverage_offset)?;
    match format {
        1 => {
            let record = ValueRecord::parse(&mut s, value_format)?;
            let suffix = record.suffix(value_format, font);
            for glyph_id in coverage {
                sink.feature(&format!(
                    "gpos {} {}{}",
                    tag,
                    font.glyph_name(glyph_id),
                    suffix
                ));
            }
        }
        2 => {
            let value_count: u16 = s.read()?;
            for &glyph_id in coverage.iter().take(value_count as usize) {
                let record = ValueRecord::parse(&mut s, value_format)?;
                sink.feature(&format!(
                    "gpos {} {}{}",
                    tag,
                    font.glyph_name(glyph_id),
                    record.suffix(value_format, font)
                ));
            }
        }
        _ => log::debug!("unhandled GPOS single adjustment format {}", format),
    }
    Some(())
}

fn pair_adjustment(font: &Font, tag: Tag, subtable: &[u8], sink: &mut dyn Sink) -> Option<()> {
    let mut s = Stream::new(subtable);
    let format: u16 = s.read()?;
    let coverage_offset: u16 = s.read()?;
    let value_format1: u16 = s.read()?;
    let value_format2: u16 = s.read()?;
    if format != 1 {
        // Format 2 classifies pairs by glyph class; fonts that rely on it
        // get no pair output here.
        log::debug!("unhandled GPOS pair adjustment format {}", format);
        return None;
    }
    let pair_set_count: u16 = s.read()?;
    let pair_set_offsets = s.read_array::<u16>(pair_set_count as usize)?;
    let coverage = layout::coverage_glyphs(subtable, coverage_offset)?;
    for (i, &first_glyph) in coverage.iter().enumerate().take(pair_set_count as usize) {
        let Some(offset) = pair_set_offsets.get(i) else {
            continue;
        };
        let Some(set_data) = subtable.get(offset as usize..) else {
            continue;
        };
        let mut set = Stream::new(set_data);
        let Some(pair_value_count) = set.read::<u16>() else {
            continue;
        };
        for _ in 0..pair_value_count {
            let Some(second_glyph) = set.read::<u16>() else {
                break;
            };
            let Some(value1) = ValueRecord::parse(&mut set, value_format1) else {
                break;
            };
            let Some(value2) = ValueRecord::parse(&mut set, value_format2) else {
                break;
            };
            sink.feature(&format!(
                "gpos {} 2 {}{} {}{}",
                tag,
                font.glyph_name(first_glyph),
                value1.suffix(value_format1, font),
                font.glyph_name(second_glyph),
                value2.suffix(value_format2, font)
            ));
        }
    }
    Some(())
}

fn cursive_attachment(font: &Font, tag: Tag, subtable: &[u8], sink: &mut dyn Sink) -> Option<()> {
    let mut s = Stream::new(subtable);
    let format: u16 = s.read()?;
    let coverage_offset: u16 = s.read()?;
    if format != 1 {
        log::debug!("unhandled GPOS cursive attachment format {}", format);
        return None;
    }
    let entry_exit_count: u16 = s.read()?;
    let coverage = layout::coverage_glyphs(subtable, coverage_offset)?;
    for &glyph_id in coverage.iter().take(entry_exit_count as usize) {
        let entry_offset: u16 = s.read()?;
        let exit_offset: u16 = s.read()?;
        let mut line = format!("gcur {} {}", tag, font.glyph_name(glyph_id));
        for anchor_offset in [entry_offset, exit_offset] {
            let anchor = if anchor_offset == 0 {
                None
            } else {
                subtable
                    .get(anchor_offset as usize..)
                    .and_then(Anchor::parse)
            };
            match anchor {
                Some(anchor) => {
                    let _ = write!(
                        line,
                        " {} {}",
                        font.uwid(anchor.xCoordinate as i32),
                        font.uwid(anchor.yCoordinate as i32)
                    );
                }
                None => line.push_str(" - -"),
            }
        }
        sink.feature(&line);
    }
    Some(())
}
