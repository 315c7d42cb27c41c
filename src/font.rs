use thiserror::Error;

use crate::{gpos, gsub, sink::Sink, table::Table, units};

/// Capacity of the per-glyph arrays; glyphs beyond it are ignored.
pub const NGLYPHS: usize = 1 << 14;

/// Upper bound on the size of a font accepted on standard input.
pub const MAX_FONT_SIZE: usize = 1 << 23;

#[derive(Debug, Error)]
pub enum Error {
    #[error("empty input")]
    EmptyInput,
    #[error("not an OpenType font")]
    UnsupportedFormat,
    #[error("missing or malformed head table")]
    MissingHead,
}

/// One parsed font: the raw buffer plus the per-glyph arrays populated at
/// construction. Metrics can then be emitted any number of times; the
/// feature phase additionally needs a device resolution.
pub struct Font<'a> {
    data: &'a [u8],
    units_per_em: i32,
    resolution: i32,
    glyph_names: Vec<String>,
    glyph_codes: Vec<u16>,
    glyph_bboxes: Vec<[i16; 4]>,
    glyph_widths: Vec<u16>,
    glyph_n: usize,
}

impl<'a> Font<'a> {
    /// Parses the font and fills the glyph arrays: code points from cmap,
    /// names from post, bounding boxes from glyf, widths from hmtx. Any
    /// optional table that is absent or unreadable leaves its defaults.
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        let table = Table::new(data).ok_or(Error::UnsupportedFormat)?;
        let head = table.get_head_table().ok_or(Error::MissingHead)?;

        let mut font = Self {
            data,
            units_per_em: i32::from(head.get_units_per_em()).max(1),
            resolution: 720,
            glyph_names: vec![String::new(); NGLYPHS],
            glyph_codes: vec![0; NGLYPHS],
            glyph_bboxes: vec![[0; 4]; NGLYPHS],
            glyph_widths: vec![0; NGLYPHS],
            glyph_n: 0,
        };

        match table.get_cmap_table().and_then(|cmap| cmap.get_unicode_format4()) {
            Some(subtable) => subtable.assign_code_points(&mut font.glyph_codes),
            None => log::debug!("no Windows Unicode BMP format 4 cmap subtable"),
        }

        if let Some(post) = table.get_post_table() {
            font.glyph_n = (post.numberOfGlyphs as usize).min(NGLYPHS);
            for (glyph_id, name) in post.names().take(font.glyph_n).enumerate() {
                font.glyph_names[glyph_id] = name.to_owned();
            }
        }

        if let Some(glyf) = table.get_glyf_table() {
            let num_glyphs = table
                .get_maxp_table()
                .map(|maxp| maxp.numGlyphs)
                .unwrap_or(0);
            let loca = table.get_loca_table(head.get_loca_offset_format(), num_glyphs);
            if let Some(loca) = loca {
                for glyph_id in 0..num_glyphs.min(NGLYPHS as u16) {
                    let bbox = loca
                        .get_glyf_range(glyph_id)
                        .and_then(|range| glyf.get_bbox(range));
                    if let Some(bbox) = bbox {
                        font.glyph_bboxes[glyph_id as usize] = bbox;
                    }
                }
            }
        }

        let hmtx = table
            .get_hhea_table()
            .and_then(|hhea| table.get_hmtx_table(hhea.numberOfHMetrics));
        if let Some(hmtx) = hmtx {
            for glyph_id in 0..font.glyph_n {
                font.glyph_widths[glyph_id] = hmtx.get_advance_width(glyph_id).unwrap_or(0);
            }
        }

        Ok(font)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyph_n
    }

    pub fn units_per_em(&self) -> i32 {
        self.units_per_em
    }

    /// Emits one record per glyph, then the format 0 kerning pairs. All
    /// values are in 1/1000 em.
    pub fn metrics(&self, sink: &mut dyn Sink) {
        for glyph_id in 0..self.glyph_n {
            let code = self.glyph_codes[glyph_id];
            let code = if code == 0xFFFF { 0 } else { i32::from(code) };
            let bbox = self.glyph_bboxes[glyph_id];
            sink.glyph(
                &self.glyph_names[glyph_id],
                -1,
                code,
                self.owid(i32::from(self.glyph_widths[glyph_id])),
                [
                    self.owid(i32::from(bbox[0])),
                    self.owid(i32::from(bbox[1])),
                    self.owid(i32::from(bbox[2])),
                    self.owid(i32::from(bbox[3])),
                ],
            );
        }

        let kern = Table::new(self.data).and_then(|table| table.get_kern_table());
        if let Some(kern) = kern {
            for subtable in kern.subtables() {
                if !subtable.is_horizontal_format0() {
                    continue;
                }
                let Some(pairs) = subtable.pairs() else {
                    continue;
                };
                for pair in &pairs {
                    sink.kern(
                        self.glyph_name(pair.left),
                        self.glyph_name(pair.right),
                        self.owid(i32::from(pair.value)),
                    );
                }
            }
        }
    }

    /// Emits the GSUB substitutions, then the GPOS adjustments, with
    /// positioning values in device units at `resolution` dots per inch.
    pub fn features(&mut self, resolution: u32, sink: &mut dyn Sink) {
        self.resolution = i32::try_from(resolution).unwrap_or(i32::MAX).max(1);
        let Some(table) = Table::new(self.data) else {
            return;
        };
        if let Some(gsub_table) = table.get_gsub_table() {
            gsub::decode(self, &gsub_table, sink);
        }
        if let Some(gpos_table) = table.get_gpos_table() {
            gpos::decode(self, &gpos_table, sink);
        }
    }

    /// The PostScript name of `glyph_id`, or "" for a glyph the post table
    /// never named. Bogus layout references stay harmless this way.
    pub fn glyph_name(&self, glyph_id: u16) -> &str {
        self.glyph_names
            .get(glyph_id as usize)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub(crate) fn owid(&self, w: i32) -> i32 {
        units::owid(w, self.units_per_em)
    }

    pub(crate) fn uwid(&self, w: i32) -> i32 {
        units::uwid(w, self.units_per_em, self.resolution)
    }

    #[cfg(test)]
    pub(crate) fn with_glyphs(names: Vec<String>, units_per_em: i32, resolution: i32) -> Font<'static> {
        let glyph_n = names.len();
        Font {
            data: &[],
            units_per_em,
            resolution,
            glyph_codes: vec![0; glyph_n],
            glyph_bboxes: vec![[0; 4]; glyph_n],
            glyph_widths: vec![0; glyph_n],
            glyph_names: names,
            glyph_n,
        }
    }
}
