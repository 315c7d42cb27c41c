//! Read-only OpenType/TrueType parsing for typesetting toolchains:
//! per-glyph metrics (names, code points, widths, bounding boxes), kerning
//! pairs and the GSUB/GPOS layout features a troff-style renderer can use.

pub mod cmap;
pub mod data_types;
pub mod decoder;
pub mod font;
pub mod glyf;
pub mod gpos;
pub mod gsub;
pub mod head;
pub mod hmtx;
pub mod kern;
pub mod layout;
pub mod loca;
pub mod maxp;
pub mod post;
pub mod sink;
pub mod table;
pub mod units;

pub use crate::{
    font::{Error, Font, MAX_FONT_SIZE},
    sink::{Sink, TextSink},
};
