#![allow(non_camel_case_types)]

use core::fmt;

#[derive(PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct Tag(pub u32); // Array of four uint8s identifying a table, script, language system or feature

impl Tag {
    #[inline]
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }
    #[inline]
    pub fn to_array(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
    #[inline]
    pub fn to_string(&self) -> String {
        self.to_array().iter().map(|&c| c as char).collect()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0} (= 0x{0:08x} = {1})", self.0, self.to_string())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string())
    }
}

pub const HEAD: Tag = Tag::from_be_bytes(*b"head");
pub const MAXP: Tag = Tag::from_be_bytes(*b"maxp");
pub const CMAP: Tag = Tag::from_be_bytes(*b"cmap");
pub const POST: Tag = Tag::from_be_bytes(*b"post");
pub const LOCA: Tag = Tag::from_be_bytes(*b"loca");
pub const GLYF: Tag = Tag::from_be_bytes(*b"glyf");
pub const HHEA: Tag = Tag::from_be_bytes(*b"hhea");
pub const HMTX: Tag = Tag::from_be_bytes(*b"hmtx");
pub const KERN: Tag = Tag::from_be_bytes(*b"kern");
pub const GSUB: Tag = Tag::from_be_bytes(*b"GSUB");
pub const GPOS: Tag = Tag::from_be_bytes(*b"GPOS");

// 32-bit signed fixed-point number (16.16)
pub struct Fixed(pub i32);

impl Fixed {
    pub fn to_f64(&self) -> f64 {
        f64::from(self.0) / 65536.0
    }
}

// Packed 32-bit value with major and minor version numbers.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct Version16Dot16(pub u32);

impl fmt::Debug for Version16Dot16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

pub type LONGDATETIME = i64; // Seconds since 12:00 midnight, January 1, 1904, UTC.

pub type TableTag = Tag;
pub type Offset16 = u16;
pub type Offset32 = u32;
pub type uint16 = u16;
pub type int16 = i16;
pub type uint32 = u32;
