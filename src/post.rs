use crate::{
    data_types::{uint16, Version16Dot16},
    decoder::{LazyArray, Stream},
};

/// Longest glyph name kept, not counting the terminator byte of the
/// downstream record format.
pub const MAX_NAME_LEN: usize = 63;

#[allow(non_snake_case)]
pub struct PostTable<'a> {
    pub version: Version16Dot16,
    pub numberOfGlyphs: uint16,                // Only present in version 2.0.
    pub glyphNameIndex: LazyArray<'a, uint16>, // [numberOfGlyphs]
    string_data: &'a [u8],                     // Pascal strings for indices > 257, in order.
}

impl<'a> PostTable<'a> {
    #[allow(non_snake_case)]
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let version: Version16Dot16 = s.read()?;
        if version != Version16Dot16(0x00020000) {
            log::debug!("unsupported post table version {:?}", version);
            return None;
        }
        s.set_offset(32); // the version 2.0 header ends the common 32-byte header
        let numberOfGlyphs = s.read()?;
        let glyphNameIndex = s.read_array(numberOfGlyphs as usize)?;
        let string_data = s.get_tail()?;
        Some(Self {
            version,
            numberOfGlyphs,
            glyphNameIndex,
            string_data,
        })
    }

    /// Iterates glyph names in glyph order. Indices up to 257 select from
    /// the Mac standard set and do not consume a Pascal string.
    pub fn names(&self) -> NameIter<'a, '_> {
        NameIter {
            table: self,
            glyph_id: 0,
            string_pos: 0,
        }
    }
}

pub struct NameIter<'a, 'b> {
    table: &'b PostTable<'a>,
    glyph_id: usize,
    string_pos: usize,
}

impl<'a, 'b> Iterator for NameIter<'a, 'b> {
    type Item = &'a str;
    fn next(&mut self) -> Option<Self::Item> {
        if self.glyph_id >= self.table.numberOfGlyphs as usize {
            return None;
        }
        let index = self.table.glyphNameIndex.get(self.glyph_id)?;
        self.glyph_id += 1;
        if let Some(&name) = MAC_GLYPH_NAMES.get(index as usize) {
            return Some(name);
        }
        let strings = self.table.string_data;
        let len = *strings.get(self.string_pos)? as usize;
        let bytes = strings.get(self.string_pos + 1..self.string_pos + 1 + len)?;
        self.string_pos += 1 + len;
        let bytes = &bytes[..bytes.len().min(MAX_NAME_LEN)];
        Some(core::str::from_utf8(bytes).unwrap_or_default())
    }
}

/// The 258 standard Macintosh glyph names; post version 2.0 indices 0..=257
/// refer to this set.
pub const MAC_GLYPH_NAMES: [&str; 258] = [
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam",
    "quotedbl", "numbersign", "dollar", "percent", "ampersand",
    "quotesingle", "parenleft", "parenright", "asterisk", "plus",
    "comma", "hyphen", "period", "slash", "zero",
    "one", "two", "three", "four", "five",
    "six", "seven", "eight", "nine", "colon",
    "semicolon", "less", "equal", "greater", "question",
    "at", "A", "B", "C", "D",
    "E", "F", "G", "H", "I",
    "J", "K", "L", "M", "N",
    "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X",
    "Y", "Z", "bracketleft", "backslash", "bracketright",
    "asciicircum", "underscore", "grave", "a", "b",
    "c", "d", "e", "f", "g",
    "h", "i", "j", "k", "l",
    "m", "n", "o", "p", "q",
    "r", "s", "t", "u", "v",
    "w", "x", "y", "z", "braceleft",
    "bar", "braceright", "asciitilde", "Adieresis", "Aring",
    "Ccedilla", "Eacute", "Ntilde", "Odieresis", "Udieresis",
    "aacute", "agrave", "acircumflex", "adieresis", "atilde",
    "aring", "ccedilla", "eacute", "egrave", "ecircumflex",
    "edieresis", "iacute", "igrave", "icircumflex", "idieresis",
    "ntilde", "oacute", "ograve", "ocircumflex", "odieresis",
    "otilde", "uacute", "ugrave", "ucircumflex", "udieresis",
    "dagger", "degree", "cent", "sterling", "section",
    "bullet", "paragraph", "germandbls", "registered", "copyright",
    "trademark", "acute", "dieresis", "notequal", "AE",
    "Oslash", "infinity", "plusminus", "lessequal", "greaterequal",
    "yen", "mu", "partialdiff", "summation", "product",
    "pi", "integral", "ordfeminine", "ordmasculine", "Omega",
    "ae", "oslash", "questiondown", "exclamdown", "logicalnot",
    "radical", "florin", "approxequal", "Delta", "guillemotleft",
    "guillemotright", "ellipsis", "nonbreakingspace", "Agrave", "Atilde",
    "Otilde", "OE", "oe", "endash", "emdash",
    "quotedblleft", "quotedblright", "quoteleft", "quoteright", "divide",
    "lozenge", "ydieresis", "Ydieresis", "fraction", "currency",
    "guilsinglleft", "guilsinglright", "fi", "fl", "daggerdbl",
    "periodcentered", "quotesinglbase", "quotedblbase", "perthousand", "Acircumflex",
    "Ecircumflex", "Aacute", "Edieresis", "Egrave", "Iacute",
    "Icircumflex", "Idieresis", "Igrave", "Oacute", "Ocircumflex",
    "apple", "Ograve", "Uacute", "Ucircumflex", "Ugrave",
    "dotlessi", "circumflex", "tilde", "macron", "breve",
    "dotaccent", "ring", "cedilla", "hungarumlaut", "ogonek",
    "caron", "Lslash", "lslash", "Scaron", "scaron",
    "Zcaron", "zcaron", "brokenbar", "Eth", "eth",
    "Yacute", "yacute", "Thorn", "thorn", "minus",
    "multiply", "onesuperior", "twosuperior", "threesuperior", "onehalf",
    "onequarter", "threequarters", "franc", "Gbreve", "gbreve",
    "Idotaccent", "Scedilla", "scedilla", "Cacute", "cacute",
    "Ccaron", "ccaron", "dcroat",
];

#[cfg(test)]
pub(crate) mod tests {
    use super::{PostTable, MAC_GLYPH_NAMES};

    pub(crate) fn post_bytes(indices: &[u16], strings: &[&str]) -> Vec<u8> {
        let mut data = vec![0_u8; 32];
        data[0..4].copy_from_slice(&0x00020000_u32.to_be_bytes());
        data.extend_from_slice(&(indices.len() as u16).to_be_bytes());
        for &index in indices {
            data.extend_from_slice(&index.to_be_bytes());
        }
        for string in strings {
            data.push(string.len() as u8);
            data.extend_from_slice(string.as_bytes());
        }
        data
    }

    #[test]
    fn test_mac_set_bounds() {
        assert_eq!(MAC_GLYPH_NAMES.len(), 258);
        assert_eq!(MAC_GLYPH_NAMES[0], ".notdef");
        assert_eq!(MAC_GLYPH_NAMES[3], "space");
        assert_eq!(MAC_GLYPH_NAMES[257], "dcroat");
    }

    #[test]
    fn test_standard_and_custom_names() {
        let data = post_bytes(&[3, 258], &["foo"]);
        let post = PostTable::parse(&data).unwrap();
        let names: Vec<&str> = post.names().collect();
        assert_eq!(names, ["space", "foo"]);
    }

    #[test]
    fn test_standard_indices_do_not_consume_strings() {
        let data = post_bytes(&[258, 257, 259], &["alpha", "beta"]);
        let post = PostTable::parse(&data).unwrap();
        let names: Vec<&str> = post.names().collect();
        assert_eq!(names, ["alpha", "dcroat", "beta"]);
    }

    #[test]
    fn test_unsupported_version() {
        let mut data = post_bytes(&[0], &[]);
        data[0..4].copy_from_slice(&0x00030000_u32.to_be_bytes());
        assert!(PostTable::parse(&data).is_none());
    }

    #[test]
    fn test_missing_string_ends_iteration() {
        let data = post_bytes(&[258, 259], &["only"]);
        let post = PostTable::parse(&data).unwrap();
        let names: Vec<&str> = post.names().collect();
        assert_eq!(names, ["only"]);
    }
}
