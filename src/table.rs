use crate::{
    cmap::CmapTable,
    data_types::{
        Offset32, TableTag, Tag, CMAP, GLYF, GPOS, GSUB, HEAD, HHEA, HMTX, KERN, LOCA, MAXP, POST,
    },
    decoder::{FromData, LazyArray, Stream},
    glyf::GlyfTable,
    head::{HeadTable, LocaOffsetFormat},
    hmtx::{HheaTable, HmtxTable},
    kern::KernTable,
    layout::LayoutTable,
    loca::LocaTable,
    maxp::MaxpTable,
    post::PostTable,
};

fn is_supported_sfnt_version(sfnt_version: &Tag) -> bool {
    const TRUETYPE: Tag = Tag(0x00010000);
    const CFF: Tag = Tag::from_be_bytes(*b"OTTO");
    sfnt_version == &TRUETYPE || sfnt_version == &CFF
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy)]
pub struct TableRecord {
    pub tableTag: TableTag,
    pub checksum: u32,
    pub offset: Offset32,
    pub length: u32,
}

impl FromData for TableRecord {
    const SIZE: usize = 4 * 4;
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(Self {
            tableTag: Tag(s.read()?),
            checksum: s.read()?,
            offset: s.read()?,
            length: s.read()?,
        })
    }
}

#[allow(non_snake_case)]
pub struct TableDirectory<'a> {
    pub sfntVersion: Tag,
    pub numTables: u16,
    pub searchRange: u16,
    pub entrySelector: u16,
    pub rangeShift: u16,
    pub tableRecords: LazyArray<'a, TableRecord>,
}

impl<'a> TableDirectory<'a> {
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let sfnt_version: Tag = s.read()?;
        if !is_supported_sfnt_version(&sfnt_version) {
            return None;
        }
        let num_tables = s.read()?;
        let search_range = s.read()?;
        let entry_selector = s.read()?;
        let range_shift = s.read()?;
        let table_records = s.read_array(num_tables as usize)?;
        Some(Self {
            sfntVersion: sfnt_version,
            numTables: num_tables,
            searchRange: search_range,
            entrySelector: entry_selector,
            rangeShift: range_shift,
            tableRecords: table_records,
        })
    }
}

pub struct Table<'a> {
    data: &'a [u8], // the whole font.
    pub table_directory: TableDirectory<'a>,
}

impl<'a> Table<'a> {
    pub fn new(data: &'a [u8]) -> Option<Self> {
        let table_directory = TableDirectory::parse(data)?;
        Some(Self {
            data,
            table_directory,
        })
    }

    // Directory records are sorted by tag in well-formed fonts, but a
    // first-match scan also handles the ones that are not.
    pub fn get_table_record(&self, tag: &Tag) -> Option<TableRecord> {
        self.table_directory
            .tableRecords
            .into_iter()
            .find(|record| &record.tableTag == tag)
    }

    pub fn get_table_data(&self, tag: &Tag) -> Option<&'a [u8]> {
        let table_record = self.get_table_record(tag)?;
        let offset = table_record.offset as usize;
        let end = {
            let length = table_record.length as usize;
            offset.checked_add(length)?
        };
        self.data.get(offset..end)
    }

    pub fn get_head_table(&self) -> Option<HeadTable> {
        self.get_table_data(&HEAD).and_then(HeadTable::parse)
    }

    pub fn get_maxp_table(&self) -> Option<MaxpTable> {
        self.get_table_data(&MAXP).and_then(MaxpTable::parse)
    }

    pub fn get_cmap_table(&self) -> Option<CmapTable<'a>> {
        self.get_table_data(&CMAP).and_then(CmapTable::parse)
    }

    pub fn get_post_table(&self) -> Option<PostTable<'a>> {
        self.get_table_data(&POST).and_then(PostTable::parse)
    }

    pub fn get_loca_table(
        &self,
        format: LocaOffsetFormat,
        num_glyphs: u16,
    ) -> Option<LocaTable<'a>> {
        self.get_table_data(&LOCA)
            .and_then(|data| LocaTable::parse(data, format, num_glyphs))
    }

    pub fn get_glyf_table(&self) -> Option<GlyfTable<'a>> {
        self.get_table_data(&GLYF).map(GlyfTable)
    }

    pub fn get_hhea_table(&self) -> Option<HheaTable> {
        self.get_table_data(&HHEA).and_then(HheaTable::parse)
    }

    pub fn get_hmtx_table(&self, number_of_h_metrics: u16) -> Option<HmtxTable<'a>> {
        self.get_table_data(&HMTX)
            .and_then(|data| HmtxTable::parse(data, number_of_h_metrics))
    }

    pub fn get_kern_table(&self) -> Option<KernTable<'a>> {
        self.get_table_data(&KERN).and_then(KernTable::parse)
    }

    pub fn get_gsub_table(&self) -> Option<LayoutTable<'a>> {
        self.get_table_data(&GSUB).and_then(LayoutTable::parse)
    }

    pub fn get_gpos_table(&self) -> Option<LayoutTable<'a>> {
        self.get_table_data(&GPOS).and_then(LayoutTable::parse)
    }
}
