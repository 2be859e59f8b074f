/// Size of the ICONDIR header: reserved + type + count.
pub const HEADER_LEN: usize = 6;

/// Size of one ICONDIRENTRY record.
pub const DIR_ENTRY_LEN: usize = 16;

pub const RESOURCE_TYPE_ICON: u16 = 1;
pub const COLOR_PLANES: u16 = 1;
pub const BITS_PER_PIXEL: u16 = 32;

/// Largest edge length an ICO directory can describe.
pub const MAX_DIMENSION: u32 = 256;

/// Encode an edge length as the single directory byte.
///
/// The format has no room for 256 in a byte, so 0 stands for 256.
pub fn dimension_byte(size: u32) -> u8 {
    (size % 256) as u8
}

/// Byte offset of the first payload for a container holding `count` images.
pub fn payload_start(count: usize) -> usize {
    HEADER_LEN + DIR_ENTRY_LEN * count
}

/// ICONDIR header.
///
/// Wire format (little-endian):
/// ```text
/// [reserved: 2 = 0] [type: 2 = 1] [count: 2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconDir {
    pub count: u16,
}

impl IconDir {
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&RESOURCE_TYPE_ICON.to_le_bytes());
        out.extend_from_slice(&self.count.to_le_bytes());
    }
}

/// One directory record describing an embedded image.
///
/// Wire format (little-endian):
/// ```text
/// [width: 1] [height: 1] [colors: 1 = 0] [reserved: 1 = 0]
/// [planes: 2 = 1] [bpp: 2 = 32] [data_size: 4] [data_offset: 4]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconDirEntry {
    pub size: u32,
    pub data_size: u32,
    pub data_offset: u32,
}

impl IconDirEntry {
    pub fn write_to(&self, out: &mut Vec<u8>) {
        let dim = dimension_byte(self.size);
        out.push(dim);
        out.push(dim);
        out.push(0); // not palette-based
        out.push(0);
        out.extend_from_slice(&COLOR_PLANES.to_le_bytes());
        out.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
        out.extend_from_slice(&self.data_size.to_le_bytes());
        out.extend_from_slice(&self.data_offset.to_le_bytes());
    }
}
