use std::io::Cursor;
use byteorder::{LittleEndian, WriteBytesExt};

/// Creates a classic little-endian TIFF buffer with two LONG entries
pub fn create_test_tiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    // TIFF header (little-endian)
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II for little-endian
    buffer.write_u16::<LittleEndian>(42).unwrap();     // TIFF magic number
    buffer.write_u32::<LittleEndian>(8).unwrap();      // IFD offset

    // Sample IFD (at offset 8)
    buffer.write_u16::<LittleEndian>(2).unwrap();      // Entry count (2 entries)

    // Entry 1: ImageWidth (tag 256)
    buffer.write_u16::<LittleEndian>(256).unwrap();    // Tag
    buffer.write_u16::<LittleEndian>(4).unwrap();      // Type (LONG)
    buffer.write_u32::<LittleEndian>(1).unwrap();      // Count
    buffer.write_u32::<LittleEndian>(800).unwrap();    // Value (width)

    // Entry 2: ImageLength (tag 257)
    buffer.write_u16::<LittleEndian>(257).unwrap();    // Tag
    buffer.write_u16::<LittleEndian>(4).unwrap();      // Type (LONG)
    buffer.write_u32::<LittleEndian>(1).unwrap();      // Count
    buffer.write_u32::<LittleEndian>(600).unwrap();    // Value (height)

    // Next IFD offset (0 = no more IFDs)
    buffer.write_u32::<LittleEndian>(0).unwrap();

    Cursor::new(buffer)
}

/// Creates a BigTIFF buffer with two LONG entries
pub fn create_test_bigtiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    // BigTIFF header (little-endian)
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II for little-endian
    buffer.write_u16::<LittleEndian>(43).unwrap();     // BigTIFF version
    buffer.write_u16::<LittleEndian>(8).unwrap();      // Offset size
    buffer.write_u16::<LittleEndian>(0).unwrap();      // Reserved
    buffer.write_u64::<LittleEndian>(16).unwrap();     // IFD offset

    // Sample IFD (at offset 16)
    buffer.write_u64::<LittleEndian>(2).unwrap();      // Entry count (2 entries)

    // Entry 1: ImageWidth (tag 256)
    buffer.write_u16::<LittleEndian>(256).unwrap();    // Tag
    buffer.write_u16::<LittleEndian>(4).unwrap();      // Type (LONG)
    buffer.write_u64::<LittleEndian>(1).unwrap();      // Count
    buffer.write_u64::<LittleEndian>(1024).unwrap();   // Value (width)

    // Entry 2: ImageLength (tag 257)
    buffer.write_u16::<LittleEndian>(257).unwrap();    // Tag
    buffer.write_u16::<LittleEndian>(4).unwrap();      // Type (LONG)
    buffer.write_u64::<LittleEndian>(1).unwrap();      // Count
    buffer.write_u64::<LittleEndian>(768).unwrap();    // Value (height)

    // Next IFD offset (0 = no more IFDs)
    buffer.write_u64::<LittleEndian>(0).unwrap();

    Cursor::new(buffer)
}

/// One classic little-endian entry, appended to a buffer under construction
pub fn push_classic_entry(buffer: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, slot: u32) {
    buffer.write_u16::<LittleEndian>(tag).unwrap();
    buffer.write_u16::<LittleEndian>(field_type).unwrap();
    buffer.write_u32::<LittleEndian>(count).unwrap();
    buffer.write_u32::<LittleEndian>(slot).unwrap();
}

/// Creates a classic buffer whose two directories point at each other
///
/// Directory A's next pointer leads to B, and B's back to A.
pub fn create_cycle_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    buffer.write_u16::<LittleEndian>(0x4949).unwrap();
    buffer.write_u16::<LittleEndian>(42).unwrap();
    buffer.write_u32::<LittleEndian>(8).unwrap();      // A at offset 8

    // Directory A: one entry, 2 + 12 + 4 = 18 bytes -> B at offset 26
    buffer.write_u16::<LittleEndian>(1).unwrap();
    push_classic_entry(&mut buffer, 256, 4, 1, 100);
    buffer.write_u32::<LittleEndian>(26).unwrap();     // next -> B

    // Directory B at offset 26: one entry, next -> A again
    buffer.write_u16::<LittleEndian>(1).unwrap();
    push_classic_entry(&mut buffer, 256, 4, 1, 200);
    buffer.write_u32::<LittleEndian>(8).unwrap();      // next -> A (cycle)

    Cursor::new(buffer)
}

/// Creates an uncompressed single-strip image whose byte count is zero
///
/// Geometry: 4x2 pixels, 8 bits, one sample, one strip of 8 bytes at
/// the end of the buffer. The zero byte count must be repaired to
/// bytes_per_row * rows_per_strip = 8.
pub fn create_zero_bytecount_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    buffer.write_u16::<LittleEndian>(0x4949).unwrap();
    buffer.write_u16::<LittleEndian>(42).unwrap();
    buffer.write_u32::<LittleEndian>(8).unwrap();

    // 8 entries: 2 + 8 * 12 + 4 = 102 bytes of directory, strip at 110
    let strip_offset = 110u32;
    buffer.write_u16::<LittleEndian>(8).unwrap();
    push_classic_entry(&mut buffer, 256, 4, 1, 4);               // ImageWidth
    push_classic_entry(&mut buffer, 257, 4, 1, 2);               // ImageLength
    push_classic_entry(&mut buffer, 258, 3, 1, 8);               // BitsPerSample
    push_classic_entry(&mut buffer, 259, 3, 1, 1);               // Compression = none
    push_classic_entry(&mut buffer, 273, 4, 1, strip_offset);    // StripOffsets
    push_classic_entry(&mut buffer, 277, 3, 1, 1);               // SamplesPerPixel
    push_classic_entry(&mut buffer, 278, 4, 1, 2);               // RowsPerStrip
    push_classic_entry(&mut buffer, 279, 4, 1, 0);               // StripByteCounts = 0
    buffer.write_u32::<LittleEndian>(0).unwrap();

    // Padding up to the strip, then 8 bytes of pixel data
    while buffer.len() < strip_offset as usize {
        buffer.push(0);
    }
    buffer.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

    Cursor::new(buffer)
}
