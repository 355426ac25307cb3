//! Tests for the directory writer

extern crate std;

use std::io::Cursor;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{field_types, tags};
use crate::tiff::directory::Directory;
use crate::tiff::format::TiffFormat;
use crate::tiff::reader::TiffReader;
use crate::tiff::value::FieldValue;
use crate::tiff::writer::TiffWriter;

fn sample_directory() -> Directory {
    let mut dir = Directory::new(0);
    dir.set_field(tags::IMAGE_WIDTH, FieldValue::Long(vec![640]));
    dir.set_field(tags::IMAGE_LENGTH, FieldValue::Long(vec![480]));
    dir.set_field(tags::BITS_PER_SAMPLE, FieldValue::Short(vec![8]));
    dir.set_field(tags::COMPRESSION, FieldValue::Short(vec![1]));
    dir
}

#[test]
fn test_write_then_read_classic() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);

    writer.create(&mut cursor).unwrap();
    let data_offset = writer.append_data(&mut cursor, &[9u8; 16]).unwrap();

    // Geometry matches the payload exactly: 4x4, 8-bit, single strip.
    let mut dir = Directory::new(0);
    dir.set_field(tags::IMAGE_WIDTH, FieldValue::Long(vec![4]));
    dir.set_field(tags::IMAGE_LENGTH, FieldValue::Long(vec![4]));
    dir.set_field(tags::BITS_PER_SAMPLE, FieldValue::Short(vec![8]));
    dir.set_field(tags::COMPRESSION, FieldValue::Short(vec![1]));
    dir.strip_offsets = vec![data_offset];
    dir.strip_byte_counts = vec![16];
    dir.set_field(tags::ROWS_PER_STRIP, FieldValue::Long(vec![4]));

    let offset = writer.write_directory(&mut cursor, &dir, None).unwrap();
    std::assert!(offset >= 8);

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    std::assert_eq!(tiff.directory_count(), 1);
    let read_back = tiff.main_directory().unwrap();
    std::assert_eq!(read_back.dimensions(), Some((640, 480)));
    std::assert_eq!(read_back.strip_offsets, vec![data_offset]);
    std::assert_eq!(read_back.strip_byte_counts, vec![16]);
}

#[test]
fn test_entries_are_emitted_in_tag_order() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);
    writer.create(&mut cursor).unwrap();

    // Fields set in descending tag order must still serialize sorted.
    let mut dir = Directory::new(0);
    dir.set_field(tags::SOFTWARE, FieldValue::Ascii("ifdkit test".to_string()));
    dir.set_field(tags::IMAGE_LENGTH, FieldValue::Long(vec![10]));
    dir.set_field(tags::IMAGE_WIDTH, FieldValue::Long(vec![20]));

    let offset = writer.write_directory(&mut cursor, &dir, None).unwrap();

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    reader.read(&mut cursor).unwrap();
    cursor.set_position(0);
    let ifd = reader.read_ifd(&mut cursor, offset, 0).unwrap();

    let written_tags: Vec<u16> = ifd.entries.iter().map(|e| e.tag).collect();
    let mut sorted = written_tags.clone();
    sorted.sort_unstable();
    std::assert_eq!(written_tags, sorted);
}

#[test]
fn test_inline_indirect_boundary_classic() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);
    writer.create(&mut cursor).unwrap();

    let mut dir = Directory::new(0);
    dir.set_field(400, FieldValue::Short(vec![1, 2]));       // 4 bytes: inline
    dir.set_field(401, FieldValue::Short(vec![1, 2, 3]));    // 6 bytes: indirect
    dir.set_field(402, FieldValue::Long(vec![7]));           // 4 bytes: inline
    dir.set_field(403, FieldValue::Long(vec![7, 8]));        // 8 bytes: indirect

    let offset = writer.write_directory(&mut cursor, &dir, None).unwrap();

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    cursor.set_position(0);
    let ifd = reader.read_ifd(&mut cursor, offset, 0).unwrap();
    std::assert!(ifd.get_entry(400).unwrap().is_value_inline(TiffFormat::Classic));
    std::assert!(!ifd.get_entry(401).unwrap().is_value_inline(TiffFormat::Classic));
    std::assert!(ifd.get_entry(402).unwrap().is_value_inline(TiffFormat::Classic));
    std::assert!(!ifd.get_entry(403).unwrap().is_value_inline(TiffFormat::Classic));

    let dir = tiff.main_directory().unwrap();
    std::assert_eq!(dir.get_field(400), Some(&FieldValue::Short(vec![1, 2])));
    std::assert_eq!(dir.get_field(401), Some(&FieldValue::Short(vec![1, 2, 3])));
    std::assert_eq!(dir.get_field(402), Some(&FieldValue::Long(vec![7])));
    std::assert_eq!(dir.get_field(403), Some(&FieldValue::Long(vec![7, 8])));
}

#[test]
fn test_bigtiff_doubles_the_inline_threshold() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Big);
    writer.create(&mut cursor).unwrap();

    let mut dir = Directory::new(0);
    dir.set_field(400, FieldValue::Short(vec![1, 2, 3, 4]));     // 8 bytes: inline
    dir.set_field(401, FieldValue::Short(vec![1, 2, 3, 4, 5])); // 10 bytes: indirect
    dir.set_field(402, FieldValue::Long(vec![7, 8]));            // 8 bytes: inline

    let offset = writer.write_directory(&mut cursor, &dir, None).unwrap();

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    cursor.set_position(0);
    let ifd = reader.read_ifd(&mut cursor, offset, 0).unwrap();
    std::assert!(ifd.get_entry(400).unwrap().is_value_inline(TiffFormat::Big));
    std::assert!(!ifd.get_entry(401).unwrap().is_value_inline(TiffFormat::Big));
    std::assert!(ifd.get_entry(402).unwrap().is_value_inline(TiffFormat::Big));

    let dir = tiff.main_directory().unwrap();
    std::assert_eq!(dir.get_field(401), Some(&FieldValue::Short(vec![1, 2, 3, 4, 5])));
}

#[test]
fn test_extra_samples_with_no_samples_is_suppressed() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);
    writer.create(&mut cursor).unwrap();

    let mut dir = sample_directory();
    dir.set_field(tags::EXTRA_SAMPLES, FieldValue::Short(vec![]));

    let offset = writer.write_directory(&mut cursor, &dir, None).unwrap();

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    reader.read(&mut cursor).unwrap();
    cursor.set_position(0);
    let ifd = reader.read_ifd(&mut cursor, offset, 0).unwrap();
    std::assert!(!ifd.has_tag(tags::EXTRA_SAMPLES));
}

#[test]
fn test_tiled_mode_selects_tile_tags() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);
    writer.create(&mut cursor).unwrap();

    let data = writer.append_data(&mut cursor, &[0u8; 32]).unwrap();

    let mut dir = sample_directory();
    dir.set_field(tags::TILE_WIDTH, FieldValue::Long(vec![16]));
    dir.set_field(tags::TILE_LENGTH, FieldValue::Long(vec![16]));
    dir.tiled = true;
    dir.strip_offsets = vec![data];
    dir.strip_byte_counts = vec![32];

    let offset = writer.write_directory(&mut cursor, &dir, None).unwrap();

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    cursor.set_position(0);
    let ifd = reader.read_ifd(&mut cursor, offset, 0).unwrap();

    std::assert!(ifd.has_tag(tags::TILE_OFFSETS));
    std::assert!(ifd.has_tag(tags::TILE_BYTE_COUNTS));
    std::assert!(!ifd.has_tag(tags::STRIP_OFFSETS));

    let dir = tiff.main_directory().unwrap();
    std::assert!(dir.tiled);
    std::assert_eq!(dir.strip_offsets, vec![data]);
}

#[test]
fn test_multiple_directories_are_chained() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);
    writer.create(&mut cursor).unwrap();

    let mut first = sample_directory();
    first.set_field(tags::IMAGE_WIDTH, FieldValue::Long(vec![100]));
    writer.write_directory(&mut cursor, &first, None).unwrap();

    let mut second = Directory::new(1);
    second.set_field(tags::IMAGE_WIDTH, FieldValue::Long(vec![50]));
    second.set_field(tags::IMAGE_LENGTH, FieldValue::Long(vec![25]));
    writer.write_directory(&mut cursor, &second, None).unwrap();

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    std::assert_eq!(tiff.directory_count(), 2);
    std::assert_eq!(tiff.directories[0].width(), Some(100));
    std::assert_eq!(tiff.directories[1].width(), Some(50));
}

#[test]
fn test_big_endian_output_reads_back() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::BigEndian, TiffFormat::Classic);
    writer.create(&mut cursor).unwrap();

    let mut dir = sample_directory();
    dir.set_field(tags::X_RESOLUTION, FieldValue::Rational(vec![(300, 1)]));
    dir.set_field(tags::SOFTWARE, FieldValue::Ascii("ifdkit".to_string()));

    writer.write_directory(&mut cursor, &dir, None).unwrap();

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    std::assert_eq!(reader.byte_order(), Some(ByteOrder::BigEndian));

    let read_back = tiff.main_directory().unwrap();
    std::assert_eq!(read_back.dimensions(), Some((640, 480)));
    std::assert_eq!(
        read_back.get_field(tags::X_RESOLUTION),
        Some(&FieldValue::Rational(vec![(300, 1)]))
    );
    std::assert_eq!(
        read_back.get_field(tags::SOFTWARE).and_then(|v| v.as_str()),
        Some("ifdkit")
    );
}

#[test]
fn test_disable_big_tiff_fails_on_overflow() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);
    writer.disable_big_tiff();
    writer.create(&mut cursor).unwrap();

    let mut dir = sample_directory();
    // An offset hint past the 32-bit range forces the overflow path
    // without materializing 4 GiB of data.
    let result = writer.write_directory(&mut cursor, &dir, Some(0x1_0000_0010));
    std::assert!(matches!(result, Err(crate::tiff::errors::TiffError::BigTiffDisabled)));

    // The same write succeeds in classic range.
    dir.set_field(tags::ORIENTATION, FieldValue::Short(vec![1]));
    std::assert!(writer.write_directory(&mut cursor, &dir, None).is_ok());
}

#[test]
fn test_ascii_field_round_trip() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);
    writer.create(&mut cursor).unwrap();

    let mut dir = Directory::new(0);
    dir.set_field(tags::SOFTWARE, FieldValue::Ascii("a much longer name".to_string()));
    dir.set_field(tags::ARTIST, FieldValue::Ascii("ab".to_string())); // 3 bytes: inline
    writer.write_directory(&mut cursor, &dir, None).unwrap();

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let read_back = tiff.main_directory().unwrap();

    std::assert_eq!(
        read_back.get_field(tags::SOFTWARE).and_then(|v| v.as_str()),
        Some("a much longer name")
    );
    std::assert_eq!(
        read_back.get_field(tags::ARTIST).and_then(|v| v.as_str()),
        Some("ab")
    );
}

#[test]
fn test_all_wire_types_round_trip() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);
    writer.create(&mut cursor).unwrap();

    let values: Vec<(u16, FieldValue)> = vec![
        (500, FieldValue::Byte(vec![1, 2, 3, 4, 5])),
        (501, FieldValue::Ascii("wire".to_string())),
        (502, FieldValue::Short(vec![1, 65535])),
        (503, FieldValue::Long(vec![1, u32::MAX])),
        (504, FieldValue::Rational(vec![(72, 1), (300, 7)])),
        (505, FieldValue::SByte(vec![-1, 2, -3])),
        (506, FieldValue::Undefined(vec![0xDE, 0xAD])),
        (507, FieldValue::SShort(vec![-5, 5])),
        (508, FieldValue::SLong(vec![-100000, 100000])),
        (509, FieldValue::SRational(vec![(-1, 3)])),
        (510, FieldValue::Float(vec![1.25, -0.5])),
        (511, FieldValue::Double(vec![3.5, -2.25])),
    ];

    let mut dir = Directory::new(0);
    for (tag, value) in &values {
        dir.set_field(*tag, value.clone());
    }
    writer.write_directory(&mut cursor, &dir, None).unwrap();

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let read_back = tiff.main_directory().unwrap();

    for (tag, value) in &values {
        std::assert_eq!(read_back.get_field(*tag), Some(value), "tag {}", tag);
    }
}

#[test]
fn test_long8_requires_big_format() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Big);
    writer.create(&mut cursor).unwrap();

    let mut dir = Directory::new(0);
    dir.set_field(520, FieldValue::Long8(vec![u64::MAX]));
    dir.set_field(521, FieldValue::SLong8(vec![i64::MIN]));
    writer.write_directory(&mut cursor, &dir, None).unwrap();

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let read_back = tiff.main_directory().unwrap();

    std::assert_eq!(read_back.get_field(520), Some(&FieldValue::Long8(vec![u64::MAX])));
    std::assert_eq!(read_back.get_field(521), Some(&FieldValue::SLong8(vec![i64::MIN])));
    std::assert_eq!(
        read_back.get_field(520).unwrap().wire_type(),
        field_types::LONG8
    );
}
