//! Integration tests for the directory engine

extern crate std;

use std::io::{Cursor, Seek, SeekFrom};

use ifdkit::codec::{Codec, CodecFactory, CodecSetup};
use ifdkit::tiff::{compression, predictor, tags};
use ifdkit::tiff::directory::Directory;
use ifdkit::{ByteOrder, FieldValue, TiffFormat, TiffReader, TiffWriter};

#[test]
fn test_complete_tiff_workflow() {
    // Create a sample TIFF file in memory
    let mut buffer = Vec::new();

    // TIFF header (little-endian)
    buffer.extend_from_slice(&[0x49, 0x49]); // "II" for little-endian
    buffer.extend_from_slice(&[42, 0]);      // TIFF magic number
    buffer.extend_from_slice(&[8, 0, 0, 0]); // Offset to first IFD

    // IFD with two entries
    buffer.extend_from_slice(&[2, 0]);       // Number of entries

    // Entry 1: ImageWidth (tag 256)
    buffer.extend_from_slice(&[0, 1]);       // Tag (256)
    buffer.extend_from_slice(&[4, 0]);       // Type (LONG)
    buffer.extend_from_slice(&[1, 0, 0, 0]); // Count
    buffer.extend_from_slice(&[200, 0, 0, 0]); // Value (width = 200)

    // Entry 2: ImageLength (tag 257)
    buffer.extend_from_slice(&[1, 1]);       // Tag (257)
    buffer.extend_from_slice(&[4, 0]);       // Type (LONG)
    buffer.extend_from_slice(&[1, 0, 0, 0]); // Count
    buffer.extend_from_slice(&[100, 0, 0, 0]); // Value (height = 100)

    // Next IFD offset (0 = no more IFDs)
    buffer.extend_from_slice(&[0, 0, 0, 0]);

    let mut cursor = Cursor::new(buffer);
    let mut reader = TiffReader::new();

    let tiff = reader.read(&mut cursor).unwrap();
    std::assert!(!tiff.format.is_big());
    std::assert_eq!(tiff.directory_count(), 1);
    std::assert_eq!(tiff.main_directory().unwrap().dimensions(), Some((200, 100)));
}

fn resolution_directory() -> Directory {
    let mut dir = Directory::new(0);
    dir.set_field(tags::IMAGE_WIDTH, FieldValue::Long(vec![32]));
    dir.set_field(tags::IMAGE_LENGTH, FieldValue::Long(vec![8]));
    dir.set_field(tags::BITS_PER_SAMPLE, FieldValue::Short(vec![8]));
    dir.set_field(tags::X_RESOLUTION, FieldValue::Rational(vec![(300, 1)]));
    dir.set_field(tags::Y_RESOLUTION, FieldValue::Rational(vec![(72, 1)]));
    dir.set_field(tags::SOFTWARE, FieldValue::Ascii("ifdkit integration".to_string()));
    dir.set_field(tags::SMIN_SAMPLE_VALUE, FieldValue::Double(vec![0.25]));
    dir
}

/// Writing in either byte order must decode to identical values.
#[test]
fn test_endian_symmetry() {
    let mut decoded = Vec::new();

    for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = TiffWriter::new(order, TiffFormat::Classic);
        writer.create(&mut cursor).unwrap();
        writer.write_directory(&mut cursor, &resolution_directory(), None).unwrap();

        cursor.set_position(0);
        let mut reader = TiffReader::new();
        let tiff = reader.read(&mut cursor).unwrap();
        std::assert_eq!(reader.byte_order(), Some(order));

        let dir = tiff.main_directory().unwrap();
        decoded.push((
            dir.dimensions(),
            dir.get_field(tags::X_RESOLUTION).cloned(),
            dir.get_field(tags::Y_RESOLUTION).cloned(),
            dir.get_field(tags::SOFTWARE).cloned(),
            dir.get_field(tags::SMIN_SAMPLE_VALUE).cloned(),
        ));
    }

    std::assert_eq!(decoded[0], decoded[1]);
    std::assert_eq!(decoded[0].0, Some((32, 8)));
}

/// The same fields must survive a BigTIFF round trip unchanged.
#[test]
fn test_classic_and_big_decode_identically() {
    let mut results = Vec::new();

    for format in [TiffFormat::Classic, TiffFormat::Big] {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = TiffWriter::new(ByteOrder::LittleEndian, format);
        writer.create(&mut cursor).unwrap();
        writer.write_directory(&mut cursor, &resolution_directory(), None).unwrap();

        cursor.set_position(0);
        let mut reader = TiffReader::new();
        let tiff = reader.read(&mut cursor).unwrap();
        std::assert_eq!(tiff.format, format);

        let dir = tiff.main_directory().unwrap();
        results.push((
            dir.dimensions(),
            dir.get_field(tags::X_RESOLUTION).cloned(),
            dir.get_field(tags::SOFTWARE).cloned(),
        ));
    }

    std::assert_eq!(results[0], results[1]);
}

/// Pushing an offset past 2^32 - 1 must upgrade the file in place and
/// keep every previously written directory readable at big widths.
#[test]
fn test_bigtiff_upgrade_preserves_directories() {
    let path = std::env::temp_dir().join(format!("ifdkit_upgrade_{}.tif", std::process::id()));
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .unwrap();

    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);
    writer.create(&mut file).unwrap();

    let mut first = resolution_directory();
    first.set_field(tags::IMAGE_WIDTH, FieldValue::Long(vec![111]));
    writer.write_directory(&mut file, &first, None).unwrap();
    std::assert!(!writer.format().is_big());

    // Simulate a payload that pushes the next directory past the
    // classic range without materializing 4 GiB (the file stays
    // sparse on disk).
    writer.reserve_region(0x1_0000_0000).unwrap();

    let mut second = Directory::new(1);
    second.set_field(tags::IMAGE_WIDTH, FieldValue::Long(vec![222]));
    second.set_field(tags::IMAGE_LENGTH, FieldValue::Long(vec![2]));
    let offset = writer.write_directory(&mut file, &second, None).unwrap();

    std::assert!(writer.format().is_big());
    std::assert!(offset > u32::MAX as u64);

    file.seek(SeekFrom::Start(0)).unwrap();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut file).unwrap();

    std::assert!(tiff.format.is_big());
    std::assert_eq!(tiff.directory_count(), 2);
    std::assert_eq!(tiff.directories[0].width(), Some(111));
    std::assert_eq!(tiff.directories[0].dimensions(), Some((111, 8)));
    std::assert_eq!(
        tiff.directories[0].get_field(tags::X_RESOLUTION),
        Some(&FieldValue::Rational(vec![(300, 1)]))
    );
    std::assert_eq!(tiff.directories[1].width(), Some(222));

    drop(file);
    std::fs::remove_file(&path).ok();
}

/// Full pixel pipeline: predictor + deflate through the file and back.
#[test]
fn test_predicted_compressed_strip_round_trip() {
    let width = 16u64;
    let height = 4u64;
    let samples = 3usize;
    let row_bytes = (width as usize) * samples;

    let raw: Vec<u8> = (0..row_bytes * height as usize)
        .map(|i| ((i * 13) % 251) as u8)
        .collect();

    let setup = CodecSetup {
        compression: compression::DEFLATE as u64,
        predictor: predictor::HORIZONTAL_DIFFERENCING,
        row_bytes,
        rows_per_unit: height as usize,
        samples_per_pixel: samples,
        bits_per_sample: 8,
        planar_contiguous: true,
        byte_order: ByteOrder::LittleEndian,
    };

    let mut codec = CodecFactory::create(&setup).unwrap();
    codec.setup_encode(&setup).unwrap();
    codec.pre_encode(0).unwrap();
    let mut encoded = Vec::new();
    codec.encode_unit(&raw, &mut encoded, 0).unwrap();
    codec.post_encode().unwrap();

    // Store the strip and its directory.
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);
    writer.create(&mut cursor).unwrap();
    let strip_offset = writer.append_data(&mut cursor, &encoded).unwrap();

    let mut dir = Directory::new(0);
    dir.set_field(tags::IMAGE_WIDTH, FieldValue::Long(vec![width as u32]));
    dir.set_field(tags::IMAGE_LENGTH, FieldValue::Long(vec![height as u32]));
    dir.set_field(tags::BITS_PER_SAMPLE, FieldValue::Short(vec![8, 8, 8]));
    dir.set_field(tags::SAMPLES_PER_PIXEL, FieldValue::Short(vec![3]));
    dir.set_field(tags::ROWS_PER_STRIP, FieldValue::Long(vec![height as u32]));
    dir.set_field(tags::COMPRESSION, FieldValue::Short(vec![compression::DEFLATE]));
    dir.set_field(tags::PREDICTOR, FieldValue::Short(vec![predictor::HORIZONTAL_DIFFERENCING]));
    dir.strip_offsets = vec![strip_offset];
    dir.strip_byte_counts = vec![encoded.len() as u64];
    writer.write_directory(&mut cursor, &dir, None).unwrap();

    // Read it all back and decode through the directory's own codec
    // selection.
    cursor.set_position(0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let read_dir = tiff.main_directory().unwrap();

    std::assert_eq!(read_dir.compression(), compression::DEFLATE as u64);
    std::assert_eq!(read_dir.predictor(), predictor::HORIZONTAL_DIFFERENCING);
    std::assert_eq!(read_dir.strip_byte_counts, vec![encoded.len() as u64]);

    let read_setup = CodecSetup::from_directory(read_dir, tiff.byte_order);
    std::assert_eq!(read_setup.row_bytes, row_bytes);

    let mut decode_codec = CodecFactory::create(&read_setup).unwrap();
    decode_codec.setup_decode(&read_setup).unwrap();
    decode_codec.pre_decode(0).unwrap();

    let start = read_dir.strip_offsets[0] as usize;
    let end = start + read_dir.strip_byte_counts[0] as usize;
    let strip = &cursor.get_ref()[start..end];

    let mut decoded = Vec::new();
    decode_codec.decode_unit(strip, &mut decoded, 0).unwrap();
    std::assert_eq!(decoded, raw);
}

/// An unsupported compression value must not block metadata access.
#[test]
fn test_unknown_compression_keeps_metadata_readable() {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian, TiffFormat::Classic);
    writer.create(&mut cursor).unwrap();

    let strip_offset = writer.append_data(&mut cursor, &[0xAB; 10]).unwrap();
    let mut dir = Directory::new(0);
    dir.set_field(tags::IMAGE_WIDTH, FieldValue::Long(vec![10]));
    dir.set_field(tags::IMAGE_LENGTH, FieldValue::Long(vec![1]));
    dir.set_field(tags::COMPRESSION, FieldValue::Short(vec![0x7777]));
    dir.strip_offsets = vec![strip_offset];
    dir.strip_byte_counts = vec![10];
    writer.write_directory(&mut cursor, &dir, None).unwrap();

    cursor.set_position(0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let read_dir = tiff.main_directory().unwrap();

    // Metadata survives the open.
    std::assert_eq!(read_dir.width(), Some(10));
    std::assert_eq!(read_dir.compression(), 0x7777);

    // Actual decoding is where the failure surfaces.
    let setup = CodecSetup::from_directory(read_dir, tiff.byte_order);
    let mut codec = CodecFactory::create(&setup).unwrap();
    std::assert!(!codec.can_decode());
    let mut out = Vec::new();
    std::assert!(codec.decode_unit(&[1, 2, 3], &mut out, 0).is_err());
}
