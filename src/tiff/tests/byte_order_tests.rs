//! Tests for the byte order module

extern crate std;

use std::io::Cursor;
use byteorder::{LittleEndian, BigEndian, WriteBytesExt};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler, LittleEndianHandler, BigEndianHandler};

#[test]
fn test_byte_order_detection_little_endian() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II
    let mut cursor = Cursor::new(buffer);

    let result = ByteOrder::detect(&mut cursor);
    std::assert!(result.is_ok());
    std::assert_eq!(result.unwrap(), ByteOrder::LittleEndian);
}

#[test]
fn test_byte_order_detection_big_endian() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x4D4D).unwrap(); // MM
    let mut cursor = Cursor::new(buffer);

    let result = ByteOrder::detect(&mut cursor);
    std::assert!(result.is_ok());
    std::assert_eq!(result.unwrap(), ByteOrder::BigEndian);
}

#[test]
fn test_byte_order_detection_invalid() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap(); // Invalid
    let mut cursor = Cursor::new(buffer);

    let result = ByteOrder::detect(&mut cursor);
    std::assert!(result.is_err());
}

#[test]
fn test_little_endian_handler_reads() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    buffer.write_u32::<LittleEndian>(0x12345678).unwrap();
    buffer.write_u64::<LittleEndian>(0x1234567890ABCDEF).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = LittleEndianHandler;

    std::assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    std::assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    std::assert_eq!(handler.read_u64(&mut cursor).unwrap(), 0x1234567890ABCDEF);
}

#[test]
fn test_big_endian_handler_reads() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x1234).unwrap();
    buffer.write_u32::<BigEndian>(0x12345678).unwrap();
    buffer.write_u64::<BigEndian>(0x1234567890ABCDEF).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = BigEndianHandler;

    std::assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    std::assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    std::assert_eq!(handler.read_u64(&mut cursor).unwrap(), 0x1234567890ABCDEF);
}

#[test]
fn test_write_read_round_trip_both_orders() {
    for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
        let handler = order.create_handler();

        let mut buffer: Vec<u8> = Vec::new();
        handler.write_u16(&mut buffer, 0xBEEF).unwrap();
        handler.write_u32(&mut buffer, 0xDEADBEEF).unwrap();
        handler.write_u64(&mut buffer, 0x0123456789ABCDEF).unwrap();
        handler.write_f64(&mut buffer, 2.5).unwrap();
        handler.write_rational(&mut buffer, (300, 7)).unwrap();
        handler.write_srational(&mut buffer, (-5, 9)).unwrap();

        let mut cursor = Cursor::new(buffer);
        std::assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0xBEEF);
        std::assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0xDEADBEEF);
        std::assert_eq!(handler.read_u64(&mut cursor).unwrap(), 0x0123456789ABCDEF);
        std::assert_eq!(handler.read_f64(&mut cursor).unwrap(), 2.5);
        std::assert_eq!(handler.read_rational(&mut cursor).unwrap(), (300, 7));
        std::assert_eq!(handler.read_srational(&mut cursor).unwrap(), (-5, 9));
    }
}

#[test]
fn test_swab_utils() {
    use crate::utils::swab_utils;

    let mut buf = [0x12u8, 0x34, 0x56, 0x78];
    swab_utils::swab_bytes_16(&mut buf);
    std::assert_eq!(buf, [0x34, 0x12, 0x78, 0x56]);

    let mut buf = [0x12u8, 0x34, 0x56, 0x78];
    swab_utils::swab_bytes_32(&mut buf);
    std::assert_eq!(buf, [0x78, 0x56, 0x34, 0x12]);

    // Odd trailing bytes stay put.
    let mut buf = [1u8, 2, 3];
    swab_utils::swab_bytes_16(&mut buf);
    std::assert_eq!(buf, [2, 1, 3]);
}
