//! Directory entry model
//!
//! Each IFD entry is a fixed-size on-disk record: tag, field type,
//! value count and a slot that holds either the value itself (when it
//! fits) or a file offset to an out-of-line region. The serialized
//! size of the record depends on the format mode.

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::field_types;
use crate::tiff::format::TiffFormat;
use crate::tiff::names;

/// Returns the width in bytes of a single value of the given field type
///
/// ASCII and UNDEFINED are byte arrays, so their width is 1. Returns
/// None for field types this library does not know, which callers must
/// treat as an entry they cannot size.
pub fn field_type_width(field_type: u16) -> Option<u64> {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE
        | field_types::UNDEFINED => Some(1),
        field_types::SHORT | field_types::SSHORT => Some(2),
        field_types::LONG | field_types::SLONG | field_types::FLOAT
        | field_types::IFD => Some(4),
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE
        | field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => Some(8),
        _ => None,
    }
}

/// Represents an entry in an Image File Directory (IFD)
///
/// Each entry describes one aspect of the image (dimensions, color
/// space, compression, etc.) using a tag-value pair. The field type
/// and count determine how to interpret the slot.
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Value-or-offset slot decoded as an integer in file byte order
    pub value_offset: u64,
    /// Raw slot bytes exactly as they appear in the file
    ///
    /// Only the first `format.inline_size()` bytes are meaningful.
    pub slot: [u8; 8],
}

impl IFDEntry {
    /// Creates an entry from fields decoded off the wire
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64, slot: [u8; 8]) -> Self {
        Self { tag, field_type, count, value_offset, slot }
    }

    /// Creates an entry whose slot holds a plain offset
    ///
    /// Used by the writer, which serializes the slot itself, and by
    /// tests that only care about the numeric value.
    pub fn with_offset(tag: u16, field_type: u16, count: u64, value_offset: u64) -> Self {
        Self { tag, field_type, count, value_offset, slot: [0u8; 8] }
    }

    /// Total payload size of this entry in bytes, if the type is known
    pub fn data_size(&self) -> Option<u64> {
        field_type_width(self.field_type)?.checked_mul(self.count)
    }

    /// Determines if the value is stored inline in the offset slot
    ///
    /// TIFF stores values of up to the slot width (4 bytes classic,
    /// 8 bytes BigTIFF) directly in the entry instead of pointing at a
    /// separate data region. Entries of unknown type cannot be sized
    /// and are treated as not inline.
    pub fn is_value_inline(&self, format: TiffFormat) -> bool {
        match self.data_size() {
            Some(size) => size <= format.inline_size(),
            None => false,
        }
    }

    /// Extracts one inline value from the slot by integer shifting
    ///
    /// Inline values are packed starting at the slot's first byte, each
    /// in file byte order. Reading the slot as one integer therefore
    /// puts value `index` at a shift that depends on the declared byte
    /// order: little-endian packs value 0 in the low bits, big-endian
    /// in the high bits.
    pub fn inline_value(&self, index: u64, width: u64, order: ByteOrder, format: TiffFormat) -> u64 {
        let slot_bits = format.inline_size() * 8;
        let value_bits = width * 8;
        let shift = match order {
            ByteOrder::LittleEndian => index * value_bits,
            ByteOrder::BigEndian => slot_bits - (index + 1) * value_bits,
        };
        let raw = self.value_offset >> shift;
        if value_bits >= 64 {
            raw
        } else {
            raw & ((1u64 << value_bits) - 1)
        }
    }

    /// Returns a human-readable description of this entry
    pub fn description(&self) -> String {
        format!(
            "Tag: {}, Type: {} ({}), Count: {}, Value/Offset: {}",
            self.tag,
            self.field_type,
            names::field_type_name(self.field_type),
            self.count,
            self.value_offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_pair_is_inline_in_classic() {
        let entry = IFDEntry::with_offset(258, field_types::SHORT, 2, 0);
        assert!(entry.is_value_inline(TiffFormat::Classic));

        let entry = IFDEntry::with_offset(258, field_types::SHORT, 3, 0);
        assert!(!entry.is_value_inline(TiffFormat::Classic));
        assert!(entry.is_value_inline(TiffFormat::Big));
    }

    #[test]
    fn unknown_type_is_never_inline() {
        let entry = IFDEntry::with_offset(50000, 99, 1, 0);
        assert!(!entry.is_value_inline(TiffFormat::Classic));
        assert!(entry.data_size().is_none());
    }

    #[test]
    fn inline_shift_direction_follows_byte_order() {
        // Slot bytes [0x34, 0x12, 0x78, 0x56] hold the SHORT array
        // [0x1234, 0x5678] in a little-endian file. The same logical
        // array in a big-endian file has slot bytes [0x12, 0x34, 0x56, 0x78].
        let le = IFDEntry::with_offset(258, field_types::SHORT, 2, 0x5678_1234);
        assert_eq!(le.inline_value(0, 2, ByteOrder::LittleEndian, TiffFormat::Classic), 0x1234);
        assert_eq!(le.inline_value(1, 2, ByteOrder::LittleEndian, TiffFormat::Classic), 0x5678);

        let be = IFDEntry::with_offset(258, field_types::SHORT, 2, 0x1234_5678);
        assert_eq!(be.inline_value(0, 2, ByteOrder::BigEndian, TiffFormat::Classic), 0x1234);
        assert_eq!(be.inline_value(1, 2, ByteOrder::BigEndian, TiffFormat::Classic), 0x5678);
    }
}
