//! Format mode selection
//!
//! Classic TIFF and BigTIFF use different integer widths for every
//! offset and count in the file. This module centralizes those widths
//! so the reader and writer branch on one selector instead of
//! scattering `if big_tiff` checks.

use crate::tiff::constants::header;

/// The two header generations of the TIFF format
///
/// Fixed for the lifetime of one open file, except for the one-way
/// classic-to-big upgrade the writer performs when offsets outgrow
/// 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffFormat {
    /// Classic TIFF: version 42, 4-byte offsets, 2-byte entry counts
    Classic,
    /// BigTIFF: version 43, 8-byte offsets and entry counts
    Big,
}

impl TiffFormat {
    /// Version number stored in the header
    pub fn version(&self) -> u16 {
        match self {
            TiffFormat::Classic => header::TIFF_VERSION,
            TiffFormat::Big => header::BIG_TIFF_VERSION,
        }
    }

    /// Size of the file header in bytes, including the first-IFD offset
    pub fn header_size(&self) -> u64 {
        match self {
            TiffFormat::Classic => 8,
            TiffFormat::Big => 16,
        }
    }

    /// Width of an offset (and of the next-directory pointer) in bytes
    pub fn offset_size(&self) -> u64 {
        match self {
            TiffFormat::Classic => 4,
            TiffFormat::Big => 8,
        }
    }

    /// Width of the entry-count field that opens a directory
    pub fn count_field_size(&self) -> u64 {
        match self {
            TiffFormat::Classic => 2,
            TiffFormat::Big => 8,
        }
    }

    /// Serialized size of one directory entry
    pub fn entry_size(&self) -> u64 {
        match self {
            TiffFormat::Classic => 12,
            TiffFormat::Big => 20,
        }
    }

    /// Bytes available for an inline value in the offset slot
    pub fn inline_size(&self) -> u64 {
        self.offset_size()
    }

    /// Position of the first-IFD offset within the header
    pub fn first_offset_position(&self) -> u64 {
        match self {
            TiffFormat::Classic => 4,
            TiffFormat::Big => 8,
        }
    }

    /// Serialized size of a whole directory with `entries` entries
    pub fn directory_size(&self, entries: u64) -> u64 {
        self.count_field_size() + entries * self.entry_size() + self.offset_size()
    }

    /// Largest offset this format can store
    pub fn max_offset(&self) -> u64 {
        match self {
            TiffFormat::Classic => u32::MAX as u64,
            TiffFormat::Big => u64::MAX,
        }
    }

    /// Returns true for the BigTIFF variant
    pub fn is_big(&self) -> bool {
        matches!(self, TiffFormat::Big)
    }
}
