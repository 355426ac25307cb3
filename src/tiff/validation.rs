//! TIFF validation utilities
//!
//! Validation functions that keep malformed files from walking the
//! reader out of bounds.

use log::warn;
use std::io::SeekFrom;

use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// Validates an IFD offset against the file size
///
/// Offsets below the smallest possible header are as bogus as offsets
/// past the end of the file.
pub fn validate_ifd_offset(offset: u64, file_size: u64) -> TiffResult<()> {
    if offset >= file_size || offset < 8 {
        return Err(TiffError::GenericError(format!(
            "Invalid IFD offset: {} (file size: {})",
            offset, file_size
        )));
    }

    Ok(())
}

/// Gets the stream length, restoring the current position afterwards
///
/// Returns u64::MAX when the length cannot be determined, so size
/// checks degrade to no-ops instead of rejecting pipe-like streams.
pub fn stream_length(reader: &mut dyn SeekableReader) -> TiffResult<u64> {
    let current_position = reader.seek(SeekFrom::Current(0))?;
    let file_size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => {
            reader.seek(SeekFrom::Start(current_position))?;
            size
        }
        Err(e) => {
            warn!("Could not determine stream length: {}", e);
            reader.seek(SeekFrom::Start(current_position))?;
            u64::MAX
        }
    };

    Ok(file_size)
}

/// Validates the BigTIFF header extension
///
/// After the version number (43) BigTIFF stores the offset size (must
/// be 8) and a reserved word (must be 0).
pub fn validate_bigtiff_header(
    reader: &mut dyn SeekableReader,
    handler: &dyn ByteOrderHandler,
) -> TiffResult<()> {
    let offset_size = handler.read_u16(reader)?;
    let reserved = handler.read_u16(reader)?;

    if offset_size != header::BIGTIFF_OFFSET_SIZE || reserved != 0 {
        return Err(TiffError::InvalidBigTIFFHeader);
    }

    Ok(())
}
