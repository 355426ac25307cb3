//! TIFF header reading and writing
//!
//! The header is the only fixed-position structure in a TIFF file:
//! a two-byte order marker, a version number that separates classic
//! TIFF from BigTIFF, and the offset of the first directory.

use log::debug;
use std::io::{Seek, SeekFrom, Write};

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::{SeekableReader, SeekableStream};
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::format::TiffFormat;
use crate::tiff::validation;

/// Detects and returns the byte order handler for a TIFF file
pub fn detect_byte_order(reader: &mut dyn SeekableReader) -> TiffResult<Box<dyn ByteOrderHandler>> {
    let byte_order = ByteOrder::detect(reader)?;
    debug!("Detected byte order: {}", byte_order.name());

    Ok(byte_order.create_handler())
}

/// Detects whether a file is classic TIFF or BigTIFF
///
/// Reads the version word that follows the order marker and, for
/// BigTIFF, validates the offset-size/reserved extension words.
pub fn detect_format(
    reader: &mut dyn SeekableReader,
    handler: &dyn ByteOrderHandler,
) -> TiffResult<TiffFormat> {
    let version = handler.read_u16(reader)?;
    debug!("TIFF version: {}", version);

    match version {
        header::BIG_TIFF_VERSION => {
            validation::validate_bigtiff_header(reader, handler)?;
            Ok(TiffFormat::Big)
        }
        header::TIFF_VERSION => Ok(TiffFormat::Classic),
        _ => Err(TiffError::UnsupportedVersion(version)),
    }
}

/// Reads the first-IFD offset that closes the header
///
/// The stream must be positioned right after the version words, which
/// is where `detect_format` leaves it.
pub fn read_first_ifd_offset(
    reader: &mut dyn SeekableReader,
    format: TiffFormat,
    handler: &dyn ByteOrderHandler,
) -> TiffResult<u64> {
    match format {
        TiffFormat::Big => handler.read_u64(reader).map_err(TiffError::IoError),
        TiffFormat::Classic => handler
            .read_u32(reader)
            .map(|v| v as u64)
            .map_err(TiffError::IoError),
    }
}

/// Writes a complete header at the start of the stream
///
/// The first-IFD offset is written as 0 and patched later via
/// `patch_first_ifd_offset`, once the first directory has a home.
pub fn write_header<S: SeekableStream>(
    stream: &mut S,
    format: TiffFormat,
    handler: &dyn ByteOrderHandler,
) -> TiffResult<()> {
    stream.seek(SeekFrom::Start(0))?;
    stream.write_all(&handler.order().marker())?;
    handler.write_u16(stream, format.version())?;

    match format {
        TiffFormat::Big => {
            handler.write_u16(stream, header::BIGTIFF_OFFSET_SIZE)?;
            handler.write_u16(stream, 0)?;
            handler.write_u64(stream, 0)?;
        }
        TiffFormat::Classic => {
            handler.write_u32(stream, 0)?;
        }
    }

    Ok(())
}

/// Patches the header's first-IFD offset in place
pub fn patch_first_ifd_offset<S: SeekableStream>(
    stream: &mut S,
    format: TiffFormat,
    handler: &dyn ByteOrderHandler,
    offset: u64,
) -> TiffResult<()> {
    stream.seek(SeekFrom::Start(format.first_offset_position()))?;
    match format {
        TiffFormat::Big => handler.write_u64(stream, offset)?,
        TiffFormat::Classic => {
            if offset > u32::MAX as u64 {
                return Err(TiffError::OffsetOverflow(offset));
            }
            handler.write_u32(stream, offset as u32)?;
        }
    }

    Ok(())
}
