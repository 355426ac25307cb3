//! Custom error types for TIFF processing

use std::fmt;
use std::io;

/// TIFF-specific error types
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Short read while a structure required more bytes
    TruncatedRead(u64),
    /// Entry whose declared type/count cannot describe real data
    MalformedEntry(u16, String),
    /// Declared value count disagrees with the registry's expectation
    CountMismatch(u16, u64, u64),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// A field value was accessed as a type it does not hold
    WrongFieldType(u16, &'static str),
    /// An offset does not fit the classic 32-bit offset slot
    OffsetOverflow(u64),
    /// The classic->BigTIFF upgrade was needed but disabled
    BigTiffDisabled,
    /// Image dimensions not found
    MissingDimensions,
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::InvalidHeader => write!(f, "Invalid TIFF header"),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::TruncatedRead(offset) => write!(f, "Truncated read at offset {}", offset),
            TiffError::MalformedEntry(tag, msg) => write!(f, "Malformed entry for tag {}: {}", tag, msg),
            TiffError::CountMismatch(tag, declared, expected) =>
                write!(f, "Tag {} declares {} values, expected {}", tag, declared, expected),
            TiffError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            TiffError::WrongFieldType(tag, wanted) =>
                write!(f, "Tag {} does not hold a {} value", tag, wanted),
            TiffError::OffsetOverflow(offset) =>
                write!(f, "Offset {} exceeds the classic 32-bit range", offset),
            TiffError::BigTiffDisabled =>
                write!(f, "File requires BigTIFF but BigTIFF output is disabled"),
            TiffError::MissingDimensions => write!(f, "Image dimensions not found"),
            TiffError::GenericError(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;

impl From<String> for TiffError {
    fn from(msg: String) -> Self {
        TiffError::GenericError(msg)
    }
}
