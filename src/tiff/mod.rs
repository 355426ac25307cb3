//! TIFF directory format module
//!
//! This module provides structures and functions for reading and
//! writing TIFF and BigTIFF image file directories.

pub mod errors;
pub mod format;
pub mod entry;
pub mod value;
pub mod registry;
pub mod directory;
pub mod reader;
pub mod writer;
pub mod types;
pub mod warnings;
pub(crate) mod constants;
pub(crate) mod header;
pub(crate) mod names;
pub(crate) mod validation;
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use directory::{Directory, FieldSet, IFD};
pub use entry::IFDEntry;
pub use errors::{TiffError, TiffResult};
pub use format::TiffFormat;
pub use reader::TiffReader;
pub use registry::{ExpectedCount, TagExtender, TagInfo, TagRegistry};
pub use types::Tiff;
pub use value::FieldValue;
pub use warnings::{LogSink, WarningSink};
pub use writer::TiffWriter;

// Constants for the TIFF format, re-exported for embedders
pub use constants::{compression, field_types, predictor, tags};
