//! Codec contract
//!
//! Every compression scheme implements this trait. Exactly one codec
//! is active per directory, selected by the directory's compression
//! tag; the predictor filter wraps a codec without the codec knowing.

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::planar_config;
use crate::tiff::directory::Directory;
use crate::tiff::errors::{TiffError, TiffResult};

/// Geometry and layout a codec needs before touching data
///
/// Derived from the current directory at setup time; one setup covers
/// every strip or tile of that directory.
#[derive(Debug, Clone)]
pub struct CodecSetup {
    /// Compression code from the directory
    pub compression: u64,
    /// Predictor code from the directory
    pub predictor: u16,
    /// Bytes in one row of the current tiling mode
    pub row_bytes: usize,
    /// Rows per strip or tile
    pub rows_per_unit: usize,
    /// Samples per pixel
    pub samples_per_pixel: usize,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Whether samples are interleaved rather than planar
    pub planar_contiguous: bool,
    /// Byte order of the file
    pub byte_order: ByteOrder,
}

impl CodecSetup {
    /// Builds a setup from the current directory
    pub fn from_directory(dir: &Directory, byte_order: ByteOrder) -> Self {
        CodecSetup {
            compression: dir.compression(),
            predictor: dir.predictor(),
            row_bytes: dir.bytes_per_row() as usize,
            rows_per_unit: dir.rows_per_strip() as usize,
            samples_per_pixel: dir.samples_per_pixel() as usize,
            bits_per_sample: dir.bits_per_sample() as u16,
            planar_contiguous: dir.planar_configuration() == planar_config::CHUNKY,
            byte_order,
        }
    }
}

/// Contract every compression scheme implements
///
/// The lifecycle per direction is setup once, then pre/unit per strip
/// or tile, with `post_encode` closing an encode pass. `cleanup`
/// releases whatever the codec allocated. Methods a codec has no use
/// for keep their default no-op implementations.
pub trait Codec: Send + Sync {
    /// Human-readable name of this compression method
    fn name(&self) -> &'static str;

    /// The compression code this codec serves
    fn code(&self) -> u64;

    /// Whether this codec can decode
    fn can_decode(&self) -> bool {
        true
    }

    /// Whether this codec can encode
    fn can_encode(&self) -> bool {
        true
    }

    /// Whether this codec performs its own byte-order fixup
    ///
    /// When true the caller must skip its generic post-decode swab;
    /// the predictor filter claims this because 16/32-bit accumulation
    /// has to happen on host-order samples before any generic swap.
    fn handles_byte_order(&self) -> bool {
        false
    }

    /// Prepares for decoding a directory's data
    fn setup_decode(&mut self, setup: &CodecSetup) -> TiffResult<()> {
        let _ = setup;
        Ok(())
    }

    /// Called before each strip/tile is decoded
    fn pre_decode(&mut self, plane: u16) -> TiffResult<()> {
        let _ = plane;
        Ok(())
    }

    /// Decodes one strip or tile, replacing `output`'s contents
    fn decode_unit(&mut self, input: &[u8], output: &mut Vec<u8>, plane: u16) -> TiffResult<()>;

    /// Prepares for encoding a directory's data
    fn setup_encode(&mut self, setup: &CodecSetup) -> TiffResult<()> {
        let _ = setup;
        Ok(())
    }

    /// Called before each strip/tile is encoded
    fn pre_encode(&mut self, plane: u16) -> TiffResult<()> {
        let _ = plane;
        Ok(())
    }

    /// Encodes one strip or tile, replacing `output`'s contents
    ///
    /// The input buffer belongs to the caller and must never be
    /// mutated.
    fn encode_unit(&mut self, input: &[u8], output: &mut Vec<u8>, plane: u16) -> TiffResult<()>;

    /// Finishes an encode pass
    fn post_encode(&mut self) -> TiffResult<()> {
        Ok(())
    }

    /// Positions the codec for random access within a strip
    fn seek(&mut self, row: u64) -> TiffResult<()> {
        let _ = row;
        Err(TiffError::GenericError(format!(
            "{} does not support random access",
            self.name()
        )))
    }

    /// Releases codec-owned state
    fn cleanup(&mut self) {}

    /// Exact size of a decoded-then-encoded unit, if knowable
    ///
    /// Only codecs whose output size is a pure function of geometry
    /// return Some; the reader's byte-count repair asks this before
    /// falling back to distributing remaining file space.
    fn estimated_unit_size(&self, row_bytes: usize, rows: usize) -> Option<usize> {
        let _ = (row_bytes, rows);
        None
    }
}
