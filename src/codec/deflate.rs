//! Adobe Deflate codec

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::contract::Codec;
use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};

/// Adobe Deflate (zlib) codec (compression code 8)
pub struct DeflateCodec {
    /// flate2 compression level
    level: Compression,
}

impl DeflateCodec {
    /// Creates a codec with the default compression level
    pub fn new() -> Self {
        DeflateCodec { level: Compression::default() }
    }

    /// Creates a codec with an explicit level (0-9)
    pub fn with_level(level: u32) -> Self {
        DeflateCodec { level: Compression::new(level.min(9)) }
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for DeflateCodec {
    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u64 {
        compression::DEFLATE as u64
    }

    fn decode_unit(&mut self, input: &[u8], output: &mut Vec<u8>, _plane: u16) -> TiffResult<()> {
        output.clear();
        let mut decoder = ZlibDecoder::new(input);
        decoder.read_to_end(output).map_err(TiffError::IoError)?;
        Ok(())
    }

    fn encode_unit(&mut self, input: &[u8], output: &mut Vec<u8>, _plane: u16) -> TiffResult<()> {
        output.clear();
        let mut encoder = ZlibEncoder::new(Vec::new(), self.level);
        encoder.write_all(input).map_err(TiffError::IoError)?;
        let compressed = encoder.finish().map_err(TiffError::IoError)?;
        output.extend_from_slice(&compressed);
        Ok(())
    }
}
