//! Zstandard codec

use log::debug;

use super::contract::Codec;
use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};

/// Zstandard codec (compression code 14)
pub struct ZstdCodec {
    /// Compression level (1-22, default 3)
    compression_level: i32,
}

impl ZstdCodec {
    /// Creates a codec with the default compression level
    pub fn new() -> Self {
        ZstdCodec { compression_level: 3 }
    }

    /// Creates a codec with the specified compression level
    pub fn with_level(level: i32) -> Self {
        ZstdCodec { compression_level: level.clamp(1, 22) }
    }
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for ZstdCodec {
    fn name(&self) -> &'static str {
        "Zstandard"
    }

    fn code(&self) -> u64 {
        compression::ZSTD as u64
    }

    fn decode_unit(&mut self, input: &[u8], output: &mut Vec<u8>, _plane: u16) -> TiffResult<()> {
        output.clear();
        if input.is_empty() {
            return Ok(());
        }
        debug!("zstd decoding {} bytes", input.len());
        let decoded = zstd::decode_all(input)
            .map_err(|e| TiffError::GenericError(format!("zstd decode error: {}", e)))?;
        output.extend_from_slice(&decoded);
        Ok(())
    }

    fn encode_unit(&mut self, input: &[u8], output: &mut Vec<u8>, _plane: u16) -> TiffResult<()> {
        output.clear();
        if input.is_empty() {
            return Ok(());
        }
        debug!("zstd encoding {} bytes at level {}", input.len(), self.compression_level);
        let encoded = zstd::encode_all(input, self.compression_level)
            .map_err(|e| TiffError::GenericError(format!("zstd encode error: {}", e)))?;
        output.extend_from_slice(&encoded);
        Ok(())
    }
}
