//! Identity ("store raw") codec

use super::contract::Codec;
use crate::tiff::constants::compression;
use crate::tiff::errors::TiffResult;

/// Pass-through codec for uncompressed data (compression code 1)
pub struct IdentityCodec;

impl Codec for IdentityCodec {
    fn name(&self) -> &'static str {
        "Uncompressed"
    }

    fn code(&self) -> u64 {
        compression::NONE as u64
    }

    fn decode_unit(&mut self, input: &[u8], output: &mut Vec<u8>, _plane: u16) -> TiffResult<()> {
        output.clear();
        output.extend_from_slice(input);
        Ok(())
    }

    fn encode_unit(&mut self, input: &[u8], output: &mut Vec<u8>, _plane: u16) -> TiffResult<()> {
        output.clear();
        output.extend_from_slice(input);
        Ok(())
    }

    fn seek(&mut self, _row: u64) -> TiffResult<()> {
        // Raw data is addressable by row arithmetic alone.
        Ok(())
    }

    fn estimated_unit_size(&self, row_bytes: usize, rows: usize) -> Option<usize> {
        Some(row_bytes * rows)
    }
}
