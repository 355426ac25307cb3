//! Fallback codec for unknown compression schemes
//!
//! An unrecognized compression value must not fail the open: the
//! directory's metadata is still valuable. Decoding, however, cannot
//! be faked, so this codec reports no capabilities and fails any
//! actual data access.

use super::contract::Codec;
use crate::tiff::errors::{TiffError, TiffResult};

/// Stand-in for a compression scheme this library cannot process
pub struct PassthroughCodec {
    code: u64,
}

impl PassthroughCodec {
    /// Creates a stand-in for the given compression code
    pub fn new(code: u64) -> Self {
        PassthroughCodec { code }
    }
}

impl Codec for PassthroughCodec {
    fn name(&self) -> &'static str {
        "Unsupported"
    }

    fn code(&self) -> u64 {
        self.code
    }

    fn can_decode(&self) -> bool {
        false
    }

    fn can_encode(&self) -> bool {
        false
    }

    fn decode_unit(&mut self, _input: &[u8], _output: &mut Vec<u8>, _plane: u16) -> TiffResult<()> {
        Err(TiffError::UnsupportedCompression(self.code))
    }

    fn encode_unit(&mut self, _input: &[u8], _output: &mut Vec<u8>, _plane: u16) -> TiffResult<()> {
        Err(TiffError::UnsupportedCompression(self.code))
    }
}
