//! Factory for creating codecs

use log::warn;

use super::contract::{Codec, CodecSetup};
use super::deflate::DeflateCodec;
use super::identity::IdentityCodec;
use super::passthrough::PassthroughCodec;
use super::predictor::PredictorCodec;
use super::zstd::ZstdCodec;
use crate::tiff::constants::{compression, predictor};
use crate::tiff::errors::{TiffError, TiffResult};

/// Factory for creating codecs
pub struct CodecFactory;

impl CodecFactory {
    /// Creates the codec for a directory, predictor included
    ///
    /// Selection comes from the directory's compression tag; the
    /// predictor tag wraps the codec in the filter when it is not
    /// "none" (the none case is an explicit pass-through, not a
    /// degenerate filter). Unknown compression values fall back to a
    /// stand-in codec so the directory's metadata stays readable.
    pub fn create(setup: &CodecSetup) -> TiffResult<Box<dyn Codec>> {
        let base = Self::create_raw(setup.compression);

        if setup.predictor == predictor::NONE || (!base.can_decode() && !base.can_encode()) {
            return Ok(base);
        }

        Ok(Box::new(PredictorCodec::new(base, setup)?))
    }

    /// Creates the bare codec for a compression code
    pub fn create_raw(code: u64) -> Box<dyn Codec> {
        match code {
            c if c == compression::NONE as u64 => Box::new(IdentityCodec),
            c if c == compression::DEFLATE as u64 => Box::new(DeflateCodec::new()),
            c if c == compression::ZSTD as u64 => Box::new(ZstdCodec::new()),
            other => {
                warn!("unknown compression {}, metadata only", other);
                Box::new(PassthroughCodec::new(other))
            }
        }
    }

    /// Gets a codec by name
    pub fn create_by_name(name: &str) -> TiffResult<Box<dyn Codec>> {
        match name.to_lowercase().as_str() {
            "uncompressed" | "none" => Ok(Box::new(IdentityCodec)),
            "deflate" | "zip" | "adobe deflate" => Ok(Box::new(DeflateCodec::new())),
            "zstd" | "zstandard" => Ok(Box::new(ZstdCodec::new())),
            _ => Err(TiffError::GenericError(format!("Unknown compression type: {}", name))),
        }
    }

    /// All codecs this build can actually process
    pub fn available_codecs() -> Vec<Box<dyn Codec>> {
        vec![
            Box::new(IdentityCodec),
            Box::new(DeflateCodec::new()),
            Box::new(ZstdCodec::new()),
        ]
    }
}
