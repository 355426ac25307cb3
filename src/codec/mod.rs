//! Compression codec layer
//!
//! This module defines the codec contract every compression scheme
//! implements, the built-in codecs, the selection factory, and the
//! predictor filter that decorates any codec with horizontal or
//! floating-point differencing.

mod contract;
mod identity;
mod deflate;
mod zstd;
mod passthrough;
pub mod factory;
pub mod predictor;
mod tests;

pub use contract::{Codec, CodecSetup};
pub use identity::IdentityCodec;
pub use deflate::DeflateCodec;
pub use self::zstd::ZstdCodec;
pub use passthrough::PassthroughCodec;
pub use factory::CodecFactory;
pub use predictor::PredictorCodec;
