pub mod io;
pub mod tiff;
pub mod utils;
pub mod codec;

pub use tiff::{
    ByteOrder, Directory, FieldValue, Tiff, TiffError, TiffFormat, TiffReader, TiffResult,
    TiffWriter,
};

pub use codec::{Codec, CodecFactory, CodecSetup, PredictorCodec};
