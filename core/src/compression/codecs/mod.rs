//! compression/codecs/mod.rs
//! Codec implementations behind the `Compressor` seam.

pub mod deflate;

pub use deflate::*;

use std::sync::Arc;

use crate::compression::{CodecOptions, CompressionError, Compressor};

/// Shared constructor handed to every worker a dispatcher starts.
pub type CompressorFactory =
    Arc<dyn Fn(CodecOptions) -> Result<Box<dyn Compressor>, CompressionError> + Send + Sync>;

/// Build the compressor a worker owns for its lifetime.
pub fn create_compressor(options: CodecOptions) -> Result<Box<dyn Compressor>, CompressionError> {
    Ok(Box::new(DeflateCompressor::new(options)?))
}

pub fn default_factory() -> CompressorFactory {
    Arc::new(create_compressor)
}
