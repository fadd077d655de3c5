//! compression/types.rs
//! Codec errors, options and the compressor seam.
use std::fmt;

use bytes::Bytes;
use thiserror::Error;

use crate::compression::BoundedBuffer;
use crate::constants::{DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL};

#[derive(Debug, Error)]
pub enum CompressionError {
    /// The pass did not reach its end-of-stream state within the output capacity.
    #[error("compressed output exceeds {capacity} byte buffer")]
    OutputOverflow { capacity: usize },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },

    #[error("invalid compression level {0} (expected 0..={max})", max = MAX_COMPRESSION_LEVEL)]
    InvalidLevel(u32),
}

/// Stream wrapping around the raw deflate blocks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StreamFormat {
    /// zlib header + adler32 trailer, as produced by `deflateInit`.
    #[default]
    Zlib,
    /// Bare deflate blocks, no header or trailer.
    Raw,
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamFormat::Zlib => f.write_str("zlib"),
            StreamFormat::Raw => f.write_str("raw"),
        }
    }
}

/// What to do with a frame larger than the input buffer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TruncationPolicy {
    /// Compress the first `cap` bytes and flag the entry as truncated.
    #[default]
    Truncate,
    /// Fail the frame with `VzipError::Oversize`.
    Reject,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    pub level: u32,
    pub format: StreamFormat,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_COMPRESSION_LEVEL,
            format: StreamFormat::Zlib,
        }
    }
}

impl CodecOptions {
    pub fn validate(&self) -> Result<(), CompressionError> {
        if self.level > MAX_COMPRESSION_LEVEL {
            return Err(CompressionError::InvalidLevel(self.level));
        }
        Ok(())
    }
}

/// Result of compressing one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompressedBlob {
    pub bytes: Bytes,
    /// Bytes fed to the compressor (`min(file_size, cap)`).
    pub input_len: usize,
    /// True when the source file was longer than the input buffer.
    pub truncated: bool,
}

impl CompressedBlob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Require Send so one compressor can live on each worker thread.
pub trait Compressor: Send {
    /// Compress `input` in one pass into `out`, replacing its contents.
    /// Returns the exact number of bytes written.
    fn compress_into(&mut self, input: &[u8], out: &mut BoundedBuffer) -> Result<usize, CompressionError>;

    fn name(&self) -> &'static str;
}
