use std::io;
use thiserror::Error;

use crate::{archive::ArchiveError, compression::CompressionError};

/// Unified error covering every pipeline stage.
/// - Each stage variant carries the path it failed on.
/// - `From<T>` for the codec and framing errors keeps `?` usable across layers.
#[derive(Debug, Error)]
pub enum VzipError {
    /// Bad arguments or configuration.
    #[error("invalid invocation: {0}")]
    Invocation(String),

    /// Input directory could not be opened or listed.
    #[error("cannot enumerate directory '{path}': {source}")]
    Enumerate {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Frame file could not be opened or read.
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Frame larger than the buffer cap under `TruncationPolicy::Reject`.
    #[error("'{path}' exceeds the {cap} byte buffer (at least {size} bytes)")]
    Oversize { path: String, size: u64, cap: usize },

    /// Deflate pass failed or overflowed its output buffer.
    #[error("cannot compress '{path}': {source}")]
    Compress {
        path: String,
        #[source]
        source: CompressionError,
    },

    /// Archive could not be created or written.
    #[error("cannot write archive '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Malformed archive on read-back.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Worker or channel breakdown inside the dispatcher.
    #[error("pipeline error: {0}")]
    Pipeline(&'static str),
}

impl VzipError {
    /// Short stage tag, used in logs and skip reports.
    pub fn stage(&self) -> &'static str {
        match self {
            VzipError::Invocation(_) => "invocation",
            VzipError::Enumerate { .. } => "enumerate",
            VzipError::Read { .. } | VzipError::Oversize { .. } => "read",
            VzipError::Compress { .. } => "compress",
            VzipError::Write { .. } | VzipError::Archive(_) => "write",
            VzipError::Pipeline(_) => "pipeline",
        }
    }
}

pub type Result<T> = std::result::Result<T, VzipError>;
