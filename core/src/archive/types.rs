use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("payload of {0} bytes does not fit the 32-bit length field")]
    LengthOverflow(usize),

    #[error("entry {index}: negative length {value}")]
    NegativeLength { index: usize, value: i32 },

    #[error("entry {index}: truncated, expected {expected} bytes, found {found}")]
    Truncated { index: usize, expected: usize, found: usize },
}

/// Byte counts accumulated while writing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveTotals {
    pub entries: usize,
    pub payload_bytes: u64,
    /// Payload plus length prefixes; equals the archive file size.
    pub archive_bytes: u64,
}
