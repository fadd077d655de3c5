//! Archive container for compressed frames.
//!
//! Layout, repeated once per catalog entry in sorted-path order:
//!
//! ```text
//! i32 little-endian   compressed_length
//! u8[length]          compressed payload (one complete deflate stream)
//! ```
//!
//! There is no header, magic, entry count, filename or checksum. A reader
//! must know how many entries to expect and re-derive the filename order by
//! scanning the source directory again.
//!
//! Non-responsibilities:
//! - Compression and decompression
//! - Ordering (the catalog decides it)

pub mod decode;
pub mod encode;
pub mod types;

pub use decode::{read_archive, ArchiveReader};
pub use encode::{write_archive, ArchiveWriter};
pub use types::{ArchiveError, ArchiveTotals};
