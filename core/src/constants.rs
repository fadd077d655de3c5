//! constants.rs
//! Fixed sizes, suffixes and defaults shared by every stage.

/// Per-file buffer capacity (1 MiB). Bounds both the bytes read from a frame
/// and the compressed bytes a single deflate pass may produce.
pub const BUFFER_CAP: usize = 1024 * 1024;

/// Default number of concurrently running compression tasks.
pub const DEFAULT_POOL_CAPACITY: usize = 20;

/// Filename suffix marking a frame file. Exact, case-sensitive match.
pub const FRAME_SUFFIX: &str = ".ppm";

/// Archive file written relative to the working directory.
pub const DEFAULT_ARCHIVE_NAME: &str = "video.vzip";

/// Width of the per-entry length field (signed 32-bit, little-endian).
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Deflate levels (flate2 numbering).
pub const MAX_COMPRESSION_LEVEL: u32 = 9;
pub const DEFAULT_COMPRESSION_LEVEL: u32 = MAX_COMPRESSION_LEVEL;

/// Share of available memory the dynamic profile may spend on in-flight buffers.
pub const DEFAULT_MEM_FRACTION: f64 = 0.50;
