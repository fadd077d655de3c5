//! compression/mod.rs
//! Single-shot, capacity-bounded compression of whole frame files.
//!
//! Notes:
//! - Each frame is compressed independently, so results are reproducible and
//!   safe to compute in any order across threads.
//! - Both sides of a pass are `BoundedBuffer`s; input truncation and output
//!   overflow are reported explicitly instead of being absorbed.

pub mod buffer;
pub mod codecs;
pub mod types;

pub use buffer::*;
pub use codecs::*;
pub use types::*;
