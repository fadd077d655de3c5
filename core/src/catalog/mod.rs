//! catalog/mod.rs
//! Discovery and canonical ordering of frame files.
//!
//! The sorted position of an entry is its only address in the archive: no
//! filename is persisted, so a reader re-derives the mapping by scanning the
//! same directory again.

pub mod scan;
pub mod types;

pub use scan::{has_frame_suffix, join_path, scan_dir};
pub use types::{Catalog, CatalogEntry, CatalogTotals};
