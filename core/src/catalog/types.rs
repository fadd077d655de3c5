use std::cmp::Ordering;

use bytes::Bytes;

use crate::compression::CompressedBlob;
use crate::types::{Result, VzipError};

/// One discovered frame and, once dispatched, its compressed payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    pub path: String,
    /// Empty until the owning task fills it.
    pub compressed: Bytes,
    pub compressed_len: usize,
    pub input_len: usize,
    pub truncated: bool,
    filled: bool,
}

impl CatalogEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Store the compression result. Write-once.
    pub fn fill(&mut self, blob: CompressedBlob) -> Result<()> {
        if self.filled {
            return Err(VzipError::Pipeline("catalog entry filled twice"));
        }
        self.compressed_len = blob.bytes.len();
        self.compressed = blob.bytes;
        self.input_len = blob.input_len;
        self.truncated = blob.truncated;
        self.filled = true;
        Ok(())
    }
}

/// Aggregate byte counts over filled entries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogTotals {
    pub entries: usize,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub truncated: usize,
}

/// Index-addressed, path-sorted collection of entries.
///
/// Ordering is fixed at construction and never changes afterwards, except
/// that `remove_unfilled` may drop entries (skip-on-error runs).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build from unsorted paths; sorts byte-wise.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<CatalogEntry> = paths.into_iter().map(CatalogEntry::new).collect();
        entries.sort_by(|a, b| compare_paths(&a.path, &b.path));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    /// Disjoint mutable slots; each dispatched task gets exactly one.
    pub fn slots_mut(&mut self) -> &mut [CatalogEntry] {
        &mut self.entries
    }

    pub fn fill(&mut self, index: usize, blob: CompressedBlob) -> Result<()> {
        self.entries
            .get_mut(index)
            .ok_or(VzipError::Pipeline("catalog index out of range"))?
            .fill(blob)
    }

    pub fn all_filled(&self) -> bool {
        self.entries.iter().all(CatalogEntry::is_filled)
    }

    /// Drop entries that never received a payload. Returns their paths.
    pub fn remove_unfilled(&mut self) -> Vec<String> {
        let mut removed = Vec::new();
        self.entries.retain(|e| {
            if e.is_filled() {
                true
            } else {
                removed.push(e.path.clone());
                false
            }
        });
        removed
    }

    pub fn totals(&self) -> CatalogTotals {
        self.entries
            .iter()
            .filter(|e| e.is_filled())
            .fold(CatalogTotals::default(), |mut t, e| {
                t.entries += 1;
                t.bytes_in += e.input_len as u64;
                t.bytes_out += e.compressed_len as u64;
                t.truncated += e.truncated as usize;
                t
            })
    }
}

/// Byte-wise lexicographic comparison (what `strcmp` does on the joined path).
fn compare_paths(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}
