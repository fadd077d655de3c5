//! compression/buffer.rs
//! Fixed-capacity heap buffers used on both sides of a compression pass.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

/// Owned buffer whose capacity never changes after construction.
///
/// The backing storage is allocated once; `len` tracks the filled prefix.
/// Workers keep one input and one output buffer and reuse them for every file.
#[derive(Debug, Clone)]
pub struct BoundedBuffer {
    buf: Vec<u8>,
    len: usize,
}

/// What a capped read produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReadOutcome {
    pub len: usize,
    /// Source still had bytes after the buffer filled up.
    pub truncated: bool,
}

impl BoundedBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Filled prefix.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Whole backing region, for writers that report how much they produced.
    pub fn storage_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Mark the first `len` bytes as filled. Clamped to capacity.
    pub fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.buf.len(), "len {} > capacity {}", len, self.buf.len());
        self.len = len.min(self.buf.len());
    }

    /// Read from `reader` until the buffer is full or EOF.
    ///
    /// When the buffer fills, one extra byte is probed to tell "exactly
    /// capacity" apart from "longer than capacity". The probed byte is dropped.
    pub fn fill_from<R: Read>(&mut self, reader: &mut R) -> io::Result<ReadOutcome> {
        self.len = 0;
        while self.len < self.buf.len() {
            match reader.read(&mut self.buf[self.len..]) {
                Ok(0) => break,
                Ok(n) => self.len += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        let truncated = if self.len == self.buf.len() {
            let mut probe = [0u8; 1];
            loop {
                match reader.read(&mut probe) {
                    Ok(n) => break n > 0,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        } else {
            false
        };

        Ok(ReadOutcome { len: self.len, truncated })
    }
}

/// Open `path` and read at most `buf.capacity()` bytes of it into `buf`.
pub fn read_capped(path: &Path, buf: &mut BoundedBuffer) -> io::Result<ReadOutcome> {
    let mut file = File::open(path)?;
    buf.fill_from(&mut file)
}
