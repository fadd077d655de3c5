use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};

use crate::archive::types::ArchiveError;
use crate::constants::LENGTH_PREFIX_LEN;
use crate::types::{Result, VzipError};

/// Iterates the payloads of an archive without inflating them.
#[derive(Debug)]
pub struct ArchiveReader<R: Read> {
    inner: R,
    index: usize,
    done: bool,
}

impl<R: Read> ArchiveReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            index: 0,
            done: false,
        }
    }

    /// Next payload, `Ok(None)` at a clean end of archive.
    pub fn next_payload(&mut self) -> std::result::Result<Option<Vec<u8>>, ArchiveError> {
        let mut prefix = [0u8; LENGTH_PREFIX_LEN];
        let got = read_full(&mut self.inner, &mut prefix)?;
        if got == 0 {
            return Ok(None);
        }
        if got < LENGTH_PREFIX_LEN {
            return Err(ArchiveError::Truncated {
                index: self.index,
                expected: LENGTH_PREFIX_LEN,
                found: got,
            });
        }

        let value = LittleEndian::read_i32(&prefix);
        let len = usize::try_from(value).map_err(|_| ArchiveError::NegativeLength {
            index: self.index,
            value,
        })?;

        // Length is untrusted; let the buffer grow with what is actually there.
        let mut payload = Vec::new();
        (&mut self.inner).take(len as u64).read_to_end(&mut payload)?;
        if payload.len() < len {
            return Err(ArchiveError::Truncated {
                index: self.index,
                expected: len,
                found: payload.len(),
            });
        }

        self.index += 1;
        Ok(Some(payload))
    }
}

impl<R: Read> Iterator for ArchiveReader<R> {
    type Item = std::result::Result<Vec<u8>, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_payload() {
            Ok(Some(payload)) => Some(Ok(payload)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Read every payload of the archive at `path`.
pub fn read_archive(path: &Path) -> Result<Vec<Vec<u8>>> {
    let file = File::open(path).map_err(|source| VzipError::Read {
        path: path.display().to_string(),
        source,
    })?;
    ArchiveReader::new(BufReader::new(file))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(VzipError::from)
}

/// Fill `buf` as far as the reader allows; returns bytes read.
fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut off = 0;
    while off < buf.len() {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(off)
}
