use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::{debug, info};

use crate::archive::types::{ArchiveError, ArchiveTotals};
use crate::catalog::Catalog;
use crate::constants::LENGTH_PREFIX_LEN;
use crate::types::{Result, VzipError};

/// Appends length-prefixed payloads to any writer.
pub struct ArchiveWriter<W: Write> {
    out: W,
    totals: ArchiveTotals,
}

impl<W: Write> ArchiveWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            totals: ArchiveTotals::default(),
        }
    }

    pub fn push(&mut self, payload: &[u8]) -> std::result::Result<(), ArchiveError> {
        let len = i32::try_from(payload.len()).map_err(|_| ArchiveError::LengthOverflow(payload.len()))?;
        self.out.write_i32::<LittleEndian>(len)?;
        self.out.write_all(payload)?;

        self.totals.entries += 1;
        self.totals.payload_bytes += payload.len() as u64;
        self.totals.archive_bytes += (LENGTH_PREFIX_LEN + payload.len()) as u64;
        Ok(())
    }

    pub fn totals(&self) -> ArchiveTotals {
        self.totals
    }

    /// Flush and hand back the writer with the final totals.
    pub fn finish(mut self) -> std::result::Result<(W, ArchiveTotals), ArchiveError> {
        self.out.flush()?;
        Ok((self.out, self.totals))
    }
}

/// Create `path` and write every catalog entry, in index order.
///
/// All entries must be filled; dispatch has to have fully returned first.
pub fn write_archive(path: &Path, catalog: &Catalog) -> Result<ArchiveTotals> {
    let write_err = |e: ArchiveError| match e {
        ArchiveError::Io(source) => VzipError::Write {
            path: path.display().to_string(),
            source,
        },
        other => VzipError::Archive(other),
    };

    if !catalog.all_filled() {
        return Err(VzipError::Pipeline("archive writer reached an unfilled catalog entry"));
    }

    let file = File::create(path).map_err(|e| write_err(e.into()))?;
    let mut writer = ArchiveWriter::new(BufWriter::new(file));

    for (index, entry) in catalog.entries().iter().enumerate() {
        writer.push(&entry.compressed).map_err(write_err)?;
        debug!(index, path = %entry.path, len = entry.compressed_len, "entry written");
    }

    let (_, totals) = writer.finish().map_err(write_err)?;
    info!(
        archive = %path.display(),
        entries = totals.entries,
        bytes = totals.archive_bytes,
        "archive written"
    );
    Ok(totals)
}
