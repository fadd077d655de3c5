use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::constants::FRAME_SUFFIX;
use crate::types::{Result, VzipError};

/// Exact, case-sensitive suffix match. The name must be longer than the
/// suffix itself, so a file literally named ".ppm" is not a frame.
pub fn has_frame_suffix(name: &str) -> bool {
    name.len() > FRAME_SUFFIX.len() && name.ends_with(FRAME_SUFFIX)
}

/// `dir` + one separator + `name`. A trailing separator on `dir` is kept
/// as given so sorting sees the same strings the caller passed in.
pub fn join_path(dir: &str, name: &str) -> String {
    let mut path = String::with_capacity(dir.len() + name.len() + 1);
    path.push_str(dir);
    path.push('/');
    path.push_str(name);
    path
}

/// Enumerate `dir` (non-recursive) and build the sorted catalog of frames.
///
/// Subdirectories (including symlinks to directories) and non-matching
/// names are skipped. Entries whose file type cannot be determined are
/// treated like files, as `readdir` would.
pub fn scan_dir(dir: &str) -> Result<Catalog> {
    let start = Instant::now();
    let enumerate_err = |source| VzipError::Enumerate {
        path: dir.to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(Path::new(dir)).map_err(enumerate_err)? {
        let entry = entry.map_err(enumerate_err)?;

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            warn!(name = ?name, "skipping non UTF-8 file name");
            continue;
        };
        if !has_frame_suffix(name) {
            continue;
        }
        if is_directory(&entry) {
            debug!(name, "skipping directory with frame suffix");
            continue;
        }
        paths.push(join_path(dir, name));
    }

    let catalog = Catalog::from_paths(paths);
    info!(dir, frames = catalog.len(), elapsed_ms = start.elapsed().as_millis() as u64, "catalog built");
    Ok(catalog)
}

/// Follows symlinks; a dangling link falls back to the entry's own type.
fn is_directory(entry: &fs::DirEntry) -> bool {
    match fs::metadata(entry.path()) {
        Ok(meta) => meta.is_dir(),
        Err(_) => entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false),
    }
}
