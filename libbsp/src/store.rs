//! Reading and replacing map files on disk.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::error::{BspError, Result};

pub fn read_map(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path).map_err(|e| BspError::io(path, e))?;
    debug!("read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

/// Replaces `path` with `data`.
///
/// The bytes go to a temporary file next to the target which is renamed over
/// it once fully written and synced, so readers see either the old or the new
/// file and a failure leaves the original in place. An existing file keeps its
/// permissions.
pub fn write_map_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| BspError::io(dir, e))?;
    tmp.write_all(data)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| BspError::io(tmp.path(), e))?;
    match fs::metadata(path) {
        Ok(meta) => tmp
            .as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| BspError::io(tmp.path(), e))?,
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(BspError::io(path, e)),
    }
    tmp.persist(path).map_err(|e| BspError::io(path, e.error))?;

    debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
