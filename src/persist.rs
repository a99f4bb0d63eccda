//! Persistence Boundary
//!
//! Whole-file load and save. No streaming, no partial-write recovery: a save
//! interrupted mid-write leaves a truncated file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::error::{Result, StoreError};

/// Read the entire file at `path`
pub fn load_file(path: &Path) -> Result<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded store file");
            Ok(bytes)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(StoreError::FileRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replace the file at `path` with `bytes`, optionally fsyncing it
pub fn save_file(path: &Path, bytes: &[u8], sync: bool) -> Result<()> {
    write_all(path, bytes, sync).map_err(|source| StoreError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), sync, "saved store file");
    Ok(())
}

fn write_all(path: &Path, bytes: &[u8], sync: bool) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}
