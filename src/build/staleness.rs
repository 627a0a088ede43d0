// src/build/staleness.rs

use std::path::Path;
use std::time::SystemTime;

use crate::errors::Result;
use crate::fs::FileSystem;

/// An output is up to date when it exists and was modified no earlier than
/// its source. Equal timestamps count as up to date.
pub fn is_up_to_date(
    fs: &dyn FileSystem,
    source_modified: SystemTime,
    destination: &Path,
) -> Result<bool> {
    if !fs.exists(destination) {
        return Ok(false);
    }
    Ok(fs.modified(destination)? >= source_modified)
}
