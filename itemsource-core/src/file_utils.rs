//! File utility functions.

use crate::error::{ItemSourceError, Result};
use std::io::Write;
use std::path::Path;

/// Read file as UTF-8. A leading BOM is stripped; invalid sequences are an error.
pub fn read_utf8_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ItemSourceError::NotFound(format!(
            "Input file not found: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
    if had_errors {
        return Err(ItemSourceError::Parse(format!(
            "Invalid UTF-8 in {}",
            path.display()
        )));
    }
    Ok(text.into_owned())
}

/// Write `text` to `path`, replacing any existing file.
///
/// The text goes to a temporary file next to `path` which is then renamed
/// over it, so `path` holds either the old or the complete new contents.
pub fn write_utf8_file(path: &Path, text: &str) -> Result<()> {
    let write_err = |e: std::io::Error| {
        ItemSourceError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write {}: {}", path.display(), e),
        ))
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
