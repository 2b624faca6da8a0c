use anyhow::{Context, Result};
use glob::Pattern;
use std::fs;
use std::path::Path;

/// True if any pattern matches the full path or just its last component.
pub fn is_path_excluded(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let full = path.to_string_lossy();
    let name = path.file_name().map(|n| n.to_string_lossy());
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&full) || name.as_deref().is_some_and(|n| pattern.matches(n))
    })
}

/// Read a text file, replacing invalid UTF-8 sequences.
///
/// Collaborator lists are pasted from word processors and spreadsheets, so
/// stray Latin-1 bytes are common and must not abort a batch.
pub fn read_text_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
