/// Pages directory scanning
///
/// Walks a pages directory and produces the sorted, forward-slash relative
/// paths of every recognized page file, ready for the route tree builder.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::Conventions;

/// Collects the relative paths of all page files under `dir`.
///
/// Only files whose extension is listed in
/// [`Conventions::page_extensions`](crate::Conventions) are returned.
/// Paths are relative to `dir`, use forward slashes, and come back sorted
/// so that route compilation is deterministic across platforms.
pub fn scan_pages_dir(dir: impl AsRef<Path>, conventions: &Conventions) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry =
            entry.with_context(|| format!("Failed to read pages directory: {:?}", dir))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let recognized = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| conventions.recognizes_extension(ext))
            .unwrap_or(false);
        if !recognized {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(dir)
            .with_context(|| format!("Failed to relativize path: {:?}", entry.path()))?;
        paths.push(rel.to_string_lossy().replace('\\', "/"));
    }

    paths.sort();
    debug!(count = paths.len(), dir = %dir.display(), "scanned pages directory");

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_is_an_error() {
        let err = scan_pages_dir("definitely/not/a/real/dir", &Conventions::default());
        assert!(err.is_err());
    }
}
