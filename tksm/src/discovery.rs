//! Word-file discovery.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Files in `dir` whose name starts with `prefix` and ends with
/// `extension`, sorted by file name. A later file's numbered entry takes
/// its slot from an earlier file's phrase, so the order is part of the
/// result.
pub fn word_files(dir: &Path, prefix: &str, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(prefix) && name.ends_with(extension) {
            found.push(entry.path());
        }
    }
    found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(count = found.len(), dir = %dir.display(), "word files");
    Ok(found)
}
