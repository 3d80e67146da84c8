//! Stale-output invalidation for the converted JPEG directory.
//!
//! The converter never removes anything it wrote on a previous run, so the
//! output directory is thrown away and rebuilt whenever the source textures
//! outgrow it. The check is a plain byte-total comparison:
//!
//! - source total > output total: the output is stale, delete it recursively
//! - otherwise: keep it
//!
//! This is a coarse heuristic. A source folder whose content changes without
//! growing keeps its old output, and a source that compresses poorly to JPEG
//! can trigger a rebuild on every run. Both are accepted.

use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// What the cleanup stage decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Source or output directory is absent.
    NothingToClean,
    /// Output is at least as large as the source and was left in place.
    Kept { source_bytes: u64, output_bytes: u64 },
    /// Source outgrew the output, which was deleted.
    Removed { source_bytes: u64, output_bytes: u64 },
}

/// Total size in bytes of every regular file under `dir`, recursively.
///
/// Symlinks are not followed.
pub fn dir_size(dir: &Path) -> io::Result<u64> {
    let mut total = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            total += entry.metadata()?.len();
        }
    }
    Ok(total)
}

/// Delete `output` when the total size of `source` exceeds it.
pub fn clean_stale_output(source: &Path, output: &Path) -> io::Result<CleanupOutcome> {
    if !source.is_dir() || !output.is_dir() {
        return Ok(CleanupOutcome::NothingToClean);
    }
    let source_bytes = dir_size(source)?;
    let output_bytes = dir_size(output)?;
    if source_bytes > output_bytes {
        std::fs::remove_dir_all(output)?;
        Ok(CleanupOutcome::Removed {
            source_bytes,
            output_bytes,
        })
    } else {
        Ok(CleanupOutcome::Kept {
            source_bytes,
            output_bytes,
        })
    }
}
