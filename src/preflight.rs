//! Precondition checks run before anything touches the filesystem.
//!
//! The converter toolchain is a handful of loose files dropped next to the
//! tool (an executable and the libraries it loads). Only their presence is
//! checked; versions and contents are the converter's problem.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PreflightError {
    #[error("The following required files are missing:\n{}", format_missing(.0))]
    MissingFiles(Vec<String>),
    #[error("{} folder doesn't exist", .0.display())]
    MissingDirectory(PathBuf),
}

fn format_missing(files: &[String]) -> String {
    files
        .iter()
        .map(|f| format!("- {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Presence of one required file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    pub name: String,
    pub present: bool,
}

/// Check each required file relative to `root`, preserving the input order.
pub fn check_files(root: &Path, files: &[String]) -> Vec<FileCheck> {
    files
        .iter()
        .map(|name| FileCheck {
            name: name.clone(),
            present: root.join(name).exists(),
        })
        .collect()
}

/// Names from `files` that do not exist under `root`.
pub fn missing_files(root: &Path, files: &[String]) -> Vec<String> {
    check_files(root, files)
        .into_iter()
        .filter(|c| !c.present)
        .map(|c| c.name)
        .collect()
}

/// Turn a set of file checks into an error if anything is missing.
pub fn require_files(checks: &[FileCheck]) -> Result<(), PreflightError> {
    let missing: Vec<String> = checks
        .iter()
        .filter(|c| !c.present)
        .map(|c| c.name.clone())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PreflightError::MissingFiles(missing))
    }
}

/// Fail unless `dir` exists.
pub fn check_directory(dir: &Path) -> Result<(), PreflightError> {
    if dir.exists() {
        Ok(())
    } else {
        Err(PreflightError::MissingDirectory(dir.to_path_buf()))
    }
}
