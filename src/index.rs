//! Spray index: Steam ID → spray files, built from converted filenames.
//!
//! The game server names every uploaded spray `<steamid>_<spray>.vtf`, and
//! the converter keeps that stem, so the JPEG directory already encodes the
//! ownership. Aggregation is just a split on the delimiter:
//!
//! ```text
//! sr_sprays_jpg/                       sr_sprays_api.json
//! ├── 76561198000000001_a1b2.jpg   →   {
//! ├── 76561198000000001_c3d4.jpg         "76561198000000001": ["a1b2.jpg", "c3d4.jpg"],
//! ├── 76561198000000002_e5f6.jpg         "76561198000000002": ["e5f6.jpg"]
//! └── readme.jpg          (skipped)    }
//! ```
//!
//! ## Skipped names
//!
//! A filename contributes only if it splits into exactly two parts. Names
//! with no delimiter, or with more than one, are dropped without error:
//! they are not spray uploads, and the index should not guess at which
//! delimiter separates the owner.
//!
//! ## Ordering
//!
//! Owners are kept in a `BTreeMap`, so the JSON keys come out sorted and the
//! file is byte-for-byte stable for an unchanged directory. Within an owner,
//! items keep the order the directory listing produced them in. Duplicates
//! are kept.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("error creating spray files directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error reading spray files in {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error creating output file {}: {source}", path.display())]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error encoding sprays to JSON: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("error parsing spray index: {0}")]
    Decode(serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Spray files grouped by owning Steam ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SprayIndex(BTreeMap<String, Vec<String>>);

impl SprayIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` to `owner`'s list, creating the list on first use.
    pub fn insert(&mut self, owner: &str, item: &str) {
        self.0
            .entry(owner.to_string())
            .or_default()
            .push(item.to_string());
    }

    pub fn get(&self, owner: &str) -> Option<&[String]> {
        self.0.get(owner).map(Vec::as_slice)
    }

    /// Number of distinct owners.
    pub fn owner_count(&self) -> usize {
        self.0.len()
    }

    /// Total number of items across all owners.
    pub fn item_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for SprayIndex {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

/// Split `name` into `(owner, item)` if it has exactly one `delimiter`.
///
/// Empty parts are allowed: `"_x.jpg"` yields `("", "x.jpg")`.
pub fn split_name<'a>(name: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    let mut parts = name.split(delimiter);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(item), None) => Some((owner, item)),
        _ => None,
    }
}

/// Group names into an index, in iteration order, skipping names that do not split in two.
pub fn group_names<I, S>(names: I, delimiter: &str) -> SprayIndex
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index = SprayIndex::new();
    for name in names {
        if let Some((owner, item)) = split_name(name.as_ref(), delimiter) {
            index.insert(owner, item);
        }
    }
    index
}

/// Build the index from the direct file children of `dir`.
///
/// The directory is created if missing so an empty conversion still yields
/// an (empty) index. Subdirectories and names that are not valid UTF-8 are
/// skipped.
pub fn build_index(dir: &Path, delimiter: &str) -> Result<SprayIndex, IndexError> {
    fs::create_dir_all(dir).map_err(|source| IndexError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let read_err = |source| IndexError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_type().map_err(read_err)?.is_dir() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(group_names(names, delimiter))
}

/// Create or truncate `path` and write `index` to it as a JSON object.
pub fn write_index(index: &SprayIndex, path: &Path, pretty: bool) -> Result<(), IndexError> {
    let file = File::create(path).map_err(|source| IndexError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, index)?;
    } else {
        serde_json::to_writer(&mut writer, index)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read an index previously written by [`write_index`].
pub fn read_index(path: &Path) -> Result<SprayIndex, IndexError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(IndexError::Decode)
}
