//! Tool configuration module.
//!
//! Handles loading, validating, and resolving `spray-index.toml`. Every value
//! has a stock default, so the file is optional: with no config at all the
//! tool looks for the VTFCmd toolchain in the working directory, converts
//! `sr_sprays/` into the sibling `sr_sprays_jpg/`, and writes
//! `sr_sprays_api.json`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! required_files = ["VTFLib.dll", "VTFCmd.exe", "HLLib.dll", "DevIL.dll"]
//!
//! [paths]
//! source = "sr_sprays"          # VTF input directory
//! output = "sr_sprays_jpg"      # JPEG output directory (sibling of source)
//! index = "sr_sprays_api.json"  # JSON index file
//!
//! [converter]
//! program = "VTFCmd.exe"
//! pattern = "*.vtf"
//! export_format = "jpg"
//!
//! [index]
//! delimiter = "_"               # Splits `<steamid>_<spray>` filenames
//! pretty = false                # Indent the JSON output
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `spray-index.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SprayConfig {
    /// Support files that must exist in the root directory before anything runs.
    pub required_files: Vec<String>,
    /// Input and output locations.
    pub paths: PathsConfig,
    /// External converter invocation.
    pub converter: ConverterConfig,
    /// Filename aggregation and JSON emission.
    pub index: IndexConfig,
}

impl Default for SprayConfig {
    fn default() -> Self {
        Self {
            required_files: vec![
                "VTFLib.dll".to_string(),
                "VTFCmd.exe".to_string(),
                "HLLib.dll".to_string(),
                "DevIL.dll".to_string(),
            ],
            paths: PathsConfig::default(),
            converter: ConverterConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

impl SprayConfig {
    /// Validate that no value is empty where an empty value would make a stage meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_empty = [
            ("paths.source", &self.paths.source),
            ("paths.output", &self.paths.output),
            ("paths.index", &self.paths.index),
            ("converter.program", &self.converter.program),
            ("converter.pattern", &self.converter.pattern),
            ("converter.export_format", &self.converter.export_format),
            ("index.delimiter", &self.index.delimiter),
        ];
        for (key, value) in non_empty {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.required_files.iter().any(|f| f.is_empty()) {
            return Err(ConfigError::Validation(
                "required_files entries must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory holding the `.vtf` spray textures, relative to the root.
    pub source: String,
    /// Directory the converter writes JPEGs to. A relative path is resolved
    /// next to the source directory, not under the root.
    pub output: String,
    /// JSON index file, relative to the root.
    pub index: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: "sr_sprays".to_string(),
            output: "sr_sprays_jpg".to_string(),
            index: "sr_sprays_api.json".to_string(),
        }
    }
}

/// External converter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Converter executable, relative to the root.
    pub program: String,
    /// Glob handed to the converter's `-folder` flag, appended to the source directory.
    pub pattern: String,
    /// Value of the converter's `-exportformat` flag.
    pub export_format: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "VTFCmd.exe".to_string(),
            pattern: "*.vtf".to_string(),
            export_format: "jpg".to_string(),
        }
    }
}

/// Aggregation and emission settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Separator between the owner and item parts of a converted filename.
    pub delimiter: String,
    /// Write indented JSON instead of a single line.
    pub pretty: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            delimiter: "_".to_string(),
            pretty: false,
        }
    }
}

/// Concrete filesystem locations derived from a [`SprayConfig`] and a root directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPaths {
    pub root: PathBuf,
    pub required_files: Vec<String>,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub index_file: PathBuf,
    pub converter: PathBuf,
}

impl ResolvedPaths {
    /// Resolve every configured path against `root`.
    ///
    /// The output directory is joined onto the source directory's parent so
    /// the two stay siblings wherever the source lives.
    pub fn resolve(config: &SprayConfig, root: &Path) -> Self {
        let source_dir = root.join(&config.paths.source);
        let output_dir = source_dir
            .parent()
            .unwrap_or(root)
            .join(&config.paths.output);
        Self {
            root: root.to_path_buf(),
            required_files: config.required_files.clone(),
            source_dir,
            output_dir,
            index_file: root.join(&config.paths.index),
            converter: root.join(&config.converter.program),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SprayConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SprayConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SprayConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<SprayConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `spray-index.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# spray-index configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Files that must exist in the root directory before anything runs.
# Only their presence is checked.
required_files = ["VTFLib.dll", "VTFCmd.exe", "HLLib.dll", "DevIL.dll"]

# ---------------------------------------------------------------------------
# Locations
# ---------------------------------------------------------------------------
[paths]
# Directory holding the .vtf spray textures.
source = "sr_sprays"
# Directory the converter writes JPEGs to. Relative paths are placed next to
# the source directory. It is deleted and rebuilt when the source directory
# grows larger than it.
output = "sr_sprays_jpg"
# JSON index mapping each Steam ID to its spray files. Overwritten every run.
index = "sr_sprays_api.json"

# ---------------------------------------------------------------------------
# External converter
# ---------------------------------------------------------------------------
[converter]
# Converter executable, relative to the root directory.
program = "VTFCmd.exe"
# Glob passed to -folder, appended to the source directory.
pattern = "*.vtf"
# Value passed to -exportformat.
export_format = "jpg"

# ---------------------------------------------------------------------------
# Index
# ---------------------------------------------------------------------------
[index]
# Converted files are named <steamid><delimiter><spray>. Names that do not
# split into exactly two parts are skipped.
delimiter = "_"
# Indent the JSON output.
pretty = false
"##
}
