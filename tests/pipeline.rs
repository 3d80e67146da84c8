//! End-to-end pipeline runs against temporary directories.
//!
//! The converter is replaced by a fake that drops pre-named JPEGs into the
//! output directory, so these tests exercise every stage except the real
//! VTFCmd process.

use spray_index::config::{IndexConfig, ResolvedPaths, SprayConfig};
use spray_index::converter::{ConvertError, Converter};
use spray_index::index::read_index;
use spray_index::pipeline::{self, PipelineError};
use spray_index::preflight::PreflightError;
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Writes a fixed set of filenames into the output directory.
struct FakeConverter {
    outputs: Vec<&'static str>,
    runs: Cell<usize>,
}

impl FakeConverter {
    fn new(outputs: &[&'static str]) -> Self {
        Self {
            outputs: outputs.to_vec(),
            runs: Cell::new(0),
        }
    }
}

impl Converter for FakeConverter {
    fn convert(&self, _source: &Path, output: &Path) -> Result<(), ConvertError> {
        self.runs.set(self.runs.get() + 1);
        fs::create_dir_all(output).map_err(|e| ConvertError::Other(e.to_string()))?;
        for name in &self.outputs {
            fs::write(output.join(name), b"\xff\xd8\xff\xe0")
                .map_err(|e| ConvertError::Other(e.to_string()))?;
        }
        Ok(())
    }
}

fn setup_root(config: &SprayConfig) -> (TempDir, ResolvedPaths) {
    let tmp = TempDir::new().unwrap();
    for name in &config.required_files {
        fs::write(tmp.path().join(name), b"MZ").unwrap();
    }
    let paths = ResolvedPaths::resolve(config, tmp.path());
    fs::create_dir_all(&paths.source_dir).unwrap();
    for name in ["alice_sunset.vtf", "alice_forest.vtf", "bob_logo.vtf"] {
        fs::write(paths.source_dir.join(name), vec![1u8; 32]).unwrap();
    }
    (tmp, paths)
}

fn sorted_items(index: &spray_index::index::SprayIndex, owner: &str) -> Vec<String> {
    let mut items = index.get(owner).unwrap_or_default().to_vec();
    items.sort();
    items
}

#[test]
fn converted_sprays_are_indexed_by_owner() {
    let config = SprayConfig::default();
    let (_tmp, paths) = setup_root(&config);
    let converter = FakeConverter::new(&["alice_sunset.jpg", "alice_forest.jpg", "bob_logo.jpg"]);

    let summary = pipeline::run(&paths, &config.index, &converter, &mut |_| {}).unwrap();

    assert_eq!(converter.runs.get(), 1);
    assert_eq!((summary.owners, summary.items), (2, 3));

    let index = read_index(&paths.index_file).unwrap();
    assert_eq!(index.owner_count(), 2);
    assert_eq!(sorted_items(&index, "alice"), vec!["forest.jpg", "sunset.jpg"]);
    assert_eq!(sorted_items(&index, "bob"), vec!["logo.jpg"]);
}

#[test]
fn malformed_names_are_left_out() {
    let config = SprayConfig::default();
    let (_tmp, paths) = setup_root(&config);
    let converter = FakeConverter::new(&[
        "111_1.jpg",
        "111_2.jpg",
        "222_5.jpg",
        "badname.jpg",
        "333_two_parts.jpg",
    ]);

    pipeline::run(&paths, &config.index, &converter, &mut |_| {}).unwrap();

    let index = read_index(&paths.index_file).unwrap();
    assert_eq!(index.owner_count(), 2);
    assert_eq!(sorted_items(&index, "111"), vec!["1.jpg", "2.jpg"]);
    assert_eq!(sorted_items(&index, "222"), vec!["5.jpg"]);
    assert!(index.get("badname.jpg").is_none());
    assert!(index.get("333").is_none());
}

#[test]
fn missing_support_file_aborts_before_any_side_effect() {
    let config = SprayConfig::default();
    let (tmp, paths) = setup_root(&config);
    fs::remove_file(tmp.path().join("HLLib.dll")).unwrap();
    let converter = FakeConverter::new(&["alice_sunset.jpg"]);

    let err = pipeline::run(&paths, &config.index, &converter, &mut |_| {}).unwrap_err();

    match err {
        PipelineError::Preflight(PreflightError::MissingFiles(missing)) => {
            assert_eq!(missing, vec!["HLLib.dll"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(converter.runs.get(), 0);
    assert!(!paths.output_dir.exists());
    assert!(!paths.index_file.exists());
}

#[test]
fn second_run_produces_identical_json() {
    let config = SprayConfig::default();
    let (_tmp, paths) = setup_root(&config);
    let converter = FakeConverter::new(&["b_2.jpg", "a_1.jpg", "b_1.jpg", "c_9.jpg"]);

    pipeline::run(&paths, &config.index, &converter, &mut |_| {}).unwrap();
    let first = fs::read(&paths.index_file).unwrap();
    pipeline::reindex(&paths, &config.index, &mut |_| {}).unwrap();
    let second = fs::read(&paths.index_file).unwrap();

    assert_eq!(first, second);
}

#[test]
fn config_file_redirects_every_location() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("spray-index.toml");
    fs::write(
        &config_path,
        r#"
required_files = ["vtfcmd"]

[paths]
source = "uploads/vtf"
output = "jpg"
index = "public/sprays.json"

[index]
delimiter = "-"
pretty = true
"#,
    )
    .unwrap();
    let config = spray_index::config::load_config(&config_path).unwrap();
    fs::write(tmp.path().join("vtfcmd"), b"").unwrap();
    fs::create_dir_all(tmp.path().join("uploads/vtf")).unwrap();
    fs::create_dir_all(tmp.path().join("public")).unwrap();
    let paths = ResolvedPaths::resolve(&config, tmp.path());
    let converter = FakeConverter::new(&["42-a.jpg", "42_b.jpg"]);

    pipeline::run(&paths, &config.index, &converter, &mut |_| {}).unwrap();

    assert!(tmp.path().join("uploads/jpg/42-a.jpg").exists());
    let json = fs::read_to_string(tmp.path().join("public/sprays.json")).unwrap();
    assert_eq!(json, "{\n  \"42\": [\n    \"a.jpg\"\n  ]\n}\n");
}

#[test]
fn unwritable_index_location_is_an_index_error() {
    let mut config = SprayConfig::default();
    config.paths.index = "no/such/dir/out.json".to_string();
    let (_tmp, paths) = setup_root(&config);
    let converter = FakeConverter::new(&["alice_sunset.jpg"]);

    let err = pipeline::run(&paths, &config.index, &converter, &mut |_| {}).unwrap_err();
    assert!(matches!(err, PipelineError::Index(_)));
    assert!(err.to_string().starts_with("error creating output file"));
}

#[test]
fn reindex_of_empty_output_writes_empty_object() {
    let tmp = TempDir::new().unwrap();
    let paths = ResolvedPaths::resolve(&SprayConfig::default(), tmp.path());

    let summary = pipeline::reindex(&paths, &IndexConfig::default(), &mut |_| {}).unwrap();

    assert_eq!((summary.owners, summary.items), (0, 0));
    assert!(paths.output_dir.is_dir());
    assert_eq!(fs::read_to_string(&paths.index_file).unwrap(), "{}\n");
}
