//! The five-stage build sequence.
//!
//! ```text
//! 1. Preflight   required files + source dir   (no side effects)
//! 2. Cleanup     drop output if source outgrew it
//! 3. Convert     VTFCmd: source/*.vtf → output/*.jpg
//! 4. Aggregate   output filenames → SprayIndex
//! 5. Emit        SprayIndex → JSON file
//! ```
//!
//! Stages run strictly in order and the first error ends the run. Nothing is
//! rolled back: a failed emit can leave a truncated JSON file behind.
//!
//! Progress is reported through a caller-supplied event sink rather than
//! printed directly, so the CLI decides how it looks (see
//! [`output::format_event`](crate::output::format_event)) and tests can
//! assert on exactly what happened.

use crate::cleanup::{self, CleanupOutcome};
use crate::config::{IndexConfig, ResolvedPaths};
use crate::converter::{ConvertError, Converter};
use crate::index::{self, IndexError};
use crate::preflight::{self, FileCheck, PreflightError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Preflight(#[from] PreflightError),
    #[error("error cleaning stale output {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preflight,
    Cleanup,
    Convert,
    Aggregate,
    Emit,
}

impl Stage {
    pub fn number(self) -> usize {
        match self {
            Stage::Preflight => 1,
            Stage::Cleanup => 2,
            Stage::Convert => 3,
            Stage::Aggregate => 4,
            Stage::Emit => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Preflight => "Checking required files",
            Stage::Cleanup => "Checking for stale output",
            Stage::Convert => "Converting VTF files",
            Stage::Aggregate => "Processing spray files",
            Stage::Emit => "Writing spray index",
        }
    }
}

/// Progress reported while the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    StageStarted(Stage),
    FileChecked(FileCheck),
    DirectoryChecked { path: PathBuf, present: bool },
    Cleanup(CleanupOutcome),
    Converting { description: String },
    Converted,
    Indexed { owners: usize, items: usize },
    Written { path: PathBuf },
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// `None` when the cleanup stage was not part of the run.
    pub cleanup: Option<CleanupOutcome>,
    pub owners: usize,
    pub items: usize,
    pub index_file: PathBuf,
}

/// Stage 1: required files, then the source directory.
///
/// Every file is reported before failing, so one run lists everything that
/// is missing.
pub fn check(
    paths: &ResolvedPaths,
    on_event: &mut dyn FnMut(PipelineEvent),
) -> Result<(), PipelineError> {
    on_event(PipelineEvent::StageStarted(Stage::Preflight));
    let checks = preflight::check_files(&paths.root, &paths.required_files);
    for check in &checks {
        on_event(PipelineEvent::FileChecked(check.clone()));
    }
    preflight::require_files(&checks)?;

    let result = preflight::check_directory(&paths.source_dir);
    on_event(PipelineEvent::DirectoryChecked {
        path: paths.source_dir.clone(),
        present: result.is_ok(),
    });
    result?;
    Ok(())
}

/// Run all five stages.
pub fn run(
    paths: &ResolvedPaths,
    settings: &IndexConfig,
    converter: &dyn Converter,
    on_event: &mut dyn FnMut(PipelineEvent),
) -> Result<RunSummary, PipelineError> {
    check(paths, on_event)?;

    on_event(PipelineEvent::StageStarted(Stage::Cleanup));
    let outcome = cleanup::clean_stale_output(&paths.source_dir, &paths.output_dir).map_err(
        |source| PipelineError::Cleanup {
            path: paths.output_dir.clone(),
            source,
        },
    )?;
    on_event(PipelineEvent::Cleanup(outcome));

    on_event(PipelineEvent::StageStarted(Stage::Convert));
    on_event(PipelineEvent::Converting {
        description: converter.describe(&paths.source_dir, &paths.output_dir),
    });
    converter.convert(&paths.source_dir, &paths.output_dir)?;
    on_event(PipelineEvent::Converted);

    let mut summary = reindex(paths, settings, on_event)?;
    summary.cleanup = Some(outcome);
    Ok(summary)
}

/// Stages 4 and 5 only: rebuild the JSON from whatever is already in the output directory.
pub fn reindex(
    paths: &ResolvedPaths,
    settings: &IndexConfig,
    on_event: &mut dyn FnMut(PipelineEvent),
) -> Result<RunSummary, PipelineError> {
    on_event(PipelineEvent::StageStarted(Stage::Aggregate));
    let sprays = index::build_index(&paths.output_dir, &settings.delimiter)?;
    let owners = sprays.owner_count();
    let items = sprays.item_count();
    on_event(PipelineEvent::Indexed { owners, items });

    on_event(PipelineEvent::StageStarted(Stage::Emit));
    index::write_index(&sprays, &paths.index_file, settings.pretty)?;
    on_event(PipelineEvent::Written {
        path: paths.index_file.clone(),
    });

    Ok(RunSummary {
        cleanup: None,
        owners,
        items,
        index_file: paths.index_file.clone(),
    })
}
