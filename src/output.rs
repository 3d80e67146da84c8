//! CLI output formatting for all pipeline stages.
//!
//! Every line the tool prints comes from here. Each stage reports through
//! [`PipelineEvent`]s; [`format_event`] turns one event into display lines
//! and [`print_event`] writes them to stdout. Format functions are pure (no
//! I/O, no side effects) so the exact wording is unit-tested.
//!
//! # Output Format
//!
//! ```text
//! ==> Stage 1: Checking required files
//!     ok: VTFLib.dll
//!     ok: VTFCmd.exe
//!     ok: HLLib.dll
//!     ok: DevIL.dll
//!     ok: sr_sprays/
//! ==> Stage 2: Checking for stale output
//!     Removed stale output (source 48.0 KiB > output 12.5 KiB)
//! ==> Stage 3: Converting VTF files
//!     Running command: VTFCmd.exe -folder "sr_sprays/*.vtf" -output "sr_sprays_jpg" -exportformat jpg
//!     Conversion success
//! ==> Stage 4: Processing spray files
//!     3 sprays from 2 Steam IDs
//! ==> Stage 5: Writing spray index
//!     Wrote sr_sprays_api.json
//! ==> Done: 3 sprays, 2 Steam IDs → sr_sprays_api.json
//! ```

use crate::cleanup::CleanupOutcome;
use crate::pipeline::{PipelineEvent, RunSummary};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte size, binary units.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// `"1 spray"` / `"3 sprays"`.
fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Directory path with a trailing slash, the way scan output shows folders.
fn dir_display(path: &Path) -> String {
    format!("{}/", path.display())
}

fn format_cleanup(outcome: &CleanupOutcome) -> String {
    match outcome {
        CleanupOutcome::NothingToClean => "Nothing to clean".to_string(),
        CleanupOutcome::Kept {
            source_bytes,
            output_bytes,
        } => format!(
            "Output up to date (source {} <= output {})",
            format_bytes(*source_bytes),
            format_bytes(*output_bytes)
        ),
        CleanupOutcome::Removed {
            source_bytes,
            output_bytes,
        } => format!(
            "Removed stale output (source {} > output {})",
            format_bytes(*source_bytes),
            format_bytes(*output_bytes)
        ),
    }
}

/// Format a single pipeline event as display lines.
pub fn format_event(event: &PipelineEvent) -> Vec<String> {
    let body = match event {
        PipelineEvent::StageStarted(stage) => {
            return vec![format!("==> Stage {}: {}", stage.number(), stage.title())];
        }
        PipelineEvent::FileChecked(check) if check.present => format!("ok: {}", check.name),
        PipelineEvent::FileChecked(check) => format!("missing: {}", check.name),
        PipelineEvent::DirectoryChecked { path, present } => {
            let status = if *present { "ok" } else { "missing" };
            format!("{}: {}", status, dir_display(path))
        }
        PipelineEvent::Cleanup(outcome) => format_cleanup(outcome),
        PipelineEvent::Converting { description } => format!("Running command: {description}"),
        PipelineEvent::Converted => "Conversion success".to_string(),
        PipelineEvent::Indexed { owners, items } => format!(
            "{} from {}",
            plural(*items, "spray", "sprays"),
            plural(*owners, "Steam ID", "Steam IDs")
        ),
        PipelineEvent::Written { path } => format!("Wrote {}", path.display()),
    };
    vec![format!("{}{}", indent(1), body)]
}

/// Format the closing line of a successful run.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    vec![format!(
        "==> Done: {}, {} → {}",
        plural(summary.items, "spray", "sprays"),
        plural(summary.owners, "Steam ID", "Steam IDs"),
        summary.index_file.display()
    )]
}

pub fn print_event(event: &PipelineEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}
