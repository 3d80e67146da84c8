//! VTF → JPEG conversion through an external converter.
//!
//! The [`Converter`] trait is the single operation the pipeline needs: turn
//! every texture in one directory into an image in another. The production
//! implementation is [`VtfCmd`], which shells out to `VTFCmd.exe` and blocks
//! until it exits. Tests substitute a mock that never launches a process.
//!
//! The converter's stdout and stderr are inherited by the tool, so its own
//! progress output reaches the console unchanged. Only the exit status is
//! consumed: the batch either succeeded or it did not.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("error converting VTF files: could not start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },
    #[error("error converting VTF files: converter {status}")]
    Failed { status: ExitStatus },
    #[error("error converting VTF files: {0}")]
    Other(String),
}

/// Converts every texture in a source directory into a destination directory.
pub trait Converter {
    fn convert(&self, source: &Path, output: &Path) -> Result<(), ConvertError>;

    /// One-line description of what [`convert`](Self::convert) will do, for progress output.
    fn describe(&self, source: &Path, output: &Path) -> String {
        format!("{} -> {}", source.display(), output.display())
    }
}

/// The VTFCmd command-line converter.
///
/// Invoked as:
///
/// ```text
/// VTFCmd.exe -folder "<source>/*.vtf" -output "<output>" -exportformat jpg
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VtfCmd {
    pub program: PathBuf,
    pub pattern: String,
    pub export_format: String,
}

impl VtfCmd {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            pattern: "*.vtf".to_string(),
            export_format: "jpg".to_string(),
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_export_format(mut self, format: impl Into<String>) -> Self {
        self.export_format = format.into();
        self
    }

    /// Argument list for converting `source` into `output`.
    pub fn args(&self, source: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-folder".into(),
            source.join(&self.pattern).into_os_string(),
            "-output".into(),
            output.as_os_str().to_os_string(),
            "-exportformat".into(),
            self.export_format.clone().into(),
        ]
    }

    /// Human-readable command line, quoted the way a shell user would type it.
    pub fn command_line(&self, source: &Path, output: &Path) -> String {
        format!(
            "{} -folder \"{}\" -output \"{}\" -exportformat {}",
            self.program.display(),
            source.join(&self.pattern).display(),
            output.display(),
            self.export_format
        )
    }
}

impl Converter for VtfCmd {
    fn convert(&self, source: &Path, output: &Path) -> Result<(), ConvertError> {
        let status = Command::new(&self.program)
            .args(self.args(source, output))
            .status()
            .map_err(|source| ConvertError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ConvertError::Failed { status })
        }
    }

    fn describe(&self, source: &Path, output: &Path) -> String {
        self.command_line(source, output)
    }
}
