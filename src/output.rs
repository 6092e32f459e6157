//! Result of a successful conversion.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What [`crate::convert::convert`] returns on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Absolute path of the source presentation.
    pub input_path: PathBuf,
    /// Absolute path of the PDF on disk.
    pub output_path: PathBuf,
    /// The exact argument vector executed, program first.
    pub command: Vec<String>,
    /// Captured standard output of the rendering tool (may be empty).
    pub stdout: String,
    /// Captured standard error of the rendering tool (may be empty).
    pub stderr: String,
}

impl ConversionResult {
    /// The command as a single shell-like line, for logs.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}
