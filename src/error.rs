//! Error types for the ppt2pdf library.
//!
//! Every failure of [`crate::convert::convert`] is a [`Ppt2PdfError`]. The
//! variants carry their diagnostics as data (exit code, captured streams,
//! the exact command, attempted paths) so callers can branch on them, while
//! the `Display` text stays ready to show to an end user.
//!
//! Several variants describe the same broad failure. [`Ppt2PdfError::kind`]
//! collapses them into the coarse [`ErrorKind`] taxonomy:
//!
//! | Kind | Variants |
//! |------|----------|
//! | `InputMissing` | [`Ppt2PdfError::InputMissing`] |
//! | `ExecutableNotFound` | [`Ppt2PdfError::ExecutableNotFound`] |
//! | `ConversionFailed` | [`Ppt2PdfError::ProcessFailed`], [`Ppt2PdfError::TimedOut`], [`Ppt2PdfError::NoOutput`] |
//! | `OutputPlacementFailed` | [`Ppt2PdfError::OutputPlacementFailed`] |
//! | `InvalidConfig` | [`Ppt2PdfError::InvalidConfig`] |
//! | `Io` | [`Ppt2PdfError::SpawnFailed`], [`Ppt2PdfError::Io`] |

use serde::Serialize;
use soffice_locate::LocateError;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the ppt2pdf library.
#[derive(Debug, Error)]
pub enum Ppt2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input path does not exist or is not a regular file.
    #[error("Input file does not exist: '{}'\nCheck the path points at a .ppt or .pptx file.", .path.display())]
    InputMissing { path: PathBuf },

    // ── Executable errors ─────────────────────────────────────────────────
    /// The rendering tool could not be located.
    #[error(transparent)]
    ExecutableNotFound(#[from] LocateError),

    // ── Conversion errors ─────────────────────────────────────────────────
    /// LibreOffice exited with a non-zero status, or was killed by a signal
    /// (`code` is `None` in that case).
    #[error(
        "LibreOffice failed to convert the presentation ({}).\nCommand: {}\n{}",
        exit_label(.code),
        .command.join(" "),
        diagnostic(.stdout, .stderr)
    )]
    ProcessFailed {
        code: Option<i32>,
        command: Vec<String>,
        stdout: String,
        stderr: String,
    },

    /// LibreOffice did not finish within the configured bound and was killed.
    #[error(
        "LibreOffice timed out after {secs}s while converting the presentation.\nCommand: {}\n{}",
        .command.join(" "),
        diagnostic(.stdout, .stderr)
    )]
    TimedOut {
        secs: f64,
        command: Vec<String>,
        stdout: String,
        stderr: String,
    },

    /// LibreOffice exited zero but the expected PDF is not on disk.
    #[error(
        "LibreOffice reported success but no PDF was produced at '{}'.\nCommand: {}\nStdout: {}\nStderr: {}",
        .expected.display(),
        .command.join(" "),
        .stdout.trim_end(),
        .stderr.trim_end()
    )]
    NoOutput {
        expected: PathBuf,
        command: Vec<String>,
        stdout: String,
        stderr: String,
    },

    // ── Placement errors ──────────────────────────────────────────────────
    /// The produced PDF could not be moved to the requested output file.
    #[error("Failed to move '{}' to '{}': {source}", .from.display(), .to.display())]
    OutputPlacementFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Process errors ────────────────────────────────────────────────────
    /// The operating system refused to start the rendering tool.
    #[error("Failed to start '{}': {source}", .program.display())]
    SpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pass-through ──────────────────────────────────────────────────────
    /// Unanticipated filesystem error, surfaced unmodified.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Ppt2PdfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    InputMissing,
    ExecutableNotFound,
    ConversionFailed,
    OutputPlacementFailed,
    InvalidConfig,
    Io,
}

impl Ppt2PdfError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Ppt2PdfError::InputMissing { .. } => ErrorKind::InputMissing,
            Ppt2PdfError::ExecutableNotFound(_) => ErrorKind::ExecutableNotFound,
            Ppt2PdfError::ProcessFailed { .. }
            | Ppt2PdfError::TimedOut { .. }
            | Ppt2PdfError::NoOutput { .. } => ErrorKind::ConversionFailed,
            Ppt2PdfError::OutputPlacementFailed { .. } => ErrorKind::OutputPlacementFailed,
            Ppt2PdfError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Ppt2PdfError::SpawnFailed { .. } | Ppt2PdfError::Io(_) => ErrorKind::Io,
        }
    }

    /// `true` for the timeout flavour of `ConversionFailed`.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Ppt2PdfError::TimedOut { .. })
    }

    /// Exit code of the rendering tool, when it exited on its own.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Ppt2PdfError::ProcessFailed { code, .. } => *code,
            Ppt2PdfError::NoOutput { .. } => Some(0),
            _ => None,
        }
    }

    /// The command that was executed, for errors raised after spawning.
    pub fn command(&self) -> Option<&[String]> {
        match self {
            Ppt2PdfError::ProcessFailed { command, .. }
            | Ppt2PdfError::TimedOut { command, .. }
            | Ppt2PdfError::NoOutput { command, .. } => Some(command),
            _ => None,
        }
    }

    /// Captured standard output, for errors raised after spawning.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Ppt2PdfError::ProcessFailed { stdout, .. }
            | Ppt2PdfError::TimedOut { stdout, .. }
            | Ppt2PdfError::NoOutput { stdout, .. } => Some(stdout),
            _ => None,
        }
    }

    /// Captured standard error, for errors raised after spawning.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Ppt2PdfError::ProcessFailed { stderr, .. }
            | Ppt2PdfError::TimedOut { stderr, .. }
            | Ppt2PdfError::NoOutput { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "terminated by signal".to_string(),
    }
}

/// Prefer stderr; fall back to stdout when stderr is blank.
fn diagnostic(stdout: &str, stderr: &str) -> String {
    if !stderr.trim().is_empty() {
        format!("Stderr: {}", stderr.trim_end())
    } else if !stdout.trim().is_empty() {
        format!("Stdout: {}", stdout.trim_end())
    } else {
        "(no output captured)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd() -> Vec<String> {
        vec!["soffice".into(), "--convert-to".into(), "pdf".into()]
    }

    #[test]
    fn process_failed_prefers_stderr() {
        let e = Ppt2PdfError::ProcessFailed {
            code: Some(3),
            command: cmd(),
            stdout: "chatter".into(),
            stderr: "boom".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("exit code 3"), "got: {msg}");
        assert!(msg.contains("Stderr: boom"), "got: {msg}");
        assert!(!msg.contains("chatter"), "got: {msg}");
        assert!(msg.contains("soffice --convert-to pdf"), "got: {msg}");
        assert_eq!(e.kind(), ErrorKind::ConversionFailed);
        assert_eq!(e.exit_code(), Some(3));
    }

    #[test]
    fn process_failed_falls_back_to_stdout() {
        let e = Ppt2PdfError::ProcessFailed {
            code: Some(1),
            command: cmd(),
            stdout: "only stdout".into(),
            stderr: "  \n".into(),
        };
        assert!(e.to_string().contains("Stdout: only stdout"));
    }

    #[test]
    fn signal_death_display() {
        let e = Ppt2PdfError::ProcessFailed {
            code: None,
            command: cmd(),
            stdout: String::new(),
            stderr: String::new(),
        };
        let msg = e.to_string();
        assert!(msg.contains("terminated by signal"), "got: {msg}");
        assert!(msg.contains("(no output captured)"), "got: {msg}");
    }

    #[test]
    fn timeout_is_conversion_failure() {
        let e = Ppt2PdfError::TimedOut {
            secs: 1.5,
            command: cmd(),
            stdout: "partial".into(),
            stderr: String::new(),
        };
        assert!(e.is_timeout());
        assert_eq!(e.kind(), ErrorKind::ConversionFailed);
        assert!(e.to_string().contains("1.5s"));
        assert_eq!(e.stdout(), Some("partial"));
        assert_eq!(e.exit_code(), None);
    }

    #[test]
    fn no_output_shows_both_streams() {
        let e = Ppt2PdfError::NoOutput {
            expected: PathBuf::from("/tmp/deck.pdf"),
            command: cmd(),
            stdout: "out".into(),
            stderr: "err".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("no PDF was produced"), "got: {msg}");
        assert!(msg.contains("/tmp/deck.pdf"));
        assert!(msg.contains("Stdout: out") && msg.contains("Stderr: err"));
        assert_eq!(e.command().map(|c| c.len()), Some(3));
    }

    #[test]
    fn io_errors_pass_through_unchanged() {
        let inner = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e = Ppt2PdfError::from(inner);
        assert_eq!(e.kind(), ErrorKind::Io);
        assert_eq!(e.to_string(), "denied");
        match e {
            Ppt2PdfError::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::PermissionDenied),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn locate_errors_keep_their_message() {
        let inner = LocateError::ExplicitNotFound {
            path: PathBuf::from("/opt/missing/soffice"),
        };
        let text = inner.to_string();
        let e = Ppt2PdfError::from(inner);
        assert_eq!(e.kind(), ErrorKind::ExecutableNotFound);
        assert_eq!(e.to_string(), text);
    }
}
