//! Destination resolution: where the PDF must end up.
//!
//! LibreOffice only accepts an output *directory* and always names the PDF
//! after the input (`deck.pptx` → `deck.pdf`). When the caller asks for a
//! different file name, the orchestrator has to move the tool's file into
//! place afterwards. [`Destination`] records both paths so that decision is
//! made once, before anything is spawned.

use soffice_locate::expand_tilde;
use std::io;
use std::path::{Path, PathBuf};

/// The resolved output locations for one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Where the caller will find the PDF.
    pub output_path: PathBuf,
    /// Directory passed to `--outdir`; the parent of `output_path`.
    pub target_dir: PathBuf,
    /// Where LibreOffice itself writes: `target_dir/<input stem>.pdf`.
    pub tool_output: PathBuf,
}

impl Destination {
    /// `true` when the tool's file must be renamed to reach `output_path`.
    pub fn needs_rename(&self) -> bool {
        self.output_path != self.tool_output
    }
}

/// `<stem>.pdf` for an input path. Only the last extension is replaced.
pub fn pdf_file_name(input: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .unwrap_or(input.as_os_str())
        .to_os_string();
    name.push(".pdf");
    PathBuf::from(name)
}

/// Apply the precedence rule `output_file` > `output_dir` > beside the input.
///
/// `input` should already be absolute. Relative destinations are made
/// absolute against the current directory and `~` is expanded; no file or
/// directory is created or inspected.
pub fn resolve_destination(
    input: &Path,
    output_file: Option<&Path>,
    output_dir: Option<&Path>,
) -> io::Result<Destination> {
    let output_path = match (output_file, output_dir) {
        (Some(file), _) => absolute(file)?,
        (None, Some(dir)) => absolute(dir)?.join(pdf_file_name(input)),
        (None, None) => absolute(input)?.with_file_name(pdf_file_name(input)),
    };

    let target_dir = match output_path.parent() {
        Some(parent) => parent.to_path_buf(),
        None => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output path '{}' has no parent directory", output_path.display()),
            ))
        }
    };
    let tool_output = target_dir.join(pdf_file_name(input));

    Ok(Destination {
        output_path,
        target_dir,
        tool_output,
    })
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    std::path::absolute(expand_tilde(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_beside_input() {
        let d = resolve_destination(Path::new("/work/slides/deck.pptx"), None, None).unwrap();
        assert_eq!(d.output_path, PathBuf::from("/work/slides/deck.pdf"));
        assert_eq!(d.target_dir, PathBuf::from("/work/slides"));
        assert!(!d.needs_rename());
    }

    #[test]
    fn output_dir_uses_input_stem() {
        let d = resolve_destination(
            Path::new("/work/slides/deck.ppt"),
            None,
            Some(Path::new("/exports")),
        )
        .unwrap();
        assert_eq!(d.output_path, PathBuf::from("/exports/deck.pdf"));
        assert_eq!(d.target_dir, PathBuf::from("/exports"));
        assert!(!d.needs_rename());

        let dotted = resolve_destination(
            Path::new("/work/slides/q3.review.pptx"),
            None,
            Some(Path::new("/exports")),
        )
        .unwrap();
        assert_eq!(dotted.output_path, PathBuf::from("/exports/q3.review.pdf"));
        assert_eq!(dotted.tool_output, dotted.output_path);
    }

    #[test]
    fn output_file_beats_output_dir() {
        let d = resolve_destination(
            Path::new("/work/deck.pptx"),
            Some(Path::new("/custom/final.pdf")),
            Some(Path::new("/ignored")),
        )
        .unwrap();
        assert_eq!(d.output_path, PathBuf::from("/custom/final.pdf"));
        assert_eq!(d.target_dir, PathBuf::from("/custom"));
        assert_eq!(d.tool_output, PathBuf::from("/custom/deck.pdf"));
        assert!(d.needs_rename());
    }

    #[test]
    fn output_file_with_input_stem_needs_no_rename() {
        let d = resolve_destination(
            Path::new("/work/deck.pptx"),
            Some(Path::new("/custom/deck.pdf")),
            None,
        )
        .unwrap();
        assert!(!d.needs_rename());
    }

    #[test]
    fn only_last_extension_is_replaced() {
        assert_eq!(
            pdf_file_name(Path::new("/a/q3.review.pptx")),
            PathBuf::from("q3.review.pdf")
        );
        assert_eq!(pdf_file_name(Path::new("/a/README")), PathBuf::from("README.pdf"));
    }

    #[test]
    fn relative_destinations_become_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let d = resolve_destination(Path::new("/work/deck.pptx"), None, Some(Path::new("out")))
            .unwrap();
        assert_eq!(d.output_path, cwd.join("out").join("deck.pdf"));
        assert!(d.output_path.is_absolute());
    }

    #[test]
    fn tilde_output_dir_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let d = resolve_destination(Path::new("/work/deck.pptx"), None, Some(Path::new("~/pdfs")))
            .unwrap();
        assert_eq!(d.output_path, home.join("pdfs").join("deck.pdf"));
    }
}
