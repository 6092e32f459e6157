//! The `soffice` invocation.
//!
//! ```text
//! soffice --headless --nologo --nofirststartwizard \
//!         --convert-to pdf --outdir <dir> <input> [extra args…]
//! ```
//!
//! Caller-supplied arguments always come last and are passed through
//! untouched: no reordering, no deduplication.

use std::path::Path;

/// Flags that keep LibreOffice from opening a window or first-run UI.
pub const HEADLESS_ARGS: [&str; 3] = ["--headless", "--nologo", "--nofirststartwizard"];

/// Conversion-mode flag and its filter argument.
pub const CONVERT_TO_PDF: [&str; 2] = ["--convert-to", "pdf"];

/// Output-directory flag; followed by the directory.
pub const OUTDIR_FLAG: &str = "--outdir";

/// Build the full argument vector, program first.
pub fn build_command(
    executable: &Path,
    target_dir: &Path,
    input: &Path,
    extra_args: &[String],
) -> Vec<String> {
    let mut command = Vec::with_capacity(
        1 + HEADLESS_ARGS.len() + CONVERT_TO_PDF.len() + 3 + extra_args.len(),
    );
    command.push(executable.to_string_lossy().into_owned());
    command.extend(HEADLESS_ARGS.iter().map(|s| s.to_string()));
    command.extend(CONVERT_TO_PDF.iter().map(|s| s.to_string()));
    command.push(OUTDIR_FLAG.to_string());
    command.push(target_dir.to_string_lossy().into_owned());
    command.push(input.to_string_lossy().into_owned());
    command.extend(extra_args.iter().cloned());
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_arguments_in_order() {
        let cmd = build_command(
            Path::new("/usr/bin/soffice"),
            Path::new("/work"),
            Path::new("/work/deck.pptx"),
            &[],
        );
        assert_eq!(
            cmd,
            vec![
                "/usr/bin/soffice",
                "--headless",
                "--nologo",
                "--nofirststartwizard",
                "--convert-to",
                "pdf",
                "--outdir",
                "/work",
                "/work/deck.pptx",
            ]
        );
    }

    #[test]
    fn extra_args_are_trailing_and_verbatim() {
        let extra = vec![
            "--invisible".to_string(),
            "--foo".to_string(),
            "--invisible".to_string(),
        ];
        let cmd = build_command(
            Path::new("soffice"),
            Path::new("/out"),
            Path::new("/in/deck.ppt"),
            &extra,
        );
        assert_eq!(&cmd[cmd.len() - 3..], extra.as_slice());
        assert_eq!(cmd[cmd.len() - 4], "/in/deck.ppt");
    }
}
