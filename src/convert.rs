//! Conversion entry points.
//!
//! [`convert`] runs one presentation through LibreOffice and returns once the
//! PDF is at its final location (or the attempt has failed). There is no
//! retry and no partial recovery: a failed call makes no promise about files
//! LibreOffice may have left in the output directory.
//!
//! [`convert_sync`] is the blocking form for callers without a runtime.

use crate::command::build_command;
use crate::config::ConversionRequest;
use crate::destination::{resolve_destination, Destination};
use crate::error::Ppt2PdfError;
use crate::output::ConversionResult;
use crate::process::{run_with_timeout, ProcessOutcome};
use soffice_locate::{expand_tilde, SofficeLocator};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a `.ppt` / `.pptx` file to PDF.
///
/// # Steps
/// 1. The input must be an existing regular file.
/// 2. The destination is resolved (`output_file` > `output_dir` > beside the input).
/// 3. `soffice` is located (explicit override, else PATH, else known installs).
/// 4. The destination directory is created if missing.
/// 5. `soffice --convert-to pdf --outdir <dir> <input> [extra args]` runs,
///    bounded by the request's timeout.
/// 6. A non-zero exit, a timeout, or a missing PDF is an error.
/// 7. If a custom file name was requested the PDF is renamed into place.
///
/// # Errors
/// See [`Ppt2PdfError`]; use [`Ppt2PdfError::kind`] for coarse branching.
///
/// # Example
/// ```rust,no_run
/// use ppt2pdf::{convert, ConversionRequest};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), ppt2pdf::Ppt2PdfError> {
/// let request = ConversionRequest::builder("deck.pptx").output_dir("out").build()?;
/// let result = convert(&request).await?;
/// println!("{}", result.output_path.display());
/// # Ok(())
/// # }
/// ```
pub async fn convert(request: &ConversionRequest) -> Result<ConversionResult, Ppt2PdfError> {
    request.validate()?;
    let total_start = Instant::now();
    info!("Starting conversion: {}", request.input_path.display());

    // ── Step 1: Validate input ───────────────────────────────────────────
    let input_path = resolve_input(&request.input_path)?;

    // ── Step 2: Resolve destination (no I/O) ─────────────────────────────
    if let (Some(file), Some(dir)) = (&request.output_file, &request.output_dir) {
        warn!(
            "Both output file '{}' and output dir '{}' given; ignoring the directory",
            file.display(),
            dir.display()
        );
    }
    let dest = resolve_destination(
        &input_path,
        request.output_file.as_deref(),
        request.output_dir.as_deref(),
    )?;
    debug!("Destination: {:?}", dest);

    // ── Step 3: Locate soffice ───────────────────────────────────────────
    // Done before any directory is created so a bad override leaves no trace.
    let executable = match request.locator {
        Some(ref locator) => locator.resolve(request.executable_path.as_deref()),
        None => SofficeLocator::from_env().resolve(request.executable_path.as_deref()),
    }?;

    // ── Step 4: Ensure the output directory exists ───────────────────────
    tokio::fs::create_dir_all(&dest.target_dir).await?;

    // ── Step 5: Build command ────────────────────────────────────────────
    let command = build_command(
        &executable,
        &dest.target_dir,
        &input_path,
        &request.extra_args,
    );
    debug!("Command: {}", command.join(" "));

    if let Some(ref cb) = request.progress_callback {
        cb.on_conversion_start(&input_path, &dest.output_path);
    }

    let result = execute(request, input_path, &dest, command).await;

    match result {
        Ok(ref r) => {
            info!(
                "Conversion complete: {} in {}ms",
                r.output_path.display(),
                total_start.elapsed().as_millis()
            );
            if let Some(ref cb) = request.progress_callback {
                cb.on_conversion_complete(r);
            }
        }
        Err(ref e) => {
            if let Some(ref cb) = request.progress_callback {
                cb.on_conversion_error(&e.to_string());
            }
        }
    }

    result
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a current-thread tokio runtime internally, so it must not be
/// called from inside an async context.
pub fn convert_sync(request: &ConversionRequest) -> Result<ConversionResult, Ppt2PdfError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(convert(request))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Absolute path of an existing regular file, else `InputMissing`.
fn resolve_input(raw: &Path) -> Result<PathBuf, Ppt2PdfError> {
    let path = expand_tilde(raw);
    match std::fs::metadata(&path) {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(Ppt2PdfError::InputMissing { path }),
    }
    Ok(std::path::absolute(&path)?)
}

/// Steps 5–7: run, classify the outcome, verify and place the PDF.
async fn execute(
    request: &ConversionRequest,
    input_path: PathBuf,
    dest: &Destination,
    command: Vec<String>,
) -> Result<ConversionResult, Ppt2PdfError> {
    let callback = request.progress_callback.as_ref();
    let outcome = run_with_timeout(&command, request.timeout, || {
        if let Some(cb) = callback {
            cb.on_process_spawned(&command);
        }
    })
    .await?;

    let (stdout, stderr) = match outcome {
        ProcessOutcome::TimedOut { output, .. } => {
            return Err(Ppt2PdfError::TimedOut {
                secs: request.timeout_secs().unwrap_or_default(),
                command,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }
        ProcessOutcome::Exited {
            success: false,
            code,
            output,
            ..
        } => {
            return Err(Ppt2PdfError::ProcessFailed {
                code,
                command,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }
        ProcessOutcome::Exited { output, .. } => (output.stdout, output.stderr),
    };

    // A zero exit proves nothing; LibreOffice exits 0 on many failures.
    if !dest.tool_output.is_file() {
        return Err(Ppt2PdfError::NoOutput {
            expected: dest.tool_output.clone(),
            command,
            stdout,
            stderr,
        });
    }

    if dest.needs_rename() {
        place_output(&dest.tool_output, &dest.output_path).await?;
    }

    Ok(ConversionResult {
        input_path,
        output_path: dest.output_path.clone(),
        command,
        stdout,
        stderr,
    })
}

/// Move the tool's `<stem>.pdf` onto the requested file, replacing it.
async fn place_output(from: &Path, to: &Path) -> Result<(), Ppt2PdfError> {
    debug!("Renaming {} -> {}", from.display(), to.display());
    let placement_error = |source: io::Error| Ppt2PdfError::OutputPlacementFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    tokio::fs::rename(from, to).await.map_err(placement_error)?;

    if !to.is_file() {
        return Err(placement_error(io::Error::new(
            io::ErrorKind::NotFound,
            "file missing after rename",
        )));
    }
    Ok(())
}
