//! CLI binary for ppt2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `ConversionRequest` and prints the resulting PDF path.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use ppt2pdf::{
    convert, ConversionProgressCallback, ConversionRequest, ConversionResult, Ppt2PdfError,
    ProgressCallback,
};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner shown while LibreOffice runs.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Set when the process is spawned; used for the elapsed time in the summary.
    spawned_at: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Locating LibreOffice…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            spawned_at: Mutex::new(None),
        })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, input: &Path, output: &Path) {
        self.bar.set_message(format!(
            "{} → {}",
            file_label(input),
            dim(&output.display().to_string())
        ));
    }

    fn on_process_spawned(&self, _command: &[String]) {
        if let Ok(mut t) = self.spawned_at.lock() {
            *t = Some(Instant::now());
        }
        self.bar.set_prefix("Converting");
    }

    fn on_conversion_complete(&self, result: &ConversionResult) {
        let elapsed = self
            .spawned_at
            .lock()
            .ok()
            .and_then(|t| *t)
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        self.bar.finish_and_clear();
        eprintln!(
            "{} {}  {}",
            green("✔"),
            bold(&file_label(&result.output_path)),
            dim(&format!("{elapsed:.1}s")),
        );
    }

    fn on_conversion_error(&self, _error: &str) {
        self.bar.finish_and_clear();
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # deck.pdf next to deck.pptx
  ppt2pdf deck.pptx

  # Explicit output file (renamed from deck.pdf after conversion)
  ppt2pdf deck.pptx handouts/q3-review.pdf

  # Into a directory, giving up after two minutes
  ppt2pdf --outdir exports --timeout 120 legacy.ppt

  # Use a specific LibreOffice and forward raw soffice flags
  ppt2pdf --soffice /opt/libreoffice/program/soffice --extra-arg=--invisible deck.pptx

  # Machine-readable result
  ppt2pdf --json deck.pptx > result.json

ENVIRONMENT VARIABLES:
  PPT2PDF_OUTDIR       Default for --outdir
  PPT2PDF_SOFFICE      Default for --soffice
  PPT2PDF_TIMEOUT      Default for --timeout
  RUST_LOG             Log filter (overrides --verbose / --quiet)

  Without --soffice, 'soffice' and 'libreoffice' are searched on PATH, then
  in the usual install locations (e.g. /Applications/LibreOffice.app on macOS).
"#;

/// Convert PowerPoint presentations into PDF documents.
#[derive(Parser, Debug)]
#[command(
    name = "ppt2pdf",
    version,
    about = "Convert PowerPoint presentations into PDF documents",
    long_about = "Convert .ppt and .pptx presentations to PDF using an installed LibreOffice \
running in headless mode. Prints the absolute path of the PDF on success.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the .ppt or .pptx file to convert.
    input: PathBuf,

    /// Path of the generated PDF (defaults to the input name with .pdf).
    output: Option<PathBuf>,

    /// Directory for the PDF when OUTPUT is omitted.
    #[arg(long, env = "PPT2PDF_OUTDIR", value_name = "DIR")]
    outdir: Option<PathBuf>,

    /// Path to the LibreOffice 'soffice' executable (falls back to PATH lookup).
    #[arg(long, env = "PPT2PDF_SOFFICE", value_name = "PATH")]
    soffice: Option<PathBuf>,

    /// Maximum number of seconds to wait for LibreOffice to finish.
    #[arg(long, env = "PPT2PDF_TIMEOUT", value_name = "SECONDS", value_parser = parse_timeout)]
    timeout: Option<f64>,

    /// Additional argument forwarded to soffice. Repeat for multiple arguments.
    #[arg(
        long = "extra-arg",
        value_name = "VALUE",
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    extra_args: Vec<String>,

    /// Print the full result (command, paths, captured output) as JSON.
    #[arg(long, env = "PPT2PDF_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PPT2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PPT2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the PDF path.
    #[arg(short, long, env = "PPT2PDF_QUIET")]
    quiet: bool,
}

/// `--timeout` must be a finite, positive number of seconds.
fn parse_timeout(s: &str) -> std::result::Result<f64, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number of seconds"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("timeout must be greater than zero (got {s})"));
    }
    Ok(secs)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let prefix = if io::stderr().is_terminal() {
                red("error:")
            } else {
                "error:".to_string()
            };
            // Library errors already carry a complete, user-facing message.
            match e.downcast_ref::<Ppt2PdfError>() {
                Some(err) => eprintln!("{prefix} {err}"),
                None => eprintln!("{prefix} {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // ── Logging setup ────────────────────────────────────────────────────
    // Keep library INFO logs out of the way while the spinner is drawing.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build request ────────────────────────────────────────────────────
    let spinner = show_progress.then(CliProgressCallback::new);
    let progress = spinner
        .as_ref()
        .map(|cb| Arc::clone(cb) as ProgressCallback);
    let request = build_request(&cli, progress)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let outcome = convert(&request).await;

    // Errors raised before the process starts never reach the callback.
    if let Some(ref cb) = spinner {
        cb.bar.finish_and_clear();
    }
    let result = outcome?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialise result")?;
        println!("{json}");
    } else {
        println!("{}", result.output_path.display());
    }

    Ok(())
}

/// Map CLI args to `ConversionRequest`.
fn build_request(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionRequest> {
    let mut builder =
        ConversionRequest::builder(&cli.input).extra_args(cli.extra_args.iter().cloned());

    if let Some(ref output) = cli.output {
        builder = builder.output_file(output);
    }
    if let Some(ref dir) = cli.outdir {
        builder = builder.output_dir(dir);
    }
    if let Some(ref soffice) = cli.soffice {
        builder = builder.executable(soffice);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    Ok(builder.build()?)
}
