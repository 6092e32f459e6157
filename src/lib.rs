//! # ppt2pdf
//!
//! Convert PowerPoint presentations (`.ppt`, `.pptx`) to PDF by driving an
//! installed LibreOffice in headless mode.
//!
//! LibreOffice does the rendering. This crate does everything around it:
//! finding `soffice`, deciding exactly where the PDF must land, running the
//! conversion under a time bound, and telling a real success from a zero exit
//! that produced nothing.
//!
//! ## Flow
//!
//! ```text
//! deck.pptx
//!  │
//!  ├─ 1. Input        must be an existing regular file
//!  ├─ 2. Destination  output_file > output_dir > beside the input
//!  ├─ 3. Locate       --soffice override, else PATH, else known installs
//!  ├─ 4. Run          soffice --headless --convert-to pdf --outdir DIR deck.pptx …
//!  ├─ 5. Verify       exit status, timeout, PDF actually on disk
//!  └─ 6. Place        rename deck.pdf → custom name when requested
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ppt2pdf::{convert_sync, ConversionRequest};
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = ConversionRequest::builder("deck.pptx")
//!         .output_file("handouts/q3.pdf")
//!         .timeout(Duration::from_secs(120))
//!         .build()?;
//!     let result = convert_sync(&request)?;
//!     println!("{}", result.output_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ppt2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod command;
pub mod config;
pub mod convert;
pub mod destination;
pub mod error;
pub mod output;
pub mod process;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionRequest, ConversionRequestBuilder};
pub use convert::{convert, convert_sync};
pub use destination::{resolve_destination, Destination};
pub use error::{ErrorKind, Ppt2PdfError};
pub use output::ConversionResult;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use soffice_locate::{LocateError, SofficeLocator};
