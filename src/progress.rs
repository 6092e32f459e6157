//! Progress-callback trait for conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionRequestBuilder::progress_callback`] to hear
//! about the conversion as it happens: a terminal spinner, a log line, a job
//! record in a database.
//!
//! # Example
//!
//! ```rust
//! use ppt2pdf::{ConversionProgressCallback, ConversionRequest};
//! use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
//!
//! struct SpawnFlag(AtomicBool);
//!
//! impl ConversionProgressCallback for SpawnFlag {
//!     fn on_process_spawned(&self, command: &[String]) {
//!         self.0.store(true, Ordering::SeqCst);
//!         eprintln!("running {}", command.join(" "));
//!     }
//! }
//!
//! let request = ConversionRequest::builder("deck.pptx")
//!     .progress_callback(Arc::new(SpawnFlag(AtomicBool::new(false))))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::ConversionResult;
use std::path::Path;
use std::sync::Arc;

/// Called by [`crate::convert::convert`] at each stage of a conversion.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Exactly one of `on_conversion_complete` or
/// `on_conversion_error` fires per call once `on_conversion_start` has.
pub trait ConversionProgressCallback: Send + Sync {
    /// Input validated and destination resolved; nothing spawned yet.
    fn on_conversion_start(&self, input: &Path, output: &Path) {
        let _ = (input, output);
    }

    /// The rendering tool was started with `command`.
    fn on_process_spawned(&self, command: &[String]) {
        let _ = command;
    }

    /// The PDF is in place.
    fn on_conversion_complete(&self, result: &ConversionResult) {
        let _ = result;
    }

    /// The conversion failed after it had started.
    fn on_conversion_error(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionRequest`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
