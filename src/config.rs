//! Per-call conversion settings.
//!
//! Everything a single [`crate::convert::convert`] call needs lives in
//! [`ConversionRequest`], built via its [`ConversionRequestBuilder`]. Nothing
//! in here outlives the call; there is no process-wide configuration.
//!
//! Destination precedence is fixed: `output_file` > `output_dir` > next to
//! the input. Setting both `output_file` and `output_dir` is accepted and the
//! directory is ignored.

use crate::error::Ppt2PdfError;
use crate::progress::ProgressCallback;
use soffice_locate::SofficeLocator;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Inputs to one presentation → PDF conversion.
///
/// # Example
/// ```rust
/// use ppt2pdf::ConversionRequest;
/// use std::time::Duration;
///
/// let request = ConversionRequest::builder("deck.pptx")
///     .output_dir("out")
///     .timeout(Duration::from_secs(120))
///     .extra_arg("--invisible")
///     .build()
///     .unwrap();
/// assert_eq!(request.extra_args, vec!["--invisible".to_string()]);
/// ```
#[derive(Clone)]
pub struct ConversionRequest {
    /// Source presentation. Must be an existing regular file.
    pub input_path: PathBuf,

    /// Exact destination for the PDF. Takes priority over `output_dir`.
    pub output_file: Option<PathBuf>,

    /// Directory receiving `<input stem>.pdf`. Ignored when `output_file` is set.
    pub output_dir: Option<PathBuf>,

    /// Explicit `soffice` location. Skips the PATH search entirely.
    pub executable_path: Option<PathBuf>,

    /// Wall-clock bound from spawn to exit. `None` waits forever.
    pub timeout: Option<Duration>,

    /// Raw arguments appended after the fixed arguments, in order.
    pub extra_args: Vec<String>,

    /// Search configuration used when `executable_path` is `None`.
    /// Defaults to [`SofficeLocator::from_env`].
    pub locator: Option<SofficeLocator>,

    /// Optional observer notified as the conversion progresses.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConversionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRequest")
            .field("input_path", &self.input_path)
            .field("output_file", &self.output_file)
            .field("output_dir", &self.output_dir)
            .field("executable_path", &self.executable_path)
            .field("timeout", &self.timeout)
            .field("extra_args", &self.extra_args)
            .field("locator", &self.locator)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionRequest {
    /// A request with every option at its default.
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_file: None,
            output_dir: None,
            executable_path: None,
            timeout: None,
            extra_args: Vec::new(),
            locator: None,
            progress_callback: None,
        }
    }

    /// Create a new builder for `ConversionRequest`.
    pub fn builder(input_path: impl Into<PathBuf>) -> ConversionRequestBuilder {
        ConversionRequestBuilder {
            request: Self::new(input_path),
        }
    }

    /// Timeout in (fractional) seconds, as shown in messages.
    pub fn timeout_secs(&self) -> Option<f64> {
        self.timeout.map(|d| d.as_secs_f64())
    }
}

/// Builder for [`ConversionRequest`].
#[derive(Debug)]
pub struct ConversionRequestBuilder {
    request: ConversionRequest,
}

impl ConversionRequestBuilder {
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.request.output_file = Some(path.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.request.output_dir = Some(dir.into());
        self
    }

    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.request.executable_path = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    /// Fractional-second form of [`Self::timeout`]. Rejected by [`Self::build`]
    /// unless finite and positive; values beyond [`Duration::MAX`] saturate.
    pub fn timeout_secs(mut self, secs: f64) -> Self {
        self.request.timeout = Some(if !secs.is_finite() || secs <= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        });
        self
    }

    pub fn extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.request.extra_args.push(arg.into());
        self
    }

    pub fn extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn locator(mut self, locator: SofficeLocator) -> Self {
        self.request.locator = Some(locator);
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.request.progress_callback = Some(callback);
        self
    }

    /// Build the request, validating constraints.
    pub fn build(self) -> Result<ConversionRequest, Ppt2PdfError> {
        self.request.validate()?;
        Ok(self.request)
    }
}

impl ConversionRequest {
    /// Check invariants that do not touch the filesystem.
    pub(crate) fn validate(&self) -> Result<(), Ppt2PdfError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(Ppt2PdfError::InvalidConfig(
                "input path must not be empty".into(),
            ));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(Ppt2PdfError::InvalidConfig(
                "timeout must be a positive number of seconds".into(),
            ));
        }
        if matches!(self.output_file, Some(ref p) if p.as_os_str().is_empty()) {
            return Err(Ppt2PdfError::InvalidConfig(
                "output file must not be empty".into(),
            ));
        }
        Ok(())
    }
}
