//! # soffice-locate
//!
//! Find the LibreOffice `soffice` executable without launching anything.
//!
//! ## How it works
//!
//! [`SofficeLocator::resolve`] applies a fixed strategy:
//!
//! 1. If the caller passed an explicit path, that path must be an existing
//!    executable file. Nothing else is searched.
//! 2. Otherwise every directory of the search path (normally `PATH`) is
//!    probed for each platform binary name (`soffice`, `libreoffice`, …).
//! 3. Finally a short list of well-known install locations is probed, such
//!    as the macOS application bundle.
//!
//! The search path and the fallback list are plain data on the locator, so
//! tests and embedders can substitute their own instead of relying on the
//! ambient environment.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use soffice_locate::SofficeLocator;
//!
//! let soffice = SofficeLocator::from_env()
//!     .resolve(None)
//!     .expect("LibreOffice is not installed");
//! println!("using {}", soffice.display());
//! ```
//!
//! ## Platform defaults
//!
//! | OS      | Binary names                 | Fallback locations (abridged)                      |
//! |---------|------------------------------|----------------------------------------------------|
//! | macOS   | `soffice`, `libreoffice`     | `/Applications/LibreOffice.app/Contents/MacOS/soffice` |
//! | Linux   | `soffice`, `libreoffice`     | `/usr/lib/libreoffice/program/soffice`, `/snap/bin/libreoffice` |
//! | Windows | `soffice.exe`, `soffice.com` | `C:\Program Files\LibreOffice\program\soffice.exe` |

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by [`SofficeLocator::resolve`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// The caller-supplied override does not point at an executable file.
    #[error(
        "LibreOffice executable not found at '{}'.\n\
         Check the --soffice path exists and is executable.",
        .path.display()
    )]
    ExplicitNotFound { path: PathBuf },

    /// Neither the search path nor the fallback locations had a match.
    #[error(
        "LibreOffice executable not found.\n\
         Looked for {} in {} and in: {}\n\
         Install LibreOffice and make sure 'soffice' is on your PATH, or pass --soffice <PATH>.",
        quoted_list(.names),
        count_dirs(.searched_dirs),
        display_list(.fallbacks)
    )]
    NotFound {
        names: Vec<String>,
        searched_dirs: Vec<PathBuf>,
        fallbacks: Vec<PathBuf>,
    },
}

impl LocateError {
    /// The explicit path that was rejected, if this error came from an override.
    pub fn attempted_path(&self) -> Option<&Path> {
        match self {
            LocateError::ExplicitNotFound { path } => Some(path),
            LocateError::NotFound { .. } => None,
        }
    }
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn count_dirs(dirs: &[PathBuf]) -> String {
    match dirs.len() {
        1 => "1 PATH directory".to_string(),
        n => format!("{n} PATH directories"),
    }
}

fn display_list(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(no fallback locations)".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Platform defaults ────────────────────────────────────────────────────────

/// Binary names probed in each search-path directory, in priority order.
pub fn default_binary_names() -> Vec<String> {
    if cfg!(windows) {
        vec!["soffice.exe".into(), "soffice.com".into()]
    } else {
        vec!["soffice".into(), "libreoffice".into()]
    }
}

/// Well-known install locations probed after the search path.
pub fn default_fallback_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    match std::env::consts::OS {
        "macos" => {
            const BUNDLE: &str = "Applications/LibreOffice.app/Contents/MacOS/soffice";
            locations.push(Path::new("/").join(BUNDLE));
            if let Some(home) = dirs::home_dir() {
                locations.push(home.join(BUNDLE));
            }
        }
        "windows" => {
            locations.push(PathBuf::from(
                r"C:\Program Files\LibreOffice\program\soffice.exe",
            ));
            locations.push(PathBuf::from(
                r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
            ));
        }
        _ => {
            locations.push(PathBuf::from("/usr/bin/soffice"));
            locations.push(PathBuf::from("/usr/lib/libreoffice/program/soffice"));
            locations.push(PathBuf::from("/opt/libreoffice/program/soffice"));
            locations.push(PathBuf::from("/snap/bin/libreoffice"));
            locations.push(PathBuf::from("/usr/local/bin/soffice"));
        }
    }

    locations
}

// ── Locator ──────────────────────────────────────────────────────────────────

/// Resolves the `soffice` executable from an injected search configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct SofficeLocator {
    /// Value in `PATH` format (platform separator). `None` disables the search.
    pub search_path: Option<OsString>,
    /// File names probed in each search-path directory.
    pub binary_names: Vec<String>,
    /// Absolute paths probed after the search path.
    pub fallback_locations: Vec<PathBuf>,
}

impl fmt::Debug for SofficeLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SofficeLocator")
            .field("search_dirs", &self.search_dirs().len())
            .field("binary_names", &self.binary_names)
            .field("fallback_locations", &self.fallback_locations)
            .finish()
    }
}

impl Default for SofficeLocator {
    fn default() -> Self {
        Self::from_env()
    }
}

impl SofficeLocator {
    /// Build a locator with every input supplied explicitly.
    pub fn new(
        search_path: Option<OsString>,
        binary_names: Vec<String>,
        fallback_locations: Vec<PathBuf>,
    ) -> Self {
        Self {
            search_path,
            binary_names,
            fallback_locations,
        }
    }

    /// Snapshot `PATH` and use the platform default names and fallbacks.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os("PATH"),
            default_binary_names(),
            default_fallback_locations(),
        )
    }

    /// Directories of the search path, skipping empty entries.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        match self.search_path {
            Some(ref raw) => std::env::split_paths(raw)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Return the absolute path of the executable to run.
    ///
    /// An `explicit` override short-circuits the search: it either names an
    /// executable file or the call fails with [`LocateError::ExplicitNotFound`].
    /// Relative overrides and relative PATH entries are anchored at the
    /// current directory, so the returned path never goes through a second
    /// PATH lookup when spawned.
    pub fn resolve(&self, explicit: Option<&Path>) -> Result<PathBuf, LocateError> {
        if let Some(candidate) = explicit {
            let path = anchored(&expand_tilde(candidate));
            if is_executable(&path) {
                debug!("Using explicit soffice: {}", path.display());
                return Ok(path);
            }
            return Err(LocateError::ExplicitNotFound { path });
        }

        let searched_dirs = self.search_dirs();
        for dir in &searched_dirs {
            for name in &self.binary_names {
                let candidate = anchored(&dir.join(name));
                if is_executable(&candidate) {
                    debug!("Found soffice on PATH: {}", candidate.display());
                    return Ok(candidate);
                }
            }
        }

        for candidate in &self.fallback_locations {
            let candidate = anchored(candidate);
            if is_executable(&candidate) {
                debug!("Found soffice at fallback location: {}", candidate.display());
                return Ok(candidate);
            }
        }

        Err(LocateError::NotFound {
            names: self.binary_names.clone(),
            searched_dirs,
            fallbacks: self.fallback_locations.clone(),
        })
    }
}

// ── Filesystem helpers ───────────────────────────────────────────────────────

/// `true` when `path` is a regular file the current user may execute.
///
/// On non-Unix platforms any regular file qualifies.
pub fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}

/// `path` made absolute against the current directory, or unchanged if that fails.
fn anchored(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Expand a leading `~` to the home directory. Other paths are returned as-is.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(path: &Path, mode: u32) {
        fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
        }
        #[cfg(not(unix))]
        let _ = mode;
    }

    fn locator_for(dirs: &[&Path], fallbacks: Vec<PathBuf>) -> SofficeLocator {
        let joined = std::env::join_paths(dirs.iter()).unwrap();
        SofficeLocator::new(
            Some(joined),
            vec!["soffice".into(), "libreoffice".into()],
            fallbacks,
        )
    }

    #[test]
    fn explicit_path_is_returned_without_search() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = tmp.path().join("my-soffice");
        write_file(&exe, 0o755);

        let locator = SofficeLocator::new(None, vec![], vec![]);
        assert_eq!(locator.resolve(Some(&exe)).unwrap(), exe);
    }

    #[test]
    fn explicit_missing_path_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");

        // A valid PATH hit must not rescue a bad override.
        let exe = tmp.path().join("soffice");
        write_file(&exe, 0o755);
        let locator = locator_for(&[tmp.path()], vec![]);

        let err = locator.resolve(Some(&missing)).unwrap_err();
        assert_eq!(err, LocateError::ExplicitNotFound { path: missing.clone() });
        assert_eq!(err.attempted_path(), Some(missing.as_path()));
        assert!(err.to_string().contains("nope"), "got: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn relative_explicit_path_is_made_absolute() {
        use std::os::unix::fs::PermissionsExt;

        // A bare file name in the working directory, as `--soffice mysoffice` would give.
        let file = tempfile::Builder::new()
            .prefix("mysoffice-")
            .tempfile_in(".")
            .unwrap();
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o755)).unwrap();
        let bare = PathBuf::from(file.path().file_name().unwrap());
        assert_eq!(bare.components().count(), 1);

        let locator = SofficeLocator::new(None, vec![], vec![]);
        let resolved = locator.resolve(Some(&bare)).unwrap();
        assert!(resolved.is_absolute(), "got: {}", resolved.display());
        assert_eq!(resolved, std::env::current_dir().unwrap().join(&bare));
    }

    #[test]
    fn relative_search_path_hits_are_made_absolute() {
        let dir = tempfile::tempdir_in(".").unwrap();
        write_file(&dir.path().join("soffice"), 0o755);
        let relative = PathBuf::from(dir.path().file_name().unwrap());

        let locator = locator_for(&[relative.as_path()], vec![]);
        let resolved = locator.resolve(None).unwrap();
        assert!(resolved.is_absolute(), "got: {}", resolved.display());
        assert_eq!(
            resolved,
            std::env::current_dir().unwrap().join(&relative).join("soffice")
        );
    }

    #[test]
    fn explicit_directory_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let locator = SofficeLocator::new(None, vec![], vec![]);
        assert!(matches!(
            locator.resolve(Some(tmp.path())),
            Err(LocateError::ExplicitNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_files_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(&tmp.path().join("soffice"), 0o644);
        let locator = locator_for(&[tmp.path()], vec![]);
        assert!(matches!(
            locator.resolve(None),
            Err(LocateError::NotFound { .. })
        ));
    }

    #[test]
    fn search_path_order_wins_over_name_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_file(&first.path().join("libreoffice"), 0o755);
        write_file(&second.path().join("soffice"), 0o755);

        let locator = locator_for(&[first.path(), second.path()], vec![]);
        assert_eq!(
            locator.resolve(None).unwrap(),
            first.path().join("libreoffice")
        );
    }

    #[test]
    fn fallback_locations_are_probed_after_path() {
        let empty = tempfile::tempdir().unwrap();
        let install = tempfile::tempdir().unwrap();
        let bundled = install.path().join("soffice-bin");
        write_file(&bundled, 0o755);

        let locator = locator_for(
            &[empty.path()],
            vec![install.path().join("missing"), bundled.clone()],
        );
        assert_eq!(locator.resolve(None).unwrap(), bundled);
    }

    #[test]
    fn not_found_message_names_strategy() {
        let empty = tempfile::tempdir().unwrap();
        let locator = locator_for(&[empty.path()], vec![PathBuf::from("/nowhere/soffice")]);

        let err = locator.resolve(None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'soffice', 'libreoffice'"), "got: {msg}");
        assert!(msg.contains("1 PATH directory"), "got: {msg}");
        assert!(msg.contains("/nowhere/soffice"), "got: {msg}");
        assert!(msg.contains("--soffice"), "got: {msg}");
        assert_eq!(err.attempted_path(), None);
    }

    #[test]
    fn missing_search_path_only_uses_fallbacks() {
        let locator = SofficeLocator::new(None, default_binary_names(), vec![]);
        assert!(locator.search_dirs().is_empty());
        match locator.resolve(None) {
            Err(LocateError::NotFound { searched_dirs, .. }) => assert!(searched_dirs.is_empty()),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn tilde_expansion() {
        assert_eq!(expand_tilde(Path::new("/abs/x")), PathBuf::from("/abs/x"));
        assert_eq!(expand_tilde(Path::new("rel/x")), PathBuf::from("rel/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~")), home);
            assert_eq!(expand_tilde(Path::new("~/bin/soffice")), home.join("bin/soffice"));
        }
    }

    #[test]
    fn platform_defaults_nonempty() {
        assert!(!default_binary_names().is_empty());
        assert!(!default_fallback_locations().is_empty());
    }
}
