//! Browser executable resolution.
//!
//! Two resolution paths exist: a full locally-installed binary discovered on
//! the PATH (developer machines, always-on servers), and a minimal
//! serverless-packaged binary at a configured or platform-conventional path
//! (on-demand functions with cold starts and size constraints).

use crate::error::{ErrorKind, Result};
use std::path::{Path, PathBuf};

/// Executable names checked on the PATH, most specific first.
const EXECUTABLES: [&str; 5] =
    ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser", "chrome"];

/// Conventional locations for a serverless-packaged binary.
const SERVERLESS_CANDIDATES: [&str; 3] =
    ["/opt/chromium/chrome", "/opt/bin/headless-chromium", "/usr/lib/chromium/headless-shell"];

/// Resolves a full browser binary: the explicit path if given, otherwise the
/// first matching executable on the PATH.
pub(crate) fn discover_system(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(path = %path.display(), "configured browser executable does not exist");
        exn::bail!(ErrorKind::BrowserNotFound);
    }
    for exe in EXECUTABLES {
        if let Ok(path) = which::which(exe) {
            tracing::debug!(executable = %path.display(), "discovered system browser");
            return Ok(path);
        }
    }
    tracing::info!("no chrome/chromium executable found in PATH");
    exn::bail!(ErrorKind::BrowserNotFound)
}

/// Resolves the serverless-packaged binary: the configured path if given,
/// otherwise the first conventional location that exists.
pub(crate) fn resolve_serverless(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(path = %path.display(), "configured serverless browser does not exist");
        exn::bail!(ErrorKind::BrowserNotFound);
    }
    for candidate in SERVERLESS_CANDIDATES {
        let path = Path::new(candidate);
        if path.is_file() {
            tracing::debug!(executable = candidate, "resolved serverless browser");
            return Ok(path.to_path_buf());
        }
    }
    exn::bail!(ErrorKind::BrowserNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_explicit_path_wins_when_present() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"#!/bin/sh\n").unwrap();
        let resolved = discover_system(Some(file.path())).unwrap();
        assert_eq!(resolved, file.path());
    }

    #[test]
    fn test_missing_explicit_path_is_not_found() {
        let err = discover_system(Some(Path::new("/definitely/not/chrome"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::BrowserNotFound));
    }

    #[test]
    fn test_missing_serverless_path_is_not_found() {
        let err = resolve_serverless(Some(Path::new("/definitely/not/chromium"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::BrowserNotFound));
    }

    #[test]
    fn test_configured_serverless_path_wins() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let resolved = resolve_serverless(Some(file.path())).unwrap();
        assert_eq!(resolved, file.path());
    }
}
