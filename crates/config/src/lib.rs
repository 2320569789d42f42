//! Configuration for the folio service, client, and browser launch.
//!
//! Settings are merged from a TOML file and `FOLIO_`-prefixed environment
//! variables (environment wins). Nested keys use a double underscore in the
//! environment: `FOLIO_SERVICE__CORS_ORIGIN`, `FOLIO_CLIENT__SERVICE_URL`,
//! and so on. The default file location is the platform config directory
//! (`folio/config.toml`), overridable with `FOLIO_CONFIG`.

pub mod error;

use crate::error::{ErrorKind, Result};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "FOLIO_CONFIG";

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Settings for the PDF conversion service.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Origin allowed to call the conversion endpoint cross-origin. Absent
    /// means any origin (the permissive client-hosted variant).
    #[serde(default)]
    pub cors_origin: Option<String>,
    /// Output filename used when the request supplies none (no extension).
    #[serde(default = "default_filename")]
    pub default_filename: String,
    /// Overall per-request deadline, in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout: u64,
    /// Page format for the exported PDF.
    #[serde(default)]
    pub paper: Paper,
    /// Path to a profile JSON file; the embedded sample is used when absent.
    #[serde(default)]
    pub profile: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            cors_origin: None,
            default_filename: default_filename(),
            request_timeout: default_timeout(),
            paper: Paper::default(),
            profile: None,
        }
    }
}

/// Settings for the PDF delivery client.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Conversion endpoint the client posts snapshots to. Required for
    /// conversion; its absence is a configuration error, not a network one.
    #[serde(default)]
    pub service_url: Option<String>,
    /// Public deployment URL injected as the snapshot `<base>` href when the
    /// app is served from a different public URL than its internal origin.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl ClientConfig {
    /// The conversion endpoint, or [`ErrorKind::Missing`] before any network
    /// activity happens.
    pub fn require_service_url(&self) -> Result<&str> {
        match self.service_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => Ok(url),
            None => exn::bail!(ErrorKind::Missing("client.service_url")),
        }
    }
}

/// How the conversion service obtains a browser.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LaunchStrategy {
    /// Prefer the serverless-packaged binary, fall back to a system browser.
    #[default]
    Auto,
    /// Only a locally-installed browser discovered on the PATH.
    System,
    /// Only the minimal serverless-packaged binary.
    Serverless,
}

/// Browser launch settings.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BrowserConfig {
    #[serde(default)]
    pub strategy: LaunchStrategy,
    /// Explicit executable path, bypassing PATH discovery.
    #[serde(default)]
    pub executable: Option<PathBuf>,
    /// Location of the serverless-packaged browser binary.
    #[serde(default)]
    pub serverless_path: Option<PathBuf>,
    /// How long to let subresources settle after navigation, in milliseconds.
    #[serde(default = "default_settle")]
    pub settle_delay: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            strategy: LaunchStrategy::default(),
            executable: None,
            serverless_path: None,
            settle_delay: default_settle(),
        }
    }
}

/// PDF page format. The historical variants disagreed between A3 and A4;
/// A4 is the canonical default.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Paper {
    #[default]
    A4,
    A3,
    Letter,
}

impl Paper {
    /// Page dimensions in inches, (width, height).
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            Self::A4 => (8.27, 11.69),
            Self::A3 => (11.69, 16.54),
            Self::Letter => (8.5, 11.0),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:4127".to_string()
}

fn default_filename() -> String {
    "resume".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_settle() -> u64 {
    500
}

impl Config {
    /// The figment backing [`load`](Self::load): platform config file (or
    /// `FOLIO_CONFIG`), then environment overrides.
    pub fn figment() -> Figment {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .or_else(default_config_path);
        let mut figment = Figment::new();
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "merging configuration file");
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(env_provider())
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    /// Loads from an explicit file plus environment overrides, for the
    /// `--config` command-line flag.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new().merge(Toml::file(path.as_ref())).merge(env_provider());
        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        match figment.extract() {
            Ok(config) => Ok(config),
            Err(err) => exn::bail!(ErrorKind::Invalid(err.to_string())),
        }
    }
}

/// `FOLIO_CONFIG` itself points at the file, so it is not a settings key.
fn env_provider() -> Env {
    Env::prefixed("FOLIO_").split("__").ignore(&["config"])
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "folio")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.service.listen, "127.0.0.1:4127");
        assert_eq!(config.service.default_filename, "resume");
        assert_eq!(config.service.request_timeout, 30);
        assert_eq!(config.service.paper, Paper::A4);
        assert_eq!(config.browser.strategy, LaunchStrategy::Auto);
        assert!(config.client.service_url.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[service]\nlisten = \"0.0.0.0:8080\"\ncors_origin = \"https://example.com\"\n\
             paper = \"a3\"\n\n[client]\nservice_url = \"https://pdf.example.com/html-to-pdf\"\n"
        )
        .unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.listen, "0.0.0.0:8080");
        assert_eq!(config.service.cors_origin.as_deref(), Some("https://example.com"));
        assert_eq!(config.service.paper, Paper::A3);
        assert_eq!(
            config.client.require_service_url().unwrap(),
            "https://pdf.example.com/html-to-pdf"
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nlisten_addres = \"typo\"").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_missing_service_url_is_a_configuration_error() {
        let config = ClientConfig::default();
        let err = config.require_service_url().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Missing("client.service_url")));
        assert!(!err.is_retryable());
    }

    #[rstest]
    #[case(Paper::A4, 8.27, 11.69)]
    #[case(Paper::A3, 11.69, 16.54)]
    #[case(Paper::Letter, 8.5, 11.0)]
    fn test_paper_dimensions(#[case] paper: Paper, #[case] width: f64, #[case] height: f64) {
        assert_eq!(paper.dimensions(), (width, height));
    }
}
