//! Launch strategies.
//!
//! The deployment environment decides where the browser binary comes from:
//! `system` for developer machines and long-lived servers, `serverless` for
//! size-constrained on-demand functions, and `auto` to prefer the packaged
//! binary and fall back to whatever is installed locally.

use crate::chrome;
use crate::error::Result;
use crate::session::BrowserSession;
use folio_config::{BrowserConfig, LaunchStrategy};
use std::path::PathBuf;
use std::sync::Arc;

/// Produces a fresh [`BrowserSession`] per conversion.
pub trait Launch: Send + Sync {
    fn name(&self) -> &'static str;
    fn launch(&self) -> Result<BrowserSession>;
}

/// Launches a full browser discovered on the PATH (or configured explicitly).
pub struct SystemBrowser {
    executable: Option<PathBuf>,
}

impl SystemBrowser {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }
}

impl Launch for SystemBrowser {
    fn name(&self) -> &'static str {
        "system"
    }

    fn launch(&self) -> Result<BrowserSession> {
        let path = chrome::discover_system(self.executable.as_deref())?;
        BrowserSession::launch(path, self.name())
    }
}

/// Launches a minimal serverless-packaged browser binary.
pub struct ServerlessBrowser {
    path: Option<PathBuf>,
}

impl ServerlessBrowser {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl Launch for ServerlessBrowser {
    fn name(&self) -> &'static str {
        "serverless"
    }

    fn launch(&self) -> Result<BrowserSession> {
        let path = chrome::resolve_serverless(self.path.as_deref())?;
        BrowserSession::launch(path, self.name())
    }
}

/// Tries the serverless binary first, falling back once to a system browser.
pub struct PreferServerless {
    serverless: ServerlessBrowser,
    system: SystemBrowser,
}

impl Launch for PreferServerless {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn launch(&self) -> Result<BrowserSession> {
        match self.serverless.launch() {
            Ok(session) => Ok(session),
            Err(err) => {
                tracing::warn!(error = %err, "serverless browser unavailable, trying system browser");
                self.system.launch()
            }
        }
    }
}

/// Builds the launcher the configuration asks for.
pub fn from_config(config: &BrowserConfig) -> Arc<dyn Launch> {
    match config.strategy {
        LaunchStrategy::System => Arc::new(SystemBrowser::new(config.executable.clone())),
        LaunchStrategy::Serverless => {
            Arc::new(ServerlessBrowser::new(config.serverless_path.clone()))
        }
        LaunchStrategy::Auto => Arc::new(PreferServerless {
            serverless: ServerlessBrowser::new(config.serverless_path.clone()),
            system: SystemBrowser::new(config.executable.clone()),
        }),
    }
}
