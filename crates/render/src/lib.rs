//! HTML-to-PDF rendering through a headless Chrome/Chromium browser.
//!
//! The [`HtmlToPdf`] trait is the seam the HTTP service converts through;
//! [`ChromePdf`] is its production implementation. Browser acquisition is
//! pluggable via [`Launch`] so deployments can run either a full local
//! install or a serverless-packaged binary.

mod chrome;
mod engine;
pub mod error;
mod launch;
mod session;

pub use engine::{ChromePdf, HtmlToPdf};
pub use launch::{Launch, PreferServerless, ServerlessBrowser, SystemBrowser, from_config};
pub use session::{BrowserSession, LAUNCH_ARGS, PrintOptions};
