//! Session trait for abstracting the UI host
//!
//! The scenario driver and the run orchestration only talk to this trait,
//! so the browser can be swapped for anything able to load the bundle.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::core::Result;
use crate::stubs::StubCatalog;

/// One live page hosting the UI under test
#[async_trait]
pub trait Session: Send {
    /// Make every stub in `catalog` callable from the page. Must precede
    /// `navigate`.
    async fn install_stubs(&mut self, catalog: Arc<StubCatalog>) -> Result<()>;

    /// Load the bundle entry point and wait for the load lifecycle
    async fn navigate(&mut self, entry: &Path) -> Result<()>;

    /// Append a style rule to the loaded document
    async fn add_style(&mut self, css: &str) -> Result<()>;

    /// Wait for a button labelled `text` and click it
    async fn click_button(&mut self, text: &str) -> Result<()>;

    /// Wait for the input matching `selector` and type `text` into it
    async fn type_into(&mut self, selector: &str, text: &str) -> Result<()>;

    /// Press and release a key on the page
    async fn press_key(&mut self, key: &str) -> Result<()>;

    /// Fixed pause for rendering to settle
    async fn pause(&mut self, duration: Duration) -> Result<()>;

    /// Write `<name>.png` of the viewport, or of the element matching
    /// `region`, and return its path
    async fn capture(&mut self, name: &str, region: Option<&str>) -> Result<PathBuf>;

    /// Apply the named state-store mutation with `args`
    async fn dispatch(&mut self, action: &str, args: &[Value]) -> Result<()>;

    /// Release the page and the browser. Safe to call more than once.
    async fn shutdown(&mut self) -> Result<()>;
}

/// Shut `session` down, logging a failure instead of returning it
pub async fn release<S: Session + ?Sized>(session: &mut S) {
    if let Err(e) = session.shutdown().await {
        warn!("Browser did not shut down cleanly: {}", e);
    }
}
