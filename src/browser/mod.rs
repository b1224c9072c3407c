// src/browser/mod.rs
//! Browser driver boundary.
//!
//! The renderer only needs navigation, script execution, scrolling, reading
//! the DOM and teardown. A launcher hands out one fresh session per render.

pub mod chrome;
pub mod renderer;

use crate::error::Result;
use async_trait::async_trait;

pub use chrome::{ChromeLauncher, ChromeSettings};
pub use renderer::PageRenderer;

#[async_trait]
pub trait BrowserSession: Send {
    async fn open(&mut self, url: &str) -> Result<()>;

    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value>;

    async fn scroll_by(&mut self, dx: i64, dy: i64) -> Result<()> {
        self.execute_script(&format!("window.scrollBy({}, {});", dx, dy))
            .await
            .map(|_| ())
    }

    async fn current_content(&mut self) -> Result<String>;

    /// Release the browser. Must be safe to call more than once.
    async fn close(&mut self);
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}
