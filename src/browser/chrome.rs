// src/browser/chrome.rs
use super::{BrowserLauncher, BrowserSession};
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Flags that keep Chrome from advertising automated control
static STEALTH_ARGS: [&str; 4] = [
    "--disable-blink-features=AutomationControlled",
    "--disable-extensions",
    "--no-sandbox",
    "--disable-dev-shm-usage",
];

/// Default switch Chrome uses to show the "controlled by automated software" state
const AUTOMATION_SWITCH: &str = "--enable-automation";

#[derive(Debug, Clone)]
pub struct ChromeSettings {
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub user_agent: Option<String>,
    pub window_size: (u32, u32),
    pub idle_timeout: Duration,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            user_agent: None,
            window_size: (1366, 900),
            idle_timeout: Duration::from_secs(60),
        }
    }
}

pub struct ChromeLauncher {
    settings: ChromeSettings,
}

impl ChromeLauncher {
    pub fn new(settings: ChromeSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let settings = self.settings.clone();
        let session = tokio::task::spawn_blocking(move || ChromeSession::start(&settings))
            .await
            .map_err(|e| ScrapeError::Render(format!("Browser launch task failed: {}", e)))??;
        Ok(Box::new(session))
    }
}

/// One Chrome process with a single tab. Dropping it kills the process.
pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl ChromeSession {
    fn start(settings: &ChromeSettings) -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(settings.headless)
            .sandbox(false)
            .path(settings.chrome_path.clone())
            .window_size(Some(settings.window_size))
            .idle_browser_timeout(settings.idle_timeout)
            .args(STEALTH_ARGS.iter().map(|arg| OsStr::new(*arg)).collect())
            .ignore_default_args(vec![OsStr::new(AUTOMATION_SWITCH)])
            .build()
            .map_err(|e| ScrapeError::Render(format!("Invalid browser options: {}", e)))?;

        let browser = Browser::new(options)
            .map_err(|e| ScrapeError::Render(format!("Failed to launch Chrome: {}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::Render(format!("Failed to open tab: {}", e)))?;

        if let Some(user_agent) = &settings.user_agent {
            tab.set_user_agent(user_agent, None, None)
                .map_err(|e| ScrapeError::Render(format!("Failed to set user agent: {}", e)))?;
        }

        debug!("Chrome session started (headless: {})", settings.headless);
        Ok(Self {
            browser: Some(browser),
            tab,
        })
    }
}

/// Run a blocking tab operation off the async runtime
async fn on_tab<T, F>(tab: Arc<Tab>, what: &'static str, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Tab) -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&tab))
        .await
        .map_err(|e| ScrapeError::Render(format!("{} task failed: {}", what, e)))?
        .map_err(|e| ScrapeError::Render(format!("{} failed: {}", what, e)))
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn open(&mut self, url: &str) -> Result<()> {
        let url = url.to_string();
        on_tab(Arc::clone(&self.tab), "Navigation", move |tab| {
            tab.navigate_to(&url)?.wait_until_navigated()?;
            Ok(())
        })
        .await
    }

    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value> {
        let script = script.to_string();
        on_tab(Arc::clone(&self.tab), "Script", move |tab| {
            let result = tab.evaluate(&script, false)?;
            Ok(result.value.unwrap_or(serde_json::Value::Null))
        })
        .await
    }

    async fn current_content(&mut self) -> Result<String> {
        on_tab(Arc::clone(&self.tab), "Content capture", |tab| tab.get_content()).await
    }

    async fn close(&mut self) {
        let Some(browser) = self.browser.take() else {
            return;
        };
        let tab = Arc::clone(&self.tab);
        let closed = tokio::task::spawn_blocking(move || {
            let _ = tab.close(false);
            drop(browser);
        })
        .await;
        if let Err(e) = closed {
            warn!("Browser teardown task failed: {}", e);
        }
    }
}
