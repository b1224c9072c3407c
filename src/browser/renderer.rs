// src/browser/renderer.rs
use super::{BrowserLauncher, BrowserSession};
use crate::error::{Result, ScrapeError};
use crate::pacing::{random_between, Sleeper};
use crate::types::PageContent;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Hides `navigator.webdriver` from page scripts
pub const HIDE_WEBDRIVER_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollStep {
    pub dy: i64,
    pub pause: (Duration, Duration),
}

/// Human-like interaction performed on every page before capture.
///
/// Anti-bot systems key on this: wait 2-5s after load, scroll 300px and
/// wait 1-3s, scroll 500px and wait 1-3s, then read the DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowsingTiming {
    pub settle: (Duration, Duration),
    pub scrolls: Vec<ScrollStep>,
}

impl Default for BrowsingTiming {
    fn default() -> Self {
        let pause = (Duration::from_secs(1), Duration::from_secs(3));
        Self {
            settle: (Duration::from_secs(2), Duration::from_secs(5)),
            scrolls: vec![
                ScrollStep { dy: 300, pause },
                ScrollStep { dy: 500, pause },
            ],
        }
    }
}

pub struct PageRenderer {
    launcher: Arc<dyn BrowserLauncher>,
    sleeper: Arc<dyn Sleeper>,
    timing: BrowsingTiming,
}

impl PageRenderer {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            launcher,
            sleeper,
            timing: BrowsingTiming::default(),
        }
    }

    /// Render `url` in a fresh browser session.
    ///
    /// Never fails: launch, navigation and timeout errors come back as a
    /// `PageContent` with `success == false`. The session is closed on every
    /// path once it has been launched.
    pub async fn render(&self, url: &str, timeout_seconds: u64) -> PageContent {
        info!("Rendering {}", url);

        let mut session = match self.launcher.launch().await {
            Ok(session) => session,
            Err(e) => {
                warn!("Could not start browser for {}: {}", url, e);
                return PageContent::failed(url, e.to_string());
            }
        };

        let limit = Duration::from_secs(timeout_seconds);
        let outcome = tokio::time::timeout(limit, self.drive(session.as_mut(), url)).await;
        session.close().await;

        match outcome {
            Ok(Ok(html)) => {
                info!("Captured {} characters from {}", html.len(), url);
                PageContent::captured(url, html)
            }
            Ok(Err(e)) => {
                warn!("Error crawling {}: {}", url, e);
                PageContent::failed(url, e.to_string())
            }
            Err(_) => {
                let err = ScrapeError::Render(format!("timed out after {}s", timeout_seconds));
                warn!("Error crawling {}: {}", url, err);
                PageContent::failed(url, err.to_string())
            }
        }
    }

    async fn drive(&self, session: &mut dyn BrowserSession, url: &str) -> Result<String> {
        session.open(url).await?;
        session.execute_script(HIDE_WEBDRIVER_SCRIPT).await?;

        let (low, high) = self.timing.settle;
        self.sleeper.sleep(random_between(low, high)).await;

        for step in &self.timing.scrolls {
            session.scroll_by(0, step.dy).await?;
            let (low, high) = step.pause;
            self.sleeper.sleep(random_between(low, high)).await;
        }

        session.current_content().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{event_log, events, FakeLauncher, PageBehavior, RecordingSleeper};

    const URL: &str = "https://www.indeed.com/jobs?q=rust&l=Remote&start=0";

    #[tokio::test]
    async fn test_render_follows_human_timing() {
        let log = event_log();
        let sleeper = Arc::new(RecordingSleeper::logging_to(&log));
        let renderer = PageRenderer::new(
            Arc::new(FakeLauncher::serving(&log, "<html>jobs</html>")),
            sleeper.clone(),
        );

        let page = renderer.render(URL, 30).await;

        assert!(page.success);
        assert_eq!(page.raw_text, "<html>jobs</html>");
        assert_eq!(page.url, URL);
        assert_eq!(
            events(&log),
            vec![
                "launch".to_string(),
                format!("open {}", URL),
                format!("script {}", HIDE_WEBDRIVER_SCRIPT),
                "sleep".to_string(),
                "scroll 0 300".to_string(),
                "sleep".to_string(),
                "scroll 0 500".to_string(),
                "sleep".to_string(),
                "content".to_string(),
                "close".to_string(),
            ]
        );

        let delays = sleeper.delays();
        assert!(delays[0] >= Duration::from_secs(2) && delays[0] <= Duration::from_secs(5));
        for pause in &delays[1..] {
            assert!(*pause >= Duration::from_secs(1) && *pause <= Duration::from_secs(3));
        }
    }

    #[tokio::test]
    async fn test_navigation_failure_still_closes_session() {
        let log = event_log();
        let renderer = PageRenderer::new(
            Arc::new(FakeLauncher::with_behavior(
                &log,
                PageBehavior::FailOpen("net::ERR_NAME_NOT_RESOLVED".to_string()),
            )),
            Arc::new(RecordingSleeper::default()),
        );

        let page = renderer.render(URL, 30).await;

        assert!(!page.success);
        assert!(page.raw_text.is_empty());
        assert!(page.failure.unwrap().contains("ERR_NAME_NOT_RESOLVED"));
        assert_eq!(events(&log).last().map(String::as_str), Some("close"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_returns_failed_page() {
        let log = event_log();
        let renderer = PageRenderer::new(
            Arc::new(FakeLauncher::with_behavior(&log, PageBehavior::Hang)),
            Arc::new(RecordingSleeper::default()),
        );

        let page = renderer.render(URL, 30).await;

        assert!(!page.success);
        assert!(page.failure.unwrap().contains("timed out after 30s"));
        assert_eq!(events(&log).last().map(String::as_str), Some("close"));
    }

    #[tokio::test]
    async fn test_launch_failure_returns_failed_page() {
        let log = event_log();
        let renderer = PageRenderer::new(
            Arc::new(FakeLauncher::with_behavior(&log, PageBehavior::FailLaunch)),
            Arc::new(RecordingSleeper::default()),
        );

        let page = renderer.render(URL, 30).await;

        assert!(!page.success);
        assert_eq!(events(&log), vec!["launch failed".to_string()]);
    }
}
