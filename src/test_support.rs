// src/test_support.rs
//! Fakes for the browser, provider and clock seams.

use crate::browser::{BrowserLauncher, BrowserSession};
use crate::completion::{CompletionClient, CompletionRequest};
use crate::error::{Result, ScrapeError};
use crate::pacing::Sleeper;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[derive(Debug, Clone)]
pub enum PageBehavior {
    Serve(String),
    FailOpen(String),
    Hang,
    FailLaunch,
}

pub struct FakeLauncher {
    log: EventLog,
    default: PageBehavior,
    by_url: HashMap<String, PageBehavior>,
}

impl FakeLauncher {
    pub fn serving(log: &EventLog, html: &str) -> Self {
        Self::with_behavior(log, PageBehavior::Serve(html.to_string()))
    }

    pub fn with_behavior(log: &EventLog, behavior: PageBehavior) -> Self {
        Self {
            log: Arc::clone(log),
            default: behavior,
            by_url: HashMap::new(),
        }
    }

    pub fn route(mut self, url: &str, behavior: PageBehavior) -> Self {
        self.by_url.insert(url.to_string(), behavior);
        self
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        if matches!(self.default, PageBehavior::FailLaunch) {
            self.log.lock().unwrap().push("launch failed".to_string());
            return Err(ScrapeError::Render("chrome not found".to_string()));
        }
        self.log.lock().unwrap().push("launch".to_string());
        Ok(Box::new(FakeSession {
            log: Arc::clone(&self.log),
            default: self.default.clone(),
            by_url: self.by_url.clone(),
            current: None,
        }))
    }
}

pub struct FakeSession {
    log: EventLog,
    default: PageBehavior,
    by_url: HashMap<String, PageBehavior>,
    current: Option<PageBehavior>,
}

impl FakeSession {
    fn push(&self, event: String) {
        self.log.lock().unwrap().push(event);
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn open(&mut self, url: &str) -> Result<()> {
        self.push(format!("open {}", url));
        let behavior = self
            .by_url
            .get(url)
            .cloned()
            .unwrap_or_else(|| self.default.clone());
        match &behavior {
            PageBehavior::FailOpen(reason) => return Err(ScrapeError::Render(reason.clone())),
            PageBehavior::Hang => std::future::pending::<()>().await,
            _ => {}
        }
        self.current = Some(behavior);
        Ok(())
    }

    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value> {
        self.push(format!("script {}", script));
        Ok(serde_json::Value::Null)
    }

    async fn scroll_by(&mut self, dx: i64, dy: i64) -> Result<()> {
        self.push(format!("scroll {} {}", dx, dy));
        Ok(())
    }

    async fn current_content(&mut self) -> Result<String> {
        self.push("content".to_string());
        match &self.current {
            Some(PageBehavior::Serve(html)) => Ok(html.clone()),
            _ => Err(ScrapeError::Render("no page loaded".to_string())),
        }
    }

    async fn close(&mut self) {
        self.push("close".to_string());
    }
}

/// Records requested delays instead of waiting
#[derive(Default)]
pub struct RecordingSleeper {
    log: Option<EventLog>,
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn logging_to(log: &EventLog) -> Self {
        Self {
            log: Some(Arc::clone(log)),
            delays: Mutex::new(Vec::new()),
        }
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
        if let Some(log) = &self.log {
            log.lock().unwrap().push("sleep".to_string());
        }
    }
}

/// Provider that replays canned responses in order
#[derive(Default)]
pub struct ScriptedCompletion {
    responses: Mutex<VecDeque<std::result::Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn new<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = std::result::Result<&'static str, &'static str>>,
    {
        Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|r| r.map(String::from).map_err(String::from))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ScrapeError::Provider(message)),
            None => Err(ScrapeError::Provider("no scripted response left".to_string())),
        }
    }
}
