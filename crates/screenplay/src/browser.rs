// Browser - Playwright-backed WebSession
//
// One PlaywrightSession owns a Playwright server connection, one browser
// and one page. Sessions are never shared between actors, which is what
// keeps scenarios isolated from each other.

use crate::error::{Error, Result};
use crate::session::{Key, WebSession};
use crate::target::Selector;
use async_trait::async_trait;
use playwright_rs::api::LaunchOptions;
use playwright_rs::{Browser, Page, Playwright};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Browser engine to launch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" | "safari" => Ok(BrowserKind::Webkit),
            other => Err(format!(
                "unknown browser '{}' (expected chromium, firefox or webkit)",
                other
            )),
        }
    }
}

/// Settings used when a cast launches a browser for a new actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    pub kind: BrowserKind,
    pub headless: bool,

    /// Delay inserted by the driver before every operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow_mo: Option<Duration>,

    /// Budget for launching the browser
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_timeout: Option<Duration>,

    /// Extra command-line arguments for the browser process
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: BrowserKind::default(),
            headless: true,
            slow_mo: None,
            launch_timeout: None,
            args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: BrowserKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn slow_mo(mut self, delay: Duration) -> Self {
        self.slow_mo = Some(delay);
        self
    }

    pub fn launch_timeout(mut self, timeout: Duration) -> Self {
        self.launch_timeout = Some(timeout);
        self
    }

    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Converts the settings into driver launch options
    pub fn launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new().headless(self.headless);
        if let Some(delay) = self.slow_mo {
            options = options.slow_mo(delay.as_secs_f64() * 1000.0);
        }
        if let Some(timeout) = self.launch_timeout {
            options = options.timeout(timeout.as_secs_f64() * 1000.0);
        }
        if !self.args.is_empty() {
            options = options.args(self.args.clone());
        }
        options
    }
}

/// A WebSession driving one page of a dedicated browser.
pub struct PlaywrightSession {
    playwright: Playwright,
    browser: Browser,
    page: Page,
    closed: AtomicBool,
}

impl PlaywrightSession {
    /// Starts the Playwright server, launches a browser and opens a blank page.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        tracing::debug!(browser = %config.kind, headless = config.headless, "Launching browser");

        let playwright = Playwright::launch().await?;
        let browser_type = match config.kind {
            BrowserKind::Chromium => playwright.chromium(),
            BrowserKind::Firefox => playwright.firefox(),
            BrowserKind::Webkit => playwright.webkit(),
        };
        let browser = browser_type
            .launch_with_options(config.launch_options())
            .await?;
        let page = browser.new_page().await?;

        Ok(Self {
            playwright,
            browser,
            page,
            closed: AtomicBool::new(false),
        })
    }

    /// The page this session drives
    pub fn page(&self) -> &Page {
        &self.page
    }

    async fn locator(&self, selector: &Selector) -> Result<playwright_rs::Locator> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::SessionClosed(format!(
                "cannot resolve {} on a closed session",
                selector
            )));
        }
        Ok(self.page.locator(&selector.to_engine_string()).await)
    }
}

#[async_trait]
impl WebSession for PlaywrightSession {
    async fn open(&self, url: &str) -> Result<()> {
        tracing::debug!(url, "Navigating");
        self.page.goto(url, None).await?;
        Ok(())
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        self.locator(selector).await?.click(None).await?;
        Ok(())
    }

    async fn double_click(&self, selector: &Selector) -> Result<()> {
        self.locator(selector).await?.dblclick(None).await?;
        Ok(())
    }

    async fn fill(&self, selector: &Selector, text: &str) -> Result<()> {
        self.locator(selector).await?.fill(text, None).await?;
        Ok(())
    }

    async fn press(&self, selector: &Selector, key: Key) -> Result<()> {
        self.locator(selector)
            .await?
            .press(key.as_str(), None)
            .await?;
        Ok(())
    }

    async fn press_keys(&self, keys: &[Key]) -> Result<()> {
        let keyboard = self.page.keyboard();
        for key in keys {
            keyboard.press(key.as_str(), None).await?;
        }
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        self.page.keyboard().type_text(text, None).await?;
        Ok(())
    }

    async fn text_content(&self, selector: &Selector) -> Result<String> {
        let text = self.locator(selector).await?.text_content().await?;
        Ok(text.unwrap_or_default())
    }

    async fn text_contents(&self, selector: &Selector) -> Result<Vec<String>> {
        let locator = self.locator(selector).await?;
        let count = locator.count().await?;
        let mut texts = Vec::with_capacity(count);
        for index in 0..count {
            let text = locator.nth(index as i32).text_content().await?;
            texts.push(text.unwrap_or_default());
        }
        Ok(texts)
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> Result<Option<String>> {
        Ok(self.locator(selector).await?.get_attribute(name).await?)
    }

    async fn is_visible(&self, selector: &Selector) -> Result<bool> {
        Ok(self.locator(selector).await?.is_visible().await?)
    }

    async fn count(&self, selector: &Selector) -> Result<usize> {
        Ok(self.locator(selector).await?.count().await?)
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::debug!("Closing browser session");
        let closed = self.browser.close().await;
        let shutdown = self.playwright.shutdown().await;
        closed?;
        shutdown?;
        Ok(())
    }
}

impl fmt::Debug for PlaywrightSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaywrightSession")
            .field("url", &self.page.url())
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish()
    }
}
