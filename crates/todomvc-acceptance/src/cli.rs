// Command line for the acceptance runner
//
// Every flag falls back to a TODOMVC_* environment variable so CI can
// configure a run without editing the command.

use crate::config::{DEFAULT_APP_URL, RunConfig};
use crate::tasks::EditStrategy;
use clap::{ArgAction, Parser};
use screenplay::{BrowserConfig, BrowserKind};
use std::path::PathBuf;
use std::time::Duration;

/// Runs the TodoMVC acceptance features in a real browser
#[derive(Debug, Parser)]
#[command(name = "todomvc-acceptance")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Feature files or directories
    #[arg(env = "TODOMVC_FEATURES", value_delimiter = ',', default_value = "features")]
    pub features: Vec<PathBuf>,

    /// Address of the application under test
    #[arg(long, env = "TODOMVC_URL", default_value = DEFAULT_APP_URL)]
    pub url: String,

    /// Browser to launch (chromium, firefox, webkit)
    #[arg(long, env = "TODOMVC_BROWSER", default_value = "chromium")]
    pub browser: BrowserKind,

    /// Run the browser without a window
    #[arg(long, env = "TODOMVC_HEADLESS", default_value_t = true, action = ArgAction::Set)]
    pub headless: bool,

    /// Delay every browser operation, in milliseconds
    #[arg(long, env = "TODOMVC_SLOW_MO_MS")]
    pub slow_mo_ms: Option<u64>,

    /// Only run scenarios with these tags; prefix with ~ to exclude
    #[arg(long, env = "TODOMVC_TAGS", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// How an item's label is cleared before retyping it (select-all, backspace)
    #[arg(long, env = "TODOMVC_EDIT_STRATEGY", default_value = "select-all")]
    pub edit_strategy: EditStrategy,

    /// Report pending steps without failing the run
    #[arg(long)]
    pub lenient: bool,

    /// Scenarios to run at the same time
    #[arg(long, env = "TODOMVC_CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,

    /// How long assertions keep retrying, in milliseconds
    #[arg(long, env = "TODOMVC_ASSERTION_TIMEOUT_MS", default_value_t = 5000)]
    pub assertion_timeout_ms: u64,

    /// Write a JSON report to this file
    #[arg(long, env = "TODOMVC_REPORT")]
    pub report: Option<PathBuf>,

    /// Print the supported step sentences and exit
    #[arg(long)]
    pub list_steps: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> RunConfig {
        let mut browser = BrowserConfig::new().kind(self.browser).headless(self.headless);
        if let Some(ms) = self.slow_mo_ms {
            browser = browser.slow_mo(Duration::from_millis(ms));
        }

        let mut config = RunConfig::new()
            .app_url(self.url)
            .features(self.features)
            .tags(self.tags)
            .browser(browser)
            .edit_strategy(self.edit_strategy)
            .strict(!self.lenient)
            .concurrency(self.concurrency)
            .assertion_timeout(Duration::from_millis(self.assertion_timeout_ms));
        if let Some(report) = self.report {
            config = config.report(report);
        }
        config
    }
}
