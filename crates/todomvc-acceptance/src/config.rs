// Run configuration
//
// Everything a run needs to know up front: where the application lives,
// which features to run, how browsers are launched, and how strict the
// runner is. Populated from the command line (see `cli`) or built in code.

use crate::error::{Error, Result};
use crate::tasks::EditStrategy;
use screenplay::BrowserConfig;
use screenplay::ensure::DEFAULT_ASSERTION_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// The public React build of TodoMVC
pub const DEFAULT_APP_URL: &str = "https://todomvc.com/examples/react/dist/";

/// Options for one acceptance run
///
/// ```ignore
/// let config = RunConfig::new()
///     .app_url("http://localhost:8080/")
///     .features(vec!["features/add_todo.feature".into()])
///     .concurrency(2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// Address opened by "opens the Todo Application"
    pub app_url: String,

    /// Feature files, or directories searched for `.feature` files
    pub features: Vec<PathBuf>,

    /// Tag filter; `~tag` excludes. Empty runs everything.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    pub browser: BrowserConfig,

    pub edit_strategy: EditStrategy,

    /// Fail scenarios that reach a pending step
    pub strict: bool,

    /// Scenarios running at the same time
    pub concurrency: usize,

    /// How long assertions keep polling before failing
    pub assertion_timeout: Duration,

    /// Where to write the JSON report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            app_url: DEFAULT_APP_URL.to_string(),
            features: vec![PathBuf::from("features")],
            tags: Vec::new(),
            browser: BrowserConfig::default(),
            edit_strategy: EditStrategy::default(),
            strict: true,
            concurrency: 1,
            assertion_timeout: DEFAULT_ASSERTION_TIMEOUT,
            report: None,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_url(mut self, url: impl Into<String>) -> Self {
        self.app_url = url.into();
        self
    }

    pub fn features(mut self, features: Vec<PathBuf>) -> Self {
        self.features = features;
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    pub fn edit_strategy(mut self, strategy: EditStrategy) -> Self {
        self.edit_strategy = strategy;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn assertion_timeout(mut self, timeout: Duration) -> Self {
        self.assertion_timeout = timeout;
        self
    }

    pub fn report(mut self, path: impl Into<PathBuf>) -> Self {
        self.report = Some(path.into());
        self
    }

    /// Checks the settings before anything is launched.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        if !["http://", "https://", "file://"]
            .iter()
            .any(|scheme| self.app_url.starts_with(scheme))
        {
            return Err(Error::Config(format!(
                "application URL '{}' must start with http://, https:// or file://",
                self.app_url
            )));
        }
        if self.features.is_empty() {
            return Err(Error::Config("no feature files given".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.app_url, DEFAULT_APP_URL);
        assert!(config.strict);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.edit_strategy, EditStrategy::SelectAllThenDelete);
        assert_eq!(config.assertion_timeout, Duration::from_secs(5));
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(RunConfig::new().concurrency(0).validate().is_err());
        assert!(RunConfig::new().app_url("todomvc.com").validate().is_err());
        assert!(RunConfig::new().features(vec![]).validate().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(RunConfig::new().report("report.json")).unwrap();
        assert_eq!(json["appUrl"], DEFAULT_APP_URL);
        assert_eq!(json["editStrategy"], "select-all-then-delete");
        assert_eq!(json["report"], "report.json");
        assert!(json.get("tags").is_none());
    }
}
