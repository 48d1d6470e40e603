// Report - Outcome of a run
//
// The runner records one StepReport per step of every scenario, including
// the ones it skipped. The console form is printed by the binary; the JSON
// form is written when a report path is configured.

use crate::error::Result;
use crate::steps::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Passed,
    Failed,
    /// Not run because an earlier step failed
    Skipped,
    /// Recognised but not implemented
    Pending,
    /// No definition, or more than one
    Undefined,
}

impl StepStatus {
    fn marker(&self) -> &'static str {
        match self {
            StepStatus::Passed => "✓",
            StepStatus::Failed => "✗",
            StepStatus::Skipped => "-",
            StepStatus::Pending => "?",
            StepStatus::Undefined => "!",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepStatus::Passed => "passed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
            StepStatus::Pending => "pending",
            StepStatus::Undefined => "undefined",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    /// The keyword as written ("Given ", "And ", ...)
    pub keyword: String,
    pub text: String,
    pub phase: Phase,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(with = "millis")]
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub feature: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub steps: Vec<StepReport>,
    /// Failure that did not belong to a step, such as teardown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(with = "millis")]
    pub duration: Duration,
}

impl ScenarioReport {
    /// The worst step status, or `Failed` for a scenario-level error
    pub fn status(&self) -> StepStatus {
        if self.error.is_some() {
            return StepStatus::Failed;
        }
        let has = |status| self.steps.iter().any(|step| step.status == status);
        if has(StepStatus::Undefined) {
            StepStatus::Undefined
        } else if has(StepStatus::Failed) {
            StepStatus::Failed
        } else if has(StepStatus::Pending) {
            StepStatus::Pending
        } else {
            StepStatus::Passed
        }
    }

    /// Passed, or pending in a lenient run
    pub fn is_success(&self, strict: bool) -> bool {
        match self.status() {
            StepStatus::Passed => true,
            StepStatus::Pending => !strict,
            _ => false,
        }
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.status();
        writeln!(f, "{} {}: {} ({})", status.marker(), self.feature, self.name, status)?;
        for step in &self.steps {
            writeln!(
                f,
                "    {} {}{}",
                step.status.marker(),
                step.keyword,
                step.text
            )?;
            if let Some(error) = &step.error {
                writeln!(f, "        {}", error)?;
            }
        }
        if let Some(error) = &self.error {
            writeln!(f, "    {}", error)?;
        }
        Ok(())
    }
}

/// Counts per scenario status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
    pub undefined: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.pending + self.undefined
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scenarios ({} passed, {} failed, {} pending, {} undefined)",
            self.total(),
            self.passed,
            self.failed,
            self.pending,
            self.undefined
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub app_url: String,
    pub strict: bool,
    pub scenarios: Vec<ScenarioReport>,
    #[serde(with = "millis")]
    pub duration: Duration,
}

impl RunReport {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for scenario in &self.scenarios {
            match scenario.status() {
                StepStatus::Passed => summary.passed += 1,
                StepStatus::Pending => summary.pending += 1,
                StepStatus::Undefined => summary.undefined += 1,
                StepStatus::Failed | StepStatus::Skipped => summary.failed += 1,
            }
        }
        summary
    }

    /// True when every scenario passed (pending allowed unless strict)
    pub fn is_success(&self) -> bool {
        self.scenarios
            .iter()
            .all(|scenario| scenario.is_success(self.strict))
    }

    pub fn write_json(&self, path: &Path) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| {
            crate::error::Error::from(e).context(format!("writing report to {}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "Report written");
        Ok(path.to_path_buf())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for scenario in &self.scenarios {
            write!(f, "{}", scenario)?;
        }
        write!(f, "{} in {:.2}s", self.summary(), self.duration.as_secs_f64())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(text: &str, status: StepStatus) -> StepReport {
        StepReport {
            keyword: "Given ".to_string(),
            text: text.to_string(),
            phase: Phase::Given,
            status,
            error: None,
            duration: Duration::from_millis(12),
        }
    }

    fn scenario(name: &str, steps: Vec<StepReport>) -> ScenarioReport {
        ScenarioReport {
            feature: "Adding todos".to_string(),
            name: name.to_string(),
            tags: Vec::new(),
            steps,
            error: None,
            duration: Duration::from_millis(40),
        }
    }

    #[test]
    fn test_scenario_status_takes_the_worst_step() {
        let passed = scenario("a", vec![step("one", StepStatus::Passed)]);
        assert_eq!(passed.status(), StepStatus::Passed);

        let failed = scenario(
            "b",
            vec![step("one", StepStatus::Failed), step("two", StepStatus::Skipped)],
        );
        assert_eq!(failed.status(), StepStatus::Failed);

        let pending = scenario(
            "c",
            vec![step("one", StepStatus::Passed), step("two", StepStatus::Pending)],
        );
        assert_eq!(pending.status(), StepStatus::Pending);
        assert!(!pending.is_success(true));
        assert!(pending.is_success(false));

        let mut torn = scenario("d", vec![step("one", StepStatus::Passed)]);
        torn.error = Some("teardown failed".to_string());
        assert_eq!(torn.status(), StepStatus::Failed);
    }

    #[test]
    fn test_summary_and_success() {
        let report = RunReport {
            app_url: "http://localhost/".to_string(),
            strict: true,
            scenarios: vec![
                scenario("a", vec![step("one", StepStatus::Passed)]),
                scenario("b", vec![step("one", StepStatus::Undefined)]),
            ],
            duration: Duration::from_secs(1),
        };

        let summary = report.summary();
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.undefined, 1);
        assert_eq!(
            summary.to_string(),
            "2 scenarios (1 passed, 0 failed, 0 pending, 1 undefined)"
        );
        assert!(!report.is_success());
    }

    #[test]
    fn test_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut failing = step("she adds \"Buy milk\"", StepStatus::Failed);
        failing.error = Some("Element not found".to_string());
        let report = RunReport {
            app_url: "http://localhost/".to_string(),
            strict: true,
            scenarios: vec![scenario("a", vec![failing])],
            duration: Duration::from_millis(1500),
        };

        let path = report.write_json(&dir.path().join("report.json")).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(json["appUrl"], "http://localhost/");
        assert_eq!(json["duration"], 1500);
        assert_eq!(json["scenarios"][0]["steps"][0]["status"], "failed");
        assert_eq!(json["scenarios"][0]["steps"][0]["phase"], "Given");
        assert_eq!(json["scenarios"][0]["steps"][0]["error"], "Element not found");
    }
}
