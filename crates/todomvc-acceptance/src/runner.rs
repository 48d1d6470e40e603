// Runner - Loads features and runs their scenarios
//
// Each scenario gets its own ScenarioWorld, and with it its own Stage and
// actors. Every step is bound before the first one runs; a scenario with an
// undefined or ambiguous step runs nothing. Once a step fails the rest are
// skipped, and the stage is always torn down.

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::report::{RunReport, ScenarioReport, StepReport, StepStatus};
use crate::steps::{Binding, Phase, PhaseTracker, StepRegistry};
use crate::world::ScenarioWorld;
use futures_util::stream::{self, StreamExt};
use gherkin::{Feature, GherkinEnv};
use screenplay::Cast;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use walkdir::WalkDir;

/// One step of a scenario as written in the feature file
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStep {
    pub keyword: String,
    pub text: String,
    pub phase: Phase,
    pub table: Option<Vec<Vec<String>>>,
}

/// A scenario with its background steps prepended
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioPlan {
    pub feature: String,
    pub name: String,
    pub tags: Vec<String>,
    pub steps: Vec<PlannedStep>,
    /// Why the scenario cannot be run, if it cannot
    pub unsupported: Option<String>,
}

/// Parses feature text, as read from `path`, into scenario plans.
pub fn parse_feature_str(source: &str, path: &Path) -> Result<Vec<ScenarioPlan>> {
    let feature = Feature::parse(source, GherkinEnv::default()).map_err(|e| Error::FeatureParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(plan_feature(&feature))
}

/// Parses one feature file.
pub fn load_feature(path: &Path) -> Result<Vec<ScenarioPlan>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| Error::from(e).context(format!("reading {}", path.display())))?;
    parse_feature_str(&source, path)
}

/// Feature files named by `paths`; directories are searched recursively,
/// in file name order.
pub fn feature_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(std::io::Error::from)?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "feature")
                {
                    files.push(entry.into_path());
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(Error::Config(format!("no feature file or directory at {}", path.display())));
        }
    }
    Ok(files)
}

fn plan_feature(feature: &Feature) -> Vec<ScenarioPlan> {
    let background = feature
        .background
        .as_ref()
        .map(|bg| bg.steps.as_slice())
        .unwrap_or_default();
    let feature_tags = normalize_tags(&feature.tags);

    let mut plans: Vec<ScenarioPlan> = feature
        .scenarios
        .iter()
        .map(|scenario| plan_scenario(&feature.name, &feature_tags, background, scenario))
        .collect();

    for rule in &feature.rules {
        let mut steps = background.to_vec();
        if let Some(bg) = &rule.background {
            steps.extend(bg.steps.iter().cloned());
        }
        let mut tags = feature_tags.clone();
        tags.extend(normalize_tags(&rule.tags));

        plans.extend(
            rule.scenarios
                .iter()
                .map(|scenario| plan_scenario(&feature.name, &tags, &steps, scenario)),
        );
    }
    plans
}

fn plan_scenario(
    feature: &str,
    inherited_tags: &[String],
    background: &[gherkin::Step],
    scenario: &gherkin::Scenario,
) -> ScenarioPlan {
    let mut tags = inherited_tags.to_vec();
    tags.extend(normalize_tags(&scenario.tags));

    let unsupported = (!scenario.examples.is_empty())
        .then(|| "scenario outlines with examples are not run".to_string());

    ScenarioPlan {
        feature: feature.to_string(),
        name: scenario.name.clone(),
        tags,
        steps: background
            .iter()
            .chain(&scenario.steps)
            .map(|step| PlannedStep {
                keyword: step.keyword.clone(),
                text: step.value.clone(),
                phase: Phase::from(step.ty),
                table: step.table.as_ref().map(|table| table.rows.clone()),
            })
            .collect(),
        unsupported,
    }
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.trim_start_matches('@').to_string())
        .collect()
}

/// Tag expression: plain tags include, `~tag` excludes.
///
/// A scenario runs when it carries none of the excluded tags and, if any
/// tags are included, at least one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl TagFilter {
    pub fn parse(tags: &[String]) -> Self {
        let mut filter = Self::default();
        for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            match tag.strip_prefix('~') {
                Some(excluded) => filter.exclude.push(excluded.trim_start_matches('@').to_string()),
                None => filter.include.push(tag.trim_start_matches('@').to_string()),
            }
        }
        filter
    }

    pub fn matches(&self, tags: &[String]) -> bool {
        let has = |wanted: &String| tags.contains(wanted);
        !self.exclude.iter().any(has) && (self.include.is_empty() || self.include.iter().any(has))
    }
}

/// Runs scenarios against a cast of actors.
pub struct Runner {
    config: Arc<RunConfig>,
    registry: Arc<StepRegistry>,
    cast: Arc<dyn Cast>,
}

impl Runner {
    pub fn new(config: RunConfig, registry: StepRegistry, cast: Arc<dyn Cast>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            cast,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Loads the configured features and runs every scenario the tag
    /// filter selects.
    pub async fn run(&self) -> Result<RunReport> {
        let mut plans = Vec::new();
        for file in feature_files(&self.config.features)? {
            tracing::debug!(path = %file.display(), "Loading feature");
            plans.extend(load_feature(&file)?);
        }

        let filter = TagFilter::parse(&self.config.tags);
        plans.retain(|plan| filter.matches(&plan.tags));
        tracing::info!(scenarios = plans.len(), "Features loaded");

        Ok(self.run_plans(plans).await)
    }

    /// Runs scenarios, up to `concurrency` at a time; the report keeps
    /// the order they were given in.
    pub async fn run_plans(&self, plans: Vec<ScenarioPlan>) -> RunReport {
        let started = Instant::now();

        let mut results: Vec<(usize, ScenarioReport)> = stream::iter(plans.iter().enumerate())
            .map(|(index, plan)| async move { (index, self.run_scenario(plan).await) })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;
        results.sort_by_key(|(index, _)| *index);

        RunReport {
            app_url: self.config.app_url.clone(),
            strict: self.config.strict,
            scenarios: results.into_iter().map(|(_, report)| report).collect(),
            duration: started.elapsed(),
        }
    }

    pub async fn run_scenario(&self, plan: &ScenarioPlan) -> ScenarioReport {
        let span = tracing::info_span!("scenario", feature = %plan.feature, name = %plan.name);
        self.run_scenario_inner(plan).instrument(span).await
    }

    async fn run_scenario_inner(&self, plan: &ScenarioPlan) -> ScenarioReport {
        let started = Instant::now();
        let mut report = ScenarioReport {
            feature: plan.feature.clone(),
            name: plan.name.clone(),
            tags: plan.tags.clone(),
            steps: Vec::with_capacity(plan.steps.len()),
            error: None,
            duration: Duration::ZERO,
        };

        if let Some(reason) = &plan.unsupported {
            let error = Error::UnsupportedScenario {
                scenario: plan.name.clone(),
                reason: reason.clone(),
            };
            tracing::warn!("{}", error);
            report.steps = plan
                .steps
                .iter()
                .map(|step| step_report(step, StepStatus::Skipped, None, Duration::ZERO))
                .collect();
            report.error = Some(error.to_string());
            report.duration = started.elapsed();
            return report;
        }

        let bindings: Vec<Result<Binding>> = plan
            .steps
            .iter()
            .map(|step| self.registry.resolve(&step.text, step.table.as_deref()))
            .collect();

        if bindings.iter().any(|binding| binding.is_err()) {
            for (step, binding) in plan.steps.iter().zip(bindings) {
                let entry = match binding {
                    Ok(_) => step_report(step, StepStatus::Skipped, None, Duration::ZERO),
                    Err(e) => {
                        tracing::warn!("{}", e);
                        let status = if e.is_binding_error() {
                            StepStatus::Undefined
                        } else {
                            StepStatus::Failed
                        };
                        step_report(step, status, Some(&e), Duration::ZERO)
                    }
                };
                report.steps.push(entry);
            }
            report.duration = started.elapsed();
            return report;
        }

        let mut world = ScenarioWorld::new(self.cast.clone(), self.config.clone());
        let mut tracker = PhaseTracker::new();
        let mut halted = false;

        for (step, binding) in plan.steps.iter().zip(bindings.into_iter().flatten()) {
            if halted {
                report
                    .steps
                    .push(step_report(step, StepStatus::Skipped, None, Duration::ZERO));
                continue;
            }

            let step_started = Instant::now();
            let outcome = match tracker.advance(step.phase, &step.text) {
                Ok(()) => binding.run(&mut world).await,
                Err(e) => Err(e),
            };

            let entry = match outcome {
                Ok(()) => {
                    tracing::info!("{}{} ... passed", step.keyword, step.text);
                    step_report(step, StepStatus::Passed, None, step_started.elapsed())
                }
                Err(e @ Error::Pending(_)) => {
                    tracing::warn!("{}{} ... pending", step.keyword, step.text);
                    halted = true;
                    step_report(step, StepStatus::Pending, Some(&e), step_started.elapsed())
                }
                Err(e) => {
                    tracing::error!("{}{} ... failed: {}", step.keyword, step.text, e);
                    halted = true;
                    step_report(step, StepStatus::Failed, Some(&e), step_started.elapsed())
                }
            };
            report.steps.push(entry);
        }
        tracker.finish();

        if let Err(e) = world.draw_the_curtain().await {
            tracing::warn!("Teardown failed: {}", e);
            report.error = Some(e.context("tearing down the stage").to_string());
        }

        report.duration = started.elapsed();
        tracing::info!(status = %report.status(), "Scenario finished");
        report
    }
}

fn step_report(
    step: &PlannedStep,
    status: StepStatus,
    error: Option<&Error>,
    duration: Duration,
) -> StepReport {
    StepReport {
        keyword: step.keyword.clone(),
        text: step.text.clone(),
        phase: step.phase,
        status,
        error: error.map(ToString::to_string),
        duration,
    }
}
