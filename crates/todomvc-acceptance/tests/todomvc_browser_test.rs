// Browser tests: the bundled features against a local TodoMVC page
//
// These launch Chromium through Playwright, so they need the driver and its
// browsers installed (`npx playwright install chromium`).
//
// Tests cover:
// - every bundled feature passes against the fixture page
// - both edit strategies rename an item
// - a wrong expectation fails with the actual list

mod common;

use screenplay::{BrowserConfig, OnlineCast};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use test_server::TestServer;
use todomvc_acceptance::runner::parse_feature_str;
use todomvc_acceptance::{EditStrategy, RunConfig, Runner, StepRegistry, StepStatus, todo_steps};

fn features_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("features")
}

fn runner(config: RunConfig) -> Runner {
    let cast = Arc::new(OnlineCast::new(BrowserConfig::default()));
    Runner::new(config, StepRegistry::build(todo_steps()).unwrap(), cast).unwrap()
}

#[tokio::test]
#[ignore = "Needs Playwright browsers installed"]
async fn test_bundled_features_pass() {
    common::init_tracing();
    let server = TestServer::start().await;

    let config = RunConfig::new()
        .app_url(server.url())
        .features(vec![features_dir()])
        .concurrency(2);
    let report = runner(config).run().await.expect("Failed to run features");

    assert!(!report.scenarios.is_empty());
    assert!(report.is_success(), "{}", report);

    server.shutdown();
}

#[tokio::test]
#[ignore = "Needs Playwright browsers installed"]
async fn test_both_edit_strategies_rename_items() {
    common::init_tracing();
    let server = TestServer::start().await;
    let feature = features_dir().join("update_todo.feature");

    for strategy in [EditStrategy::SelectAllThenDelete, EditStrategy::BackspacePerCharacter] {
        let config = RunConfig::new()
            .app_url(server.url())
            .features(vec![feature.clone()])
            .edit_strategy(strategy);
        let report = runner(config).run().await.expect("Failed to run feature");
        assert!(report.is_success(), "{}: {}", strategy, report);
    }

    server.shutdown();
}

#[tokio::test]
#[ignore = "Needs Playwright browsers installed"]
async fn test_wrong_expectation_reports_actual_list() {
    common::init_tracing();
    let server = TestServer::start().await;

    let config = RunConfig::new()
        .app_url(server.url())
        .assertion_timeout(Duration::from_millis(500));
    let plans = parse_feature_str(
        r#"Feature: Wrong
  Scenario: Expecting the wrong item
    Given Toby has a todo list containing
      | Buy milk |
    Then his todo list should contain exactly:
      | Walk dog |
"#,
        &features_dir().join("wrong.feature"),
    )
    .unwrap();
    let report = runner(config).run_plans(plans).await;

    let scenario = &report.scenarios[0];
    assert_eq!(scenario.steps[1].status, StepStatus::Failed);
    let error = scenario.steps[1].error.as_ref().unwrap();
    assert!(error.contains(r#"["Buy milk"]"#), "{}", error);

    server.shutdown();
}
