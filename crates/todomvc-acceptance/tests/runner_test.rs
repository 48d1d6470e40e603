// Integration tests for the scenario runner
//
// Scenarios run against scripted sessions, so these tests need no browser.
//
// Tests cover:
// - a passing scenario casts its actor, opens the app, and closes the session
// - an undefined step fails the scenario before anything runs
// - a step moving back to an earlier phase fails as out of order
// - a failing step skips the rest but teardown still runs
// - pending steps fail strict runs only
// - concurrent scenarios keep their order and their own actors
// - feature loading from disk with a tag filter

mod common;

use screenplay::testing::{Call, ScriptedCast, ScriptedSession};
use std::path::Path;
use std::sync::Arc;
use todomvc_acceptance::page;
use todomvc_acceptance::runner::parse_feature_str;
use todomvc_acceptance::steps::StepDefinition;
use todomvc_acceptance::{Runner, StepRegistry, StepStatus, todo_steps};

fn plans(feature: &str) -> Vec<todomvc_acceptance::ScenarioPlan> {
    parse_feature_str(feature, Path::new("test.feature")).expect("feature should parse")
}

fn statuses(report: &todomvc_acceptance::ScenarioReport) -> Vec<StepStatus> {
    report.steps.iter().map(|step| step.status).collect()
}

#[tokio::test]
async fn test_passing_scenario_tears_down() {
    common::init_tracing();
    let cast = Arc::new(ScriptedCast::with_factory(common::todomvc_session));
    let runner = common::runner(common::quick_config(), cast.clone());

    let report = runner
        .run_plans(plans(
            r#"Feature: Footer
  Scenario: Credits
    Given Toby opens the Todo Application
    Then he should see the credits in the footer
    And the application should suggest how to add them
"#,
        ))
        .await;

    assert!(report.is_success(), "{}", report);
    assert_eq!(
        statuses(&report.scenarios[0]),
        vec![StepStatus::Passed, StepStatus::Passed, StepStatus::Passed]
    );

    assert_eq!(cast.cast_names(), vec!["Toby"]);
    let session = cast.session_for("Toby").unwrap();
    assert_eq!(
        session.calls(),
        vec![Call::Open("http://localhost:8080/".to_string())]
    );
    assert!(session.is_closed());
}

#[tokio::test]
async fn test_undefined_step_runs_nothing() {
    common::init_tracing();
    let cast = Arc::new(ScriptedCast::with_factory(common::todomvc_session));
    let runner = common::runner(common::quick_config(), cast.clone());

    let report = runner
        .run_plans(plans(
            r#"Feature: Juggling
  Scenario: Juggling todos
    Given Toby opens the Todo Application
    When he juggles "Buy milk"
"#,
        ))
        .await;

    let scenario = &report.scenarios[0];
    assert_eq!(scenario.status(), StepStatus::Undefined);
    assert_eq!(
        statuses(scenario),
        vec![StepStatus::Skipped, StepStatus::Undefined]
    );
    assert!(scenario.steps[1].error.as_ref().unwrap().contains("Undefined step"));
    assert!(cast.cast_names().is_empty());
    assert!(!report.is_success());
}

#[tokio::test]
async fn test_step_out_of_order_fails() {
    common::init_tracing();
    let cast = Arc::new(ScriptedCast::with_factory(common::todomvc_session));
    let runner = common::runner(common::quick_config(), cast.clone());

    let report = runner
        .run_plans(plans(
            r#"Feature: Order
  Scenario: Acting after checking
    Given Toby opens the Todo Application
    Then he should see the credits in the footer
    When he adds "Buy milk"
"#,
        ))
        .await;

    let scenario = &report.scenarios[0];
    assert_eq!(
        statuses(scenario),
        vec![StepStatus::Passed, StepStatus::Passed, StepStatus::Failed]
    );
    assert!(scenario.steps[2].error.as_ref().unwrap().contains("already in the Then phase"));

    // The out-of-order step never reached the browser
    let session = cast.session_for("Toby").unwrap();
    assert_eq!(session.calls().len(), 1);
    assert!(session.is_closed());
}

#[tokio::test]
async fn test_failure_skips_remaining_steps_and_tears_down() {
    common::init_tracing();
    let cast = Arc::new(ScriptedCast::with_factory(|| {
        common::todomvc_session().failing_on(page::new_todo_field().selector())
    }));
    let runner = common::runner(common::quick_config(), cast.clone());

    let report = runner
        .run_plans(plans(
            r#"Feature: Adding
  Scenario: The field is missing
    Given Toby opens the Todo Application
    When he adds "Buy milk"
    Then his todo list should contain:
      | Buy milk |
"#,
        ))
        .await;

    let scenario = &report.scenarios[0];
    assert_eq!(
        statuses(scenario),
        vec![StepStatus::Passed, StepStatus::Failed, StepStatus::Skipped]
    );
    assert!(scenario.steps[1].error.as_ref().unwrap().contains("the new todo field"));
    assert!(cast.session_for("Toby").unwrap().is_closed());
    assert!(!report.is_success());
}

#[tokio::test]
async fn test_failed_assertion_reports_expected_and_actual() {
    common::init_tracing();
    let cast = Arc::new(ScriptedCast::with_factory(|| {
        common::todomvc_session()
            .with_texts(page::todo_list_labels().selector(), &["Buy milk", "Walk dog"])
    }));
    let runner = common::runner(common::quick_config(), cast);

    let report = runner
        .run_plans(plans(
            r#"Feature: Listing
  Scenario: Wrong list
    Given Toby opens the Todo Application
    Then his todo list should contain exactly:
      | Buy milk |
"#,
        ))
        .await;

    let error = report.scenarios[0].steps[1].error.clone().unwrap();
    assert!(error.contains(r#"["Buy milk"]"#), "{}", error);
    assert!(error.contains(r#"["Buy milk", "Walk dog"]"#), "{}", error);
}

#[tokio::test]
async fn test_pending_steps_fail_strict_runs_only() {
    common::init_tracing();
    let feature = r#"Feature: Archiving
  Scenario: Archiving an item
    Given Toby opens the Todo Application
    When he archives "Buy milk"
    Then he should see the credits in the footer
"#;
    let registry = || {
        let mut steps = todo_steps();
        steps.push(StepDefinition::pending("he/she archives {string}", 1));
        StepRegistry::build(steps).unwrap()
    };

    for strict in [true, false] {
        let cast = Arc::new(ScriptedCast::with_factory(common::todomvc_session));
        let runner = Runner::new(common::quick_config().strict(strict), registry(), cast.clone()).unwrap();

        let report = runner.run_plans(plans(feature)).await;
        let scenario = &report.scenarios[0];

        assert_eq!(scenario.status(), StepStatus::Pending);
        assert_eq!(
            statuses(scenario),
            vec![StepStatus::Passed, StepStatus::Pending, StepStatus::Skipped]
        );
        assert_eq!(report.is_success(), !strict);
        assert!(cast.session_for("Toby").unwrap().is_closed());
    }
}

#[tokio::test]
async fn test_concurrent_scenarios_keep_order_and_isolation() {
    common::init_tracing();
    let cast = Arc::new(ScriptedCast::with_factory(common::todomvc_session));
    let runner = common::runner(common::quick_config().concurrency(3), cast.clone());

    let report = runner
        .run_plans(plans(
            r#"Feature: Many
  Scenario: First
    Given Toby opens the Todo Application
    Then he should see the credits in the footer

  Scenario: Second
    Given Jane opens the Todo Application
    Then she should see the credits in the footer

  Scenario: Third
    Given Toby opens the Todo Application
    Then he should see "Part of TodoMVC" in the footer
"#,
        ))
        .await;

    let names: Vec<_> = report.scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
    assert!(report.is_success(), "{}", report);

    // Every scenario cast its own actor, even when names repeat
    assert_eq!(cast.sessions().len(), 3);
    assert!(cast.sessions().iter().all(|session| session.is_closed()));
}

#[tokio::test]
async fn test_run_loads_features_and_filters_tags() {
    common::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("footer.feature"),
        r#"Feature: Footer
  @smoke
  Scenario: Credits
    Given Toby opens the Todo Application
    Then he should see the credits in the footer

  @slow
  Scenario: Prompt
    Given Toby has not entered any todo items
    Then the application should suggest how to add them
"#,
    )
    .unwrap();

    let cast = Arc::new(ScriptedCast::with_factory(common::todomvc_session));
    let config = common::quick_config()
        .features(vec![dir.path().to_path_buf()])
        .tags(vec!["~slow".to_string()]);
    let runner = common::runner(config, cast);

    let report = runner.run().await.unwrap();
    assert_eq!(report.scenarios.len(), 1);
    assert_eq!(report.scenarios[0].name, "Credits");
    assert_eq!(report.scenarios[0].tags, vec!["smoke"]);
    assert!(report.is_success());
}

#[tokio::test]
async fn test_missing_element_is_reported() {
    common::init_tracing();
    let session = Arc::new(ScriptedSession::new());
    let cast = Arc::new(ScriptedCast::new().with_session("Toby", session.clone()));
    let runner = common::runner(common::quick_config(), cast);

    let report = runner
        .run_plans(plans(
            r#"Feature: Footer
  Scenario: No footer on the page
    Given Toby opens the Todo Application
    Then he should see the credits in the footer
"#,
        ))
        .await;

    let scenario = &report.scenarios[0];
    assert_eq!(scenario.status(), StepStatus::Failed);
    assert!(scenario.steps[1].error.as_ref().unwrap().contains("the footer section"));
    assert!(session.is_closed());
}
