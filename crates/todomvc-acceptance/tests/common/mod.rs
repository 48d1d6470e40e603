// Shared helpers for the acceptance runner's integration tests

#![allow(dead_code)]

pub mod todo_app;

use screenplay::Cast;
use screenplay::testing::ScriptedSession;
use std::sync::Arc;
use std::time::Duration;
use todomvc_acceptance::page;
use todomvc_acceptance::{RunConfig, Runner, StepRegistry, todo_steps};

/// Installs a test subscriber honouring RUST_LOG; repeated calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A session showing the TodoMVC footer and an empty list
pub fn todomvc_session() -> ScriptedSession {
    ScriptedSession::new()
        .with_text(page::footer().selector(), "Double-click to edit a todo\nPart of TodoMVC")
        .with_attribute(
            page::new_todo_field().selector(),
            "placeholder",
            "What needs to be done?",
        )
}

/// Configuration with assertions that give up quickly
pub fn quick_config() -> RunConfig {
    RunConfig::new()
        .app_url("http://localhost:8080/")
        .assertion_timeout(Duration::from_millis(200))
}

pub fn runner(config: RunConfig, cast: Arc<dyn Cast>) -> Runner {
    let registry = StepRegistry::build(todo_steps()).expect("step table should be valid");
    Runner::new(config, registry, cast).expect("config should be valid")
}
