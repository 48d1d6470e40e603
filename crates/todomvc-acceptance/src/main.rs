//! todomvc-acceptance - runs the TodoMVC features in a browser
//!
//! Exits with status 1 when any scenario does not pass.

use anyhow::Context;
use clap::Parser;
use screenplay::OnlineCast;
use std::sync::Arc;
use todomvc_acceptance::{Cli, Runner, StepRegistry, todo_steps};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let registry = StepRegistry::build(todo_steps()).context("invalid step table")?;
    if cli.list_steps {
        for line in registry.describe() {
            println!("{}", line);
        }
        return Ok(());
    }

    let config = cli.into_config();
    let cast = Arc::new(OnlineCast::new(config.browser.clone()));
    let report_path = config.report.clone();

    let runner = Runner::new(config, registry, cast)?;
    let report = runner.run().await?;
    println!("{}", report);

    if let Some(path) = report_path {
        report.write_json(&path)?;
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
