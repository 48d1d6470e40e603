//! todomvc-acceptance: Gherkin acceptance features for TodoMVC
//!
//! Feature files describe what a user does with the TodoMVC application.
//! The runner binds every step sentence to a handler from an explicit step
//! table, then plays each scenario with its own cast of Screenplay actors,
//! each driving a real browser through Playwright.
//!
//! # Example
//!
//! ```ignore
//! use screenplay::OnlineCast;
//! use std::sync::Arc;
//! use todomvc_acceptance::{RunConfig, Runner, StepRegistry, todo_steps};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RunConfig::new().features(vec!["features".into()]);
//!     let cast = Arc::new(OnlineCast::new(config.browser.clone()));
//!     let runner = Runner::new(config, StepRegistry::build(todo_steps())?, cast)?;
//!
//!     let report = runner.run().await?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
mod error;
pub mod page;
pub mod questions;
pub mod report;
pub mod runner;
pub mod steps;
pub mod tasks;
pub mod world;

// Re-export error types
pub use error::{Error, Result};

// Re-export the run surface
pub use cli::Cli;
pub use config::{DEFAULT_APP_URL, RunConfig};
pub use report::{RunReport, ScenarioReport, StepReport, StepStatus, Summary};
pub use runner::{Runner, ScenarioPlan, TagFilter};
pub use steps::{StepDefinition, StepRegistry, todo_steps};
pub use world::ScenarioWorld;

// Re-export the domain vocabulary
pub use questions::TodoStatus;
pub use tasks::{
    AddATodoItem, AddTodoItems, CompleteTodoItem, DeleteTodoItem, EditStrategy, FilterTodoItems,
    OpenTheApplication, UpdateTodoItem,
};
