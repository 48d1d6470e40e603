//! screenplay: The Screenplay pattern for browser acceptance tests
//!
//! Actors hold abilities, perform tasks built from interactions, and answer
//! questions about what the browser currently shows. Targets give locators a
//! human-readable name so failures read like the scenario that caused them.
//!
//! # Example
//!
//! ```ignore
//! use screenplay::{BrowserConfig, Ensure, Enter, Key, OnlineCast, Open, Stage, Target, TextValues};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> screenplay::Result<()> {
//!     let new_todo = Target::the("the new todo field").located_by(".new-todo");
//!     let labels = Target::the("the todo labels").located_by(".todo-list li label");
//!
//!     let mut stage = Stage::new(Arc::new(OnlineCast::new(BrowserConfig::default())));
//!     let toby = stage.actor_called("Toby").await?;
//!
//!     toby.attempts_to_all(&[
//!         &Open::url("https://todomvc.com/examples/react/dist/"),
//!         &Enter::the_value("Buy milk").into(new_todo).then_hit(Key::Enter),
//!         &Ensure::that(TextValues::of(labels)).contains_exactly(["Buy milk"]),
//!     ])
//!     .await?;
//!
//!     stage.draw_the_curtain().await
//! }
//! ```

pub mod actor;
pub mod browser;
pub mod cast;
pub mod ensure;
mod error;
pub mod interactions;
pub mod question;
pub mod session;
pub mod stage;
pub mod target;
pub mod task;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export error types
pub use error::{Error, Result};

// Re-export the core pattern
pub use actor::{Actor, BrowseTheWeb};
pub use cast::{Cast, OnlineCast};
pub use stage::Stage;
pub use task::{Performable, Task};

// Re-export locators
pub use target::{Selector, Target, TargetTemplate};

// Re-export interactions and questions
pub use ensure::{Assertion, Ensure};
pub use interactions::{Click, DoubleClick, Enter, Hit, Open, Type};
pub use question::{Attribute, Count, Question, QuestionExt, Text, TextValues, Visibility};

// Re-export the browser seam
pub use browser::{BrowserConfig, BrowserKind, PlaywrightSession};
pub use session::{Key, WebSession};
