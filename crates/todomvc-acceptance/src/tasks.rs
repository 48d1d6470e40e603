// Tasks - User-level intents against the TodoMVC application
//
// Each task is a Performable built from screenplay interactions. A task
// fails fast: the first interaction that fails aborts the rest and the
// error names the target that could not be reached.

use crate::page;
use crate::questions::{self, TodoStatus};
use async_trait::async_trait;
use screenplay::ensure::DEFAULT_ASSERTION_TIMEOUT;
use screenplay::{
    Actor, Click, DoubleClick, Ensure, Enter, Hit, Key, Open, Performable, Result, Type, Visibility,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Opens the application at its configured address.
#[derive(Debug, Clone)]
pub struct OpenTheApplication {
    url: String,
}

impl OpenTheApplication {
    pub fn at(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl Performable for OpenTheApplication {
    fn description(&self) -> String {
        "{0} opens the Todo application".to_string()
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        actor.attempts_to(&Open::url(&self.url)).await
    }
}

/// Types a label into the new todo field and confirms it with Enter.
///
/// An empty label is submitted as typed; what the application does with
/// it is up to the application.
#[derive(Debug, Clone)]
pub struct AddATodoItem {
    label: String,
}

impl AddATodoItem {
    pub fn called(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

#[async_trait]
impl Performable for AddATodoItem {
    fn description(&self) -> String {
        format!("{{0}} adds a new todo item called '{}'", self.label)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        actor
            .attempts_to(
                &Enter::the_value(&self.label)
                    .into(page::new_todo_field())
                    .then_hit(Key::Enter),
            )
            .await
    }
}

/// Adds several items, in the order given.
#[derive(Debug, Clone)]
pub struct AddTodoItems {
    labels: Vec<String>,
}

impl AddTodoItems {
    pub fn from<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Performable for AddTodoItems {
    fn description(&self) -> String {
        format!("{{0}} adds {:?} to the todo list", self.labels)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        for label in &self.labels {
            actor.attempts_to(&AddATodoItem::called(label)).await?;
        }
        Ok(())
    }
}

/// Ticks the checkbox of the item labelled exactly `label`.
///
/// The checkbox toggles, so an item that is already completed is left
/// alone.
#[derive(Debug, Clone)]
pub struct CompleteTodoItem {
    label: String,
}

impl CompleteTodoItem {
    pub fn called(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

#[async_trait]
impl Performable for CompleteTodoItem {
    fn description(&self) -> String {
        format!("{{0}} marks '{}' as complete", self.label)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        let status = actor.asks_for(&questions::status_of(&self.label)?).await?;
        if status == TodoStatus::Completed {
            tracing::debug!(actor = %actor.name(), label = %self.label, "Item already completed");
            return Ok(());
        }
        actor
            .attempts_to(&Click::on(page::complete_checkbox(&self.label)?))
            .await
    }
}

/// Reveals an item's controls by clicking its label, then deletes it.
#[derive(Debug, Clone)]
pub struct DeleteTodoItem {
    label: String,
}

impl DeleteTodoItem {
    pub fn called(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

#[async_trait]
impl Performable for DeleteTodoItem {
    fn description(&self) -> String {
        format!("{{0}} deletes '{}'", self.label)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        actor
            .attempts_to_all(&[
                &Click::on(page::item_label(&self.label)?),
                &Click::on(page::delete_button(&self.label)?),
            ])
            .await
    }
}

/// Clicks the filter link whose visible text is the filter name.
#[derive(Debug, Clone)]
pub struct FilterTodoItems {
    filter: String,
}

impl FilterTodoItems {
    pub fn by(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
        }
    }
}

#[async_trait]
impl Performable for FilterTodoItems {
    fn description(&self) -> String {
        format!("{{0}} filters tasks by '{}'", self.filter)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        actor.attempts_to(&Click::on(page::filter(&self.filter)?)).await
    }
}

/// How the old label is cleared before the new one is typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditStrategy {
    /// Select the whole field, then delete the selection
    #[default]
    SelectAllThenDelete,
    /// One Backspace per character of the old label
    BackspacePerCharacter,
}

impl EditStrategy {
    /// Keystrokes that empty an edit field holding `old_label`.
    ///
    /// The per-character script counts characters, not bytes, so labels
    /// with non-ASCII text are cleared completely.
    pub fn clearing_keys(&self, old_label: &str) -> Vec<Key> {
        match self {
            EditStrategy::SelectAllThenDelete => vec![Key::SelectAll, Key::Backspace],
            EditStrategy::BackspacePerCharacter => vec![Key::Backspace; old_label.chars().count()],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EditStrategy::SelectAllThenDelete => "select-all",
            EditStrategy::BackspacePerCharacter => "backspace",
        }
    }
}

impl fmt::Display for EditStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "select-all" | "select-all-then-delete" => Ok(EditStrategy::SelectAllThenDelete),
            "backspace" | "backspace-per-character" => Ok(EditStrategy::BackspacePerCharacter),
            other => Err(format!(
                "unknown edit strategy '{}' (expected select-all or backspace)",
                other
            )),
        }
    }
}

/// Renames an item: double-click its label, clear the edit field, type the
/// new label, confirm with Enter.
#[derive(Debug, Clone)]
pub struct UpdateTodoItem {
    from: String,
    to: String,
    strategy: EditStrategy,
    timeout: Duration,
}

/// First half of an [`UpdateTodoItem`], waiting for the new label
#[derive(Debug, Clone)]
pub struct UpdateTodoItemFrom {
    from: String,
}

impl UpdateTodoItem {
    pub fn from(label: impl Into<String>) -> UpdateTodoItemFrom {
        UpdateTodoItemFrom { from: label.into() }
    }

    pub fn using(mut self, strategy: EditStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// How long to wait for the edit field to appear
    pub fn within(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl UpdateTodoItemFrom {
    pub fn to(self, label: impl Into<String>) -> UpdateTodoItem {
        UpdateTodoItem {
            from: self.from,
            to: label.into(),
            strategy: EditStrategy::default(),
            timeout: DEFAULT_ASSERTION_TIMEOUT,
        }
    }
}

#[async_trait]
impl Performable for UpdateTodoItem {
    fn description(&self) -> String {
        format!("{{0}} updates '{}' to '{}'", self.from, self.to)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        actor
            .attempts_to_all(&[
                &DoubleClick::on(page::item_label(&self.from)?),
                &Ensure::that(Visibility::of(page::edit_field()))
                    .with_timeout(self.timeout)
                    .is_true(),
                &Hit::the_keys(self.strategy.clearing_keys(&self.from)),
                &Type::the_text(&self.to),
                &Hit::key(Key::Enter),
            ])
            .await
    }
}
