// Task - Composable units of work
//
// Everything an actor can attempt is Performable: single interactions such
// as clicks, and tasks built by sequencing other performables. Composition
// is by value: a Task owns the performables it runs, in order, and stops at
// the first failure.

use crate::actor::Actor;
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Something an actor can attempt.
#[async_trait]
pub trait Performable: Send + Sync {
    /// Human-readable description; `{0}` stands for the actor's name.
    fn description(&self) -> String;

    async fn perform_as(&self, actor: &Actor) -> Result<()>;
}

#[async_trait]
impl<P: Performable + ?Sized> Performable for Box<P> {
    fn description(&self) -> String {
        (**self).description()
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        (**self).perform_as(actor).await
    }
}

/// An ordered sequence of performables with a description.
///
/// ```ignore
/// let task = Task::called("{0} clears the list")
///     .then(Click::on(toggle_all))
///     .then(Click::on(clear_completed));
/// actor.attempts_to(&task).await?;
/// ```
pub struct Task {
    description: String,
    steps: Vec<Box<dyn Performable>>,
}

impl Task {
    pub fn called(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a performable to the sequence
    pub fn then(mut self, step: impl Performable + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Appends every performable from `steps`
    pub fn then_all(mut self, steps: impl IntoIterator<Item = Box<dyn Performable>>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[async_trait]
impl Performable for Task {
    fn description(&self) -> String {
        self.description.clone()
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        for step in &self.steps {
            actor.attempts_to(step.as_ref()).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self.steps.iter().map(|s| s.description()).collect();
        f.debug_struct("Task")
            .field("description", &self.description)
            .field("steps", &steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::BrowseTheWeb;
    use crate::interactions::Click;
    use crate::target::Target;
    use crate::testing::{Call, ScriptedSession};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_task_runs_steps_in_order() {
        let first = Target::the("first button").located_by("#first");
        let second = Target::the("second button").located_by("#second");
        let session = Arc::new(ScriptedSession::new());
        let actor = Actor::named("Toby").who_can(BrowseTheWeb::with(session.clone()));

        let task = Task::called("{0} presses both buttons")
            .then(Click::on(first.clone()))
            .then(Click::on(second.clone()));
        assert_eq!(task.len(), 2);

        actor.attempts_to(&task).await.expect("task should succeed");

        assert_eq!(
            session.calls(),
            vec![
                Call::Click(first.selector().clone()),
                Call::Click(second.selector().clone()),
            ]
        );
    }

    #[tokio::test]
    async fn test_task_stops_at_first_failure() {
        let missing = Target::the("missing button").located_by("#missing");
        let second = Target::the("second button").located_by("#second");
        let session = Arc::new(ScriptedSession::new().failing_on(missing.selector()));
        let actor = Actor::named("Toby").who_can(BrowseTheWeb::with(session.clone()));

        let task = Task::called("{0} presses both buttons")
            .then(Click::on(missing))
            .then(Click::on(second));

        let error = actor.attempts_to(&task).await.unwrap_err();
        assert!(error.to_string().starts_with("Toby presses both buttons"));
        assert!(error.to_string().contains("missing button"));
        assert!(session.calls().is_empty());
    }
}
