// Actor - Who performs tasks and answers questions
//
// An actor has a name and at most one ability: browsing the web through a
// WebSession. Tasks and questions receive the actor and reach the browser
// through that ability, never through global state.

use crate::error::{Error, Result};
use crate::question::Question;
use crate::session::WebSession;
use crate::task::Performable;
use std::fmt;
use std::sync::Arc;

/// The ability to browse the web, backed by one session.
#[derive(Clone)]
pub struct BrowseTheWeb {
    session: Arc<dyn WebSession>,
}

impl BrowseTheWeb {
    pub fn with(session: Arc<dyn WebSession>) -> Self {
        Self { session }
    }

    /// The ability held by `actor`, or `MissingAbility`
    pub fn as_actor(actor: &Actor) -> Result<&BrowseTheWeb> {
        actor.browsing.as_ref().ok_or_else(|| Error::MissingAbility {
            actor: actor.name.clone(),
        })
    }

    pub fn session(&self) -> &dyn WebSession {
        self.session.as_ref()
    }
}

impl fmt::Debug for BrowseTheWeb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowseTheWeb").finish_non_exhaustive()
    }
}

/// A named participant in a scenario.
#[derive(Debug)]
pub struct Actor {
    name: String,
    browsing: Option<BrowseTheWeb>,
}

impl Actor {
    /// Creates an actor without abilities
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            browsing: None,
        }
    }

    /// Grants the browsing ability, replacing any previous one
    pub fn who_can(mut self, ability: BrowseTheWeb) -> Self {
        self.browsing = Some(ability);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn can_browse_the_web(&self) -> bool {
        self.browsing.is_some()
    }

    /// Shortcut for [`BrowseTheWeb::as_actor`]
    pub fn browse_the_web(&self) -> Result<&BrowseTheWeb> {
        BrowseTheWeb::as_actor(self)
    }

    /// Performs a task or interaction.
    ///
    /// The description's `{0}` placeholder is replaced by the actor's name.
    /// Failures carry that description as context.
    pub async fn attempts_to(&self, performable: &dyn Performable) -> Result<()> {
        let description = self.describe(&performable.description());
        tracing::info!(actor = %self.name, "{}", description);

        performable
            .perform_as(self)
            .await
            .map_err(|e| e.context(description))
    }

    /// Performs several tasks in order, stopping at the first failure.
    pub async fn attempts_to_all(&self, performables: &[&dyn Performable]) -> Result<()> {
        for performable in performables {
            self.attempts_to(*performable).await?;
        }
        Ok(())
    }

    /// Asks a question about the current state of the UI.
    pub async fn asks_for<Q>(&self, question: &Q) -> Result<Q::Answer>
    where
        Q: Question + ?Sized,
    {
        let answer = question.answered_by(self).await?;
        tracing::debug!(actor = %self.name, subject = %question.subject(), ?answer, "Answered");
        Ok(answer)
    }

    /// Releases the actor's browsing session, if any.
    pub async fn dismiss(&self) -> Result<()> {
        match &self.browsing {
            Some(ability) => {
                tracing::debug!(actor = %self.name, "Closing browsing session");
                ability.session().close().await
            }
            None => Ok(()),
        }
    }

    fn describe(&self, description: &str) -> String {
        description.replace("{0}", &self.name)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
