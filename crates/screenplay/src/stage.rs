// Stage - The per-scenario actor registry
//
// A Stage lives for exactly one scenario. It casts actors on first
// reference, keeps one instance per name, tracks the actor in the
// spotlight, and releases every session when the curtain falls. Nothing is
// global: concurrent scenarios each own a Stage and never see each other's
// actors.

use crate::actor::Actor;
use crate::cast::Cast;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

pub struct Stage {
    cast: Arc<dyn Cast>,
    actors: Vec<Actor>,
    spotlight: Option<usize>,
}

impl Stage {
    pub fn new(cast: Arc<dyn Cast>) -> Self {
        Self {
            cast,
            actors: Vec::new(),
            spotlight: None,
        }
    }

    /// Casts a new actor under `name`.
    ///
    /// Fails with `ActorAlreadyRegistered` if the name is taken. The first
    /// actor on an empty stage takes the spotlight; later registrations
    /// leave it where it is.
    pub async fn register_actor(&mut self, name: &str) -> Result<&Actor> {
        if self.position(name).is_some() {
            return Err(Error::ActorAlreadyRegistered(name.to_string()));
        }
        let index = self.cast_actor(name).await?;
        if self.spotlight.is_none() {
            self.spotlight = Some(index);
        }
        Ok(&self.actors[index])
    }

    /// Returns the actor called `name`, casting it if needed, and puts it
    /// in the spotlight.
    pub async fn actor_called(&mut self, name: &str) -> Result<&Actor> {
        let index = match self.position(name) {
            Some(index) => index,
            None => self.cast_actor(name).await?,
        };
        self.spotlight = Some(index);
        Ok(&self.actors[index])
    }

    /// The actor most recently called.
    ///
    /// Asking before any actor has been called is a programming error and
    /// fails with `NoActorInSpotlight`.
    pub fn actor_in_the_spotlight(&self) -> Result<&Actor> {
        self.spotlight
            .map(|index| &self.actors[index])
            .ok_or(Error::NoActorInSpotlight)
    }

    /// Names of the actors on stage, in order of appearance
    pub fn actor_names(&self) -> Vec<&str> {
        self.actors.iter().map(Actor::name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Dismisses every actor and empties the stage.
    ///
    /// Every session is closed even when some fail to close; the first
    /// failure is returned afterwards.
    pub async fn draw_the_curtain(&mut self) -> Result<()> {
        let mut first_error = None;
        for actor in self.actors.drain(..) {
            if let Err(e) = actor.dismiss().await {
                tracing::warn!(actor = %actor.name(), "Failed to close session: {}", e);
                first_error.get_or_insert(e.context(format!("dismissing {}", actor.name())));
            }
        }
        self.spotlight = None;
        first_error.map_or(Ok(()), Err)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.actors.iter().position(|actor| actor.name() == name)
    }

    async fn cast_actor(&mut self, name: &str) -> Result<usize> {
        let actor = self.cast.actor_named(name).await?;
        self.actors.push(actor);
        Ok(self.actors.len() - 1)
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("actors", &self.actor_names())
            .field("spotlight", &self.spotlight)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedCast, ScriptedSession};

    fn stage_with(cast: &Arc<ScriptedCast>) -> Stage {
        Stage::new(cast.clone())
    }

    #[tokio::test]
    async fn test_spotlight_before_any_actor_is_an_error() {
        let cast = Arc::new(ScriptedCast::new());
        let stage = stage_with(&cast);

        let error = stage.actor_in_the_spotlight().unwrap_err();
        assert!(matches!(error, Error::NoActorInSpotlight));
    }

    #[tokio::test]
    async fn test_actor_called_reuses_one_instance_per_name() {
        let cast = Arc::new(ScriptedCast::new());
        let mut stage = stage_with(&cast);

        stage.actor_called("Toby").await.unwrap();
        stage.actor_called("Jane").await.unwrap();
        stage.actor_called("Toby").await.unwrap();

        assert_eq!(stage.actor_names(), vec!["Toby", "Jane"]);
        assert_eq!(cast.cast_names(), vec!["Toby", "Jane"]);
        assert_eq!(stage.actor_in_the_spotlight().unwrap().name(), "Toby");
    }

    #[tokio::test]
    async fn test_register_actor_rejects_duplicates() {
        let cast = Arc::new(ScriptedCast::new());
        let mut stage = stage_with(&cast);

        stage.register_actor("Toby").await.unwrap();
        stage.register_actor("Jane").await.unwrap();
        assert_eq!(stage.actor_in_the_spotlight().unwrap().name(), "Toby");

        let error = stage.register_actor("Toby").await.unwrap_err();
        assert!(matches!(error, Error::ActorAlreadyRegistered(ref name) if name == "Toby"));
    }

    #[tokio::test]
    async fn test_curtain_closes_every_session() {
        let cast = Arc::new(ScriptedCast::new());
        let mut stage = stage_with(&cast);

        stage.actor_called("Toby").await.unwrap();
        stage.actor_called("Jane").await.unwrap();
        stage.draw_the_curtain().await.unwrap();

        assert!(stage.is_empty());
        assert!(stage.actor_in_the_spotlight().is_err());
        for session in cast.sessions() {
            assert!(session.is_closed());
        }
    }

    #[tokio::test]
    async fn test_new_stage_gets_fresh_sessions() {
        let toby = Arc::new(ScriptedSession::new());
        let cast = Arc::new(ScriptedCast::new().with_session("Toby", toby.clone()));

        let mut first = stage_with(&cast);
        first.actor_called("Toby").await.unwrap();
        first.draw_the_curtain().await.unwrap();
        assert!(toby.is_closed());

        let mut second = stage_with(&cast);
        second.actor_called("Toby").await.unwrap();
        let replacement = cast.session_for("Toby").unwrap();
        assert!(!Arc::ptr_eq(&replacement, &toby));
        assert!(!replacement.is_closed());
    }
}
