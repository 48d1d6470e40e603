// World - State shared by the steps of one scenario
//
// A fresh world is created for every scenario and dropped after teardown.
// It owns the scenario's Stage, so actors never leak between scenarios.

use crate::config::RunConfig;
use crate::error::Result;
use screenplay::ensure::EnsureThat;
use screenplay::{Actor, Cast, Ensure, Question, Stage};
use std::sync::Arc;

pub struct ScenarioWorld {
    stage: Stage,
    config: Arc<RunConfig>,
}

impl ScenarioWorld {
    pub fn new(cast: Arc<dyn Cast>, config: Arc<RunConfig>) -> Self {
        Self {
            stage: Stage::new(cast),
            config,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The named actor, cast on first use, now in the spotlight
    pub async fn actor_called(&mut self, name: &str) -> Result<&Actor> {
        Ok(self.stage.actor_called(name).await?)
    }

    /// The actor the previous steps were about ("he", "she", "his", "her")
    pub fn actor_in_the_spotlight(&self) -> Result<&Actor> {
        Ok(self.stage.actor_in_the_spotlight()?)
    }

    /// Starts an assertion that polls for the configured timeout
    pub fn ensure<Q>(&self, question: Q) -> EnsureThat<Q>
    where
        Q: Question + 'static,
    {
        Ensure::that(question).with_timeout(self.config.assertion_timeout)
    }

    /// Closes every actor's session
    pub async fn draw_the_curtain(&mut self) -> Result<()> {
        Ok(self.stage.draw_the_curtain().await?)
    }
}
