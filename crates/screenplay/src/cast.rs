// Cast - Hands out actors with their abilities
//
// The stage asks its cast for a new actor the first time a name is used in
// a scenario. OnlineCast launches a dedicated browser for every actor.

use crate::actor::{Actor, BrowseTheWeb};
use crate::browser::{BrowserConfig, PlaywrightSession};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Supplies fully equipped actors.
#[async_trait]
pub trait Cast: Send + Sync {
    async fn actor_named(&self, name: &str) -> Result<Actor>;
}

/// Casts actors that browse with their own Playwright browser.
#[derive(Debug, Clone, Default)]
pub struct OnlineCast {
    config: BrowserConfig,
}

impl OnlineCast {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }
}

#[async_trait]
impl Cast for OnlineCast {
    async fn actor_named(&self, name: &str) -> Result<Actor> {
        let session = PlaywrightSession::launch(&self.config)
            .await
            .map_err(|e| e.context(format!("launching a browser for {}", name)))?;
        tracing::info!(actor = name, browser = %self.config.kind, "Actor enters the stage");
        Ok(Actor::named(name).who_can(BrowseTheWeb::with(Arc::new(session))))
    }
}
