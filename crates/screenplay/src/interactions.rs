// Interactions - Atomic UI actions
//
// Each interaction is one step against the actor's browsing session. They
// do not retry: waiting for an element to become actionable is the driver's
// job. A failure is reported as Error::Interaction naming the operation, the
// target, and the concrete selector.

use crate::actor::{Actor, BrowseTheWeb};
use crate::error::{Error, Result};
use crate::session::Key;
use crate::target::Target;
use crate::task::Performable;
use async_trait::async_trait;

/// Wraps a session failure with the target it was aimed at.
pub(crate) fn against(operation: &'static str, target: &Target) -> impl FnOnce(Error) -> Error {
    let target_name = target.name().to_string();
    let selector = target.selector().to_engine_string();
    move |source| Error::Interaction {
        operation,
        target: target_name,
        selector,
        source: Box::new(source),
    }
}

/// Navigates to a URL.
#[derive(Debug, Clone)]
pub struct Open {
    url: String,
}

impl Open {
    pub fn url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl Performable for Open {
    fn description(&self) -> String {
        format!("{{0}} opens {}", self.url)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        BrowseTheWeb::as_actor(actor)?
            .session()
            .open(&self.url)
            .await
            .map_err(|e| e.context(format!("navigating to {}", self.url)))
    }
}

/// Clicks a target.
#[derive(Debug, Clone)]
pub struct Click {
    target: Target,
}

impl Click {
    pub fn on(target: Target) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Performable for Click {
    fn description(&self) -> String {
        format!("{{0}} clicks on {}", self.target)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        BrowseTheWeb::as_actor(actor)?
            .session()
            .click(self.target.selector())
            .await
            .map_err(against("click on", &self.target))
    }
}

/// Double-clicks a target.
#[derive(Debug, Clone)]
pub struct DoubleClick {
    target: Target,
}

impl DoubleClick {
    pub fn on(target: Target) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Performable for DoubleClick {
    fn description(&self) -> String {
        format!("{{0}} double-clicks on {}", self.target)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        BrowseTheWeb::as_actor(actor)?
            .session()
            .double_click(self.target.selector())
            .await
            .map_err(against("double-click on", &self.target))
    }
}

/// Types a value into a field and optionally confirms it with keystrokes.
///
/// ```ignore
/// Enter::the_value("Buy milk").into(new_todo).then_hit(Key::Enter)
/// ```
#[derive(Debug, Clone)]
pub struct Enter {
    value: String,
    target: Target,
    keys: Vec<Key>,
}

/// First half of an [`Enter`], waiting for its target
#[derive(Debug, Clone)]
pub struct EnterValue {
    value: String,
}

impl Enter {
    pub fn the_value(value: impl Into<String>) -> EnterValue {
        EnterValue {
            value: value.into(),
        }
    }

    /// Presses `key` on the field once the value is in
    pub fn then_hit(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }
}

impl EnterValue {
    #[allow(clippy::should_implement_trait)]
    pub fn into(self, target: Target) -> Enter {
        Enter {
            value: self.value,
            target,
            keys: Vec::new(),
        }
    }
}

#[async_trait]
impl Performable for Enter {
    fn description(&self) -> String {
        format!("{{0}} enters '{}' into {}", self.value, self.target)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        let session = BrowseTheWeb::as_actor(actor)?.session();
        let selector = self.target.selector();

        session
            .fill(selector, &self.value)
            .await
            .map_err(against("enter a value into", &self.target))?;
        for key in &self.keys {
            session
                .press(selector, *key)
                .await
                .map_err(against("press a key in", &self.target))?;
        }
        Ok(())
    }
}

/// Sends raw keystrokes to the focused element.
#[derive(Debug, Clone)]
pub struct Hit {
    keys: Vec<Key>,
}

impl Hit {
    pub fn the_keys(keys: impl Into<Vec<Key>>) -> Self {
        Self { keys: keys.into() }
    }

    pub fn key(key: Key) -> Self {
        Self { keys: vec![key] }
    }
}

#[async_trait]
impl Performable for Hit {
    fn description(&self) -> String {
        let keys: Vec<&str> = self.keys.iter().map(Key::as_str).collect();
        format!("{{0}} hits {}", keys.join(", "))
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        BrowseTheWeb::as_actor(actor)?
            .session()
            .press_keys(&self.keys)
            .await
            .map_err(|e| e.context("sending keystrokes"))
    }
}

/// Types text into the focused element, one keystroke per character.
#[derive(Debug, Clone)]
pub struct Type {
    text: String,
}

impl Type {
    pub fn the_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl Performable for Type {
    fn description(&self) -> String {
        format!("{{0}} types '{}'", self.text)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        BrowseTheWeb::as_actor(actor)?
            .session()
            .type_text(&self.text)
            .await
            .map_err(|e| e.context("typing text"))
    }
}
