// Question - Read-only queries about the UI
//
// A question maps (actor, current page) to a typed answer. Questions have no
// side effects and read the DOM again every time they are asked, so they can
// be re-evaluated freely; Ensure relies on that when it polls.

use crate::actor::{Actor, BrowseTheWeb};
use crate::error::Result;
use crate::interactions::against;
use crate::target::Target;
use async_trait::async_trait;
use std::fmt;

/// A query an actor can answer about the current UI state.
#[async_trait]
pub trait Question: Send + Sync {
    type Answer: fmt::Debug + Send;

    /// What the question is about, used in assertion messages
    fn subject(&self) -> String;

    async fn answered_by(&self, actor: &Actor) -> Result<Self::Answer>;
}

/// Adapters available on every question
pub trait QuestionExt: Question + Sized {
    /// Converts the answer with a fallible function.
    ///
    /// ```ignore
    /// let items_left = Text::of(count).map("items left", |text| parse(&text));
    /// ```
    fn map<T, F>(self, subject: impl Into<String>, convert: F) -> Mapped<Self, F>
    where
        T: fmt::Debug + Send + 'static,
        F: Fn(Self::Answer) -> Result<T> + Send + Sync + 'static,
    {
        Mapped {
            inner: self,
            subject: subject.into(),
            convert,
        }
    }
}

impl<Q: Question> QuestionExt for Q {}

/// Question produced by [`QuestionExt::map`]
pub struct Mapped<Q, F> {
    inner: Q,
    subject: String,
    convert: F,
}

#[async_trait]
impl<Q, F, T> Question for Mapped<Q, F>
where
    Q: Question + 'static,
    T: fmt::Debug + Send + 'static,
    F: Fn(Q::Answer) -> Result<T> + Send + Sync + 'static,
{
    type Answer = T;

    fn subject(&self) -> String {
        self.subject.clone()
    }

    async fn answered_by(&self, actor: &Actor) -> Result<T> {
        let answer = self.inner.answered_by(actor).await?;
        (self.convert)(answer)
    }
}

/// The trimmed text content of a target.
#[derive(Debug, Clone)]
pub struct Text {
    target: Target,
}

impl Text {
    pub fn of(target: Target) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Question for Text {
    type Answer = String;

    fn subject(&self) -> String {
        format!("the text of {}", self.target)
    }

    async fn answered_by(&self, actor: &Actor) -> Result<String> {
        let text = BrowseTheWeb::as_actor(actor)?
            .session()
            .text_content(self.target.selector())
            .await
            .map_err(against("read the text of", &self.target))?;
        Ok(text.trim().to_string())
    }
}

/// The trimmed text content of every element matching a target.
#[derive(Debug, Clone)]
pub struct TextValues {
    target: Target,
}

impl TextValues {
    pub fn of(target: Target) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Question for TextValues {
    type Answer = Vec<String>;

    fn subject(&self) -> String {
        format!("the text values of {}", self.target)
    }

    async fn answered_by(&self, actor: &Actor) -> Result<Vec<String>> {
        let texts = BrowseTheWeb::as_actor(actor)?
            .session()
            .text_contents(self.target.selector())
            .await
            .map_err(against("read the text values of", &self.target))?;
        Ok(texts.into_iter().map(|t| t.trim().to_string()).collect())
    }
}

/// The value of an attribute; an absent attribute reads as empty text.
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    target: Target,
}

/// First half of an [`Attribute`], waiting for its target
#[derive(Debug, Clone)]
pub struct AttributeNamed {
    name: String,
}

impl Attribute {
    pub fn named(name: impl Into<String>) -> AttributeNamed {
        AttributeNamed { name: name.into() }
    }
}

impl AttributeNamed {
    pub fn of(self, target: Target) -> Attribute {
        Attribute {
            name: self.name,
            target,
        }
    }
}

#[async_trait]
impl Question for Attribute {
    type Answer = String;

    fn subject(&self) -> String {
        format!("the '{}' attribute of {}", self.name, self.target)
    }

    async fn answered_by(&self, actor: &Actor) -> Result<String> {
        let value = BrowseTheWeb::as_actor(actor)?
            .session()
            .attribute(self.target.selector(), &self.name)
            .await
            .map_err(against("read an attribute of", &self.target))?;
        Ok(value.unwrap_or_default())
    }
}

/// Whether a target is currently visible.
#[derive(Debug, Clone)]
pub struct Visibility {
    target: Target,
}

impl Visibility {
    pub fn of(target: Target) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Question for Visibility {
    type Answer = bool;

    fn subject(&self) -> String {
        format!("the visibility of {}", self.target)
    }

    async fn answered_by(&self, actor: &Actor) -> Result<bool> {
        BrowseTheWeb::as_actor(actor)?
            .session()
            .is_visible(self.target.selector())
            .await
            .map_err(against("check the visibility of", &self.target))
    }
}

/// How many elements currently match a target.
#[derive(Debug, Clone)]
pub struct Count {
    target: Target,
}

impl Count {
    pub fn of(target: Target) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Question for Count {
    type Answer = usize;

    fn subject(&self) -> String {
        format!("the number of {}", self.target)
    }

    async fn answered_by(&self, actor: &Actor) -> Result<usize> {
        BrowseTheWeb::as_actor(actor)?
            .session()
            .count(self.target.selector())
            .await
            .map_err(against("count", &self.target))
    }
}
