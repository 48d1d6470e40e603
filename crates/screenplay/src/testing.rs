// Testing - Scripted sessions for driver-free tests
//
// ScriptedSession answers reads from elements set up by the test and records
// every successful action. It does not model the application: clicking a
// checkbox changes nothing unless the test updates the scripted elements.
//
// Available with the `test-support` feature.

use crate::actor::{Actor, BrowseTheWeb};
use crate::cast::Cast;
use crate::error::{Error, Result};
use crate::session::{Key, WebSession};
use crate::target::Selector;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// An action recorded by a [`ScriptedSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open(String),
    Click(Selector),
    DoubleClick(Selector),
    Fill(Selector, String),
    Press(Selector, Key),
    PressKeys(Vec<Key>),
    TypeText(String),
}

#[derive(Debug, Clone)]
struct Element {
    texts: Vec<String>,
    attributes: HashMap<String, String>,
    visible: bool,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            texts: vec![String::new()],
            attributes: HashMap::new(),
            visible: true,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    elements: HashMap<Selector, Element>,
    failing: HashSet<Selector>,
    calls: Vec<Call>,
    closed: bool,
}

/// In-memory [`WebSession`] with scripted elements.
///
/// Reads of a selector with no scripted element behave like an empty page:
/// text and attribute reads fail, counts are zero, visibility is false.
/// Operations on a selector marked with [`failing_on`](Self::failing_on)
/// fail with `ElementNotFound` and are not recorded.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    state: Mutex<State>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element with no text
    pub fn with_element(self, selector: &Selector) -> Self {
        self.state
            .lock()
            .elements
            .entry(selector.clone())
            .or_default();
        self
    }

    pub fn with_text(self, selector: &Selector, text: &str) -> Self {
        self.set_text(selector, text);
        self
    }

    /// Scripts one element per text, in document order
    pub fn with_texts(self, selector: &Selector, texts: &[&str]) -> Self {
        self.set_texts(selector, texts);
        self
    }

    pub fn with_attribute(self, selector: &Selector, name: &str, value: &str) -> Self {
        self.set_attribute(selector, name, value);
        self
    }

    pub fn with_visible(self, selector: &Selector, visible: bool) -> Self {
        self.state
            .lock()
            .elements
            .entry(selector.clone())
            .or_default()
            .visible = visible;
        self
    }

    pub fn failing_on(self, selector: &Selector) -> Self {
        self.state.lock().failing.insert(selector.clone());
        self
    }

    pub fn set_text(&self, selector: &Selector, text: &str) {
        self.state
            .lock()
            .elements
            .entry(selector.clone())
            .or_default()
            .texts = vec![text.to_string()];
    }

    pub fn set_texts(&self, selector: &Selector, texts: &[&str]) {
        self.state
            .lock()
            .elements
            .entry(selector.clone())
            .or_default()
            .texts = texts.iter().map(|t| t.to_string()).collect();
    }

    pub fn set_attribute(&self, selector: &Selector, name: &str, value: &str) {
        self.state
            .lock()
            .elements
            .entry(selector.clone())
            .or_default()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Removes an element, as if the application deleted it
    pub fn remove(&self, selector: &Selector) {
        self.state.lock().elements.remove(selector);
    }

    /// Actions recorded so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn act(&self, selector: Option<&Selector>, call: Call) -> Result<()> {
        let mut state = self.state.lock();
        check(&state, selector)?;
        state.calls.push(call);
        Ok(())
    }

    fn read<T>(&self, selector: &Selector, read: impl FnOnce(Option<&Element>) -> Result<T>) -> Result<T> {
        let state = self.state.lock();
        check(&state, Some(selector))?;
        read(state.elements.get(selector))
    }
}

fn check(state: &State, selector: Option<&Selector>) -> Result<()> {
    if state.closed {
        return Err(Error::SessionClosed("scripted session".to_string()));
    }
    match selector {
        Some(selector) if state.failing.contains(selector) => {
            Err(Error::ElementNotFound(selector.to_engine_string()))
        }
        _ => Ok(()),
    }
}

fn not_found(selector: &Selector) -> Error {
    Error::ElementNotFound(selector.to_engine_string())
}

#[async_trait]
impl WebSession for ScriptedSession {
    async fn open(&self, url: &str) -> Result<()> {
        self.act(None, Call::Open(url.to_string()))
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        self.act(Some(selector), Call::Click(selector.clone()))
    }

    async fn double_click(&self, selector: &Selector) -> Result<()> {
        self.act(Some(selector), Call::DoubleClick(selector.clone()))
    }

    async fn fill(&self, selector: &Selector, text: &str) -> Result<()> {
        self.act(Some(selector), Call::Fill(selector.clone(), text.to_string()))
    }

    async fn press(&self, selector: &Selector, key: Key) -> Result<()> {
        self.act(Some(selector), Call::Press(selector.clone(), key))
    }

    async fn press_keys(&self, keys: &[Key]) -> Result<()> {
        self.act(None, Call::PressKeys(keys.to_vec()))
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        self.act(None, Call::TypeText(text.to_string()))
    }

    async fn text_content(&self, selector: &Selector) -> Result<String> {
        self.read(selector, |element| match element {
            Some(element) if element.texts.len() == 1 => Ok(element.texts[0].clone()),
            Some(element) if element.texts.is_empty() => Err(not_found(selector)),
            Some(element) => Err(Error::ElementNotFound(format!(
                "{} (strict mode: {} elements matched)",
                selector.to_engine_string(),
                element.texts.len()
            ))),
            None => Err(not_found(selector)),
        })
    }

    async fn text_contents(&self, selector: &Selector) -> Result<Vec<String>> {
        self.read(selector, |element| {
            Ok(element.map(|e| e.texts.clone()).unwrap_or_default())
        })
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> Result<Option<String>> {
        self.read(selector, |element| match element {
            Some(element) => Ok(element.attributes.get(name).cloned()),
            None => Err(not_found(selector)),
        })
    }

    async fn is_visible(&self, selector: &Selector) -> Result<bool> {
        self.read(selector, |element| Ok(element.is_some_and(|e| e.visible)))
    }

    async fn count(&self, selector: &Selector) -> Result<usize> {
        self.read(selector, |element| {
            Ok(element.map(|e| e.texts.len()).unwrap_or(0))
        })
    }

    async fn close(&self) -> Result<()> {
        self.state.lock().closed = true;
        Ok(())
    }
}

type SessionFactory = Box<dyn Fn() -> ScriptedSession + Send + Sync>;

/// A [`Cast`] handing out scripted sessions.
///
/// A session registered with [`with_session`](Self::with_session) goes to
/// the first actor of that name; every other casting gets a fresh session
/// from the factory. Sessions handed out stay inspectable, so a test can
/// check what each actor did and whether its session was closed.
pub struct ScriptedCast {
    factory: SessionFactory,
    presets: Mutex<HashMap<String, Arc<ScriptedSession>>>,
    issued: Mutex<Vec<(String, Arc<ScriptedSession>)>>,
}

impl ScriptedCast {
    pub fn new() -> Self {
        Self::with_factory(ScriptedSession::new)
    }

    pub fn with_factory(factory: impl Fn() -> ScriptedSession + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            presets: Mutex::new(HashMap::new()),
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn with_session(self, name: &str, session: Arc<ScriptedSession>) -> Self {
        self.presets.lock().insert(name.to_string(), session);
        self
    }

    /// The latest session handed to `name`, or the one waiting for it
    pub fn session_for(&self, name: &str) -> Option<Arc<ScriptedSession>> {
        let issued = self
            .issued
            .lock()
            .iter()
            .rev()
            .find(|(actor, _)| actor == name)
            .map(|(_, session)| session.clone());
        issued.or_else(|| self.presets.lock().get(name).cloned())
    }

    /// Every session handed out so far, in casting order
    pub fn sessions(&self) -> Vec<Arc<ScriptedSession>> {
        self.issued.lock().iter().map(|(_, s)| s.clone()).collect()
    }

    /// Names of the actors cast so far, in casting order
    pub fn cast_names(&self) -> Vec<String> {
        self.issued.lock().iter().map(|(name, _)| name.clone()).collect()
    }
}

impl Default for ScriptedCast {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cast for ScriptedCast {
    async fn actor_named(&self, name: &str) -> Result<Actor> {
        let preset = self.presets.lock().remove(name);
        let session = preset.unwrap_or_else(|| Arc::new((self.factory)()));
        self.issued
            .lock()
            .push((name.to_string(), session.clone()));
        Ok(Actor::named(name).who_can(BrowseTheWeb::with(session)))
    }
}
