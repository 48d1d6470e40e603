// WebSession - The browsing capability behind an actor
//
// Every interaction and question ends up as one call on a WebSession. The
// trait is the only seam between the screenplay layer and the browser
// automation driver: `PlaywrightSession` implements it on top of
// playwright-rs, and `testing::ScriptedSession` implements it in memory.
//
// Sessions never retry. Waiting for elements is left to the driver's own
// auto-wait and timeout policy.

use crate::error::Result;
use crate::target::Selector;
use async_trait::async_trait;
use std::fmt;

/// Keys that can be sent to the focused element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Backspace,
    Delete,
    Escape,
    Tab,
    /// Select everything in the focused field (Ctrl+A, or Cmd+A on macOS)
    SelectAll,
}

impl Key {
    /// Key name in Playwright's keyboard notation
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Enter => "Enter",
            Key::Backspace => "Backspace",
            Key::Delete => "Delete",
            Key::Escape => "Escape",
            Key::Tab => "Tab",
            Key::SelectAll => "ControlOrMeta+a",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Low-level browsing operations an actor can use.
///
/// Each call blocks until the driver finishes the action or gives up after
/// its own timeout.
#[async_trait]
pub trait WebSession: Send + Sync {
    /// Navigates the session's page to `url`.
    async fn open(&self, url: &str) -> Result<()>;

    async fn click(&self, selector: &Selector) -> Result<()>;

    async fn double_click(&self, selector: &Selector) -> Result<()>;

    /// Replaces the value of an input with `text`.
    async fn fill(&self, selector: &Selector, text: &str) -> Result<()>;

    /// Presses `key` while the matched element has focus.
    async fn press(&self, selector: &Selector, key: Key) -> Result<()>;

    /// Sends keystrokes to whatever element currently has focus.
    async fn press_keys(&self, keys: &[Key]) -> Result<()>;

    /// Types text into whatever element currently has focus.
    async fn type_text(&self, text: &str) -> Result<()>;

    /// Text content of the single matched element (empty when it has none).
    async fn text_content(&self, selector: &Selector) -> Result<String>;

    /// Text content of every matched element, in document order.
    async fn text_contents(&self, selector: &Selector) -> Result<Vec<String>>;

    async fn attribute(&self, selector: &Selector, name: &str) -> Result<Option<String>>;

    async fn is_visible(&self, selector: &Selector) -> Result<bool>;

    async fn count(&self, selector: &Selector) -> Result<usize>;

    /// Releases the session. Closing twice is not an error.
    async fn close(&self) -> Result<()>;
}
