// Error types for the screenplay layer

use thiserror::Error;

/// Result type alias for screenplay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while actors perform tasks or answer questions
#[derive(Debug, Error)]
pub enum Error {
    /// The browser automation driver reported a failure
    #[error("Browser error: {0}")]
    Browser(#[from] playwright_rs::Error),

    /// A session could not find an element for a selector
    ///
    /// Raised by sessions that resolve elements eagerly. The Playwright session
    /// surfaces the same condition as a driver timeout instead.
    #[error("Element not found: selector '{0}'")]
    ElementNotFound(String),

    /// An interaction or read against a target failed
    ///
    /// Names the operation, the human-readable target, and the concrete
    /// selector so a failing scenario points at the offending locator.
    #[error("Could not {operation} {target} [selector: {selector}]: {source}")]
    Interaction {
        operation: &'static str,
        target: String,
        selector: String,
        #[source]
        source: Box<Error>,
    },

    /// An observed value differs from the expected one
    #[error("Expected {subject} {expectation} {expected}, but was {actual}")]
    AssertionFailed {
        subject: String,
        expectation: &'static str,
        expected: String,
        actual: String,
    },

    /// A UI text fragment could not be parsed into the expected type
    #[error("Could not parse {subject}: '{text}' is not {expected_type}")]
    Parse {
        subject: String,
        text: String,
        expected_type: &'static str,
    },

    /// A target template was filled with the wrong number of parameters
    #[error("Invalid target '{name}': {reason}")]
    InvalidTarget { name: String, reason: String },

    /// The spotlight was requested before any actor took the stage
    #[error("No actor is in the spotlight; call actor_called() first")]
    NoActorInSpotlight,

    /// An actor name was registered twice on the same stage
    #[error("An actor called '{0}' is already on stage")]
    ActorAlreadyRegistered(String),

    /// An actor was asked to browse without the ability to do so
    #[error("{actor} does not have the ability to browse the web")]
    MissingAbility { actor: String },

    /// The session behind an ability has already been closed
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Returns true when the failure is an assertion mismatch, looking
    /// through interaction and context wrappers.
    pub fn is_assertion_failure(&self) -> bool {
        match self {
            Error::AssertionFailed { .. } => true,
            Error::Context(_, inner) => inner.is_assertion_failure(),
            Error::Interaction { source, .. } => source.is_assertion_failure(),
            _ => false,
        }
    }

    /// Returns true when asking again may give a different outcome.
    ///
    /// Missing elements, driver hiccups and half-rendered text qualify;
    /// misconfiguration such as a missing ability or a closed session does not.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Browser(_)
            | Error::ElementNotFound(_)
            | Error::Parse { .. }
            | Error::AssertionFailed { .. } => true,
            Error::Context(_, inner) => inner.is_transient(),
            Error::Interaction { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}
