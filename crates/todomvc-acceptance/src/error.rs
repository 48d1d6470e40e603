// Error types for the acceptance runner

use crate::steps::Phase;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading features, binding steps, or running scenarios
#[derive(Debug, Error)]
pub enum Error {
    /// An actor failed to perform a task or answer a question
    #[error(transparent)]
    Screenplay(#[from] screenplay::Error),

    /// A feature file is not valid Gherkin
    #[error("Could not parse feature {path}: {message}")]
    FeatureParse { path: PathBuf, message: String },

    /// A scenario uses a construct the runner does not execute
    #[error("Scenario '{scenario}' is not supported: {reason}")]
    UnsupportedScenario { scenario: String, reason: String },

    /// No step definition matches the sentence
    #[error("Undefined step: '{0}'")]
    UndefinedStep(String),

    /// More than one step definition matches the sentence
    #[error("Ambiguous step '{step}' matches: {}", .candidates.join(" | "))]
    AmbiguousStep {
        step: String,
        candidates: Vec<String>,
    },

    /// A step keyword moves the scenario back to an earlier phase
    #[error("Step '{step}' is a {phase} step but the scenario is already in the {current} phase")]
    StepOutOfOrder {
        step: String,
        phase: Phase,
        current: Phase,
    },

    /// The step is recognised but has no implementation yet
    #[error("Step '{0}' is pending")]
    Pending(String),

    /// A step signature does not compile
    #[error("Invalid step expression '{signature}': {reason}")]
    InvalidStepExpression { signature: String, reason: String },

    /// Two step definitions share a signature
    #[error("Step '{0}' is defined more than once")]
    DuplicateStep(String),

    /// The expression and the handler disagree on the number of parameters
    #[error("Step '{signature}' captures {found} parameter(s) but its handler takes {expected}")]
    ParameterMismatch {
        signature: String,
        expected: usize,
        found: usize,
    },

    /// A handler read an argument the step does not provide
    #[error("Step argument {index} is not {expected}")]
    MissingArgument { index: usize, expected: &'static str },

    /// A handler expected a data table that the step does not have
    #[error("Step '{0}' needs a data table")]
    MissingTable(String),

    /// Invalid run configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// True when the step could not be bound to a definition
    pub fn is_binding_error(&self) -> bool {
        match self {
            Error::UndefinedStep(_)
            | Error::AmbiguousStep { .. }
            | Error::MissingTable(_)
            | Error::UnsupportedScenario { .. } => true,
            Error::Context(_, inner) => inner.is_binding_error(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_step_lists_candidates() {
        let error = Error::AmbiguousStep {
            step: "Toby adds \"milk\"".to_string(),
            candidates: vec![
                "{actor} adds {string}".to_string(),
                "{word} adds {string}".to_string(),
            ],
        };
        assert_eq!(
            error.to_string(),
            "Ambiguous step 'Toby adds \"milk\"' matches: {actor} adds {string} | {word} adds {string}"
        );
    }

    #[test]
    fn test_out_of_order_names_both_phases() {
        let error = Error::StepOutOfOrder {
            step: "Toby opens the Todo Application".to_string(),
            phase: Phase::Given,
            current: Phase::Then,
        };
        let message = error.to_string();
        assert!(message.contains("is a Given step"));
        assert!(message.contains("already in the Then phase"));
    }

    #[test]
    fn test_binding_errors_seen_through_context() {
        let error = Error::UndefinedStep("Toby flies".to_string()).context("scenario 'Flying'");
        assert!(error.is_binding_error());
        assert!(!Error::Pending("x".to_string()).is_binding_error());
    }
}
