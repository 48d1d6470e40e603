// Steps - Binding Gherkin sentences to handlers
//
// Step definitions are an explicit table built at startup. Each entry pairs
// a typed signature with a handler; the registry compiles and validates the
// whole table before any scenario runs, and every step of a scenario is
// resolved before the first one executes.

pub mod definitions;
pub mod expression;
pub mod phase;
pub mod registry;

use crate::error::{Error, Result};
use crate::world::ScenarioWorld;
use futures_util::future::BoxFuture;
use std::fmt;

pub use definitions::todo_steps;
pub use expression::{Argument, ParameterKind, StepExpression};
pub use phase::{Phase, PhaseTracker};
pub use registry::{Binding, StepRegistry};

/// Handler invoked with the scenario world and the captured arguments
pub type StepFn = for<'a> fn(&'a mut ScenarioWorld, StepArgs) -> BoxFuture<'a, Result<()>>;

/// One row of the step table.
#[derive(Clone)]
pub struct StepDefinition {
    signature: &'static str,
    parameters: usize,
    table: bool,
    handler: Option<StepFn>,
}

impl StepDefinition {
    /// A step whose signature captures `parameters` values.
    pub fn new(signature: &'static str, parameters: usize, handler: StepFn) -> Self {
        Self {
            signature,
            parameters,
            table: false,
            handler: Some(handler),
        }
    }

    /// A recognised step without an implementation.
    ///
    /// Pending steps fail the scenario in strict mode and are reported as
    /// pending otherwise.
    pub fn pending(signature: &'static str, parameters: usize) -> Self {
        Self {
            signature,
            parameters,
            table: false,
            handler: None,
        }
    }

    /// The step takes a data table, bound as a list of strings
    pub fn with_table(mut self) -> Self {
        self.table = true;
        self
    }

    pub fn signature(&self) -> &'static str {
        self.signature
    }

    pub fn parameters(&self) -> usize {
        self.parameters
    }

    pub fn takes_table(&self) -> bool {
        self.table
    }

    pub fn is_pending(&self) -> bool {
        self.handler.is_none()
    }

    pub(crate) fn handler(&self) -> Option<StepFn> {
        self.handler
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("signature", &self.signature)
            .field("parameters", &self.parameters)
            .field("table", &self.table)
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Arguments captured from one step sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepArgs {
    values: Vec<Argument>,
    table: Option<Vec<String>>,
}

impl StepArgs {
    pub fn new(values: Vec<Argument>, table: Option<Vec<String>>) -> Self {
        Self { values, table }
    }

    /// Binds a data table: the first cell of every row, in order.
    pub fn table_column(rows: &[Vec<String>]) -> Vec<String> {
        rows.iter()
            .filter_map(|row| row.first())
            .map(|cell| cell.trim().to_string())
            .collect()
    }

    pub fn actor(&self, index: usize) -> Result<&str> {
        match self.values.get(index) {
            Some(Argument::Actor(name)) => Ok(name),
            _ => Err(missing(index, ParameterKind::Actor)),
        }
    }

    pub fn string(&self, index: usize) -> Result<&str> {
        match self.values.get(index) {
            Some(Argument::String(text)) => Ok(text),
            _ => Err(missing(index, ParameterKind::String)),
        }
    }

    pub fn int(&self, index: usize) -> Result<i64> {
        match self.values.get(index) {
            Some(Argument::Int(value)) => Ok(*value),
            _ => Err(missing(index, ParameterKind::Int)),
        }
    }

    pub fn word(&self, index: usize) -> Result<&str> {
        match self.values.get(index) {
            Some(Argument::Word(word)) => Ok(word),
            _ => Err(missing(index, ParameterKind::Word)),
        }
    }

    /// The data table as a list
    pub fn list(&self) -> Result<&[String]> {
        self.table.as_deref().ok_or(Error::MissingArgument {
            index: self.values.len(),
            expected: "a data table",
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn missing(index: usize, kind: ParameterKind) -> Error {
    Error::MissingArgument {
        index,
        expected: kind.as_str(),
    }
}
