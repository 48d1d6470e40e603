// Registry - The compiled step table
//
// Built once at startup. Compilation rejects invalid expressions, duplicate
// signatures, and handlers whose declared parameter count differs from what
// the expression captures. Resolution matches a sentence against every
// entry: exactly one match binds, none is undefined, several are ambiguous.

use super::{StepArgs, StepDefinition, StepExpression, StepFn};
use crate::error::{Error, Result};
use crate::world::ScenarioWorld;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug)]
struct Entry {
    expression: StepExpression,
    definition: StepDefinition,
}

/// Validated table of step definitions
#[derive(Debug)]
pub struct StepRegistry {
    entries: Vec<Entry>,
}

impl StepRegistry {
    pub fn build(definitions: impl IntoIterator<Item = StepDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for definition in definitions {
            if !seen.insert(definition.signature()) {
                return Err(Error::DuplicateStep(definition.signature().to_string()));
            }

            let expression = StepExpression::compile(definition.signature())?;
            let found = expression.parameters().len();
            if found != definition.parameters() {
                return Err(Error::ParameterMismatch {
                    signature: definition.signature().to_string(),
                    expected: definition.parameters(),
                    found,
                });
            }

            entries.push(Entry {
                expression,
                definition,
            });
        }

        tracing::debug!(steps = entries.len(), "Step table compiled");
        Ok(Self { entries })
    }

    /// Binds a step sentence, with its data table if any, to one definition.
    pub fn resolve(&self, text: &str, table: Option<&[Vec<String>]>) -> Result<Binding> {
        let mut matches: Vec<(&Entry, Vec<_>)> = self
            .entries
            .iter()
            .filter_map(|entry| entry.expression.captures(text).map(|values| (entry, values)))
            .collect();

        if matches.len() > 1 {
            return Err(Error::AmbiguousStep {
                step: text.to_string(),
                candidates: matches
                    .iter()
                    .map(|(entry, _)| entry.definition.signature().to_string())
                    .collect(),
            });
        }
        let (entry, values) = matches
            .pop()
            .ok_or_else(|| Error::UndefinedStep(text.to_string()))?;

        let table = match (entry.definition.takes_table(), table) {
            (true, Some(rows)) => Some(StepArgs::table_column(rows)),
            (true, None) => return Err(Error::MissingTable(text.to_string())),
            (false, _) => None,
        };

        Ok(Binding {
            signature: entry.definition.signature(),
            handler: entry.definition.handler(),
            args: StepArgs::new(values, table),
        })
    }

    /// Signatures in table order
    pub fn signatures(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.definition.signature())
    }

    /// The table as lines for `--list-steps`
    pub fn describe(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| {
                let definition = &entry.definition;
                let mut line = definition.signature().to_string();
                if definition.takes_table() {
                    line.push_str(" + table");
                }
                if definition.is_pending() {
                    line.push_str(" (pending)");
                }
                line
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A sentence bound to its definition, ready to run.
#[derive(Clone)]
pub struct Binding {
    signature: &'static str,
    handler: Option<StepFn>,
    args: StepArgs,
}

impl Binding {
    pub fn signature(&self) -> &'static str {
        self.signature
    }

    pub fn args(&self) -> &StepArgs {
        &self.args
    }

    pub fn is_pending(&self) -> bool {
        self.handler.is_none()
    }

    /// Runs the handler; a pending step fails with `Pending`.
    pub async fn run(&self, world: &mut ScenarioWorld) -> Result<()> {
        match self.handler {
            Some(handler) => handler(world, self.args.clone()).await,
            None => Err(Error::Pending(self.signature.to_string())),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("signature", &self.signature)
            .field("args", &self.args)
            .field("pending", &self.is_pending())
            .finish()
    }
}
