// Phase - Given/When/Then ordering within one scenario
//
// A scenario moves forward through NotStarted, Given, When, Then and
// Finished. Staying in a phase is fine; going back is a StepOutOfOrder
// failure. Scenarios may skip phases, e.g. Given followed directly by Then.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    Given,
    When,
    Then,
    Finished,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::NotStarted => "NotStarted",
            Phase::Given => "Given",
            Phase::When => "When",
            Phase::Then => "Then",
            Phase::Finished => "Finished",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<gherkin::StepType> for Phase {
    fn from(ty: gherkin::StepType) -> Self {
        match ty {
            gherkin::StepType::Given => Phase::Given,
            gherkin::StepType::When => Phase::When,
            gherkin::StepType::Then => Phase::Then,
        }
    }
}

/// Tracks the phase of one running scenario.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    current: Phase,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            current: Phase::NotStarted,
        }
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    /// Enters the phase of the next step.
    pub fn advance(&mut self, phase: Phase, step: &str) -> Result<()> {
        if phase < self.current || matches!(phase, Phase::NotStarted | Phase::Finished) {
            return Err(Error::StepOutOfOrder {
                step: step.to_string(),
                phase,
                current: self.current,
            });
        }
        self.current = phase;
        Ok(())
    }

    /// Ends the scenario; no further steps are accepted.
    pub fn finish(&mut self) {
        self.current = Phase::Finished;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_moves_and_repeats() {
        let mut tracker = PhaseTracker::new();
        tracker.advance(Phase::Given, "a").unwrap();
        tracker.advance(Phase::Given, "b").unwrap();
        tracker.advance(Phase::Then, "c").unwrap();
        tracker.advance(Phase::Then, "d").unwrap();
        assert_eq!(tracker.current(), Phase::Then);
    }

    #[test]
    fn test_going_back_is_out_of_order() {
        let mut tracker = PhaseTracker::new();
        tracker.advance(Phase::When, "Toby adds milk").unwrap();

        let error = tracker.advance(Phase::Given, "Toby opens the app").unwrap_err();
        assert!(matches!(
            error,
            Error::StepOutOfOrder {
                phase: Phase::Given,
                current: Phase::When,
                ..
            }
        ));
        assert_eq!(tracker.current(), Phase::When);
    }

    #[test]
    fn test_finished_accepts_nothing() {
        let mut tracker = PhaseTracker::new();
        tracker.advance(Phase::Given, "a").unwrap();
        tracker.finish();
        assert!(tracker.advance(Phase::Then, "late").is_err());
    }

    #[test]
    fn test_phase_from_gherkin_keyword() {
        assert_eq!(Phase::from(gherkin::StepType::When), Phase::When);
    }
}
