// Ensure - Auto-retry assertions over questions
//
// Ensure::that(question) builds an assertion an actor can perform. The
// question is asked again until the expectation holds or the timeout
// elapses, the same way Playwright's expect() polls a locator. On timeout
// the last observed answer is reported as the actual value.

use crate::actor::Actor;
use crate::error::{Error, Result};
use crate::question::Question;
use crate::task::Performable;
use async_trait::async_trait;
use std::fmt;
use std::time::{Duration, Instant};

/// Default timeout for assertions (5 seconds, matching Playwright)
pub const DEFAULT_ASSERTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default polling interval for assertions (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Entry point for assertions.
///
/// ```ignore
/// actor.attempts_to(&Ensure::that(TodoListItems::displayed()).contains_exactly(["Buy milk"])).await?;
/// ```
pub struct Ensure;

impl Ensure {
    pub fn that<Q>(question: Q) -> EnsureThat<Q>
    where
        Q: Question + 'static,
    {
        EnsureThat {
            question,
            timeout: DEFAULT_ASSERTION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// A question waiting for its expectation
pub struct EnsureThat<Q> {
    question: Q,
    timeout: Duration,
    poll_interval: Duration,
}

type Predicate<A> = Box<dyn Fn(&A) -> bool + Send + Sync>;

impl<Q> EnsureThat<Q>
where
    Q: Question + 'static,
{
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Default is 100ms.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Asserts with a custom predicate.
    ///
    /// `expectation` and `expected` only feed the failure message, which
    /// reads "Expected {subject} {expectation} {expected}, but was {actual}".
    pub fn matches<F>(self, expectation: &'static str, expected: impl Into<String>, predicate: F) -> Assertion<Q>
    where
        F: Fn(&Q::Answer) -> bool + Send + Sync + 'static,
    {
        Assertion {
            question: self.question,
            expectation,
            expected: expected.into(),
            predicate: Box::new(predicate),
            timeout: self.timeout,
            poll_interval: self.poll_interval,
        }
    }

    pub fn is_equal_to(self, expected: impl Into<Q::Answer>) -> Assertion<Q>
    where
        Q::Answer: PartialEq + Sync + 'static,
    {
        let expected = expected.into();
        let shown = format!("{:?}", expected);
        self.matches("to equal", shown, move |answer| *answer == expected)
    }

    pub fn is_not_equal_to(self, unexpected: impl Into<Q::Answer>) -> Assertion<Q>
    where
        Q::Answer: PartialEq + Sync + 'static,
    {
        let unexpected = unexpected.into();
        let shown = format!("{:?}", unexpected);
        self.matches("not to equal", shown, move |answer| *answer != unexpected)
    }
}

impl<Q> EnsureThat<Q>
where
    Q: Question<Answer = String> + 'static,
{
    pub fn contains(self, fragment: impl Into<String>) -> Assertion<Q> {
        let fragment = fragment.into();
        let shown = format!("{:?}", fragment);
        self.matches("to contain", shown, move |answer| answer.contains(&fragment))
    }
}

impl<Q> EnsureThat<Q>
where
    Q: Question<Answer = Vec<String>> + 'static,
{
    /// Every expected item is present, in any order
    pub fn contains_elements_from<I, S>(self, expected: I) -> Assertion<Q>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expected = collect(expected);
        let shown = format!("{:?}", expected);
        self.matches("to contain every item of", shown, move |answer| {
            expected.iter().all(|item| answer.contains(item))
        })
    }

    /// The expected items appear in this relative order, possibly with
    /// other items in between
    pub fn contains_in_order<I, S>(self, expected: I) -> Assertion<Q>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expected = collect(expected);
        let shown = format!("{:?}", expected);
        self.matches("to contain in order", shown, move |answer| {
            let mut remaining = answer.iter();
            expected
                .iter()
                .all(|item| remaining.any(|candidate| candidate == item))
        })
    }

    pub fn contains_exactly<I, S>(self, expected: I) -> Assertion<Q>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expected = collect(expected);
        let shown = format!("{:?}", expected);
        self.matches("to be exactly", shown, move |answer| *answer == expected)
    }

    pub fn does_not_contain(self, item: impl Into<String>) -> Assertion<Q> {
        let item = item.into();
        let shown = format!("{:?}", item);
        self.matches("not to contain", shown, move |answer| !answer.contains(&item))
    }
}

impl<Q> EnsureThat<Q>
where
    Q: Question<Answer = bool> + 'static,
{
    pub fn is_true(self) -> Assertion<Q> {
        self.matches("to be", "true", |answer| *answer)
    }

    pub fn is_false(self) -> Assertion<Q> {
        self.matches("to be", "false", |answer| !*answer)
    }
}

fn collect<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// A polling assertion, performed like any other task.
pub struct Assertion<Q: Question> {
    question: Q,
    expectation: &'static str,
    expected: String,
    predicate: Predicate<Q::Answer>,
    timeout: Duration,
    poll_interval: Duration,
}

impl<Q: Question> Assertion<Q> {
    async fn evaluate(&self, actor: &Actor) -> Result<()> {
        let answer = actor.asks_for(&self.question).await?;
        if (self.predicate)(&answer) {
            Ok(())
        } else {
            Err(Error::AssertionFailed {
                subject: self.question.subject(),
                expectation: self.expectation,
                expected: self.expected.clone(),
                actual: format!("{:?}", answer),
            })
        }
    }
}

#[async_trait]
impl<Q> Performable for Assertion<Q>
where
    Q: Question + 'static,
{
    fn description(&self) -> String {
        format!(
            "{{0}} expects {} {} {}",
            self.question.subject(),
            self.expectation,
            self.expected
        )
    }

    async fn perform_as(&self, actor: &Actor) -> Result<()> {
        let start = Instant::now();

        loop {
            let outcome = self.evaluate(actor).await;
            match outcome {
                Ok(()) => return Ok(()),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) if start.elapsed() >= self.timeout => {
                    tracing::debug!(timeout = ?self.timeout, "Assertion timed out");
                    return Err(e);
                }
                Err(_) => {}
            }

            // Wait before next poll
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

impl<Q: Question> fmt::Debug for Assertion<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("subject", &self.question.subject())
            .field("expectation", &self.expectation)
            .field("expected", &self.expected)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
