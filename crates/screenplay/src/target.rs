// Target - Named element locators
//
// A Target pairs a human-readable name with a selector. Names show up in
// step output and failure messages; selectors are handed to the browsing
// session only when an interaction runs.
//
// Parameterized locators are TargetTemplates. Their `{0}`, `{1}`, ...
// placeholders sit where a string literal belongs in the selector and are
// filled with escaped literals, so a label containing quotes still yields a
// valid selector that matches exactly that label.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Selector understood by the browser automation driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "engine", content = "query", rename_all = "lowercase")]
pub enum Selector {
    Css(String),
    XPath(String),
}

impl Selector {
    pub fn css(query: impl Into<String>) -> Self {
        Selector::Css(query.into())
    }

    pub fn xpath(query: impl Into<String>) -> Self {
        Selector::XPath(query.into())
    }

    /// Parses a selector string.
    ///
    /// Accepts explicit `css:` / `xpath:` prefixes. Without a prefix, queries
    /// starting with `/` or `(` are XPath and everything else is CSS.
    pub fn parse(query: &str) -> Self {
        if let Some(css) = query.strip_prefix("css:") {
            Selector::css(css)
        } else if let Some(xpath) = query.strip_prefix("xpath:") {
            Selector::xpath(xpath)
        } else if query.starts_with('/') || query.starts_with('(') {
            Selector::xpath(query)
        } else {
            Selector::css(query)
        }
    }

    /// The raw query without engine prefix
    pub fn query(&self) -> &str {
        match self {
            Selector::Css(query) | Selector::XPath(query) => query,
        }
    }

    /// Selector string in Playwright's `engine=query` form
    pub fn to_engine_string(&self) -> String {
        match self {
            Selector::Css(query) => format!("css={}", query),
            Selector::XPath(query) => format!("xpath={}", query),
        }
    }

    /// Renders `value` as a string literal valid for this selector engine.
    pub fn literal(&self, value: &str) -> String {
        match self {
            Selector::Css(_) => css_string(value),
            Selector::XPath(_) => xpath_literal(value),
        }
    }

    fn with_query(&self, query: String) -> Self {
        match self {
            Selector::Css(_) => Selector::Css(query),
            Selector::XPath(_) => Selector::XPath(query),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_engine_string())
    }
}

/// A named, concrete element locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Target {
    name: String,
    selector: Selector,
}

impl Target {
    /// Starts a target definition: `Target::the("New todo field").located_by(".new-todo")`.
    pub fn the(name: impl Into<String>) -> TargetBuilder {
        TargetBuilder { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Narrows this target to descendants matched by `selector`.
    ///
    /// Both selectors must use the same engine; mixing engines is rejected.
    pub fn inside(&self, name: impl Into<String>, selector: Selector) -> Result<Target> {
        let query = match (&self.selector, &selector) {
            (Selector::Css(outer), Selector::Css(inner)) => format!("{} {}", outer, inner),
            (Selector::XPath(outer), Selector::XPath(inner)) => {
                format!("{}{}", outer, inner.strip_prefix('.').unwrap_or(inner))
            }
            _ => {
                return Err(Error::InvalidTarget {
                    name: self.name.clone(),
                    reason: "cannot nest a CSS selector inside an XPath one, or the reverse"
                        .to_string(),
                });
            }
        };
        Ok(Target {
            name: name.into(),
            selector: self.selector.with_query(query),
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder returned by [`Target::the`] and [`TargetTemplate::the`].
#[derive(Debug, Clone)]
pub struct TargetBuilder {
    name: String,
}

impl TargetBuilder {
    /// Completes a concrete target. See [`Selector::parse`] for accepted forms.
    pub fn located_by(self, query: &str) -> Target {
        self.located(Selector::parse(query))
    }

    pub fn located(self, selector: Selector) -> Target {
        Target {
            name: self.name,
            selector,
        }
    }

    /// Completes a parameterized target whose query contains `{n}` placeholders.
    pub fn located_by_template(self, query: &str) -> TargetTemplate {
        TargetTemplate::new(self.name, Selector::parse(query))
    }
}

/// A target whose name and selector take positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTemplate {
    name: String,
    selector: Selector,
    arity: usize,
}

impl TargetTemplate {
    pub fn the(name: impl Into<String>) -> TargetBuilder {
        Target::the(name)
    }

    fn new(name: String, selector: Selector) -> Self {
        let arity = placeholders(selector.query())
            .into_iter()
            .map(|index| index + 1)
            .max()
            .unwrap_or(0);
        Self {
            name,
            selector,
            arity,
        }
    }

    /// Number of parameters this template expects
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Resolves the template into a concrete target.
    ///
    /// Each parameter is escaped as a literal of the template's selector
    /// engine. The name receives the raw parameter text.
    pub fn of(&self, params: &[&str]) -> Result<Target> {
        if params.len() != self.arity {
            return Err(Error::InvalidTarget {
                name: self.name.clone(),
                reason: format!(
                    "expected {} parameter(s), got {}",
                    self.arity,
                    params.len()
                ),
            });
        }

        let name = substitute(&self.name, |index| params.get(index).map(|p| p.to_string()));
        let query = substitute(self.selector.query(), |index| {
            params.get(index).map(|p| self.selector.literal(p))
        });

        Ok(Target {
            name,
            selector: self.selector.with_query(query),
        })
    }
}

/// Quotes `value` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so a value containing both quote kinds is
/// assembled with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }

    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// Quotes `value` as a CSS string literal.
pub fn css_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\a "),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Positions of `{n}` placeholders, in order of appearance.
fn placeholders(text: &str) -> Vec<usize> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                if let Ok(index) = after[..close].parse::<usize>() {
                    found.push(index);
                }
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    found
}

fn substitute(text: &str, value_for: impl Fn(usize) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index = after[..close].parse::<usize>().ok()?;
            Some((value_for(index)?, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(&value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
