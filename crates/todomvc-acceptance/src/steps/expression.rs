// Step expressions - Typed step signatures compiled to anchored regexes
//
// Signature syntax:
//   {actor}   a capitalised name such as Toby or Jane, never a pronoun
//   {string}  text between double quotes, quotes excluded
//   {int}     an optionally negative integer
//   {word}    a run of non-whitespace characters
//   a/b       either word in any case, e.g. "he/she", "his/her"
// Everything else is literal text.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;

/// Parameter types available in step signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Actor,
    String,
    Int,
    Word,
}

impl ParameterKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "actor" => Some(ParameterKind::Actor),
            "string" => Some(ParameterKind::String),
            "int" => Some(ParameterKind::Int),
            "word" => Some(ParameterKind::Word),
            _ => None,
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            ParameterKind::Actor => r"([\p{Lu}][\w'-]*)",
            ParameterKind::String => r#""([^"]*)""#,
            ParameterKind::Int => r"(-?\d+)",
            ParameterKind::Word => r"(\S+)",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::Actor => "an actor name",
            ParameterKind::String => "a string",
            ParameterKind::Int => "an integer",
            ParameterKind::Word => "a word",
        }
    }
}

/// Words that refer to an actor instead of naming one
const PRONOUNS: &[&str] = &["he", "she", "his", "her", "him", "they", "them", "their", "it", "i", "we", "you"];

fn is_pronoun(word: &str) -> bool {
    PRONOUNS.iter().any(|pronoun| pronoun.eq_ignore_ascii_case(word))
}

/// A value captured from a step sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Actor(String),
    String(String),
    Int(i64),
    Word(String),
}

/// A compiled step signature
#[derive(Debug, Clone)]
pub struct StepExpression {
    signature: String,
    regex: Regex,
    parameters: Vec<ParameterKind>,
}

impl StepExpression {
    pub fn compile(signature: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidStepExpression {
            signature: signature.to_string(),
            reason,
        };

        let mut pattern = String::from("^");
        let mut parameters = Vec::new();
        let mut rest = signature;

        while let Some(open) = rest.find(['{', '}']) {
            if rest[open..].starts_with('}') {
                return Err(invalid(format!("unmatched '}}' at byte {}", signature.len() - rest.len() + open)));
            }
            pattern.push_str(&literal(&rest[..open]).map_err(&invalid)?);

            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| invalid("unclosed '{'".to_string()))?;
            let name = &after[..close];
            let kind = ParameterKind::from_name(name)
                .ok_or_else(|| invalid(format!("unknown parameter type '{{{}}}'", name)))?;

            pattern.push_str(kind.pattern());
            parameters.push(kind);
            rest = &after[close + 1..];
        }
        pattern.push_str(&literal(rest).map_err(&invalid)?);
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            signature: signature.to_string(),
            regex,
            parameters,
        })
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn parameters(&self) -> &[ParameterKind] {
        &self.parameters
    }

    /// Matches a whole step sentence and converts the captures.
    ///
    /// Returns `None` when the sentence does not match, or when an actor
    /// parameter captured a pronoun such as "She".
    pub fn captures(&self, text: &str) -> Option<Vec<Argument>> {
        let captures = self.regex.captures(text)?;
        self.parameters
            .iter()
            .enumerate()
            .map(|(index, kind)| {
                let raw = captures.get(index + 1)?.as_str().to_string();
                match kind {
                    ParameterKind::Actor if is_pronoun(&raw) => None,
                    ParameterKind::Actor => Some(Argument::Actor(raw)),
                    ParameterKind::String => Some(Argument::String(raw)),
                    ParameterKind::Int => raw.parse().ok().map(Argument::Int),
                    ParameterKind::Word => Some(Argument::Word(raw)),
                }
            })
            .collect()
    }
}

impl fmt::Display for StepExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature)
    }
}

/// Escapes literal text, turning `a/b` words into alternatives.
fn literal(text: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            out.push_str(&literal_word(&word)?);
            word.clear();
            out.push_str(r"\s+");
        } else {
            word.push(c);
        }
    }
    out.push_str(&literal_word(&word)?);
    Ok(out)
}

fn literal_word(word: &str) -> std::result::Result<String, String> {
    if !word.contains('/') {
        return Ok(regex::escape(word));
    }
    let options: Vec<&str> = word.split('/').collect();
    if options.iter().any(|option| option.is_empty()) {
        return Err(format!("empty alternative in '{}'", word));
    }
    let escaped: Vec<String> = options.iter().map(|option| regex::escape(option)).collect();
    Ok(format!("(?i:{})", escaped.join("|")))
}
