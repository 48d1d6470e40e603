// Questions - What the TodoMVC page currently shows
//
// Every question reads the DOM again when asked. Nothing is cached, so a
// deleted item cannot produce a stale answer.

use crate::page;
use screenplay::{Attribute, Error, Question, QuestionExt, Result, Text, TextValues, Visibility};
use serde::Serialize;
use std::fmt;

/// Completion state of a todo item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    Todo,
    Completed,
}

impl TodoStatus {
    /// Maps an item's `class` attribute to a status.
    ///
    /// The `completed` class token means Completed; anything else, including
    /// an absent attribute, means Todo. The class is read as a token list,
    /// not compared whole, so `completed editing` is still Completed.
    pub fn from_class(class: &str) -> Self {
        if class.split_whitespace().any(|token| token == "completed") {
            TodoStatus::Completed
        } else {
            TodoStatus::Todo
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoStatus::Todo => f.write_str("todo"),
            TodoStatus::Completed => f.write_str("completed"),
        }
    }
}

/// The status of the item labelled exactly `label`.
///
/// Asking about an item that is not rendered fails instead of answering Todo.
pub fn status_of(label: &str) -> Result<impl Question<Answer = TodoStatus> + 'static> {
    let item = page::listed_item(label)?;
    let subject = format!("the status of '{}'", label);
    Ok(Attribute::named("class")
        .of(item)
        .map(subject, |class| Ok(TodoStatus::from_class(&class))))
}

/// The number of items left, parsed from the counter in the footer bar.
pub fn remaining_count() -> impl Question<Answer = u32> + 'static {
    Text::of(page::items_left_message()).map("the number of items left", parse_count)
}

/// The counter message as displayed, e.g. "2 items left"
pub fn items_left_message() -> Text {
    Text::of(page::items_left_message())
}

pub fn footer_text() -> Text {
    Text::of(page::footer())
}

pub fn footer_visible() -> Visibility {
    Visibility::of(page::footer())
}

/// Labels of the rendered items, in display order
pub fn todo_list_items() -> TextValues {
    TextValues::of(page::todo_list_labels())
}

pub fn new_todo_placeholder() -> Attribute {
    Attribute::named("placeholder").of(page::new_todo_field())
}

/// Reads the leading number of a counter such as "2 items left".
///
/// Text without a leading number is a parse error, never zero.
pub fn parse_count(text: String) -> Result<u32> {
    let parsed = text
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok());
    parsed.ok_or(Error::Parse {
        subject: "the number of items left".to_string(),
        text,
        expected_type: "a number of items",
    })
}
