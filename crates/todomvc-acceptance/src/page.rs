// Page - Locator catalog for the TodoMVC application
//
// Every element the suite touches is named here. Item lookups compare the
// whole, whitespace-normalized label text, so "Buy milk" never matches
// "Buy milk and eggs". Labels are embedded as escaped XPath literals.

use screenplay::{Result, Target, TargetTemplate};
use std::sync::LazyLock;

const TODO_ITEM: &str =
    "//ul[contains(concat(' ', normalize-space(@class), ' '), ' todo-list ')]/li[.//label[normalize-space(.)={0}]]";

static LISTED_ITEM: LazyLock<TargetTemplate> = LazyLock::new(|| {
    TargetTemplate::the("the todo item called '{0}'").located_by_template(TODO_ITEM)
});

static COMPLETE_CHECKBOX: LazyLock<TargetTemplate> = LazyLock::new(|| {
    TargetTemplate::the("the complete checkbox for '{0}'")
        .located_by_template(&format!("{}//input[@type='checkbox']", TODO_ITEM))
});

static ITEM_LABEL: LazyLock<TargetTemplate> = LazyLock::new(|| {
    TargetTemplate::the("the '{0}' item")
        .located_by_template(&format!("{}//label", TODO_ITEM))
});

static DELETE_BUTTON: LazyLock<TargetTemplate> = LazyLock::new(|| {
    TargetTemplate::the("the '{0}' delete button").located_by_template(&format!(
        "{}//button[contains(concat(' ', normalize-space(@class), ' '), ' destroy ')]",
        TODO_ITEM
    ))
});

static FILTER: LazyLock<TargetTemplate> = LazyLock::new(|| {
    TargetTemplate::the("the {0} filter")
        .located_by_template("//ul[contains(@class, 'filters')]//a[normalize-space(.)={0}]")
});

/// The field for new todo items
pub fn new_todo_field() -> Target {
    Target::the("the new todo field").located_by(".header .new-todo")
}

/// Labels of every item in the list, in display order
pub fn todo_list_labels() -> Target {
    Target::the("the todo list items").located_by(".todo-list li label")
}

/// The field shown while an item is being edited.
///
/// Classic markup uses `li.editing .edit`; the current React build renders
/// the edit field as another `.new-todo` input inside the item.
pub fn edit_field() -> Target {
    Target::the("the edit field").located_by(".todo-list li.editing .edit, .todo-list li .new-todo")
}

pub fn items_left_message() -> Target {
    Target::the("the number of items left").located_by(".todo-count")
}

pub fn footer() -> Target {
    Target::the("the footer section").located_by("footer.info")
}

/// The `<li>` holding the item labelled exactly `label`
pub fn listed_item(label: &str) -> Result<Target> {
    LISTED_ITEM.of(&[label])
}

pub fn complete_checkbox(label: &str) -> Result<Target> {
    COMPLETE_CHECKBOX.of(&[label])
}

pub fn item_label(label: &str) -> Result<Target> {
    ITEM_LABEL.of(&[label])
}

pub fn delete_button(label: &str) -> Result<Target> {
    DELETE_BUTTON.of(&[label])
}

/// The filter link whose visible text is `name`
pub fn filter(name: &str) -> Result<Target> {
    FILTER.of(&[name])
}
