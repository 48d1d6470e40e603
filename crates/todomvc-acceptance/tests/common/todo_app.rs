// TodoApp - An in-memory TodoMVC page behind the WebSession seam
//
// Unlike ScriptedSession, this session reacts to actions the way the
// TodoMVC application does: Enter in the new todo field adds an item, the
// checkbox toggles, the destroy button removes, double-click edits, and the
// filter links change which items are rendered. Selectors are recognised by
// comparing them with the page catalog, so the tasks under test drive it
// exactly as they drive a browser.

use async_trait::async_trait;
use parking_lot::Mutex;
use screenplay::{Actor, BrowseTheWeb, Cast, Error, Key, Result, Selector, Target, WebSession};
use std::sync::Arc;
use todomvc_acceptance::page;

const FOOTER: &str = "Double-click to edit a todo\nPart of TodoMVC";
const PROMPT: &str = "What needs to be done?";
const FILTERS: [&str; 3] = ["All", "Active", "Completed"];

#[derive(Debug, Clone)]
struct Todo {
    title: String,
    completed: bool,
}

#[derive(Debug)]
struct Editing {
    index: usize,
    value: String,
    selected: bool,
}

#[derive(Debug, Default)]
struct State {
    todos: Vec<Todo>,
    filter: String,
    draft: String,
    editing: Option<Editing>,
    clicks: usize,
    closed: bool,
}

impl State {
    fn shown(&self) -> Vec<(usize, &Todo)> {
        self.todos
            .iter()
            .enumerate()
            .filter(|(_, todo)| match self.filter.as_str() {
                "Active" => !todo.completed,
                "Completed" => todo.completed,
                _ => true,
            })
            .collect()
    }

    /// Index of the rendered item whose `target` matches `selector`
    fn item_for(&self, selector: &Selector, target: fn(&str) -> Result<Target>) -> Option<usize> {
        self.shown().into_iter().find_map(|(index, todo)| {
            let candidate = target(&todo.title).ok()?;
            (candidate.selector() == selector).then_some(index)
        })
    }

    fn left(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    fn commit_edit(&mut self) {
        if let Some(editing) = self.editing.take() {
            let title = editing.value.trim().to_string();
            if title.is_empty() {
                self.todos.remove(editing.index);
            } else {
                self.todos[editing.index].title = title;
            }
        }
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Enter => self.commit_edit(),
            Key::Escape => self.editing = None,
            _ => {
                if let Some(editing) = self.editing.as_mut() {
                    match key {
                        Key::SelectAll => editing.selected = true,
                        Key::Backspace | Key::Delete if editing.selected => {
                            editing.value.clear();
                            editing.selected = false;
                        }
                        Key::Backspace => {
                            editing.value.pop();
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

fn not_found(selector: &Selector) -> Error {
    Error::ElementNotFound(selector.to_engine_string())
}

/// A TodoMVC page held in memory
#[derive(Debug, Default)]
pub struct TodoApp {
    state: Mutex<State>,
}

impl TodoApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Titles of every item, whatever the filter
    pub fn titles(&self) -> Vec<String> {
        self.state.lock().todos.iter().map(|todo| todo.title.clone()).collect()
    }

    pub fn is_completed(&self, title: &str) -> Option<bool> {
        self.state
            .lock()
            .todos
            .iter()
            .find(|todo| todo.title == title)
            .map(|todo| todo.completed)
    }

    /// Number of clicks that reached an element
    pub fn clicks(&self) -> usize {
        self.state.lock().clicks
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn live(&self) -> Result<parking_lot::MutexGuard<'_, State>> {
        let state = self.state.lock();
        if state.closed {
            return Err(Error::SessionClosed("todo app".to_string()));
        }
        Ok(state)
    }
}

#[async_trait]
impl WebSession for TodoApp {
    async fn open(&self, _url: &str) -> Result<()> {
        let mut state = self.live()?;
        state.filter = "All".to_string();
        Ok(())
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        let mut state = self.live()?;
        if let Some(index) = state.item_for(selector, page::complete_checkbox) {
            let todo = &mut state.todos[index];
            todo.completed = !todo.completed;
        } else if let Some(index) = state.item_for(selector, page::delete_button) {
            state.todos.remove(index);
        } else if state.item_for(selector, page::item_label).is_some() {
            // Clicking a label only reveals the item's controls
        } else if let Some(name) = FILTERS
            .iter()
            .find(|name| page::filter(name).is_ok_and(|target| target.selector() == selector))
        {
            state.filter = name.to_string();
        } else {
            return Err(not_found(selector));
        }
        state.clicks += 1;
        Ok(())
    }

    async fn double_click(&self, selector: &Selector) -> Result<()> {
        let mut state = self.live()?;
        let index = state
            .item_for(selector, page::item_label)
            .ok_or_else(|| not_found(selector))?;
        let value = state.todos[index].title.clone();
        state.editing = Some(Editing {
            index,
            value,
            selected: false,
        });
        Ok(())
    }

    async fn fill(&self, selector: &Selector, text: &str) -> Result<()> {
        let mut state = self.live()?;
        if selector != page::new_todo_field().selector() {
            return Err(not_found(selector));
        }
        state.draft = text.to_string();
        Ok(())
    }

    async fn press(&self, selector: &Selector, key: Key) -> Result<()> {
        let mut state = self.live()?;
        if selector != page::new_todo_field().selector() {
            return Err(not_found(selector));
        }
        if key == Key::Enter {
            let title = std::mem::take(&mut state.draft).trim().to_string();
            if !title.is_empty() {
                state.todos.push(Todo {
                    title,
                    completed: false,
                });
            }
        }
        Ok(())
    }

    async fn press_keys(&self, keys: &[Key]) -> Result<()> {
        let mut state = self.live()?;
        for key in keys {
            state.key(*key);
        }
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        let mut state = self.live()?;
        if let Some(editing) = state.editing.as_mut() {
            if editing.selected {
                editing.value.clear();
                editing.selected = false;
            }
            editing.value.push_str(text);
        }
        Ok(())
    }

    async fn text_content(&self, selector: &Selector) -> Result<String> {
        let state = self.live()?;
        if selector == page::footer().selector() {
            Ok(FOOTER.to_string())
        } else if selector == page::items_left_message().selector() {
            let left = state.left();
            Ok(format!("{} {} left", left, if left == 1 { "item" } else { "items" }))
        } else {
            Err(not_found(selector))
        }
    }

    async fn text_contents(&self, selector: &Selector) -> Result<Vec<String>> {
        let state = self.live()?;
        if selector == page::todo_list_labels().selector() {
            Ok(state.shown().into_iter().map(|(_, todo)| todo.title.clone()).collect())
        } else {
            Ok(Vec::new())
        }
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> Result<Option<String>> {
        let state = self.live()?;
        if selector == page::new_todo_field().selector() {
            return Ok((name == "placeholder").then(|| PROMPT.to_string()));
        }
        let index = state
            .item_for(selector, page::listed_item)
            .ok_or_else(|| not_found(selector))?;
        let completed = state.todos[index].completed;
        Ok((name == "class" && completed).then(|| "completed".to_string()))
    }

    async fn is_visible(&self, selector: &Selector) -> Result<bool> {
        let state = self.live()?;
        if selector == page::edit_field().selector() {
            Ok(state.editing.is_some())
        } else {
            Ok(selector == page::footer().selector())
        }
    }

    async fn count(&self, selector: &Selector) -> Result<usize> {
        Ok(self.text_contents(selector).await?.len())
    }

    async fn close(&self) -> Result<()> {
        self.state.lock().closed = true;
        Ok(())
    }
}

/// Gives every actor its own in-memory page, as a browser per actor would
#[derive(Default)]
pub struct TodoAppCast {
    issued: Mutex<Vec<(String, Arc<TodoApp>)>>,
}

impl TodoAppCast {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest page handed to `name`
    pub fn app_for(&self, name: &str) -> Option<Arc<TodoApp>> {
        self.issued
            .lock()
            .iter()
            .rev()
            .find(|(actor, _)| actor == name)
            .map(|(_, app)| app.clone())
    }

    /// Every page handed out so far, in casting order
    pub fn apps(&self) -> Vec<Arc<TodoApp>> {
        self.issued.lock().iter().map(|(_, app)| app.clone()).collect()
    }
}

#[async_trait]
impl Cast for TodoAppCast {
    async fn actor_named(&self, name: &str) -> Result<Actor> {
        let app = Arc::new(TodoApp::new());
        self.issued.lock().push((name.to_string(), app.clone()));
        Ok(Actor::named(name).who_can(BrowseTheWeb::with(app)))
    }
}
