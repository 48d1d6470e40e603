// Definitions - The TodoMVC step table
//
// Sentences naming an actor ("Toby opens ...") cast that actor and put it
// in the spotlight. Sentences using a pronoun ("she adds ...") act through
// the actor in the spotlight.

use super::{StepArgs, StepDefinition};
use crate::error::{Error, Result};
use crate::questions::{self, TodoStatus};
use crate::tasks::{
    AddATodoItem, AddTodoItems, CompleteTodoItem, DeleteTodoItem, FilterTodoItems,
    OpenTheApplication, UpdateTodoItem,
};
use crate::world::ScenarioWorld;
use futures_util::future::BoxFuture;
use screenplay::Performable;

/// Text the footer credits must contain
pub const FOOTER_CREDITS: &str = "Part of TodoMVC";

/// Placeholder prompting for the first item
pub const NEW_TODO_PROMPT: &str = "What needs to be done?";

/// Every step the suite understands
pub fn todo_steps() -> Vec<StepDefinition> {
    vec![
        // Setup
        StepDefinition::new("{actor} opens the Todo Application", 1, opens_the_application),
        StepDefinition::new("{actor} has not entered any todo items", 1, opens_the_application),
        StepDefinition::new("{actor} has a todo list containing", 1, has_a_list_containing).with_table(),
        // Actions
        StepDefinition::new("{actor} adds {string}", 2, named_actor_adds),
        StepDefinition::new("he/she adds {string}", 1, adds),
        StepDefinition::new("he/she adds the following items:", 0, adds_items).with_table(),
        StepDefinition::new("he/she completes {string}", 1, completes),
        StepDefinition::new("he/she filters the list to show {word} tasks", 1, filters),
        StepDefinition::new("he/she deletes {string}", 1, deletes),
        StepDefinition::new("he/she updates {string} to {string}", 2, updates),
        // Outcomes
        StepDefinition::new("he/she should see the credits in the footer", 0, sees_credits),
        StepDefinition::new("he/she should see {string} in the footer", 1, sees_in_footer),
        StepDefinition::new("the application should suggest how to add them", 0, suggests_how_to_add),
        StepDefinition::new("his/her todo list should contain:", 0, list_contains).with_table(),
        StepDefinition::new("his/her todo list should contain exactly:", 0, list_is_exactly).with_table(),
        StepDefinition::new("his/her todo list should not contain {string}", 1, list_lacks),
        StepDefinition::new(
            "the todo item called {string} should be marked as completed",
            1,
            marked_as_completed,
        ),
        StepDefinition::new("the todo item called {string} should be marked as todo", 1, marked_as_todo),
        StepDefinition::new("the number of items left should be {int}", 1, items_left),
    ]
}

/// The actor in the spotlight attempts `performable`
async fn in_the_spotlight(world: &ScenarioWorld, performable: &dyn Performable) -> Result<()> {
    world
        .actor_in_the_spotlight()?
        .attempts_to(performable)
        .await?;
    Ok(())
}

/// The named actor steps into the spotlight and attempts `performable`
async fn as_actor(world: &mut ScenarioWorld, name: &str, performable: &dyn Performable) -> Result<()> {
    world.actor_called(name).await?.attempts_to(performable).await?;
    Ok(())
}

fn opens_the_application<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let open = OpenTheApplication::at(&world.config().app_url);
        as_actor(world, args.actor(0)?, &open).await
    })
}

fn has_a_list_containing<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let open = OpenTheApplication::at(&world.config().app_url);
        let name = args.actor(0)?;
        as_actor(world, name, &open).await?;
        as_actor(world, name, &AddTodoItems::from(args.list()?)).await
    })
}

fn named_actor_adds<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move { as_actor(world, args.actor(0)?, &AddATodoItem::called(args.string(1)?)).await })
}

fn adds<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move { in_the_spotlight(world, &AddATodoItem::called(args.string(0)?)).await })
}

fn adds_items<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move { in_the_spotlight(world, &AddTodoItems::from(args.list()?)).await })
}

fn completes<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move { in_the_spotlight(world, &CompleteTodoItem::called(args.string(0)?)).await })
}

fn filters<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move { in_the_spotlight(world, &FilterTodoItems::by(args.word(0)?)).await })
}

fn deletes<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move { in_the_spotlight(world, &DeleteTodoItem::called(args.string(0)?)).await })
}

fn updates<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let update = UpdateTodoItem::from(args.string(0)?)
            .to(args.string(1)?)
            .using(world.config().edit_strategy)
            .within(world.config().assertion_timeout);
        in_the_spotlight(world, &update).await
    })
}

fn sees_credits<'a>(world: &'a mut ScenarioWorld, _args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let credits = world.ensure(questions::footer_text()).contains(FOOTER_CREDITS);
        let visible = world.ensure(questions::footer_visible()).is_true();
        in_the_spotlight(world, &credits).await?;
        in_the_spotlight(world, &visible).await
    })
}

fn sees_in_footer<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let assertion = world.ensure(questions::footer_text()).contains(args.string(0)?);
        in_the_spotlight(world, &assertion).await
    })
}

fn suggests_how_to_add<'a>(world: &'a mut ScenarioWorld, _args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let assertion = world
            .ensure(questions::new_todo_placeholder())
            .is_equal_to(NEW_TODO_PROMPT);
        in_the_spotlight(world, &assertion).await
    })
}

fn list_contains<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let assertion = world
            .ensure(questions::todo_list_items())
            .contains_elements_from(args.list()?.to_vec());
        in_the_spotlight(world, &assertion).await
    })
}

fn list_is_exactly<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let assertion = world
            .ensure(questions::todo_list_items())
            .contains_exactly(args.list()?.to_vec());
        in_the_spotlight(world, &assertion).await
    })
}

fn list_lacks<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let assertion = world
            .ensure(questions::todo_list_items())
            .does_not_contain(args.string(0)?);
        in_the_spotlight(world, &assertion).await
    })
}

async fn marked_as(world: &ScenarioWorld, label: &str, status: TodoStatus) -> Result<()> {
    let assertion = world.ensure(questions::status_of(label)?).is_equal_to(status);
    in_the_spotlight(world, &assertion).await
}

fn marked_as_completed<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move { marked_as(world, args.string(0)?, TodoStatus::Completed).await })
}

fn marked_as_todo<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move { marked_as(world, args.string(0)?, TodoStatus::Todo).await })
}

fn items_left<'a>(world: &'a mut ScenarioWorld, args: StepArgs) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let expected = u32::try_from(args.int(0)?).map_err(|_| Error::MissingArgument {
            index: 0,
            expected: "a non-negative count",
        })?;
        let assertion = world.ensure(questions::remaining_count()).is_equal_to(expected);
        in_the_spotlight(world, &assertion).await
    })
}
