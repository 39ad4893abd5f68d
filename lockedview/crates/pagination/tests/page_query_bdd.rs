//! Behavioural tests for URL-driven page state.
//!
//! These scenarios follow a user paging through the character directory and
//! check that the query string stays canonical.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use pagination::{PageQueryState, QueryUpdate};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

#[derive(Default, ScenarioState)]
struct World {
    state: Slot<PageQueryState>,
}

#[fixture]
fn world() -> World {
    World::default()
}

#[given("the query string \"{query}\"")]
fn the_query_string(world: &World, query: String) {
    world.state.set(PageQueryState::from_query(&query));
}

#[when("the user requests page {page:u64}")]
fn the_user_requests_page(world: &World, page: u64) {
    let mut state = current_state(world);
    state.set_query(QueryUpdate::page(page));
    world.state.set(state);
}

#[then("the current page is {page:u64}")]
fn the_current_page_is(world: &World, page: u64) {
    assert_eq!(current_state(world).page_number().get(), page);
}

#[then("the query string is empty")]
fn the_query_string_is_empty(world: &World) {
    assert_eq!(current_state(world).query(), "");
}

#[then("the query string is \"{query}\"")]
fn the_query_string_is(world: &World, query: String) {
    assert_eq!(current_state(world).query(), query);
}

#[scenario(path = "tests/features/page_query.feature", index = 0)]
fn returning_to_first_page(world: World) {
    drop(world);
}

#[scenario(path = "tests/features/page_query.feature", index = 1)]
fn moving_to_later_page(world: World) {
    drop(world);
}

#[scenario(path = "tests/features/page_query.feature", index = 2)]
fn invalid_page_falls_back(world: World) {
    drop(world);
}

fn current_state(world: &World) -> PageQueryState {
    world.state.get().expect("query state should be set")
}
