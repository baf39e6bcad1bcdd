//! Testing utilities for Bevy systems.

#![cfg(test)]

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::time::Duration;

use crate::{GameState, InGameState};

/// Minimal app with state support, the way the real app initializes states.
pub fn create_base_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.init_state::<GameState>();
    app.add_sub_state::<InGameState>();
    app
}

/// Drive the app into `GameState::InGame` and apply the transition.
pub fn transition_to_ingame(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
}

/// Advance virtual time and run one update.
pub fn advance_and_update(app: &mut App, dt: Duration) {
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .advance_by(dt);
    app.update();
}

/// Assert how many entities match the given query filter.
pub fn assert_entity_count<F: QueryFilter>(app: &mut App, expected: usize) {
    let count = app
        .world_mut()
        .query_filtered::<(), F>()
        .iter(app.world())
        .count();
    assert_eq!(count, expected, "expected {expected} matching entities, found {count}");
}

/// Set a timer to 1 nanosecond before expiry so any positive delta on the
/// next tick fires `just_finished()`.
#[allow(dead_code)]
pub fn nearly_expire_timer(timer: &mut Timer) {
    timer.set_elapsed(timer.duration() - Duration::from_nanos(1));
}
