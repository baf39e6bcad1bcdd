//! Screen plugins for each game state, plus the global camera.

mod in_game;
mod loading;
mod main_menu;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup_camera);
    app.add_plugins((loading::plugin, main_menu::plugin, in_game::plugin));
}

/// Spawns the global 2D camera. Persists across all states (no
/// `DespawnOnExit`).
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
