//! Development tools — only included with the `dev` feature.
//!
//! Entity inspector plus debug spawners for stress-testing combat.

use bevy::prelude::*;
use bevy_inspector_egui::bevy_egui::EguiPlugin;
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use crate::gameplay::enemy::spawn_enemy;
use crate::gameplay::plant::spawn_plant;
use crate::{GameState, InGameState};

/// Where debug enemies appear, relative to the arena origin.
const DEBUG_ENEMY_SPAWN: Vec2 = Vec2::new(180.0, 120.0);

/// Where debug plants appear.
const DEBUG_PLANT_SPAWN: Vec2 = Vec2::new(-180.0, 120.0);

fn debug_spawn(keyboard: Res<ButtonInput<KeyCode>>, mut commands: Commands) {
    if keyboard.just_pressed(KeyCode::KeyE) {
        spawn_enemy(&mut commands, DEBUG_ENEMY_SPAWN);
    }
    if keyboard.just_pressed(KeyCode::KeyP) {
        spawn_plant(&mut commands, DEBUG_PLANT_SPAWN);
    }
}

pub fn plugin(app: &mut App) {
    app.add_plugins((
        EguiPlugin::default(),
        WorldInspectorPlugin::new(),
    ));
    app.add_systems(
        Update,
        debug_spawn.run_if(in_state(GameState::InGame).and(in_state(InGameState::Playing))),
    );
}
