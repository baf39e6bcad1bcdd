//! In-game screen plugin: pause/unpause input and the pause overlay.
//!
//! Gameplay itself is handled by the domain plugins; this owns only the
//! overlay and the keybindings that work across `InGameState` sub-states.

use bevy::prelude::*;

use crate::{GameState, InGameState};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(InGameState::Paused), setup_pause_overlay)
        .add_systems(
            Update,
            handle_pause_input.run_if(in_state(GameState::InGame)),
        );
}

fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<InGameState>>,
    mut next_ingame_state: ResMut<NextState<InGameState>>,
    mut next_game_state: ResMut<NextState<GameState>>,
) {
    match current_state.get() {
        InGameState::Playing => {
            if keyboard.just_pressed(KeyCode::Escape) {
                next_ingame_state.set(InGameState::Paused);
            }
        }
        InGameState::Paused => {
            if keyboard.just_pressed(KeyCode::Escape) {
                next_ingame_state.set(InGameState::Playing);
            }
            if keyboard.just_pressed(KeyCode::KeyQ) {
                next_game_state.set(GameState::MainMenu);
            }
        }
    }
}

fn setup_pause_overlay(mut commands: Commands) {
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        DespawnOnExit(InGameState::Paused),
    ));

    commands.spawn((
        Text::new("PAUSED"),
        TextFont {
            font_size: 64.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(40.0),
            ..default()
        },
        DespawnOnExit(InGameState::Paused),
    ));

    commands.spawn((
        Text::new("Press ESC to Resume | Q to Quit"),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::srgb(0.7, 0.7, 0.7)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(55.0),
            ..default()
        },
        DespawnOnExit(InGameState::Paused),
    ));
}
