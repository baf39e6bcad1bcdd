//! Main menu: title text and the start keybinding.

use bevy::prelude::*;

use crate::GameState;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
        .add_systems(
            Update,
            handle_menu_input.run_if(in_state(GameState::MainMenu)),
        );
}

fn setup_main_menu(mut commands: Commands) {
    commands.spawn((
        Text::new("THICKET"),
        TextFont {
            font_size: 64.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(35.0),
            ..default()
        },
        DespawnOnExit(GameState::MainMenu),
    ));

    commands.spawn((
        Text::new("Press Enter to Start"),
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
        DespawnOnExit(GameState::MainMenu),
    ));
}

fn handle_menu_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        next_state.set(GameState::InGame);
    }
}
