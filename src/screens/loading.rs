//! Loading screen plugin. Nothing heavy to load yet — advances to the
//! main menu on the first frame.

use bevy::prelude::*;

use crate::GameState;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::Loading), setup_loading_screen)
        .add_systems(
            Update,
            check_loading_complete.run_if(in_state(GameState::Loading)),
        );
}

fn setup_loading_screen(mut commands: Commands) {
    commands.spawn((
        Text::new("Loading..."),
        TextFont {
            font_size: 40.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(50.0),
            ..default()
        },
        DespawnOnExit(GameState::Loading),
    ));
}

fn check_loading_complete(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}
