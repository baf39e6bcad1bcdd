//! Player input intent: axis direction plus attack/dash presses.
//!
//! The input collaborator is read once per tick into [`PlayerInput`]; the
//! state machine and movement systems only ever see this resource, never
//! the device directly.

use bevy::prelude::*;

use super::{Player, Respawning};
use crate::gameplay::Facing;
use crate::{GameSet, gameplay_running};

// === Resources ===

/// Per-tick player intent. `direction` is normalized or zero.
#[derive(Resource, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Resource)]
pub struct PlayerInput {
    pub direction: Vec2,
    pub attack_pressed: bool,
    pub dash_pressed: bool,
}

// === Systems ===

/// Combine per-axis key strengths into a normalized direction and latch
/// action presses. Runs in `GameSet::Input`.
fn gather_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    let mut axis = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        axis.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        axis.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        axis.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        axis.y -= 1.0;
    }

    input.direction = axis.normalize_or_zero();
    input.attack_pressed =
        keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::KeyJ);
    input.dash_pressed =
        keyboard.just_pressed(KeyCode::ShiftLeft) || keyboard.just_pressed(KeyCode::KeyK);
}

/// Derive facing from the movement direction unless the active state has it
/// locked (attack, dash). Runs in `GameSet::Input`, after [`gather_input`].
pub(super) fn update_facing(
    input: Res<PlayerInput>,
    mut players: Query<(&super::PlayerState, &mut Facing), (With<Player>, Without<Respawning>)>,
) {
    for (state, mut facing) in &mut players {
        if state.locks_facing() {
            continue;
        }
        if let Some(next) = Facing::from_direction(input.direction) {
            if *facing != next {
                *facing = next;
            }
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PlayerInput>();
    app.register_type::<PlayerInput>();

    app.add_systems(
        Update,
        (gather_input, update_facing)
            .chain()
            .in_set(GameSet::Input)
            .run_if(gameplay_running),
    );
}
