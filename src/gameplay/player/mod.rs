//! Player entity: archetype, spawn, facing, and death/respawn handling.

pub mod input;
pub mod state;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::combat::{DeathEvent, Health, HealthChangedEvent, Hurtbox, Knockbackable};
use crate::gameplay::{Facing, Team, animation::CharacterAnimation, expired_timer};
use crate::third_party::CollisionLayer;
use crate::{GameSet, GameState, Z_ACTOR, gameplay_running};

pub use input::PlayerInput;
pub use state::{DashCooldown, PlayerState};

// === Constants ===

pub const PLAYER_MAX_HEALTH: i32 = 60;
pub const PLAYER_MOVE_SPEED: f32 = 100.0;

/// Immunity window after an accepted hit.
pub const PLAYER_IMMUNITY_SECS: f32 = 0.6;

/// Delay between death and respawn at the spawn point.
pub const PLAYER_RESPAWN_DELAY_SECS: f32 = 2.0;

/// Body collider radius.
pub const PLAYER_RADIUS: f32 = 6.0;

/// Clips the render collaborator provides for the player.
const PLAYER_CLIPS: [&str; 10] = [
    "idle_up",
    "idle_down",
    "idle_side",
    "walk_up",
    "walk_down",
    "walk_side",
    "attack_up",
    "attack_down",
    "attack_side",
    "dash",
];

// === Components ===

/// Marker for the player entity.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Where the player respawns after death.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SpawnPoint(pub Vec2);

/// Present while the player is dead and waiting to respawn. State machine,
/// movement, and enemy detection all skip a respawning player.
#[derive(Component, Debug)]
pub struct Respawning(pub Timer);

// === Spawn ===

/// Spawn the player archetype. Single source of truth for its components.
pub fn spawn_player(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("Player"),
            Player,
            Team::Player,
            Facing::default(),
            PlayerState::default(),
            SpawnPoint(position),
            Health::new(PLAYER_MAX_HEALTH),
            Hurtbox::new(PLAYER_IMMUNITY_SECS),
            Knockbackable,
            DashCooldown(expired_timer(state::PLAYER_DASH_COOLDOWN_SECS)),
            CharacterAnimation::new(PLAYER_CLIPS),
            Transform::from_xyz(position.x, position.y, Z_ACTOR),
            Visibility::default(),
            DespawnOnExit(GameState::InGame),
        ))
        .insert((
            RigidBody::Dynamic,
            Collider::circle(PLAYER_RADIUS),
            CollisionLayers::new(
                [CollisionLayer::Pushbox, CollisionLayer::Hurtbox],
                [CollisionLayer::Pushbox, CollisionLayer::Hitbox],
            ),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::ZERO,
        ))
        .id()
}

// === Systems ===

/// Put a dying player into the respawn wait: hidden, collider off, timer on.
/// Runs in `GameSet::Death`.
fn player_death(
    mut deaths: MessageReader<DeathEvent>,
    players: Query<(), (With<Player>, Without<Respawning>)>,
    mut commands: Commands,
) {
    for death in deaths.read() {
        if players.contains(death.entity) {
            commands.entity(death.entity).insert((
                Respawning(Timer::from_seconds(PLAYER_RESPAWN_DELAY_SECS, TimerMode::Once)),
                Visibility::Hidden,
                ColliderDisabled,
            ));
        }
    }
}

/// Tick the respawn wait; on expiry restore the player at its spawn point
/// with full health and a fresh idle state.
/// Runs in `GameSet::TickTimers`.
fn player_respawn(
    time: Res<Time>,
    mut commands: Commands,
    mut players: Query<
        (
            Entity,
            &mut Respawning,
            &mut Health,
            &mut Transform,
            &mut PlayerState,
            &mut LinearVelocity,
            &SpawnPoint,
        ),
        With<Player>,
    >,
    mut health_changed: MessageWriter<HealthChangedEvent>,
) {
    for (entity, mut respawning, mut health, mut transform, mut state, mut velocity, spawn) in
        &mut players
    {
        respawning.0.tick(time.delta());
        if !respawning.0.finished() {
            continue;
        }

        health.reset();
        health_changed.write(HealthChangedEvent {
            entity,
            current: health.current(),
            max: health.max(),
        });
        transform.translation = spawn.0.extend(Z_ACTOR);
        *state = PlayerState::default();
        velocity.0 = Vec2::ZERO;
        commands
            .entity(entity)
            .remove::<(Respawning, ColliderDisabled)>()
            .insert(Visibility::Inherited);
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Player>().register_type::<SpawnPoint>();

    input::plugin(app);
    state::plugin(app);

    app.add_systems(
        Update,
        player_respawn
            .in_set(GameSet::TickTimers)
            .run_if(gameplay_running),
    );
    app.add_systems(
        Update,
        player_death.in_set(GameSet::Death).run_if(gameplay_running),
    );
}
