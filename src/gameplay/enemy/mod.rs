//! Enemy entity: archetype, spawn, sensing parameters, and the persistent
//! limb hitbox toggled by the attack state.

pub mod state;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::combat::{
    DespawnOnDeath, Health, Hitbox, Hurtbox, Knockbackable, hitbox_collider,
};
use crate::gameplay::{Facing, Team, animation::CharacterAnimation, expired_timer};
use crate::third_party::CollisionLayer;
use crate::{GameState, Z_ACTOR};

pub use state::{AttackCooldown, EnemyState};

// === Constants ===

pub const ENEMY_MAX_HEALTH: i32 = 30;

/// Wander speed (relaxed roaming).
pub const ENEMY_WANDER_SPEED: f32 = 30.0;

/// Chase speed (pursuing the player).
pub const ENEMY_CHASE_SPEED: f32 = 60.0;

pub const ENEMY_DETECTION_RANGE: f32 = 120.0;
pub const ENEMY_ATTACK_RANGE: f32 = 32.0;

/// A chased target escaping beyond `detection_range * this` is given up on.
pub const CHASE_GIVE_UP_FACTOR: f32 = 1.5;

pub const ENEMY_ATTACK_DAMAGE: i32 = 10;
pub const ENEMY_ATTACK_KNOCKBACK: f32 = 150.0;
pub const ENEMY_ATTACK_DURATION_SECS: f32 = 0.5;

/// Fraction of the attack duration spent winding up before the limb arms.
pub const ENEMY_ATTACK_WINDUP_FRACTION: f32 = 0.4;

/// Post-attack recovery: cooldown during which detection is ignored.
pub const ENEMY_ATTACK_COOLDOWN_SECS: f32 = 1.0;

pub const ENEMY_IMMUNITY_SECS: f32 = 0.3;
pub const ENEMY_RADIUS: f32 = 7.0;
const LIMB_RADIUS: f32 = 9.0;

/// Clips the render collaborator provides for enemies.
const ENEMY_CLIPS: [&str; 6] = [
    "idle_side",
    "walk_side",
    "attack_side",
    "idle",
    "walk",
    "attack",
];

// === Components ===

/// Enemy sensing parameters. The state machine reads these; per-enemy
/// variation (faster scouts, short-sighted brutes) is a data change.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Enemy {
    pub detection_range: f32,
    pub attack_range: f32,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            detection_range: ENEMY_DETECTION_RANGE,
            attack_range: ENEMY_ATTACK_RANGE,
        }
    }
}

impl Enemy {
    /// Detection check against a sensed position.
    #[must_use]
    pub fn detects(&self, own_pos: Vec2, target_pos: Vec2) -> bool {
        own_pos.distance(target_pos) <= self.detection_range
    }

    /// Hysteresis: a chased target this far away is given up on.
    #[must_use]
    pub fn lost(&self, own_pos: Vec2, target_pos: Vec2) -> bool {
        own_pos.distance(target_pos) > self.detection_range * CHASE_GIVE_UP_FACTOR
    }

    #[must_use]
    pub fn in_attack_range(&self, own_pos: Vec2, target_pos: Vec2) -> bool {
        own_pos.distance(target_pos) <= self.attack_range
    }
}

/// Weak reference to the entity currently being hunted. Cleared when the
/// target despawns or escapes.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct EnemyTarget(pub Option<Entity>);

/// The enemy's persistent limb hitbox (a child sensor entity).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Limb(pub Entity);

// === Spawn ===

/// Spawn an enemy archetype with its limb hitbox child. Single source of
/// truth for the enemy's components.
pub fn spawn_enemy(commands: &mut Commands, position: Vec2) -> Entity {
    let body = commands
        .spawn((
            Name::new("Enemy"),
            Enemy::default(),
            Team::Enemy,
            Facing::default(),
            EnemyState::default(),
            EnemyTarget::default(),
            Health::new(ENEMY_MAX_HEALTH),
            Hurtbox::new(ENEMY_IMMUNITY_SECS),
            Knockbackable,
            DespawnOnDeath,
            AttackCooldown(expired_timer(ENEMY_ATTACK_COOLDOWN_SECS)),
            CharacterAnimation::new(ENEMY_CLIPS),
            Transform::from_xyz(position.x, position.y, Z_ACTOR),
            Visibility::default(),
            DespawnOnExit(GameState::InGame),
        ))
        .insert((
            RigidBody::Dynamic,
            Collider::circle(ENEMY_RADIUS),
            CollisionLayers::new(
                [CollisionLayer::Pushbox, CollisionLayer::Hurtbox],
                [CollisionLayer::Pushbox, CollisionLayer::Hitbox],
            ),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::ZERO,
        ))
        .id();

    // Permanently attached, toggled by the attack state — unlike the
    // player's transient swings.
    let limb = commands
        .spawn((
            Name::new("Limb"),
            Hitbox::new(body, ENEMY_ATTACK_DAMAGE, ENEMY_ATTACK_KNOCKBACK),
            Team::Enemy,
            hitbox_collider(Collider::circle(LIMB_RADIUS)),
            Transform::default(),
            ChildOf(body),
        ))
        .id();
    commands.entity(body).insert(Limb(limb));

    body
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Enemy>()
        .register_type::<EnemyTarget>()
        .register_type::<Limb>();

    state::plugin(app);
}
