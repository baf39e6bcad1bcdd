//! Damage-emitting collision volumes.
//!
//! A hitbox is a sensor-collider entity carrying a [`Hitbox`] component.
//! Two variants exist: transient swing entities (player attacks) that carry
//! a [`HitboxLifetime`] and despawn on expiry, and persistent limb hitboxes
//! (enemy attacks) toggled by their owner's attack state. While active, a
//! hitbox delivers at most one hit per target per activation.

use avian2d::prelude::*;
use bevy::ecs::entity::hash_set::EntityHashSet;
use bevy::prelude::*;

use super::hurtbox::{HitEvent, Hurtbox};
use crate::gameplay::Team;

// === Components ===

/// Damage emitter state. Lives on a sensor-collider entity together with a
/// [`Team`] (the owner's team) so hits never apply within a team.
#[derive(Component, Debug)]
pub struct Hitbox {
    damage: i32,
    knockback_force: f32,
    owner: Entity,
    active: bool,
    hit_targets: EntityHashSet,
}

impl Hitbox {
    /// New inactive hitbox. Call [`Hitbox::activate`] (or use
    /// [`Hitbox::activated`]) before it can deal damage.
    #[must_use]
    pub fn new(owner: Entity, damage: i32, knockback_force: f32) -> Self {
        debug_assert!(damage >= 0, "hitbox damage must be non-negative");
        debug_assert!(knockback_force >= 0.0, "knockback force must be non-negative");
        Self {
            damage,
            knockback_force,
            owner,
            active: false,
            hit_targets: EntityHashSet::default(),
        }
    }

    /// Builder form for hitboxes that spawn already active (player swings).
    #[must_use]
    pub fn activated(mut self) -> Self {
        self.activate();
        self
    }

    /// Arm the hitbox and clear the per-activation hit ledger.
    pub fn activate(&mut self) {
        self.active = true;
        self.hit_targets.clear();
    }

    /// Disarm the hitbox. The hit ledger is kept; the next
    /// [`Hitbox::activate`] clears it.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn owner(&self) -> Entity {
        self.owner
    }

    #[must_use]
    pub const fn damage(&self) -> i32 {
        self.damage
    }

    #[must_use]
    pub const fn knockback_force(&self) -> f32 {
        self.knockback_force
    }

    /// Whether `target` was already hit during the current activation.
    #[must_use]
    pub fn already_hit(&self, target: Entity) -> bool {
        self.hit_targets.contains(&target)
    }

    fn record_hit(&mut self, target: Entity) {
        self.hit_targets.insert(target);
    }
}

/// Self-timed deactivation for transient swing hitboxes: the entity
/// despawns when the timer elapses.
#[derive(Component, Debug)]
pub struct HitboxLifetime(pub Timer);

impl HitboxLifetime {
    #[must_use]
    pub fn new(secs: f32) -> Self {
        Self(Timer::from_seconds(secs, TimerMode::Once))
    }
}

// === Bundles ===

/// Collider/layer components shared by every hitbox entity. The caller adds
/// [`Hitbox`], [`Team`], and a `Transform`.
#[must_use]
pub fn hitbox_collider(collider: Collider) -> impl Bundle {
    (
        collider,
        Sensor,
        CollisionLayers::new(crate::third_party::CollisionLayer::Hitbox, [
            crate::third_party::CollisionLayer::Hurtbox,
        ]),
        CollisionEventsEnabled,
        CollidingEntities::default(),
    )
}

// === Systems ===

/// Tick swing lifetimes and despawn expired swing entities.
/// Runs in `GameSet::TickTimers`.
pub(super) fn tick_hitbox_lifetimes(
    time: Res<Time>,
    mut commands: Commands,
    mut hitboxes: Query<(Entity, &mut HitboxLifetime)>,
) {
    for (entity, mut lifetime) in &mut hitboxes {
        lifetime.0.tick(time.delta());
        if lifetime.0.finished() {
            commands.entity(entity).despawn();
        }
    }
}

/// Deliver hits from active hitboxes to overlapping hurtboxes.
///
/// Per overlap event: reject self-hits (owner), same-team targets, and
/// targets already hit during this activation; otherwise write a
/// [`HitEvent`] carrying the owner's position as the knockback source
/// (falling back to the hitbox's own position if the owner is gone).
/// Runs first in the `GameSet::Combat` chain.
pub(super) fn detect_hits(
    mut hitboxes: Query<(&mut Hitbox, &GlobalTransform, &CollidingEntities, &Team)>,
    targets: Query<&Team, With<Hurtbox>>,
    positions: Query<&GlobalTransform>,
    mut hits: MessageWriter<HitEvent>,
) {
    for (mut hitbox, transform, colliding, hitbox_team) in &mut hitboxes {
        if !hitbox.is_active() {
            continue;
        }

        let source = positions
            .get(hitbox.owner())
            .map_or_else(|_| transform.translation().xy(), |t| t.translation().xy());

        for &other in &colliding.0 {
            if other == hitbox.owner() || hitbox.already_hit(other) {
                continue;
            }
            let Ok(target_team) = targets.get(other) else {
                continue;
            };
            if target_team == hitbox_team {
                continue;
            }

            hits.write(HitEvent {
                target: other,
                damage: hitbox.damage(),
                knockback_force: hitbox.knockback_force(),
                source,
            });
            hitbox.record_hit(other);
        }
    }
}
