//! Damage-receiving collision volumes.
//!
//! A [`Hurtbox`] lives on the same entity as its [`Health`](super::Health)
//! — components are owned directly, never discovered by tree search. It is
//! the sole rate-limiter against repeat hits: every accepted hit opens an
//! immunity window during which further hits are dropped silently.

use bevy::prelude::*;

use super::health::DamageEvent;
use super::knockback::{Knockback, Knockbackable};
use crate::gameplay::combat::Health;

// === Components ===

/// Damage receiver with a per-hit immunity window.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    immunity_duration: f32,
    immunity_remaining: f32,
    /// Scales incoming knockback force (light entities > 1, heavy < 1).
    pub knockback_multiplier: f32,
}

impl Hurtbox {
    /// New hurtbox granting `immunity_secs` of immunity after each accepted
    /// hit, with a neutral knockback multiplier.
    #[must_use]
    pub fn new(immunity_secs: f32) -> Self {
        debug_assert!(immunity_secs >= 0.0, "immunity must be non-negative");
        Self {
            immunity_duration: immunity_secs,
            immunity_remaining: 0.0,
            knockback_multiplier: 1.0,
        }
    }

    /// Builder form to override the knockback multiplier.
    #[must_use]
    pub const fn with_knockback_multiplier(mut self, multiplier: f32) -> Self {
        self.knockback_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn is_immune(&self) -> bool {
        self.immunity_remaining > 0.0
    }

    /// Open the immunity window (called when a hit is accepted).
    pub fn grant_immunity(&mut self) {
        self.immunity_remaining = self.immunity_duration;
    }

    /// Count the immunity window down. Called once per simulation tick.
    pub fn tick(&mut self, dt: f32) {
        self.immunity_remaining = (self.immunity_remaining - dt).max(0.0);
    }
}

// === Messages ===

/// A hit delivered by an active hitbox: damage, knockback force, and the
/// attacker's position (knockback pushes away from it).
#[derive(Message, Debug, Clone, Copy)]
pub struct HitEvent {
    pub target: Entity,
    pub damage: i32,
    pub knockback_force: f32,
    pub source: Vec2,
}

// === Systems ===

/// Count down immunity windows. Runs in `GameSet::TickTimers`.
pub(super) fn tick_immunity(time: Res<Time>, mut hurtboxes: Query<&mut Hurtbox>) {
    for mut hurtbox in &mut hurtboxes {
        hurtbox.tick(time.delta_secs());
    }
}

/// Resolve delivered hits against hurtboxes.
///
/// Immune targets drop the hit silently. Otherwise the immunity window
/// opens, damage is forwarded to the health pipeline, and — if the target
/// is [`Knockbackable`] and the hit carries force — a [`Knockback`] impulse
/// pointing away from the hit source is applied.
/// Runs in `GameSet::Combat`, between hit detection and damage application.
pub(super) fn resolve_hits(
    mut hits: MessageReader<HitEvent>,
    mut targets: Query<(
        &mut Hurtbox,
        &GlobalTransform,
        Has<Knockbackable>,
        Has<Health>,
    )>,
    mut damage: MessageWriter<DamageEvent>,
    mut commands: Commands,
) {
    for hit in hits.read() {
        // Target may have despawned between detection and resolution.
        let Ok((mut hurtbox, transform, knockbackable, has_health)) = targets.get_mut(hit.target)
        else {
            continue;
        };

        if hurtbox.is_immune() {
            continue;
        }
        if !has_health {
            warn!("hurtbox on {:?} has no Health to forward damage to", hit.target);
            continue;
        }

        hurtbox.grant_immunity();
        damage.write(DamageEvent {
            target: hit.target,
            amount: hit.damage,
        });

        if hit.knockback_force > 0.0 && knockbackable {
            let own_pos = transform.translation().xy();
            if let Some(away) = (own_pos - hit.source).try_normalize() {
                let impulse = away * hit.knockback_force * hurtbox.knockback_multiplier;
                commands.entity(hit.target).insert(Knockback::new(impulse));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_hurtbox_is_not_immune() {
        let hurtbox = Hurtbox::new(0.4);
        assert!(!hurtbox.is_immune());
    }

    #[test]
    fn granted_immunity_expires_after_duration() {
        let mut hurtbox = Hurtbox::new(0.4);
        hurtbox.grant_immunity();
        assert!(hurtbox.is_immune());

        hurtbox.tick(0.2);
        assert!(hurtbox.is_immune());

        hurtbox.tick(0.3);
        assert!(!hurtbox.is_immune());
    }

    #[test]
    fn tick_clamps_at_zero() {
        let mut hurtbox = Hurtbox::new(0.4);
        hurtbox.tick(5.0);
        assert!(!hurtbox.is_immune());
    }
}
