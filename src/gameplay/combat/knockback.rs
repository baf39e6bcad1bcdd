//! Knockback impulses with eased recovery.
//!
//! While a [`Knockback`] component is present it owns the entity's
//! `LinearVelocity`: every movement system filters on `Without<Knockback>`,
//! so state machines cannot overwrite the impulse mid-recovery. The impulse
//! decays smoothly to zero over the recovery window, then the component
//! removes itself and hands velocity back to the active state.

use avian2d::prelude::LinearVelocity;
use bevy::prelude::*;

// === Constants ===

/// Recovery window: seconds from impact until velocity control returns to
/// the state machine.
pub const KNOCKBACK_RECOVERY_SECS: f32 = 0.25;

// === Components ===

/// Capability marker: this entity reacts to knockback. Static props
/// (plants) simply never carry it.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Knockbackable;

/// An in-flight knockback impulse. Inserting over an existing knockback
/// replaces it (a fresh hit restarts the recovery window).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Knockback {
    impulse: Vec2,
    recovery: Timer,
}

impl Knockback {
    #[must_use]
    pub fn new(impulse: Vec2) -> Self {
        Self {
            impulse,
            recovery: Timer::from_seconds(KNOCKBACK_RECOVERY_SECS, TimerMode::Once),
        }
    }

    #[must_use]
    pub const fn impulse(&self) -> Vec2 {
        self.impulse
    }

    /// Velocity at the current point of the recovery window: the impulse
    /// scaled by a quadratic ease-out toward zero.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        let remaining = 1.0 - self.recovery.fraction();
        self.impulse * remaining * remaining
    }
}

// === Systems ===

/// Drive knocked-back bodies: tick recovery, write the decayed velocity,
/// and remove the component (zeroing velocity) once recovered.
/// Runs in `GameSet::Movement`; state movement systems exclude
/// `Knockback`-carrying entities, so this is the only velocity writer here.
pub(super) fn apply_knockback(
    time: Res<Time>,
    mut commands: Commands,
    mut knocked: Query<(Entity, &mut Knockback, &mut LinearVelocity)>,
) {
    for (entity, mut knockback, mut velocity) in &mut knocked {
        knockback.recovery.tick(time.delta());
        if knockback.recovery.finished() {
            velocity.0 = Vec2::ZERO;
            commands.entity(entity).remove::<Knockback>();
        } else {
            velocity.0 = knockback.velocity();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_knockback_has_full_impulse() {
        let knockback = Knockback::new(Vec2::new(120.0, 0.0));
        assert_eq!(knockback.velocity(), Vec2::new(120.0, 0.0));
    }

    #[test]
    fn velocity_decays_monotonically() {
        let mut knockback = Knockback::new(Vec2::new(120.0, 0.0));
        let mut last = knockback.velocity().length();
        for _ in 0..5 {
            knockback
                .recovery
                .tick(std::time::Duration::from_millis(40));
            let now = knockback.velocity().length();
            assert!(now <= last, "decay must be monotonic: {now} > {last}");
            last = now;
        }
    }

    #[test]
    fn velocity_reaches_zero_at_recovery_end() {
        let mut knockback = Knockback::new(Vec2::new(120.0, 0.0));
        knockback
            .recovery
            .tick(std::time::Duration::from_secs_f32(KNOCKBACK_RECOVERY_SECS));
        assert_eq!(knockback.velocity(), Vec2::ZERO);
    }
}
