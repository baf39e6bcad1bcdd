//! Per-entity hit-point ledger.
//!
//! [`Health`] is pure bookkeeping: mutation methods report what happened as
//! a value and never touch other components. The [`apply_damage`] system
//! turns queued [`DamageEvent`]s into mutations and broadcasts the
//! [`DamageTakenEvent`] / [`HealthChangedEvent`] / [`DeathEvent`] messages
//! that the rest of the game reacts to.

use bevy::prelude::*;

// === Components ===

/// Hit points with a one-way death latch. Death is only undone by
/// [`Health::reset`].
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: i32,
    max: i32,
    dead: bool,
}

/// What a [`Health::take_damage`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target already dead — guarded no-op.
    Ignored,
    /// Hit points reduced, target still alive.
    Damaged,
    /// This damage reduced hit points to zero; death latched now.
    Fatal,
}

impl Health {
    /// Full health at `max` hit points.
    #[must_use]
    pub fn new(max: i32) -> Self {
        debug_assert!(max > 0, "max health must be positive");
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    #[must_use]
    pub const fn current(&self) -> i32 {
        self.current
    }

    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Reduce hit points, clamped at zero. No-op on a dead target; latches
    /// death exactly once when hit points reach zero.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        debug_assert!(amount >= 0, "damage must be non-negative");
        if self.dead {
            return DamageOutcome::Ignored;
        }
        self.current = (self.current - amount.max(0)).max(0);
        if self.current == 0 {
            self.dead = true;
            DamageOutcome::Fatal
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Restore hit points, clamped at `max`. No-op on a dead target.
    /// Returns whether anything changed.
    pub fn heal(&mut self, amount: i32) -> bool {
        debug_assert!(amount >= 0, "heal must be non-negative");
        if self.dead {
            return false;
        }
        let before = self.current;
        self.current = (self.current + amount.max(0)).min(self.max);
        self.current != before
    }

    /// Set hit points directly, clamped to `[0, max]`. No-op on a dead
    /// target; latches death when the clamped value is zero.
    pub fn set(&mut self, value: i32) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }
        self.current = value.clamp(0, self.max);
        if self.current == 0 {
            self.dead = true;
            DamageOutcome::Fatal
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Revive to full health, clearing the death latch.
    pub fn reset(&mut self) {
        self.current = self.max;
        self.dead = false;
    }
}

// === Messages ===

/// Request to damage an entity. Written by the hurtbox pipeline; consumed
/// by [`apply_damage`].
#[derive(Message, Debug, Clone, Copy)]
pub struct DamageEvent {
    pub target: Entity,
    pub amount: i32,
}

/// An entity's hit points changed (damage or heal).
#[derive(Message, Debug, Clone, Copy)]
pub struct HealthChangedEvent {
    pub entity: Entity,
    pub current: i32,
    pub max: i32,
}

/// An entity took damage (for hit flashes, sounds).
#[derive(Message, Debug, Clone, Copy)]
pub struct DamageTakenEvent {
    pub entity: Entity,
    pub amount: i32,
}

/// An entity's health reached zero. Emitted exactly once per death.
#[derive(Message, Debug, Clone, Copy)]
pub struct DeathEvent {
    pub entity: Entity,
}

// === Systems ===

/// Apply queued damage to `Health` components and broadcast the results.
/// Runs in `GameSet::Combat`, after hurtbox resolution.
pub(super) fn apply_damage(
    mut damage_events: MessageReader<DamageEvent>,
    mut healths: Query<&mut Health>,
    mut damage_taken: MessageWriter<DamageTakenEvent>,
    mut health_changed: MessageWriter<HealthChangedEvent>,
    mut deaths: MessageWriter<DeathEvent>,
) {
    for event in damage_events.read() {
        let Ok(mut health) = healths.get_mut(event.target) else {
            warn!("damage event for entity without Health: {:?}", event.target);
            continue;
        };
        let outcome = health.take_damage(event.amount);
        if outcome == DamageOutcome::Ignored {
            continue;
        }
        damage_taken.write(DamageTakenEvent {
            entity: event.target,
            amount: event.amount,
        });
        health_changed.write(HealthChangedEvent {
            entity: event.target,
            current: health.current(),
            max: health.max(),
        });
        if outcome == DamageOutcome::Fatal {
            deaths.write(DeathEvent {
                entity: event.target,
            });
        }
    }
}
