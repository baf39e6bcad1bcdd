//! Enemy state machine: Idle, Wander, Chase, Attack.
//!
//! Transitions are synchronous and deterministic given the current state,
//! its timers, and the sensed world; the only randomness is the wander
//! heading/distance/pause draw. The post-attack cooldown doubles as the
//! recovery window during which detection is ignored, so an enemy backs
//! off instead of instantly re-engaging.

use avian2d::prelude::LinearVelocity;

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use super::{
    ENEMY_ATTACK_DURATION_SECS, ENEMY_ATTACK_WINDUP_FRACTION, ENEMY_CHASE_SPEED,
    ENEMY_WANDER_SPEED, Enemy, EnemyTarget, Limb,
};
use crate::gameplay::animation::CharacterAnimation;
use crate::gameplay::combat::{Hitbox, Knockback};
use crate::gameplay::player::{Player, Respawning};
use crate::gameplay::Facing;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Wander leg length bounds (pixels).
const WANDER_MIN_DISTANCE: f32 = 24.0;
const WANDER_MAX_DISTANCE: f32 = 64.0;

/// Pause bounds between wander legs (seconds).
const WANDER_PAUSE_MIN_SECS: f32 = 0.5;
const WANDER_PAUSE_MAX_SECS: f32 = 1.5;

// === Components ===

/// Post-attack cooldown. While running it also acts as the recovery window:
/// detection checks are skipped until it finishes.
#[derive(Component, Debug)]
pub struct AttackCooldown(pub Timer);

/// The enemy's active behavior state.
#[derive(Component, Debug)]
pub enum EnemyState {
    /// Standing still between wander legs (or recovering after an attack).
    Idle { pause: Timer },
    /// Roaming a random heading for a random distance.
    Wander { heading: Vec2, distance_left: f32 },
    /// Pursuing the current target.
    Chase,
    /// Committed attack; the limb arms after the wind-up fraction.
    Attack { duration: Timer, limb_armed: bool },
}

impl Default for EnemyState {
    fn default() -> Self {
        Self::Idle {
            pause: Timer::from_seconds(WANDER_PAUSE_MIN_SECS, TimerMode::Once),
        }
    }
}

/// Discriminant of [`EnemyState`], for same-state transition checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyStateKind {
    Idle,
    Wander,
    Chase,
    Attack,
}

impl EnemyState {
    #[must_use]
    pub const fn kind(&self) -> EnemyStateKind {
        match self {
            Self::Idle { .. } => EnemyStateKind::Idle,
            Self::Wander { .. } => EnemyStateKind::Wander,
            Self::Chase => EnemyStateKind::Chase,
            Self::Attack { .. } => EnemyStateKind::Attack,
        }
    }

    const fn clip(&self) -> &'static str {
        match self {
            Self::Idle { .. } => "idle",
            Self::Wander { .. } | Self::Chase => "walk",
            Self::Attack { .. } => "attack",
        }
    }
}

/// A fresh wander leg: random heading in `[0, 2π)`, random distance.
fn random_wander() -> EnemyState {
    let mut rng = rand::rng();
    EnemyState::Wander {
        heading: Vec2::from_angle(rng.random_range(0.0..TAU)),
        distance_left: rng.random_range(WANDER_MIN_DISTANCE..WANDER_MAX_DISTANCE),
    }
}

/// A fresh pause between wander legs.
fn random_pause() -> EnemyState {
    let mut rng = rand::rng();
    EnemyState::Idle {
        pause: Timer::from_seconds(
            rng.random_range(WANDER_PAUSE_MIN_SECS..WANDER_PAUSE_MAX_SECS),
            TimerMode::Once,
        ),
    }
}

// === Transitions ===

/// Switch the active state. No-op for the already-active kind; leaving
/// Attack always disarms the limb, even if the wind-up never fired.
fn change_state(
    state: &mut EnemyState,
    next: EnemyState,
    facing: Facing,
    anim: &mut CharacterAnimation,
    limb: &mut Hitbox,
) {
    if state.kind() == next.kind() {
        return;
    }
    if matches!(state, EnemyState::Attack { .. }) {
        limb.deactivate();
    }
    *state = next;
    anim.request(state.clip(), facing);
}

// === Systems ===

/// Tick attack cooldowns (the post-attack recovery window).
/// Runs in `GameSet::TickTimers`.
fn tick_attack_cooldowns(time: Res<Time>, mut cooldowns: Query<&mut AttackCooldown>) {
    for mut cooldown in &mut cooldowns {
        cooldown.0.tick(time.delta());
    }
}

/// Drive the enemy state machine. Runs in `GameSet::Ai`.
fn enemy_state_machine(
    time: Res<Time>,
    mut enemies: Query<(
        &Enemy,
        &Limb,
        &mut EnemyState,
        &mut EnemyTarget,
        &mut AttackCooldown,
        &mut Facing,
        &mut CharacterAnimation,
        &GlobalTransform,
    )>,
    players: Query<(Entity, &GlobalTransform), (With<Player>, Without<Respawning>)>,
    mut limbs: Query<(&mut Hitbox, &mut Transform)>,
) {
    let sensed = players
        .iter()
        .next()
        .map(|(entity, transform)| (entity, transform.translation().xy()));

    for (enemy, limb, mut state, mut target, mut cooldown, mut facing, mut anim, transform) in
        &mut enemies
    {
        let Ok((mut limb_hitbox, mut limb_transform)) = limbs.get_mut(limb.0) else {
            warn!("enemy limb {:?} is missing its hitbox", limb.0);
            continue;
        };

        let own_pos = transform.translation().xy();

        // Drop a target that despawned or became untargetable.
        if target.0.is_some_and(|entity| players.get(entity).is_err()) {
            target.0 = None;
        }

        // Detection is suppressed while the post-attack recovery runs.
        let detection = if cooldown.0.finished() {
            sensed.filter(|&(_, pos)| enemy.detects(own_pos, pos))
        } else {
            None
        };

        let next = match &mut *state {
            EnemyState::Idle { pause } => {
                if let Some((player, _)) = detection {
                    target.0 = Some(player);
                    Some(EnemyState::Chase)
                } else {
                    pause.tick(time.delta());
                    if pause.finished() {
                        Some(random_wander())
                    } else {
                        None
                    }
                }
            }
            EnemyState::Wander {
                heading,
                distance_left,
            } => {
                if let Some((player, _)) = detection {
                    target.0 = Some(player);
                    Some(EnemyState::Chase)
                } else {
                    if let Some(next_facing) = Facing::from_direction(*heading) {
                        *facing = next_facing;
                    }
                    *distance_left -= ENEMY_WANDER_SPEED * time.delta_secs();
                    if *distance_left <= 0.0 {
                        Some(random_pause())
                    } else {
                        None
                    }
                }
            }
            EnemyState::Chase => {
                let target_pos = target.0.and_then(|entity| {
                    players
                        .get(entity)
                        .ok()
                        .map(|(_, transform)| transform.translation().xy())
                });
                match target_pos {
                    None => Some(random_pause()),
                    Some(pos) if enemy.lost(own_pos, pos) => {
                        target.0 = None;
                        Some(random_pause())
                    }
                    Some(pos) if enemy.in_attack_range(own_pos, pos) && cooldown.0.finished() => {
                        // Lock facing toward the target for the swing.
                        if let Some(next_facing) = Facing::from_direction(pos - own_pos) {
                            *facing = next_facing;
                        }
                        limb_transform.translation =
                            (facing.unit() * (enemy.attack_range / 2.0)).extend(0.0);
                        Some(EnemyState::Attack {
                            duration: Timer::from_seconds(
                                ENEMY_ATTACK_DURATION_SECS,
                                TimerMode::Once,
                            ),
                            limb_armed: false,
                        })
                    }
                    Some(pos) => {
                        if let Some(next_facing) = Facing::from_direction(pos - own_pos) {
                            *facing = next_facing;
                        }
                        None
                    }
                }
            }
            EnemyState::Attack {
                duration,
                limb_armed,
            } => {
                duration.tick(time.delta());
                if !*limb_armed
                    && duration.elapsed_secs()
                        >= ENEMY_ATTACK_DURATION_SECS * ENEMY_ATTACK_WINDUP_FRACTION
                {
                    limb_hitbox.activate();
                    *limb_armed = true;
                }
                if duration.finished() {
                    cooldown.0.reset();
                    Some(random_pause())
                } else {
                    None
                }
            }
        };

        if let Some(next) = next {
            change_state(&mut state, next, *facing, &mut anim, &mut limb_hitbox);
        }

        // Walk/idle clips track facing; identical requests no-op.
        if !matches!(&*state, EnemyState::Attack { .. }) {
            anim.request(state.clip(), *facing);
        }
    }
}

/// Write velocity from the active state. Runs in `GameSet::Movement`;
/// knocked-back enemies are excluded — knockback owns their velocity.
fn enemy_movement(
    mut enemies: Query<
        (
            &Enemy,
            &EnemyState,
            &EnemyTarget,
            &GlobalTransform,
            &mut LinearVelocity,
        ),
        Without<Knockback>,
    >,
    players: Query<&GlobalTransform, (With<Player>, Without<Respawning>)>,
) {
    for (enemy, state, target, transform, mut velocity) in &mut enemies {
        let own_pos = transform.translation().xy();
        velocity.0 = match state {
            EnemyState::Idle { .. } | EnemyState::Attack { .. } => Vec2::ZERO,
            EnemyState::Wander { heading, .. } => *heading * ENEMY_WANDER_SPEED,
            EnemyState::Chase => {
                let target_pos = target.0.and_then(|entity| {
                    players
                        .get(entity)
                        .ok()
                        .map(|transform| transform.translation().xy())
                });
                match target_pos {
                    // Stop at attack range instead of shoving the target.
                    Some(pos) if !enemy.in_attack_range(own_pos, pos) => {
                        (pos - own_pos).normalize_or_zero() * ENEMY_CHASE_SPEED
                    }
                    _ => Vec2::ZERO,
                }
            }
        };
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        tick_attack_cooldowns
            .in_set(GameSet::TickTimers)
            .run_if(gameplay_running),
    );
    app.add_systems(
        Update,
        enemy_state_machine
            .in_set(GameSet::Ai)
            .run_if(gameplay_running),
    );
    app.add_systems(
        Update,
        enemy_movement
            .in_set(GameSet::Movement)
            .run_if(gameplay_running),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_state_is_idle() {
        assert_eq!(EnemyState::default().kind(), EnemyStateKind::Idle);
    }

    #[test]
    fn random_wander_heading_is_unit_length() {
        for _ in 0..16 {
            let EnemyState::Wander {
                heading,
                distance_left,
            } = random_wander()
            else {
                panic!("expected wander state");
            };
            assert!((heading.length() - 1.0).abs() < 1e-4);
            assert!((WANDER_MIN_DISTANCE..WANDER_MAX_DISTANCE).contains(&distance_left));
        }
    }

    #[test]
    fn random_pause_is_within_bounds() {
        for _ in 0..16 {
            let EnemyState::Idle { pause } = random_pause() else {
                panic!("expected idle state");
            };
            let secs = pause.duration().as_secs_f32();
            assert!((WANDER_PAUSE_MIN_SECS..WANDER_PAUSE_MAX_SECS).contains(&secs));
        }
    }
}
