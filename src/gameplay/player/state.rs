//! Player state machine: Idle, Walk, Attack, Dash.
//!
//! Exactly one state is active; transitions are synchronous and go through
//! [`change_state`], which is a no-op for the already-active state kind and
//! cancels the outgoing state's pending effects (a live swing hitbox, an
//! unfired wind-up). Movement is written by [`player_movement`] from the
//! active state each tick — never while knockback owns the velocity.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::{PLAYER_MOVE_SPEED, Player, PlayerInput, Respawning};
use crate::gameplay::animation::CharacterAnimation;
use crate::gameplay::combat::{Hitbox, HitboxLifetime, Knockback, hitbox_collider};
use crate::gameplay::{Facing, Team};
use crate::{GameSet, gameplay_running};

// === Constants ===

pub const PLAYER_ATTACK_DAMAGE: i32 = 15;
pub const PLAYER_ATTACK_KNOCKBACK: f32 = 120.0;

/// Reach of the swing: the hitbox center sits at half this distance.
pub const PLAYER_ATTACK_RANGE: f32 = 32.0;

pub const PLAYER_ATTACK_DURATION_SECS: f32 = 0.4;

/// Wind-up: delay between committing to the attack and the swing spawning.
pub const PLAYER_ATTACK_WINDUP_SECS: f32 = 0.15;

/// How long the spawned swing hitbox stays live.
pub const SWING_LIFETIME_SECS: f32 = 0.2;

pub const SWING_RADIUS: f32 = 10.0;

/// Movement speed multiplier while retreat-dodging out of an attack.
pub const RETREAT_SPEED_MULTIPLIER: f32 = 1.5;

/// Input pointing this far against the locked facing counts as a retreat.
const RETREAT_DOT_THRESHOLD: f32 = -0.5;

pub const PLAYER_DASH_SPEED: f32 = 260.0;
pub const PLAYER_DASH_DURATION_SECS: f32 = 0.2;
pub const PLAYER_DASH_COOLDOWN_SECS: f32 = 1.0;

// === Components ===

/// Reusable dash cooldown. Starts expired so the first dash is available.
#[derive(Component, Debug)]
pub struct DashCooldown(pub Timer);

/// The player's active behavior state.
#[derive(Component, Debug, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Walk,
    Attack(AttackState),
    Dash(DashState),
}

/// Timers and the facing snapshot of a committed attack.
#[derive(Debug, Clone)]
pub struct AttackState {
    /// Facing snapshot taken on entry; input cannot change it mid-attack
    /// (a retreat dodge deliberately re-aims it).
    pub locked_facing: Facing,
    duration: Timer,
    windup: Timer,
    /// The spawned swing entity, once the wind-up has fired.
    swing: Option<Entity>,
    pub retreating: bool,
}

impl AttackState {
    #[must_use]
    fn new(locked_facing: Facing) -> Self {
        Self {
            locked_facing,
            duration: Timer::from_seconds(PLAYER_ATTACK_DURATION_SECS, TimerMode::Once),
            windup: Timer::from_seconds(PLAYER_ATTACK_WINDUP_SECS, TimerMode::Once),
            swing: None,
            retreating: false,
        }
    }
}

/// Locked direction and remaining duration of a dash.
#[derive(Debug, Clone)]
pub struct DashState {
    pub direction: Vec2,
    duration: Timer,
}

impl DashState {
    #[must_use]
    fn new(direction: Vec2) -> Self {
        Self {
            direction,
            duration: Timer::from_seconds(PLAYER_DASH_DURATION_SECS, TimerMode::Once),
        }
    }
}

/// Discriminant of [`PlayerState`], for same-state transition checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStateKind {
    Idle,
    Walk,
    Attack,
    Dash,
}

impl PlayerState {
    #[must_use]
    pub const fn kind(&self) -> PlayerStateKind {
        match self {
            Self::Idle => PlayerStateKind::Idle,
            Self::Walk => PlayerStateKind::Walk,
            Self::Attack(_) => PlayerStateKind::Attack,
            Self::Dash(_) => PlayerStateKind::Dash,
        }
    }

    /// Committed actions freeze facing for their duration.
    #[must_use]
    pub const fn locks_facing(&self) -> bool {
        matches!(self, Self::Attack(_) | Self::Dash(_))
    }

    const fn clip(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Attack(_) => "attack",
            Self::Dash(_) => "dash",
        }
    }
}

// === Transitions ===

/// Switch the active state. No-op when `next` is the currently-active state
/// kind; otherwise the outgoing state's pending effects are cancelled (a
/// live swing despawns, an unfired wind-up is dropped with its timer) and
/// the new state's animation is requested.
fn change_state(
    state: &mut PlayerState,
    next: PlayerState,
    facing: Facing,
    anim: &mut CharacterAnimation,
    commands: &mut Commands,
) {
    if state.kind() == next.kind() {
        return;
    }

    if let PlayerState::Attack(attack) = state {
        if let Some(swing) = attack.swing {
            if let Ok(mut swing_commands) = commands.get_entity(swing) {
                swing_commands.despawn();
            }
        }
    }

    *state = next;
    match &*state {
        PlayerState::Attack(attack) => anim.request("attack", attack.locked_facing),
        other => anim.request(other.clip(), facing),
    }
}

/// Swing hitbox transform: centered half the attack range out, along facing.
fn swing_transform(facing: Facing) -> Transform {
    Transform::from_translation((facing.unit() * (PLAYER_ATTACK_RANGE / 2.0)).extend(0.0))
}

/// Spawn the transient swing hitbox as a child of the player, already
/// active and self-timed.
fn spawn_swing(commands: &mut Commands, owner: Entity, facing: Facing) -> Entity {
    commands
        .spawn((
            Name::new("Swing"),
            Hitbox::new(owner, PLAYER_ATTACK_DAMAGE, PLAYER_ATTACK_KNOCKBACK).activated(),
            Team::Player,
            HitboxLifetime::new(SWING_LIFETIME_SECS),
            hitbox_collider(Collider::circle(SWING_RADIUS)),
            swing_transform(facing),
            ChildOf(owner),
        ))
        .id()
}

// === Systems ===

/// Tick the dash cooldown. Runs in `GameSet::TickTimers`.
fn tick_dash_cooldown(time: Res<Time>, mut cooldowns: Query<&mut DashCooldown>) {
    for mut cooldown in &mut cooldowns {
        cooldown.0.tick(time.delta());
    }
}

/// Drive the player state machine. Runs in `GameSet::Ai`.
fn player_state_machine(
    time: Res<Time>,
    input: Res<PlayerInput>,
    mut commands: Commands,
    mut players: Query<
        (
            Entity,
            &mut PlayerState,
            &mut Facing,
            &mut CharacterAnimation,
            &mut DashCooldown,
        ),
        (With<Player>, Without<Respawning>),
    >,
) {
    for (entity, mut state, mut facing, mut anim, mut cooldown) in &mut players {
        let next = match &mut *state {
            PlayerState::Idle | PlayerState::Walk => {
                if input.attack_pressed {
                    Some(PlayerState::Attack(AttackState::new(*facing)))
                } else if input.dash_pressed {
                    if cooldown.0.finished() {
                        cooldown.0.reset();
                        // Dash direction is the current facing, locked for
                        // the full duration.
                        Some(PlayerState::Dash(DashState::new(facing.unit())))
                    } else if input.direction == Vec2::ZERO {
                        // On cooldown: redirect to a neutral state instead
                        // of erroring. Same-kind transitions are no-ops.
                        Some(PlayerState::Idle)
                    } else {
                        Some(PlayerState::Walk)
                    }
                } else if input.direction == Vec2::ZERO {
                    Some(PlayerState::Idle)
                } else {
                    Some(PlayerState::Walk)
                }
            }
            PlayerState::Attack(attack) => {
                attack.duration.tick(time.delta());
                attack.windup.tick(time.delta());

                if attack.windup.just_finished() {
                    attack.swing = Some(spawn_swing(&mut commands, entity, attack.locked_facing));
                }

                // Retreat dodge: input roughly opposite the locked facing
                // re-aims the attack and boosts movement for the remainder.
                if !attack.retreating
                    && input.direction != Vec2::ZERO
                    && input.direction.dot(attack.locked_facing.unit()) < RETREAT_DOT_THRESHOLD
                {
                    attack.retreating = true;
                    if let Some(new_facing) = Facing::from_direction(input.direction) {
                        attack.locked_facing = new_facing;
                        *facing = new_facing;
                        anim.request("attack", new_facing);
                        if let Some(swing) = attack.swing {
                            if let Ok(mut swing_commands) = commands.get_entity(swing) {
                                swing_commands.insert(swing_transform(new_facing));
                            }
                        }
                    }
                }

                if attack.duration.finished() {
                    if input.direction == Vec2::ZERO {
                        Some(PlayerState::Idle)
                    } else {
                        Some(PlayerState::Walk)
                    }
                } else {
                    None
                }
            }
            PlayerState::Dash(dash) => {
                dash.duration.tick(time.delta());
                if dash.duration.finished() {
                    if input.direction == Vec2::ZERO {
                        Some(PlayerState::Idle)
                    } else {
                        Some(PlayerState::Walk)
                    }
                } else {
                    None
                }
            }
        };

        if let Some(next) = next {
            change_state(&mut state, next, *facing, &mut anim, &mut commands);
        }

        // Idle/walk clips track facing changes; identical requests no-op.
        match &*state {
            PlayerState::Idle => anim.request("idle", *facing),
            PlayerState::Walk => anim.request("walk", *facing),
            _ => {}
        }
    }
}

/// Write velocity from the active state. Runs in `GameSet::Movement`;
/// knocked-back and respawning players are excluded.
fn player_movement(
    input: Res<PlayerInput>,
    mut players: Query<
        (&PlayerState, &mut LinearVelocity),
        (With<Player>, Without<Knockback>, Without<Respawning>),
    >,
) {
    for (state, mut velocity) in &mut players {
        velocity.0 = match state {
            PlayerState::Idle => Vec2::ZERO,
            PlayerState::Walk => input.direction * PLAYER_MOVE_SPEED,
            PlayerState::Attack(attack) => {
                if attack.retreating && input.direction != Vec2::ZERO {
                    input.direction * PLAYER_MOVE_SPEED * RETREAT_SPEED_MULTIPLIER
                } else {
                    Vec2::ZERO
                }
            }
            PlayerState::Dash(dash) => dash.direction * PLAYER_DASH_SPEED,
        };
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        tick_dash_cooldown
            .in_set(GameSet::TickTimers)
            .run_if(gameplay_running),
    );
    app.add_systems(
        Update,
        player_state_machine
            .in_set(GameSet::Ai)
            .run_if(gameplay_running),
    );
    app.add_systems(
        Update,
        player_movement
            .in_set(GameSet::Movement)
            .run_if(gameplay_running),
    );
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::expired_timer;
    use crate::testing::{advance_and_update, assert_entity_count};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn create_state_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<PlayerInput>();
        app.add_systems(
            Update,
            (
                tick_dash_cooldown,
                super::super::input::update_facing,
                player_state_machine,
                player_movement,
            )
                .chain(),
        );
        app.update(); // initialize time
        app
    }

    fn spawn_test_player(world: &mut World) -> Entity {
        world
            .spawn((
                Player,
                PlayerState::default(),
                Facing::default(),
                CharacterAnimation::new([
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
                ]),
                DashCooldown(expired_timer(PLAYER_DASH_COOLDOWN_SECS)),
                LinearVelocity::ZERO,
                Transform::default(),
                GlobalTransform::default(),
            ))
            .id()
    }

    fn set_input(app: &mut App, direction: Vec2, attack: bool, dash: bool) {
        let mut input = app.world_mut().resource_mut::<PlayerInput>();
        input.direction = direction;
        input.attack_pressed = attack;
        input.dash_pressed = dash;
    }

    fn state_kind(app: &App, player: Entity) -> PlayerStateKind {
        app.world().get::<PlayerState>(player).unwrap().kind()
    }

    #[test]
    fn idle_to_walk_on_movement_input() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        set_input(&mut app, Vec2::X, false, false);
        app.update();

        assert_eq!(state_kind(&app, player), PlayerStateKind::Walk);
        let velocity = app.world().get::<LinearVelocity>(player).unwrap();
        assert_eq!(velocity.0, Vec2::X * PLAYER_MOVE_SPEED);
    }

    #[test]
    fn walk_to_idle_when_input_stops() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        set_input(&mut app, Vec2::X, false, false);
        app.update();
        set_input(&mut app, Vec2::ZERO, false, false);
        app.update();

        assert_eq!(state_kind(&app, player), PlayerStateKind::Idle);
        let velocity = app.world().get::<LinearVelocity>(player).unwrap();
        assert_eq!(velocity.0, Vec2::ZERO);
    }

    #[test]
    fn attack_locks_facing_for_full_duration() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        // Walk right so facing is Right, then attack.
        set_input(&mut app, Vec2::X, false, false);
        app.update();
        set_input(&mut app, Vec2::ZERO, true, false);
        app.update();
        assert_eq!(state_kind(&app, player), PlayerStateKind::Attack);

        // Push up mid-attack (perpendicular — not a retreat).
        set_input(&mut app, Vec2::Y, false, false);
        advance_and_update(&mut app, Duration::from_millis(100));

        assert_eq!(*app.world().get::<Facing>(player).unwrap(), Facing::Right);
        assert_eq!(state_kind(&app, player), PlayerStateKind::Attack);
    }

    #[test]
    fn windup_spawns_active_swing() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        set_input(&mut app, Vec2::ZERO, true, false);
        app.update();
        assert_entity_count::<With<Hitbox>>(&mut app, 0); // wind-up pending

        advance_and_update(
            &mut app,
            Duration::from_secs_f32(PLAYER_ATTACK_WINDUP_SECS + 0.01),
        );
        app.update(); // apply deferred spawn

        let mut swings = app.world_mut().query::<&Hitbox>();
        let swing = swings.single(app.world()).unwrap();
        assert!(swing.is_active());
        assert_eq!(swing.owner(), player);
    }

    #[test]
    fn attack_returns_to_idle_after_duration() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        set_input(&mut app, Vec2::ZERO, true, false);
        app.update();

        advance_and_update(
            &mut app,
            Duration::from_secs_f32(PLAYER_ATTACK_DURATION_SECS + 0.05),
        );

        assert_eq!(state_kind(&app, player), PlayerStateKind::Idle);
    }

    #[test]
    fn attack_returns_to_walk_when_still_moving() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        set_input(&mut app, Vec2::ZERO, true, false);
        app.update();

        set_input(&mut app, Vec2::Y, false, false);
        advance_and_update(
            &mut app,
            Duration::from_secs_f32(PLAYER_ATTACK_DURATION_SECS + 0.05),
        );

        assert_eq!(state_kind(&app, player), PlayerStateKind::Walk);
    }

    #[test]
    fn retreat_dodge_boosts_and_reaims() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        // Face right, then attack.
        set_input(&mut app, Vec2::X, false, false);
        app.update();
        set_input(&mut app, Vec2::ZERO, true, false);
        app.update();

        // Move left — opposite the locked facing.
        set_input(&mut app, Vec2::NEG_X, false, false);
        advance_and_update(&mut app, Duration::from_millis(30));

        let PlayerState::Attack(attack) = app.world().get::<PlayerState>(player).unwrap() else {
            panic!("expected attack state");
        };
        assert!(attack.retreating);
        assert_eq!(attack.locked_facing, Facing::Left);

        let velocity = app.world().get::<LinearVelocity>(player).unwrap();
        assert_eq!(
            velocity.0,
            Vec2::NEG_X * PLAYER_MOVE_SPEED * RETREAT_SPEED_MULTIPLIER
        );
    }

    #[test]
    fn dash_on_cooldown_redirects_to_walk() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        // Exhaust the cooldown with a first dash.
        set_input(&mut app, Vec2::X, false, true);
        app.update();
        assert_eq!(state_kind(&app, player), PlayerStateKind::Dash);

        // Wait out the dash itself but not the cooldown.
        set_input(&mut app, Vec2::X, false, false);
        advance_and_update(
            &mut app,
            Duration::from_secs_f32(PLAYER_DASH_DURATION_SECS + 0.05),
        );
        assert_eq!(state_kind(&app, player), PlayerStateKind::Walk);

        // Second dash request while cooling down: redirected, walk speed.
        set_input(&mut app, Vec2::X, false, true);
        app.update();
        assert_eq!(state_kind(&app, player), PlayerStateKind::Walk);
        let velocity = app.world().get::<LinearVelocity>(player).unwrap();
        assert_eq!(velocity.0, Vec2::X * PLAYER_MOVE_SPEED);
    }

    #[test]
    fn dash_on_cooldown_with_no_input_redirects_to_idle() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        set_input(&mut app, Vec2::X, false, true);
        app.update();
        set_input(&mut app, Vec2::ZERO, false, false);
        advance_and_update(
            &mut app,
            Duration::from_secs_f32(PLAYER_DASH_DURATION_SECS + 0.05),
        );

        set_input(&mut app, Vec2::ZERO, false, true);
        app.update();

        assert_eq!(state_kind(&app, player), PlayerStateKind::Idle);
        let velocity = app.world().get::<LinearVelocity>(player).unwrap();
        assert_eq!(velocity.0, Vec2::ZERO);
    }

    #[test]
    fn dash_cooldown_is_reusable() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        set_input(&mut app, Vec2::X, false, true);
        app.update();
        assert_eq!(state_kind(&app, player), PlayerStateKind::Dash);

        // Finish the dash and wait out the full cooldown.
        set_input(&mut app, Vec2::ZERO, false, false);
        advance_and_update(
            &mut app,
            Duration::from_secs_f32(PLAYER_DASH_COOLDOWN_SECS + 0.1),
        );

        set_input(&mut app, Vec2::NEG_X, false, true);
        app.update();

        assert_eq!(state_kind(&app, player), PlayerStateKind::Dash);
    }

    #[test]
    fn dash_direction_is_the_current_facing() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        // Face up first.
        set_input(&mut app, Vec2::Y, false, false);
        app.update();
        // Dash with no directional input — locked to the facing.
        set_input(&mut app, Vec2::ZERO, false, true);
        app.update();

        let PlayerState::Dash(dash) = app.world().get::<PlayerState>(player).unwrap() else {
            panic!("expected dash state");
        };
        assert_eq!(dash.direction, Vec2::Y);
    }

    #[test]
    fn knockback_blocks_state_velocity_writes() {
        let mut app = create_state_test_app();
        let player = spawn_test_player(app.world_mut());

        app.world_mut()
            .entity_mut(player)
            .insert(Knockback::new(Vec2::new(-300.0, 0.0)));
        app.world_mut().get_mut::<LinearVelocity>(player).unwrap().0 = Vec2::new(-300.0, 0.0);

        // Walking input must not overwrite the knockback-owned velocity.
        set_input(&mut app, Vec2::X, false, false);
        app.update();

        let velocity = app.world().get::<LinearVelocity>(player).unwrap();
        assert_eq!(velocity.0, Vec2::new(-300.0, 0.0));
    }
}
