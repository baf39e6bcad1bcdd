//! Thicket — a top-down 2D action-RPG prototype.
//!
//! The interesting part lives under [`gameplay`]: per-entity state machines
//! for the player and enemies, and the hitbox → hurtbox → health damage
//! pipeline with knockback and timed immunity.

pub mod gameplay;
pub mod screens;
#[cfg(test)]
pub mod testing;
pub mod third_party;

#[cfg(feature = "dev")]
pub mod dev_tools;

use bevy::prelude::*;

// === Z layers ===

/// Z coordinate for ground props (plants).
pub const Z_PROP: f32 = 1.0;

/// Z coordinate for actors (player, enemies).
pub const Z_ACTOR: f32 = 2.0;

// === States ===

/// Primary game states.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Initial loading state.
    #[default]
    Loading,
    /// Main menu state.
    MainMenu,
    /// Active gameplay state.
    InGame,
}

/// Sub-states within `InGame`. Only exists while `GameState::InGame` is active.
#[derive(SubStates, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum InGameState {
    /// Normal gameplay.
    #[default]
    Playing,
    /// Game is paused (overlay on gameplay).
    Paused,
}

// === System sets ===

/// Update-schedule system sets, chained in declaration order.
///
/// Timers tick first so the rest of the frame observes a consistent clock;
/// intent (input, then the state machines) runs before movement; the damage
/// pipeline runs once bodies have their velocities; death reactions last.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Tick cooldowns, immunity windows, and respawn timers.
    TickTimers,
    /// Gather player input intent.
    Input,
    /// Entity state machines decide intent and transitions.
    Ai,
    /// States write velocities (skipped while knockback owns them).
    Movement,
    /// Hit detection, hurtbox resolution, damage application.
    Combat,
    /// Reactions to death events: despawn, break, respawn scheduling.
    Death,
}

/// Run condition: gameplay simulation is active (in game and not paused).
pub fn gameplay_running(
    game_state: Option<Res<State<GameState>>>,
    in_game: Option<Res<State<InGameState>>>,
) -> bool {
    game_state.is_some_and(|s| *s.get() == GameState::InGame)
        && in_game.is_some_and(|s| *s.get() == InGameState::Playing)
}

// === Root plugin ===

/// Root plugin: states, system set ordering, and all domain plugins.
pub fn plugin(app: &mut App) {
    app.init_state::<GameState>();
    app.add_sub_state::<InGameState>();

    app.configure_sets(
        Update,
        (
            GameSet::TickTimers,
            GameSet::Input,
            GameSet::Ai,
            GameSet::Movement,
            GameSet::Combat,
            GameSet::Death,
        )
            .chain(),
    );

    app.add_plugins((third_party::plugin, gameplay::plugin, screens::plugin));
}
