//! Gameplay domain: shared components plus the combat, player, enemy, and
//! plant plugins.

pub mod animation;
pub mod combat;
pub mod enemy;
pub mod level;
pub mod plant;
pub mod player;

use bevy::prelude::*;

// === Shared components ===

/// Which side an entity fights for. Damage only applies across teams.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum Team {
    Player,
    Enemy,
    /// Neutral destructibles (plants).
    Wild,
}

/// Four-way facing derived from movement, driving animation variants and
/// attack geometry. Committed actions (attack, dash) lock it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
#[reflect(Component)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Derive facing from a movement direction. Horizontal input wins on
    /// diagonals so diagonal movement maps to a "side" sprite category.
    /// Returns `None` for a zero vector (facing is then left unchanged).
    #[must_use]
    pub fn from_direction(direction: Vec2) -> Option<Self> {
        if direction.x.abs() > f32::EPSILON {
            Some(if direction.x > 0.0 { Self::Right } else { Self::Left })
        } else if direction.y.abs() > f32::EPSILON {
            Some(if direction.y > 0.0 { Self::Up } else { Self::Down })
        } else {
            None
        }
    }

    /// Unit vector pointing in this facing.
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::Y,
            Self::Down => Vec2::NEG_Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }

    /// Animation clip category. Left and right share the "side" sprites;
    /// the renderer mirrors them horizontally.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left | Self::Right => "side",
        }
    }
}

// === Helpers ===

/// A one-shot timer created already expired, for cooldowns that must be
/// ready on spawn (dash, enemy attack).
pub(crate) fn expired_timer(secs: f32) -> Timer {
    let mut timer = Timer::from_seconds(secs, TimerMode::Once);
    timer.tick(std::time::Duration::from_secs_f32(secs));
    timer
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Team>().register_type::<Facing>();

    app.add_plugins((
        combat::plugin,
        player::plugin,
        enemy::plugin,
        plant::plugin,
        level::plugin,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn facing_from_horizontal_direction() {
        assert_eq!(Facing::from_direction(Vec2::X), Some(Facing::Right));
        assert_eq!(Facing::from_direction(Vec2::NEG_X), Some(Facing::Left));
    }

    #[test]
    fn facing_from_vertical_direction() {
        assert_eq!(Facing::from_direction(Vec2::Y), Some(Facing::Up));
        assert_eq!(Facing::from_direction(Vec2::NEG_Y), Some(Facing::Down));
    }

    #[test]
    fn facing_horizontal_wins_on_diagonal() {
        assert_eq!(
            Facing::from_direction(Vec2::new(0.7, 0.7)),
            Some(Facing::Right)
        );
        assert_eq!(
            Facing::from_direction(Vec2::new(-0.7, -0.7)),
            Some(Facing::Left)
        );
    }

    #[test]
    fn facing_zero_direction_is_none() {
        assert_eq!(Facing::from_direction(Vec2::ZERO), None);
    }

    #[test]
    fn facing_unit_round_trips() {
        for facing in [Facing::Up, Facing::Down, Facing::Left, Facing::Right] {
            assert_eq!(Facing::from_direction(facing.unit()), Some(facing));
        }
    }

    #[test]
    fn side_facings_share_a_category() {
        assert_eq!(Facing::Left.category(), Facing::Right.category());
        assert_ne!(Facing::Up.category(), Facing::Down.category());
    }

    #[test]
    fn team_variants_are_distinct() {
        assert_ne!(Team::Player, Team::Enemy);
        assert_ne!(Team::Enemy, Team::Wild);
    }
}
