//! Level assembly: arena walls, player, enemies, plant patch, and the
//! camera follow. Everything spawned here despawns on leaving `InGame`.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::enemy::spawn_enemy;
use crate::gameplay::plant::spawn_plant;
use crate::gameplay::player::{Player, spawn_player};
use crate::third_party::CollisionLayer;
use crate::{GameSet, GameState, gameplay_running};

// === Constants ===

/// Arena half extents (pixels). Walls sit just outside these bounds.
pub const ARENA_HALF_EXTENTS: Vec2 = Vec2::new(240.0, 160.0);

const WALL_THICKNESS: f32 = 16.0;

/// Exponential camera follow rate (higher = snappier).
const CAMERA_FOLLOW_RATE: f32 = 5.0;

const ENEMY_SPAWNS: [Vec2; 3] = [
    Vec2::new(160.0, 90.0),
    Vec2::new(-180.0, -70.0),
    Vec2::new(120.0, -110.0),
];

const PLANT_SPAWNS: [Vec2; 6] = [
    Vec2::new(-60.0, 40.0),
    Vec2::new(-40.0, 40.0),
    Vec2::new(-20.0, 40.0),
    Vec2::new(-60.0, 20.0),
    Vec2::new(-40.0, 20.0),
    Vec2::new(-20.0, 20.0),
];

// === Systems ===

fn spawn_wall(commands: &mut Commands, center: Vec2, size: Vec2) {
    commands.spawn((
        Name::new("Wall"),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        CollisionLayers::new(CollisionLayer::Pushbox, CollisionLayer::Pushbox),
        Transform::from_xyz(center.x, center.y, 0.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn setup_level(mut commands: Commands) {
    spawn_player(&mut commands, Vec2::ZERO);

    for position in ENEMY_SPAWNS {
        spawn_enemy(&mut commands, position);
    }
    for position in PLANT_SPAWNS {
        spawn_plant(&mut commands, position);
    }

    let extent = ARENA_HALF_EXTENTS;
    let horizontal = Vec2::new(extent.x.mul_add(2.0, WALL_THICKNESS * 2.0), WALL_THICKNESS);
    let vertical = Vec2::new(WALL_THICKNESS, extent.y * 2.0);
    spawn_wall(
        &mut commands,
        Vec2::new(0.0, extent.y + WALL_THICKNESS / 2.0),
        horizontal,
    );
    spawn_wall(
        &mut commands,
        Vec2::new(0.0, -extent.y - WALL_THICKNESS / 2.0),
        horizontal,
    );
    spawn_wall(
        &mut commands,
        Vec2::new(extent.x + WALL_THICKNESS / 2.0, 0.0),
        vertical,
    );
    spawn_wall(
        &mut commands,
        Vec2::new(-extent.x - WALL_THICKNESS / 2.0, 0.0),
        vertical,
    );
}

/// Ease the camera toward the player. Runs after movement so the camera
/// chases this frame's position.
fn camera_follow(
    time: Res<Time>,
    players: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    for mut camera in &mut cameras {
        let target = player.translation.truncate();
        let current = camera.translation.truncate();
        let eased = current.lerp(target, (CAMERA_FOLLOW_RATE * time.delta_secs()).min(1.0));
        camera.translation.x = eased.x;
        camera.translation.y = eased.y;
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), setup_level);
    app.add_systems(
        Update,
        camera_follow
            .after(GameSet::Movement)
            .run_if(gameplay_running),
    );
}
