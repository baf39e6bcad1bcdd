//! Death reactions shared across entity types.
//!
//! Entities that simply vanish on death (enemies) carry
//! [`DespawnOnDeath`]; entities with richer death behavior (plants break,
//! the player respawns) react to [`DeathEvent`](super::DeathEvent) in
//! their own modules instead.

use bevy::prelude::*;

use super::health::DeathEvent;

/// Marker: despawn this entity when its health dies.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnOnDeath;

/// Despawn marked entities on death. Runs in `GameSet::Death`.
pub(super) fn despawn_dead(
    mut deaths: MessageReader<DeathEvent>,
    marked: Query<(), With<DespawnOnDeath>>,
    mut commands: Commands,
) {
    for death in deaths.read() {
        if marked.contains(death.entity) {
            commands.entity(death.entity).despawn();
        }
    }
}
