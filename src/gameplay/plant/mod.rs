//! Breakable plants: an active/broken binary, not a full state machine.
//!
//! A plant's death event breaks it — visual hidden, collider disabled so it
//! neither blocks movement nor receives hits — and starts a respawn
//! countdown that restores it at full health. Plants never carry
//! `Knockbackable`: hits damage them but cannot shove them.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::combat::{DeathEvent, Health, HealthChangedEvent, Hurtbox};
use crate::gameplay::Team;
use crate::third_party::CollisionLayer;
use crate::{GameSet, GameState, Z_PROP, gameplay_running};

// === Constants ===

pub const PLANT_MAX_HEALTH: i32 = 30;

/// Seconds from breaking until the plant regrows.
pub const PLANT_RESPAWN_DELAY_SECS: f32 = 3.0;

/// Short immunity so one swing can't land twice across physics frames.
pub const PLANT_IMMUNITY_SECS: f32 = 0.1;

/// Square collider side length.
pub const PLANT_SIZE: f32 = 12.0;

// === Components ===

/// Marker for breakable plants.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Plant;

/// Present while broken; the timer schedules the regrow. Removing the
/// entity before it fires cancels the respawn with it.
#[derive(Component, Debug)]
pub struct Broken {
    respawn: Timer,
}

// === Spawn ===

/// Spawn a plant archetype: static body, hurtbox, no knockback capability.
pub fn spawn_plant(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("Plant"),
            Plant,
            Team::Wild,
            Health::new(PLANT_MAX_HEALTH),
            Hurtbox::new(PLANT_IMMUNITY_SECS),
            Transform::from_xyz(position.x, position.y, Z_PROP),
            Visibility::default(),
            DespawnOnExit(GameState::InGame),
        ))
        .insert((
            RigidBody::Static,
            Collider::rectangle(PLANT_SIZE, PLANT_SIZE),
            CollisionLayers::new(
                [CollisionLayer::Pushbox, CollisionLayer::Hurtbox],
                [CollisionLayer::Pushbox, CollisionLayer::Hitbox],
            ),
        ))
        .id()
}

// === Systems ===

/// Break plants whose health died: hide, disable the collider, start the
/// respawn countdown. A second death event on a broken plant is impossible
/// (the death latch), but the `Without<Broken>` guard keeps this idempotent
/// anyway. Runs in `GameSet::Death`.
fn break_plants(
    mut deaths: MessageReader<DeathEvent>,
    plants: Query<(), (With<Plant>, Without<Broken>)>,
    mut commands: Commands,
) {
    for death in deaths.read() {
        if plants.contains(death.entity) {
            commands.entity(death.entity).insert((
                Broken {
                    respawn: Timer::from_seconds(PLANT_RESPAWN_DELAY_SECS, TimerMode::Once),
                },
                Visibility::Hidden,
                ColliderDisabled,
            ));
        }
    }
}

/// Tick respawn countdowns; on expiry restore health, visual, and collider.
/// Runs in `GameSet::TickTimers`.
fn respawn_plants(
    time: Res<Time>,
    mut commands: Commands,
    mut plants: Query<(Entity, &mut Broken, &mut Health), With<Plant>>,
    mut health_changed: MessageWriter<HealthChangedEvent>,
) {
    for (entity, mut broken, mut health) in &mut plants {
        broken.respawn.tick(time.delta());
        if !broken.respawn.finished() {
            continue;
        }

        health.reset();
        health_changed.write(HealthChangedEvent {
            entity,
            current: health.current(),
            max: health.max(),
        });
        commands
            .entity(entity)
            .remove::<(Broken, ColliderDisabled)>()
            .insert(Visibility::Inherited);
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Plant>();

    app.add_systems(
        Update,
        respawn_plants
            .in_set(GameSet::TickTimers)
            .run_if(gameplay_running),
    );
    app.add_systems(
        Update,
        break_plants.in_set(GameSet::Death).run_if(gameplay_running),
    );
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::combat::DamageOutcome;
    use crate::testing::advance_and_update;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    /// Counts break insertions across the run.
    #[derive(Resource, Default)]
    struct BreakCount(usize);

    fn count_breaks(query: Query<(), Added<Broken>>, mut count: ResMut<BreakCount>) {
        count.0 += query.iter().count();
    }

    fn create_plant_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<DeathEvent>()
            .add_message::<HealthChangedEvent>();
        app.init_resource::<BreakCount>();
        app.add_systems(
            Update,
            (respawn_plants, break_plants, count_breaks).chain(),
        );
        app.update();
        app
    }

    /// Bare plant without physics components (the break/respawn systems
    /// don't touch avian state directly, only the disable markers).
    fn spawn_bare_plant(world: &mut World) -> Entity {
        world
            .spawn((
                Plant,
                Team::Wild,
                Health::new(PLANT_MAX_HEALTH),
                Hurtbox::new(PLANT_IMMUNITY_SECS),
                Transform::default(),
                Visibility::default(),
            ))
            .id()
    }

    /// Damage the plant's health directly and emit the death event the
    /// damage pipeline would produce.
    fn hit_plant(app: &mut App, plant: Entity, amount: i32) {
        let outcome = app
            .world_mut()
            .get_mut::<Health>(plant)
            .unwrap()
            .take_damage(amount);
        if outcome == DamageOutcome::Fatal {
            app.world_mut()
                .resource_mut::<Messages<DeathEvent>>()
                .write(DeathEvent { entity: plant });
        }
    }

    #[test]
    fn two_hits_break_the_plant_once() {
        // Two 15-damage hits on a 30 hp plant.
        let mut app = create_plant_test_app();
        let plant = spawn_bare_plant(app.world_mut());

        hit_plant(&mut app, plant, 15);
        app.update();
        assert!(app.world().get::<Broken>(plant).is_none());

        hit_plant(&mut app, plant, 15);
        app.update();
        app.update(); // Added<Broken> observed after deferred insert

        assert!(app.world().get::<Broken>(plant).is_some());
        assert!(app.world().get::<ColliderDisabled>(plant).is_some());
        assert_eq!(app.world().resource::<BreakCount>().0, 1);

        // Stray extra damage on the corpse cannot re-break it.
        hit_plant(&mut app, plant, 15);
        app.update();
        assert_eq!(app.world().resource::<BreakCount>().0, 1);
    }

    #[test]
    fn broken_plant_regrows_at_full_health() {
        let mut app = create_plant_test_app();
        let plant = spawn_bare_plant(app.world_mut());

        hit_plant(&mut app, plant, PLANT_MAX_HEALTH);
        app.update();
        app.update();
        assert!(app.world().get::<Broken>(plant).is_some());

        advance_and_update(
            &mut app,
            Duration::from_secs_f32(PLANT_RESPAWN_DELAY_SECS + 0.1),
        );
        app.update(); // apply deferred removals

        assert!(app.world().get::<Broken>(plant).is_none());
        assert!(app.world().get::<ColliderDisabled>(plant).is_none());
        let health = app.world().get::<Health>(plant).unwrap();
        assert!(!health.is_dead());
        assert_eq!(health.current(), PLANT_MAX_HEALTH);
        assert_eq!(
            *app.world().get::<Visibility>(plant).unwrap(),
            Visibility::Inherited
        );
    }

    #[test]
    fn regrown_plant_can_break_again() {
        let mut app = create_plant_test_app();
        let plant = spawn_bare_plant(app.world_mut());

        hit_plant(&mut app, plant, PLANT_MAX_HEALTH);
        app.update();
        app.update();
        advance_and_update(
            &mut app,
            Duration::from_secs_f32(PLANT_RESPAWN_DELAY_SECS + 0.1),
        );
        app.update();

        hit_plant(&mut app, plant, PLANT_MAX_HEALTH);
        app.update();
        app.update();

        assert!(app.world().get::<Broken>(plant).is_some());
        assert_eq!(app.world().resource::<BreakCount>().0, 2);
    }

    #[test]
    fn nonlethal_damage_does_not_break() {
        let mut app = create_plant_test_app();
        let plant = spawn_bare_plant(app.world_mut());

        hit_plant(&mut app, plant, PLANT_MAX_HEALTH - 1);
        app.update();

        assert!(app.world().get::<Broken>(plant).is_none());
    }
}
