//! Combat core: the hitbox → hurtbox → health damage pipeline, knockback
//! physics, and death reactions.
//!
//! Pipeline order within one tick (`GameSet::Combat`, chained):
//! hit detection → hurtbox resolution (immunity + knockback) → damage
//! application (health mutation + event broadcast). Death reactions run
//! afterwards in `GameSet::Death`.

mod death;
mod health;
mod hitbox;
mod hurtbox;
mod knockback;

pub use death::DespawnOnDeath;
pub use health::{
    DamageEvent, DamageOutcome, DamageTakenEvent, DeathEvent, Health, HealthChangedEvent,
};
pub use hitbox::{Hitbox, HitboxLifetime, hitbox_collider};
pub use hurtbox::{HitEvent, Hurtbox};
pub use knockback::{KNOCKBACK_RECOVERY_SECS, Knockback, Knockbackable};

use bevy::prelude::*;

use crate::{GameSet, gameplay_running};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Health>()
        .register_type::<Hurtbox>()
        .register_type::<Knockback>()
        .register_type::<Knockbackable>()
        .register_type::<DespawnOnDeath>();

    app.add_message::<HitEvent>()
        .add_message::<DamageEvent>()
        .add_message::<DamageTakenEvent>()
        .add_message::<HealthChangedEvent>()
        .add_message::<DeathEvent>();

    app.add_systems(
        Update,
        (hitbox::tick_hitbox_lifetimes, hurtbox::tick_immunity)
            .in_set(GameSet::TickTimers)
            .run_if(gameplay_running),
    );

    app.add_systems(
        Update,
        knockback::apply_knockback
            .in_set(GameSet::Movement)
            .run_if(gameplay_running),
    );

    // The damage pipeline proper: detection feeds resolution feeds
    // application within the same tick.
    app.add_systems(
        Update,
        (hitbox::detect_hits, hurtbox::resolve_hits, health::apply_damage)
            .chain()
            .in_set(GameSet::Combat)
            .run_if(gameplay_running),
    );

    app.add_systems(
        Update,
        death::despawn_dead
            .in_set(GameSet::Death)
            .run_if(gameplay_running),
    );
}
