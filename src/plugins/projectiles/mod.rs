//! Projectiles plugin: boss bolts and homing minions.
//!
//! # Data flow
//! ```text
//!   Think (FixedPostUpdate)
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │ update_bosses ── SpawnProjectileRequest ──► spawn_projectiles      │
//!   │ update_minions   (Emerge → Chase → Spent)                          │
//!   │ move_projectiles (ballistic / homing)                              │
//!   │ expire_projectiles (lifetime, max distance: silent removal)        │
//!   │ resolve_projectile_hits (CollisionStart → DamageRequest, effect)   │
//!   └──────────────────────────────────────────────────────────────────┘
//!   Cleanup: PendingDespawn entities are removed.
//! ```
//! A projectile damages at most once: `has_hit` is flipped on its first
//! collision and it is marked for removal whatever it touched.

pub mod collision;
pub mod components;
pub mod messages;
pub mod motion;
pub mod spawn;

use bevy::prelude::*;

use crate::plugins::boss::update_bosses;
use crate::plugins::core::FightSet;
use crate::plugins::machine::advance_state_clocks;

pub use components::{Lifetime, Minion, MinionState, Motion, Projectile};
pub use messages::{ImpactEffect, ProjectileKind, SpawnProjectileRequest};

pub struct ProjectilesPlugin;

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SpawnProjectileRequest>()
            .add_message::<ImpactEffect>();

        app.add_systems(
            FixedPostUpdate,
            (
                spawn::spawn_projectiles,
                motion::update_minions,
                motion::move_projectiles,
                motion::expire_projectiles,
                collision::resolve_projectile_hits,
            )
                .chain()
                .after(update_bosses)
                .in_set(FightSet::Think),
        )
        .add_systems(
            FixedPostUpdate,
            advance_state_clocks::<MinionState>.in_set(FightSet::Advance),
        );
    }
}
