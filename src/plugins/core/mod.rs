//! Core plugin: shared resources, the fixed-step fight pipeline, and the
//! role registry used for target discovery.
//!
//! # Fight pipeline (FixedPostUpdate, after physics collision messages)
//! ```text
//!   Intake  -> registry sync, skill input
//!   Think   -> state updates, projectile motion, collision translation
//!   Resolve -> damage requests applied (single writer per entity kind)
//!   Advance -> sub-state timers, state clocks
//!   Cleanup -> deferred actions, despawns, HUD
//! ```
//! A state's update always completes before that entity's timers advance, so a
//! timer armed during `Think` first reads as active on the next tick.

use avian3d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::common::state::GameState;
use crate::common::tunables::{TUNABLES_PATH, Tunables};
use crate::plugins::boss::Boss;
use crate::plugins::player::Player;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FightSet {
    Intake,
    Think,
    Resolve,
    Advance,
    Cleanup,
}

impl FightSet {
    pub const ALL: [FightSet; 5] = [
        FightSet::Intake,
        FightSet::Think,
        FightSet::Resolve,
        FightSet::Advance,
        FightSet::Cleanup,
    ];
}

/// Live entity per role. Stale ids are dropped on the next sync.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct EntityRegistry {
    pub player: Option<Entity>,
    pub boss: Option<Entity>,
}

/// Gameplay randomness (attack rolls).
#[derive(Resource)]
pub struct ArenaRng(pub StdRng);

impl ArenaRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Marker: remove this entity during `Cleanup`.
///
/// Structural removal is kept out of the state updates so nothing else in the
/// same tick observes a half-despawned entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<Tunables>() {
        app.insert_resource(Tunables::load_or_default(TUNABLES_PATH));
    }
    if !app.world().contains_resource::<ArenaRng>() {
        app.insert_resource(ArenaRng(StdRng::from_os_rng()));
    }
    app.init_resource::<EntityRegistry>();
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));

    app.configure_sets(
        FixedPostUpdate,
        (
            FightSet::Intake,
            FightSet::Think,
            FightSet::Resolve,
            FightSet::Advance,
            FightSet::Cleanup,
        )
            .chain()
            .after(CollisionEventSystems),
    );
    for set in FightSet::ALL {
        app.configure_sets(FixedPostUpdate, set.run_if(in_state(GameState::InGame)));
    }

    app.add_systems(FixedPostUpdate, sync_registry.in_set(FightSet::Intake));
    app.add_systems(FixedPostUpdate, despawn_marked.in_set(FightSet::Cleanup));
    app.add_systems(OnExit(GameState::InGame), clear_registry);
}

/// Keep `EntityRegistry` in step with spawns and despawns.
///
/// Removals are processed first so a same-flush swap (old boss out, new boss
/// in) ends with the new entity registered.
pub fn sync_registry(
    mut registry: ResMut<EntityRegistry>,
    mut removed_players: RemovedComponents<Player>,
    mut removed_bosses: RemovedComponents<Boss>,
    added_players: Query<Entity, Added<Player>>,
    added_bosses: Query<Entity, Added<Boss>>,
    q_players: Query<(), With<Player>>,
    q_bosses: Query<(), (With<Boss>, Without<PendingDespawn>)>,
) {
    for e in removed_players.read() {
        if registry.player == Some(e) {
            registry.player = None;
        }
    }
    for e in removed_bosses.read() {
        if registry.boss == Some(e) {
            registry.boss = None;
        }
    }

    if let Some(e) = added_players.iter().last() {
        registry.player = Some(e);
    }
    if let Some(e) = added_bosses.iter().last() {
        registry.boss = Some(e);
    }

    // Removal messages can be missed when a frame runs no fixed step.
    if registry.player.is_some_and(|e| !q_players.contains(e)) {
        debug!("Dropping stale player registration");
        registry.player = None;
    }
    if registry.boss.is_some_and(|e| !q_bosses.contains(e)) {
        debug!("Dropping stale boss registration");
        registry.boss = None;
    }
}

fn clear_registry(mut registry: ResMut<EntityRegistry>) {
    *registry = EntityRegistry::default();
}

fn despawn_marked(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}

#[cfg(test)]
mod tests;
