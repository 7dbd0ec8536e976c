//! Phase manager: arena placement, boss phase swaps and fight end.
//!
//! Phase follow-ups are never run inline from a death. The resolver schedules
//! a [`DeferredAction`] and `run_deferred` fires it once its delay of game
//! time has passed:
//!
//! ```text
//!   ArenaPlaced ─► Placement → InGame ─► start_phase1
//!   Phase1 killed ─► Deferred(TransitionToPhase2) ─► despawn Phase1 + spawn Phase2 (one flush)
//!   Phase2 killed ─► Deferred(EndFight(Victory))  ─► GameState::Victory
//!   Player killed ─► Deferred(EndFight(Defeat))   ─► GameState::Defeat
//! ```

mod deferred;

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::boss::{Boss, BossPhase, spawn_boss};
use crate::plugins::core::FightSet;

pub use deferred::{Deferred, DeferredAction, FightOutcome};

/// Reported by the AR layer once a plane has been chosen for the arena.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct ArenaPlaced {
    pub position: Vec3,
}

/// World position of the placement anchor.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct ArenaAnchor(pub Vec3);

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PhaseDirector {
    /// Where every phase's boss appears.
    pub spawn_point: Vec3,
    pub active: Option<BossPhase>,
}

pub fn plugin(app: &mut App) {
    app.add_message::<ArenaPlaced>()
        .init_resource::<ArenaAnchor>()
        .init_resource::<PhaseDirector>()
        .init_resource::<Deferred>()
        .add_systems(
            Update,
            place_arena.run_if(in_state(GameState::Placement)),
        )
        .add_systems(OnEnter(GameState::InGame), start_phase1)
        .add_systems(OnExit(GameState::InGame), stand_down)
        .add_systems(FixedPostUpdate, run_deferred.in_set(FightSet::Cleanup));
}

fn place_arena(
    mut placed: MessageReader<ArenaPlaced>,
    mut anchor: ResMut<ArenaAnchor>,
    mut next: ResMut<NextState<GameState>>,
) {
    // Only the latest placement matters.
    let Some(ev) = placed.read().last() else {
        return;
    };
    info!("Arena placed at {}", ev.position);
    anchor.0 = ev.position;
    next.set(GameState::InGame);
}

/// Transform a boss spawns with: at the spawn point, facing the player's start.
fn boss_transform(spawn_point: Vec3, anchor: Vec3, tunables: &Tunables) -> Transform {
    let player_start = anchor + tunables.arena.player_offset();
    Transform::from_translation(spawn_point)
        .looking_at(player_start.with_y(spawn_point.y), Vec3::Y)
}

pub fn start_phase1(
    mut commands: Commands,
    tunables: Res<Tunables>,
    anchor: Res<ArenaAnchor>,
    mut director: ResMut<PhaseDirector>,
    mut deferred: ResMut<Deferred>,
) {
    deferred.clear();
    director.spawn_point = anchor.0 + tunables.arena.boss_offset();
    director.active = Some(BossPhase::Phase1);

    let tf = boss_transform(director.spawn_point, anchor.0, &tunables);
    spawn_boss(
        &mut commands,
        BossPhase::Phase1,
        tf,
        &tunables.phase1,
        tunables.arena.boss_radius,
    );
    info!("Phase 1 begins at {}", director.spawn_point);
}

/// Swap whatever boss is present for a fresh Phase2 at the spawn point.
///
/// The despawn and the spawn are queued on the same `Commands`, so no tick
/// ever observes zero or two bosses.
pub fn transition_to_phase2(
    commands: &mut Commands,
    director: &mut PhaseDirector,
    anchor: Vec3,
    tunables: &Tunables,
    bosses: impl IntoIterator<Item = Entity>,
) -> bool {
    if director.active == Some(BossPhase::Phase2) {
        debug!("Ignoring duplicate phase 2 transition");
        return false;
    }
    for e in bosses {
        commands.entity(e).despawn();
    }
    let tf = boss_transform(director.spawn_point, anchor, tunables);
    spawn_boss(
        commands,
        BossPhase::Phase2,
        tf,
        &tunables.phase2,
        tunables.arena.boss_radius,
    );
    director.active = Some(BossPhase::Phase2);
    info!("Phase 2 begins");
    true
}

pub fn run_deferred(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    anchor: Res<ArenaAnchor>,
    mut director: ResMut<PhaseDirector>,
    mut deferred: ResMut<Deferred>,
    mut next: ResMut<NextState<GameState>>,
    q_bosses: Query<Entity, With<Boss>>,
) {
    for action in deferred.tick(time.delta_secs()) {
        match action {
            DeferredAction::TransitionToPhase2 => {
                transition_to_phase2(
                    &mut commands,
                    &mut director,
                    anchor.0,
                    &tunables,
                    q_bosses.iter(),
                );
            }
            DeferredAction::EndFight(outcome) => {
                info!("Fight over: {:?}", outcome);
                next.set(outcome.into());
                deferred.clear();
                director.active = None;
                break;
            }
        }
    }
}

fn stand_down(mut deferred: ResMut<Deferred>, mut director: ResMut<PhaseDirector>) {
    deferred.clear();
    director.active = None;
}
