use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;
use crate::plugins::boss::{Boss, BossPhase};

#[test]
fn inserts_resources() {
    let mut app = App::new();
    app.insert_resource(Tunables::default());
    core_plugin(&mut app);
    assert!(app.world().get_resource::<Tunables>().is_some());
    assert!(app.world().get_resource::<ArenaRng>().is_some());
    assert!(app.world().get_resource::<EntityRegistry>().is_some());
    assert!(app.world().get_resource::<ClearColor>().is_some());
}

#[test]
fn keeps_preinserted_tunables() {
    let mut app = App::new();
    let mut t = Tunables::default();
    t.phase1.max_health = 7;
    app.insert_resource(t);
    core_plugin(&mut app);
    assert_eq!(app.world().resource::<Tunables>().phase1.max_health, 7);
}

fn core_plugin(app: &mut App) {
    super::plugin(app);
}

#[test]
fn registry_tracks_spawn_and_despawn() {
    let mut world = World::new();
    world.init_resource::<EntityRegistry>();

    let player = world.spawn(Player).id();
    let boss = world.spawn(Boss { phase: BossPhase::Phase1 }).id();
    run_system_once(&mut world, sync_registry);

    let reg = *world.resource::<EntityRegistry>();
    assert_eq!(reg.player, Some(player));
    assert_eq!(reg.boss, Some(boss));

    world.despawn(boss);
    let next = world.spawn(Boss { phase: BossPhase::Phase2 }).id();
    run_system_once(&mut world, sync_registry);
    assert_eq!(world.resource::<EntityRegistry>().boss, Some(next));

    world.despawn(player);
    run_system_once(&mut world, sync_registry);
    assert_eq!(world.resource::<EntityRegistry>().player, None);
}

#[test]
fn boss_marked_for_despawn_is_unregistered() {
    let mut world = World::new();
    world.init_resource::<EntityRegistry>();
    let boss = world.spawn(Boss { phase: BossPhase::Phase2 }).id();
    run_system_once(&mut world, sync_registry);

    world.entity_mut(boss).insert(PendingDespawn);
    run_system_once(&mut world, sync_registry);
    assert_eq!(world.resource::<EntityRegistry>().boss, None);

    run_system_once(&mut world, despawn_marked);
    assert!(world.get_entity(boss).is_err());
}
