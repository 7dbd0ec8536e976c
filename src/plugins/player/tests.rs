use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::{fixed_time_with_delta, run_system_once};
use crate::plugins::combat::{DamageRequest, HealRequest};
use crate::plugins::core::EntityRegistry;
use crate::plugins::feedback::AudioCue;
use crate::plugins::machine::SubStateKind;

fn world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(fixed_time_with_delta(0.25));
    world.init_resource::<EntityRegistry>();
    world.init_resource::<GestureFlags>();
    world.init_resource::<Messages<SkillPressed>>();
    world.init_resource::<Messages<DamageRequest>>();
    world.init_resource::<Messages<HealRequest>>();
    world.init_resource::<Messages<AudioCue>>();
    world
}

fn spawn_fighters(world: &mut World) -> (Entity, Entity) {
    let player = world
        .spawn((
            Player,
            Health::new(100),
            Gauge::new(100),
            SkillCooldowns::default(),
            SubStates::default(),
        ))
        .id();
    let boss = world.spawn_empty().id();
    *world.resource_mut::<EntityRegistry>() = EntityRegistry {
        player: Some(player),
        boss: Some(boss),
    };
    (player, boss)
}

fn press(world: &mut World, skill: Skill) {
    world.write_message(SkillPressed {
        skill,
        source: InputSource::Keyboard,
    });
    run_system_once(world, run_skills);
    world.resource_mut::<Messages<SkillPressed>>().clear();
}

fn damage(world: &mut World) -> Vec<DamageRequest> {
    world
        .resource_mut::<Messages<DamageRequest>>()
        .drain()
        .collect()
}

#[test]
fn gauge_is_capped() {
    let mut g = Gauge::new(30);
    g.add(20);
    g.add(20);
    assert_eq!(g.value, 30);
    assert!(g.is_full());
    g.add(-50);
    assert_eq!(g.value, 30);
    g.reset();
    assert_eq!(g.value, 0);
}

#[test]
fn basic_attack_hits_boss_and_fills_gauge() {
    let mut world = world();
    let (player, boss) = spawn_fighters(&mut world);

    press(&mut world, Skill::Basic);

    let reqs = damage(&mut world);
    assert_eq!(
        reqs,
        vec![DamageRequest {
            target: boss,
            amount: 5,
            source: Some(player)
        }]
    );
    assert_eq!(world.get::<Gauge>(player).unwrap().value, 10);
    assert!(!world.get::<SkillCooldowns>(player).unwrap().is_ready(Skill::Basic));
}

#[test]
fn cooldown_blocks_until_it_runs_out() {
    let mut world = world();
    let (player, _) = spawn_fighters(&mut world);

    press(&mut world, Skill::Basic);
    press(&mut world, Skill::Basic);
    assert_eq!(damage(&mut world).len(), 1);

    // basic_cooldown = 0.8 s
    for _ in 0..4 {
        run_system_once(&mut world, tick_cooldowns);
    }
    assert!(world.get::<SkillCooldowns>(player).unwrap().is_ready(Skill::Basic));
    press(&mut world, Skill::Basic);
    assert_eq!(damage(&mut world).len(), 1);
}

#[test]
fn idle_cooldowns_rest_at_zero() {
    let mut cd = SkillCooldowns::default();
    cd.start(Skill::Basic, 0.8);
    for _ in 0..10_000 {
        cd.tick(1.0e6);
    }
    assert_eq!(cd, SkillCooldowns::default());
    assert_eq!(cd.remaining(), [0.0; 5]);

    cd.start(Skill::Basic, 0.8);
    cd.tick(0.25);
    assert!(!cd.is_ready(Skill::Basic));
    assert!((cd.remaining()[Skill::Basic.index()] - 0.55).abs() < 1e-6);
}

#[test]
fn ultimate_needs_a_full_gauge() {
    let mut world = world();
    let (player, boss) = spawn_fighters(&mut world);

    press(&mut world, Skill::Ultimate);
    assert!(damage(&mut world).is_empty());
    // A refused ultimate does not start its cooldown.
    assert!(world.get::<SkillCooldowns>(player).unwrap().is_ready(Skill::Ultimate));

    world.get_mut::<Gauge>(player).unwrap().value = 100;
    press(&mut world, Skill::Ultimate);

    let reqs = damage(&mut world);
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].target, boss);
    assert_eq!(reqs[0].amount, 40);
    assert_eq!(world.get::<Gauge>(player).unwrap().value, 0);
}

#[test]
fn heal_goes_through_the_resolver() {
    let mut world = world();
    let (player, _) = spawn_fighters(&mut world);

    press(&mut world, Skill::Heal);

    let heals: Vec<_> = world
        .resource_mut::<Messages<HealRequest>>()
        .drain()
        .collect();
    assert_eq!(
        heals,
        vec![HealRequest {
            target: player,
            amount: 20
        }]
    );
}

#[test]
fn defensive_skills_open_windows() {
    let mut world = world();
    let (player, _) = spawn_fighters(&mut world);

    press(&mut world, Skill::Defense);
    press(&mut world, Skill::Avoid);

    let mut subs = world.get::<SubStates>(player).unwrap().clone();
    assert!(subs.is_pending(SubStateKind::Defense));
    assert!(subs.is_pending(SubStateKind::Invincibility));
    subs.advance(0.25);
    let guard = subs.guard();
    assert!(guard.defending && guard.avoiding);
}

#[test]
fn dead_player_cannot_act() {
    let mut world = world();
    let (player, _) = spawn_fighters(&mut world);
    world.get_mut::<Health>(player).unwrap().dead = true;

    press(&mut world, Skill::Basic);
    assert!(damage(&mut world).is_empty());
}

#[test]
fn basic_without_boss_is_a_no_op() {
    let mut world = world();
    let (player, _) = spawn_fighters(&mut world);
    world.resource_mut::<EntityRegistry>().boss = None;

    press(&mut world, Skill::Basic);
    assert!(damage(&mut world).is_empty());
    assert_eq!(world.get::<Gauge>(player).unwrap().value, 0);
}

#[test]
fn gestures_fire_on_rising_edge_only() {
    let mut world = world();
    // A registered system keeps its `Local` between runs.
    let id = world.register_system(input::read_gestures);

    world.resource_mut::<GestureFlags>().set(Skill::Avoid, true);
    world.run_system(id).unwrap();
    world.run_system(id).unwrap();
    world.resource_mut::<GestureFlags>().set(Skill::Avoid, false);
    world.run_system(id).unwrap();
    world.resource_mut::<GestureFlags>().set(Skill::Avoid, true);
    world.run_system(id).unwrap();

    let presses: Vec<_> = world
        .resource_mut::<Messages<SkillPressed>>()
        .drain()
        .collect();
    assert_eq!(presses.len(), 2);
    assert!(presses.iter().all(|p| p.skill == Skill::Avoid && p.source == InputSource::Gesture));
}

#[test]
fn pose_moves_the_player() {
    let mut world = world();
    world.init_resource::<Messages<PlayerPose>>();
    let (player, _) = spawn_fighters(&mut world);
    world.entity_mut(player).insert(Transform::IDENTITY);

    world.write_message(PlayerPose {
        translation: Vec3::new(1.0, 1.5, 2.0),
        rotation: Quat::from_rotation_y(0.5),
    });
    run_system_once(&mut world, input::apply_pose);

    let tf = world.get::<Transform>(player).unwrap();
    assert_eq!(tf.translation, Vec3::new(1.0, 1.5, 2.0));
}

#[test]
fn spawn_faces_the_boss_spawn_point() {
    let mut world = world();
    world.insert_resource(ArenaAnchor(Vec3::ZERO));
    world.insert_resource(PhaseDirector {
        spawn_point: Vec3::ZERO,
        active: None,
    });

    run_system_once(&mut world, spawn);

    let (tf, health) = world
        .query_filtered::<(&Transform, &Health), With<Player>>()
        .single(&world)
        .unwrap();
    assert_eq!(tf.translation, Vec3::new(0.0, 0.0, 4.0));
    assert!(tf.forward().z < -0.99);
    assert_eq!(health.hp, 100);
}
