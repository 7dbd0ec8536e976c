use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;
use crate::plugins::machine::StateMachine;

#[test]
fn bearing_is_signed_by_side() {
    let eye = Transform::IDENTITY;
    assert!(bearing_degrees(&eye, Vec3::new(0.0, 0.0, -3.0)).unwrap().abs() < 1e-3);

    let left = bearing_degrees(&eye, Vec3::new(-2.0, 0.0, 0.0)).unwrap();
    assert!((left - 90.0).abs() < 1e-3);

    let right = bearing_degrees(&eye, Vec3::new(2.0, 5.0, 0.0)).unwrap();
    assert!((right + 90.0).abs() < 1e-3);
}

#[test]
fn bearing_is_none_when_on_top() {
    let eye = Transform::from_xyz(1.0, 0.0, 1.0);
    assert_eq!(bearing_degrees(&eye, Vec3::new(1.0, 3.0, 1.0)), None);
}

#[test]
fn hud_reflects_registry() {
    let mut world = World::new();
    world.init_resource::<HudSnapshot>();

    let player = world
        .spawn((
            Player,
            Transform::IDENTITY,
            Health::new(80),
            Gauge { value: 30, limit: 100 },
            SkillCooldowns::default(),
        ))
        .id();
    let boss = world
        .spawn((
            Boss {
                phase: BossPhase::Phase2,
            },
            Transform::from_xyz(0.0, 0.0, -4.0),
            Health::new(150),
            StateMachine::new(BossState::Walk),
        ))
        .id();
    world.insert_resource(EntityRegistry {
        player: Some(player),
        boss: Some(boss),
    });

    run_system_once(&mut world, update_hud);

    let hud = world.resource::<HudSnapshot>().clone();
    assert_eq!(hud.player_hp, 80);
    assert_eq!(hud.gauge, 30);
    assert_eq!(hud.boss_hp, 150);
    assert_eq!(hud.boss_phase, Some(BossPhase::Phase2));
    assert_eq!(hud.boss_state, Some(BossState::Walk));
    assert!(hud.boss_bearing.unwrap().abs() < 1e-3);

    world.resource_mut::<EntityRegistry>().boss = None;
    run_system_once(&mut world, update_hud);
    let hud = world.resource::<HudSnapshot>();
    assert_eq!(hud.boss_bearing, None);
    assert_eq!(hud.boss_phase, None);
}

#[test]
fn outbox_flushes_in_order() {
    let mut world = World::new();
    world.init_resource::<Messages<AnimationSignal>>();
    world.init_resource::<Messages<AudioCue>>();
    let e = world.spawn_empty().id();

    run_system_once(
        &mut world,
        move |mut anim: MessageWriter<AnimationSignal>, mut audio: MessageWriter<AudioCue>| {
            let mut out = Outbox::default();
            out.anim(e, AnimSignal::Walk, true);
            out.anim(e, AnimSignal::Attack, true);
            out.cue(Cue::AttackStart, e);
            out.flush(&mut anim, &mut audio);
            assert!(out.anim.is_empty());
        },
    );

    let signals: Vec<_> = world
        .resource_mut::<Messages<AnimationSignal>>()
        .drain()
        .map(|s| s.signal)
        .collect();
    assert_eq!(signals, vec![AnimSignal::Walk, AnimSignal::Attack]);
    assert_eq!(world.resource::<Messages<AudioCue>>().len(), 1);
}
