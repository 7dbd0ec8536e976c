mod common;

use bevy::prelude::*;

use boss_arena::common::state::GameState;
use boss_arena::common::tunables::{AttackRollTable, Tunables};
use boss_arena::plugins::boss::{AttackKind, BossPhase, BossState, ResumeState};
use boss_arena::plugins::combat::{DamageRequest, Health};
use boss_arena::plugins::machine::{StateMachine, SubStateKind, SubStates};
use boss_arena::plugins::player::{InputSource, Skill, SkillPressed};
use boss_arena::plugins::projectiles::{
    ImpactEffect, Projectile, ProjectileKind, SpawnProjectileRequest,
};

/// Tunables where every roll picks melee, with the player `distance` in front
/// of the boss.
fn melee_duel(distance: f32) -> Tunables {
    let mut t = Tunables::default();
    t.attack_roll = AttackRollTable {
        melee_max: 100,
        ranged_min: 101,
    };
    t.arena.player_offset = [0.0, 0.0, distance];
    t
}

fn only_boss(app: &mut App) -> Entity {
    let bosses = common::bosses(app);
    assert_eq!(bosses.len(), 1, "expected exactly one boss");
    bosses[0].0
}

fn player_hp(app: &App) -> i32 {
    let player = common::registry(app).player.expect("player registered");
    app.world().get::<Health>(player).expect("player health").hp
}

fn hurt(app: &mut App, target: Entity, amount: i32) {
    common::send(
        app,
        DamageRequest {
            target,
            amount,
            source: None,
        },
    );
}

#[test]
fn melee_cycle_runs_windup_attack_and_recovery() {
    let mut app = common::app_with(melee_duel(1.5));
    common::enter_fight(&mut app);
    let boss = only_boss(&mut app);

    let mut seen: Vec<BossState> = Vec::new();
    let mut longest_attack = 0.0_f32;
    let mut attack_ticks = 0;
    let mut hp_after_attack = None;

    for _ in 0..40 {
        common::ticks(&mut app, 1);
        let machine = app.world().get::<StateMachine<BossState>>(boss).unwrap();
        let state = machine.current();
        if let BossState::Attack(_) = state {
            longest_attack = longest_attack.max(machine.time_in_state());
            if hp_after_attack.is_none() {
                attack_ticks += 1;
            }
        }
        if seen.last() != Some(&state) {
            if matches!(seen.last(), Some(BossState::Attack(_))) && hp_after_attack.is_none() {
                hp_after_attack = Some(player_hp(&app));
                let subs = app.world().get::<SubStates>(boss).unwrap();
                assert!(subs.is_pending(SubStateKind::PostAttackDelay));
            }
            seen.push(state);
        }
    }

    assert_eq!(
        &seen[..5],
        &[
            BossState::Idle,
            BossState::Walk,
            BossState::Idle,
            BossState::Attack(AttackKind::Melee),
            BossState::Idle,
        ]
    );
    assert!((longest_attack - 2.0).abs() < 1e-4, "attack lasted {longest_attack}");
    // 2.0 s at 0.25 s per tick.
    assert_eq!(attack_ticks, 8);
    assert_eq!(hp_after_attack, Some(90));
}

#[test]
fn hit_while_walking_stuns_then_resumes_walk() {
    let mut app = common::app_with(melee_duel(5.0));
    common::enter_fight(&mut app);
    let boss = only_boss(&mut app);

    let mut guard = 0;
    while common::boss_state(&app, boss) != BossState::Walk {
        common::ticks(&mut app, 1);
        guard += 1;
        assert!(guard < 20, "boss never started walking");
    }

    common::send(
        &mut app,
        SkillPressed {
            skill: Skill::Basic,
            source: InputSource::Keyboard,
        },
    );
    common::ticks(&mut app, 1);
    assert_eq!(
        common::boss_state(&app, boss),
        BossState::Stun {
            resume: ResumeState::Walk
        }
    );
    assert_eq!(app.world().get::<Health>(boss).unwrap().hp, 95);

    // 0.6s of stun, the hit tick included.
    common::ticks(&mut app, 2);
    assert!(matches!(common::boss_state(&app, boss), BossState::Stun { .. }));
    common::ticks(&mut app, 1);
    assert_eq!(common::boss_state(&app, boss), BossState::Walk);
}

#[test]
fn phase1_death_swaps_in_exactly_one_phase2_boss() {
    let mut app = common::app_headless();
    common::enter_fight(&mut app);
    common::ticks(&mut app, 1);
    let phase1 = only_boss(&mut app);

    hurt(&mut app, phase1, 1_000);
    common::ticks(&mut app, 1);
    assert_eq!(common::boss_state(&app, phase1), BossState::Death);

    // 3.0s of delay, the kill tick included.
    for _ in 0..10 {
        common::ticks(&mut app, 1);
        let bosses = common::bosses(&mut app);
        assert_eq!(bosses.len(), 1);
        assert_eq!(bosses[0].0, phase1);
    }
    common::ticks(&mut app, 1);
    let bosses = common::bosses(&mut app);
    assert_eq!(bosses.len(), 1);
    assert_eq!(bosses[0].1.phase, BossPhase::Phase2);
    let phase2 = bosses[0].0;
    assert_ne!(phase2, phase1);
    assert_eq!(common::boss_state(&app, phase2), BossState::Idle);

    common::ticks(&mut app, 1);
    assert_eq!(common::registry(&app).boss, Some(phase2));
    assert_eq!(app.world().get::<Health>(phase2).unwrap().hp, 150);
}

#[test]
fn phase2_death_ends_in_victory() {
    let mut app = common::app_headless();
    common::enter_fight(&mut app);
    common::ticks(&mut app, 1);

    hurt(&mut app, only_boss(&mut app), 1_000);
    common::ticks(&mut app, 12);
    let phase2 = only_boss(&mut app);

    hurt(&mut app, phase2, 1_000);
    common::ticks(&mut app, 1);
    assert_eq!(common::boss_state(&app, phase2), BossState::Death);

    // 3.5s until the fight ends; the body is removed after 3.0s of Death.
    common::ticks(&mut app, 12);
    app.update();
    assert_eq!(common::game_state(&app), GameState::InGame);

    common::ticks(&mut app, 1);
    app.update();
    assert_eq!(common::game_state(&app), GameState::Victory);
    assert!(common::bosses(&mut app).is_empty());
    assert!(common::registry(&app).player.is_none());
}

#[test]
fn player_death_ends_in_defeat() {
    let mut app = common::app_headless();
    common::enter_fight(&mut app);
    common::ticks(&mut app, 1);
    let player = common::registry(&app).player.unwrap();

    hurt(&mut app, player, 1_000);
    // 1.5s fade, the kill tick included.
    common::ticks(&mut app, 5);
    app.update();
    assert_eq!(common::game_state(&app), GameState::InGame);

    common::ticks(&mut app, 1);
    app.update();
    assert_eq!(common::game_state(&app), GameState::Defeat);
    assert!(common::bosses(&mut app).is_empty());
}

#[test]
fn bolt_hits_player_once_and_is_removed() {
    use avian3d::prelude::CollisionStart;

    let mut app = common::app_headless();
    common::enter_fight(&mut app);
    common::ticks(&mut app, 1);
    let player = common::registry(&app).player.unwrap();
    let boss = only_boss(&mut app);

    common::send(
        &mut app,
        SpawnProjectileRequest {
            kind: ProjectileKind::Bolt,
            origin: Vec3::new(0.0, 1.0, 0.5),
            direction: Vec3::Z,
            target: Some(player),
            damage: 8,
            speed: 3.0,
            lifetime: 4.0,
            max_distance: 20.0,
            emerge: 0.0,
            spawn_effect: true,
            owner: Some(boss),
        },
    );
    common::ticks(&mut app, 1);
    let bolt = app
        .world_mut()
        .query_filtered::<Entity, With<Projectile>>()
        .single(app.world())
        .expect("one bolt in flight");
    assert_eq!(app.world().get::<Projectile>(bolt).unwrap().damage, 8);

    for _ in 0..2 {
        common::send(
            &mut app,
            CollisionStart {
                collider1: bolt,
                collider2: player,
                body1: Some(bolt),
                body2: Some(player),
            },
        );
    }
    common::ticks(&mut app, 1);

    assert_eq!(player_hp(&app), 92);
    assert!(app.world().get_entity(bolt).is_err());
    let impacts = common::drain::<ImpactEffect>(&mut app);
    assert_eq!(impacts.len(), 1);
    assert!(impacts[0].hit_player);
}
