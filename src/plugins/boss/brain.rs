//! Per-tick boss AI.
//!
//! One dispatcher per boss: match on the current state, run that state's
//! update, and apply at most one transition through [`BossHooks`]. Timers armed
//! here first read as active on the next tick, after `FightSet::Advance`.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{
    AnimatorParams, AttackKind, AttackSelection, Boss, BossHooks, BossPhase, BossState,
    TargetEntity, arm_post_attack, roll_attack,
};
use crate::common::tunables::{AttackRollTable, PhaseTuning, Tunables};
use crate::plugins::combat::DamageRequest;
use crate::plugins::core::{ArenaRng, EntityRegistry, PendingDespawn};
use crate::plugins::feedback::{AnimationSignal, AudioCue, Cue, Outbox};
use crate::plugins::machine::{StateMachine, SubStateKind, SubStates};
use crate::plugins::player::Player;
use crate::plugins::projectiles::{ProjectileKind, SpawnProjectileRequest};

/// Height above the boss origin that shots leave from.
const MUZZLE_HEIGHT: f32 = 1.0;
/// Lateral spacing between minions released together.
const MINION_SPACING: f32 = 0.6;

/// Where the target is relative to the boss, on the horizontal plane.
#[derive(Clone, Copy, Debug)]
struct Sight {
    entity: Entity,
    position: Vec3,
    distance: f32,
    /// Unsigned angle off the boss's forward, in degrees.
    angle: f32,
    /// Flattened unit direction to the target, zero when on top of it.
    direction: Vec3,
}

impl Sight {
    fn new(from: &Transform, entity: Entity, position: Vec3) -> Self {
        let flat = (position - from.translation).with_y(0.0);
        let distance = flat.length();
        let direction = flat.normalize_or_zero();
        let forward = from.forward().as_vec3().with_y(0.0);
        let angle = if direction == Vec3::ZERO || forward.length_squared() < 1e-6 {
            0.0
        } else {
            forward.angle_between(direction).to_degrees()
        };
        Self {
            entity,
            position,
            distance,
            angle,
            direction,
        }
    }

    #[inline]
    fn within(&self, distance: f32, degrees: f32) -> bool {
        self.distance <= distance && self.angle <= degrees
    }
}

#[derive(SystemParam)]
pub struct BossOutput<'w> {
    anim: MessageWriter<'w, AnimationSignal>,
    audio: MessageWriter<'w, AudioCue>,
    damage: MessageWriter<'w, DamageRequest>,
    spawn: MessageWriter<'w, SpawnProjectileRequest>,
}

type BossQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Boss,
        &'static mut Transform,
        &'static mut StateMachine<BossState>,
        &'static mut SubStates,
        &'static mut AttackSelection,
        &'static mut AnimatorParams,
        &'static mut TargetEntity,
    ),
    (Without<Player>, Without<PendingDespawn>),
>;

pub fn update_bosses(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    registry: Res<EntityRegistry>,
    mut rng: ResMut<ArenaRng>,
    mut q_boss: BossQuery,
    q_targets: Query<&Transform, (With<Player>, Without<Boss>)>,
    mut out: BossOutput,
) {
    let dt = time.delta_secs();
    let mut outbox = Outbox::default();

    for (entity, boss, mut tf, mut machine, mut subs, mut selection, mut anim, mut target) in
        &mut q_boss
    {
        let tuning = tunables.phase(boss.phase);

        if target.0.is_none_or(|e| !q_targets.contains(e)) {
            target.0 = registry.player.filter(|e| q_targets.contains(*e));
        }
        let sight = target
            .0
            .and_then(|e| q_targets.get(e).ok().map(|t| Sight::new(&tf, e, t.translation)));

        let t = machine.time_in_state();
        let next = match machine.current() {
            BossState::Idle => idle(
                &mut tf,
                &mut subs,
                &selection,
                boss.phase,
                sight,
                tuning,
                t,
                dt,
            ),
            BossState::Walk => walk(
                &mut tf,
                boss.phase,
                &mut subs,
                &mut selection,
                sight,
                tuning,
                &tunables.attack_roll,
                &mut rng,
                dt,
            ),
            BossState::Attack(kind) => {
                let attack = tuning.attack(kind);
                if !selection.struck && t >= attack.strike_at {
                    selection.struck = true;
                    strike(entity, kind, &tf, sight, tuning, &mut out, &mut outbox);
                }
                if t >= attack.duration {
                    arm_post_attack(&mut subs, &mut selection, tuning.post_attack_delay);
                    Some(BossState::Idle)
                } else {
                    None
                }
            }
            BossState::Stun { resume } => (t >= tuning.stun_duration).then_some(resume.into()),
            BossState::Teleport => {
                teleport(&mut tf, &mut subs, &mut selection, sight, tuning);
                Some(BossState::Idle)
            }
            BossState::Death => {
                if boss.phase == BossPhase::Phase2 && t >= tuning.death_duration {
                    commands.entity(entity).insert(PendingDespawn);
                }
                None
            }
        };

        if let Some(next) = next {
            let mut hooks = BossHooks::new(entity, &mut subs, &mut selection, &mut anim, &mut outbox);
            if machine.change_state(next, &mut hooks) {
                debug!("Boss {:?}: {:?} -> {:?}", entity, machine.previous(), next);
            }
        }
    }

    outbox.flush(&mut out.anim, &mut out.audio);
}

#[allow(clippy::too_many_arguments)]
fn idle(
    tf: &mut Transform,
    subs: &mut SubStates,
    selection: &AttackSelection,
    phase: BossPhase,
    sight: Option<Sight>,
    tuning: &PhaseTuning,
    t: f32,
    dt: f32,
) -> Option<BossState> {
    use SubStateKind::{PostAttackDelay, PreAttackDelay};

    if subs.is_pending(PreAttackDelay) || subs.has_elapsed(PreAttackDelay) {
        let (Some(kind), Some(sight)) = (selection.kind, sight) else {
            subs.clear(PreAttackDelay);
            return None;
        };
        let range = tuning.attack(kind).distance;

        if sight.distance > range * tuning.abort_distance_factor
            || sight.angle > tuning.windup_tolerance_degrees
        {
            subs.clear(PreAttackDelay);
            return Some(BossState::Walk);
        }

        if subs.has_elapsed(PreAttackDelay) {
            if sight.within(range, tuning.attack_arc_degrees) {
                subs.clear(PreAttackDelay);
                return Some(begin_attack(phase, kind, sight, tuning));
            }
            if sight.distance > range {
                // Keep the selection; Walk closes the gap and re-arms.
                subs.clear(PreAttackDelay);
                return Some(BossState::Walk);
            }
        }

        turn_towards(tf, sight.direction, tuning.turn_speed * dt);
        return None;
    }

    if subs.is_pending(PostAttackDelay) {
        return None;
    }
    if subs.has_elapsed(PostAttackDelay) {
        subs.clear(PostAttackDelay);
        return Some(BossState::Walk);
    }

    (t >= tuning.idle_duration && sight.is_some()).then_some(BossState::Walk)
}

#[allow(clippy::too_many_arguments)]
fn walk(
    tf: &mut Transform,
    phase: BossPhase,
    subs: &mut SubStates,
    selection: &mut AttackSelection,
    sight: Option<Sight>,
    tuning: &PhaseTuning,
    table: &AttackRollTable,
    rng: &mut ArenaRng,
    dt: f32,
) -> Option<BossState> {
    let Some(sight) = sight else {
        return Some(BossState::Idle);
    };

    let kind = *selection
        .kind
        .get_or_insert_with(|| roll_attack(&mut rng.0, table));
    let range = tuning.attack(kind).distance;

    if sight.within(range, tuning.attack_arc_degrees) {
        if tuning.pre_attack_delay <= 0.0 {
            return Some(begin_attack(phase, kind, sight, tuning));
        }
        subs.set(SubStateKind::PreAttackDelay, tuning.pre_attack_delay);
        return Some(BossState::Idle);
    }

    turn_towards(tf, sight.direction, tuning.turn_speed * dt);
    if sight.distance > range {
        // Aim slightly inside the range so float error cannot stall the approach.
        let step = (tuning.walk_speed * dt).min(sight.distance - range * 0.95);
        tf.translation += sight.direction * step;
    }
    None
}

/// The state an attack starts in: Phase2 closes a far gap with a Teleport
/// instead of attacking.
fn begin_attack(
    phase: BossPhase,
    kind: AttackKind,
    sight: Sight,
    tuning: &PhaseTuning,
) -> BossState {
    match (phase, &tuning.teleport) {
        (BossPhase::Phase2, Some(teleport)) if sight.distance > teleport.trigger_distance => {
            BossState::Teleport
        }
        _ => BossState::Attack(kind),
    }
}

fn teleport(
    tf: &mut Transform,
    subs: &mut SubStates,
    selection: &mut AttackSelection,
    sight: Option<Sight>,
    tuning: &PhaseTuning,
) {
    selection.clear();
    let Some(teleport) = &tuning.teleport else {
        return;
    };
    if let Some(sight) = sight {
        let away = (tf.translation - sight.position)
            .with_y(0.0)
            .normalize_or(Vec3::Z);
        tf.translation = sight.position.with_y(tf.translation.y) + away * teleport.offset;
        let toward = -away;
        tf.look_to(toward, Vec3::Y);
    }
    subs.set(SubStateKind::Invincibility, teleport.grace);
}

fn strike(
    entity: Entity,
    kind: AttackKind,
    tf: &Transform,
    sight: Option<Sight>,
    tuning: &PhaseTuning,
    out: &mut BossOutput,
    outbox: &mut Outbox,
) {
    let attack = tuning.attack(kind);
    outbox.cue(Cue::Strike, entity);

    match kind {
        AttackKind::Melee => {
            let Some(sight) = sight else {
                return;
            };
            if sight.within(attack.distance, tuning.attack_arc_degrees) {
                out.damage.write(DamageRequest {
                    target: sight.entity,
                    amount: attack.damage,
                    source: Some(entity),
                });
            }
        }
        AttackKind::Ranged => {
            let forward = tf.forward().as_vec3();
            let muzzle = tf.translation + Vec3::Y * MUZZLE_HEIGHT + forward * 0.5;
            let shot = &tuning.projectile;

            if shot.homing {
                let right = tf.right().as_vec3();
                let half = (shot.count as f32 - 1.0) * 0.5;
                for i in 0..shot.count {
                    let lateral = (i as f32 - half) * MINION_SPACING;
                    out.spawn.write(SpawnProjectileRequest {
                        kind: ProjectileKind::Minion,
                        origin: muzzle + right * lateral,
                        direction: forward,
                        target: sight.map(|s| s.entity),
                        damage: attack.damage,
                        speed: shot.speed,
                        lifetime: shot.lifetime,
                        max_distance: shot.max_distance,
                        emerge: shot.emerge,
                        spawn_effect: shot.spawn_effect,
                        owner: Some(entity),
                    });
                }
            } else {
                let aim = sight.map_or(muzzle + forward, |s| s.position);
                out.spawn.write(SpawnProjectileRequest {
                    kind: ProjectileKind::Bolt,
                    origin: muzzle,
                    direction: (aim - muzzle).normalize_or(forward),
                    target: sight.map(|s| s.entity),
                    damage: attack.damage,
                    speed: shot.speed,
                    lifetime: shot.lifetime,
                    max_distance: shot.max_distance,
                    emerge: 0.0,
                    spawn_effect: shot.spawn_effect,
                    owner: Some(entity),
                });
            }
        }
    }
}

/// Yaw towards `direction`, at most `max_angle` radians this tick.
fn turn_towards(tf: &mut Transform, direction: Vec3, max_angle: f32) {
    if direction == Vec3::ZERO {
        return;
    }
    let desired = Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation;
    tf.rotation = tf.rotation.rotate_towards(desired, max_angle);
}
