use bevy::prelude::*;

use super::{DamageOutcome, DamageRequest, HealRequest, scale_damage};
use crate::common::tunables::Tunables;
use crate::plugins::boss::{AnimatorParams, AttackSelection, Boss, BossHooks, BossPhase, BossState};
use crate::plugins::combat::Health;
use crate::plugins::core::PendingDespawn;
use crate::plugins::feedback::{AnimationSignal, AudioCue, Cue, Outbox};
use crate::plugins::machine::{StateMachine, SubStates};
use crate::plugins::phases::{Deferred, DeferredAction, FightOutcome};
use crate::plugins::player::Player;

/// Apply damage aimed at the boss.
///
/// Hits while idle or walking preempt into Stun. The killing hit schedules the
/// phase follow-up and forces Death.
pub fn resolve_boss_damage(
    tunables: Res<Tunables>,
    mut requests: MessageReader<DamageRequest>,
    mut deferred: ResMut<Deferred>,
    mut q_boss: Query<
        (
            &Boss,
            &mut Health,
            &mut StateMachine<BossState>,
            &mut SubStates,
            &mut AttackSelection,
            &mut AnimatorParams,
        ),
        Without<PendingDespawn>,
    >,
    mut anim_out: MessageWriter<AnimationSignal>,
    mut audio_out: MessageWriter<AudioCue>,
) {
    let mut outbox = Outbox::default();

    for req in requests.read() {
        let Ok((boss, mut health, mut machine, mut subs, mut selection, mut anim)) =
            q_boss.get_mut(req.target)
        else {
            continue;
        };
        let tuning = tunables.phase(boss.phase);
        let amount = scale_damage(req.amount, tuning.damage_taken_multiplier);

        match health.take_damage(amount, subs.guard()) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Absorbed => outbox.cue(Cue::Blocked, req.target),
            DamageOutcome::Hurt => {
                outbox.cue(Cue::Hit, req.target);
                let Some(resume) = machine.current().stun_resume() else {
                    continue;
                };
                let mut hooks =
                    BossHooks::new(req.target, &mut subs, &mut selection, &mut anim, &mut outbox);
                machine.change_state(BossState::Stun { resume }, &mut hooks);
            }
            DamageOutcome::Killed => {
                let follow_up = match boss.phase {
                    BossPhase::Phase1 => DeferredAction::TransitionToPhase2,
                    BossPhase::Phase2 => DeferredAction::EndFight(FightOutcome::Victory),
                };
                info!(
                    "Boss {:?} defeated; {:?} in {:.1}s",
                    boss.phase, follow_up, tuning.transition_delay
                );
                deferred.schedule(tuning.transition_delay, follow_up);

                let mut hooks =
                    BossHooks::new(req.target, &mut subs, &mut selection, &mut anim, &mut outbox);
                machine.change_state(BossState::Death, &mut hooks);
            }
        }
    }

    outbox.flush(&mut anim_out, &mut audio_out);
}

/// Apply damage and heals aimed at the player.
pub fn resolve_player_damage(
    tunables: Res<Tunables>,
    mut damage: MessageReader<DamageRequest>,
    mut heals: MessageReader<HealRequest>,
    mut deferred: ResMut<Deferred>,
    mut q_player: Query<(&mut Health, &SubStates), With<Player>>,
    mut audio_out: MessageWriter<AudioCue>,
) {
    for req in damage.read() {
        let Ok((mut health, subs)) = q_player.get_mut(req.target) else {
            continue;
        };
        match health.take_damage(req.amount, subs.guard()) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Absorbed => {
                audio_out.write(AudioCue {
                    cue: Cue::Blocked,
                    entity: Some(req.target),
                });
            }
            DamageOutcome::Hurt => {
                audio_out.write(AudioCue {
                    cue: Cue::Hit,
                    entity: Some(req.target),
                });
            }
            DamageOutcome::Killed => {
                info!("Player down");
                deferred.schedule(
                    tunables.arena.defeat_fade,
                    DeferredAction::EndFight(FightOutcome::Defeat),
                );
            }
        }
    }

    for req in heals.read() {
        let Ok((mut health, _)) = q_player.get_mut(req.target) else {
            continue;
        };
        if health.heal(req.amount) > 0 {
            audio_out.write(AudioCue {
                cue: Cue::Heal,
                entity: Some(req.target),
            });
        }
    }
}
