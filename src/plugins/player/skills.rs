use bevy::prelude::*;

use super::{Gauge, Player, SkillCooldowns, SkillPressed};
use crate::common::tunables::Tunables;
use crate::plugins::combat::{DamageRequest, Health, HealRequest};
use crate::plugins::core::EntityRegistry;
use crate::plugins::feedback::{AudioCue, Cue};
use crate::plugins::machine::{SubStateKind, SubStates};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Skill {
    Basic,
    Ultimate,
    Heal,
    Defense,
    Avoid,
}

impl Skill {
    pub const ALL: [Skill; 5] = [
        Skill::Basic,
        Skill::Ultimate,
        Skill::Heal,
        Skill::Defense,
        Skill::Avoid,
    ];

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Skill::Basic => 0,
            Skill::Ultimate => 1,
            Skill::Heal => 2,
            Skill::Defense => 3,
            Skill::Avoid => 4,
        }
    }
}

/// Skill controller: cooldown gate, then act.
///
/// Offensive skills become damage requests against the registered boss;
/// defensive ones open sub-state windows on the player.
pub fn run_skills(
    tunables: Res<Tunables>,
    registry: Res<EntityRegistry>,
    mut pressed: MessageReader<SkillPressed>,
    mut q_player: Query<
        (Entity, &Health, &mut Gauge, &mut SkillCooldowns, &mut SubStates),
        With<Player>,
    >,
    mut damage: MessageWriter<DamageRequest>,
    mut heal: MessageWriter<HealRequest>,
    mut audio: MessageWriter<AudioCue>,
) {
    let Ok((player, health, mut gauge, mut cooldowns, mut subs)) = q_player.single_mut() else {
        pressed.clear();
        return;
    };
    let s = &tunables.skills;

    for press in pressed.read() {
        let skill = press.skill;
        if health.is_dead() {
            continue;
        }
        if !cooldowns.is_ready(skill) {
            debug!("{:?} still cooling down", skill);
            continue;
        }

        match skill {
            Skill::Basic | Skill::Ultimate => {
                let Some(boss) = registry.boss else {
                    debug!("{:?} with no boss to hit", skill);
                    continue;
                };
                if skill == Skill::Ultimate {
                    if !gauge.is_full() {
                        debug!("Ultimate needs a full gauge ({}/{})", gauge.value, gauge.limit);
                        continue;
                    }
                    gauge.reset();
                    audio.write(AudioCue {
                        cue: Cue::Ultimate,
                        entity: Some(player),
                    });
                    damage.write(DamageRequest {
                        target: boss,
                        amount: s.ultimate_damage,
                        source: Some(player),
                    });
                    cooldowns.start(skill, s.ultimate_cooldown);
                } else {
                    gauge.add(s.basic_gauge_gain);
                    damage.write(DamageRequest {
                        target: boss,
                        amount: s.basic_damage,
                        source: Some(player),
                    });
                    cooldowns.start(skill, s.basic_cooldown);
                }
            }
            Skill::Heal => {
                heal.write(HealRequest {
                    target: player,
                    amount: s.heal_amount,
                });
                cooldowns.start(skill, s.heal_cooldown);
            }
            Skill::Defense => {
                subs.set(SubStateKind::Defense, s.defense_window);
                cooldowns.start(skill, s.defense_cooldown);
            }
            Skill::Avoid => {
                subs.set(SubStateKind::Invincibility, s.avoid_window);
                cooldowns.start(skill, s.avoid_cooldown);
            }
        }
    }
}
