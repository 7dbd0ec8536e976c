use bevy::prelude::*;

use super::{AnimatorParams, AttackSelection, BossState};
use crate::plugins::feedback::{AnimSignal, Cue, Outbox};
use crate::plugins::machine::{StateHooks, SubStateKind, SubStates};

/// Enter/exit side effects for the boss, borrowing its sibling components.
pub struct BossHooks<'a> {
    pub entity: Entity,
    pub subs: &'a mut SubStates,
    pub selection: &'a mut AttackSelection,
    pub anim: &'a mut AnimatorParams,
    pub outbox: &'a mut Outbox,
}

impl<'a> BossHooks<'a> {
    pub fn new(
        entity: Entity,
        subs: &'a mut SubStates,
        selection: &'a mut AttackSelection,
        anim: &'a mut AnimatorParams,
        outbox: &'a mut Outbox,
    ) -> Self {
        Self {
            entity,
            subs,
            selection,
            anim,
            outbox,
        }
    }

    fn drop_plans(&mut self) {
        self.subs.cancel_all();
        self.selection.clear();
    }
}

/// Arm the recovery window after an attack. Always forgets the selection.
pub fn arm_post_attack(subs: &mut SubStates, selection: &mut AttackSelection, duration: f32) {
    subs.set(SubStateKind::PostAttackDelay, duration);
    selection.clear();
}

impl StateHooks<BossState> for BossHooks<'_> {
    fn exit(&mut self, state: BossState) {
        match state {
            BossState::Idle => {
                self.anim.idle = false;
                self.outbox.anim(self.entity, AnimSignal::Idle, false);
            }
            BossState::Walk => {
                self.anim.walk = false;
                self.outbox.anim(self.entity, AnimSignal::Walk, false);
            }
            _ => {}
        }
    }

    fn enter(&mut self, state: BossState) {
        let e = self.entity;
        match state {
            BossState::Idle => {
                self.anim.idle = true;
                self.outbox.anim(e, AnimSignal::Idle, true);
            }
            BossState::Walk => {
                self.anim.walk = true;
                self.outbox.anim(e, AnimSignal::Walk, true);
            }
            BossState::Attack(kind) => {
                self.selection.kind = Some(kind);
                self.selection.initiated = true;
                self.selection.struck = false;
                self.anim.attack = true;
                self.outbox.anim(e, AnimSignal::Attack, true);
                self.outbox.cue(Cue::AttackStart, e);
            }
            BossState::Stun { .. } => {
                self.drop_plans();
                self.anim.damage = true;
                self.outbox.anim(e, AnimSignal::Damage, true);
            }
            BossState::Teleport => {
                self.drop_plans();
                self.outbox.cue(Cue::Teleport, e);
            }
            BossState::Death => {
                self.drop_plans();
                self.anim.death = true;
                self.outbox.anim(e, AnimSignal::Death, true);
                self.outbox.cue(Cue::Death, e);
            }
        }
    }

    fn reset_triggers(&mut self) {
        self.anim.attack = false;
        self.anim.damage = false;
    }
}
