use bevy::prelude::*;

use crate::common::state::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FightOutcome {
    Victory,
    Defeat,
}

impl From<FightOutcome> for GameState {
    fn from(o: FightOutcome) -> Self {
        match o {
            FightOutcome::Victory => GameState::Victory,
            FightOutcome::Defeat => GameState::Defeat,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    TransitionToPhase2,
    EndFight(FightOutcome),
}

/// One-shot actions waiting on game time.
#[derive(Resource, Debug, Default)]
pub struct Deferred {
    pending: Vec<(f32, DeferredAction)>,
}

impl Deferred {
    pub fn schedule(&mut self, delay: f32, action: DeferredAction) {
        let delay = if delay.is_nan() { 0.0 } else { delay.max(0.0) };
        self.pending.push((delay, action));
    }

    /// Count down by `dt` and return everything now due, in scheduling order.
    pub fn tick(&mut self, dt: f32) -> Vec<DeferredAction> {
        let mut due = Vec::new();
        self.pending.retain_mut(|(remaining, action)| {
            *remaining -= dt;
            if *remaining <= 0.0 {
                due.push(*action);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn contains(&self, action: DeferredAction) -> bool {
        self.pending.iter().any(|(_, a)| *a == action)
    }
}
