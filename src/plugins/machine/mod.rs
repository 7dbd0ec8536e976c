//! Generic finite state machine shared by the boss and its minions.
//!
//! The machine owns exactly one current state. A transition always runs
//! `exit(old)` and then `enter(new)` through a [`StateHooks`] implementation
//! borrowed for the duration of the call, so the hooks can touch sibling
//! components without the machine knowing about them.
//!
//! ```text
//!   change_state(next)
//!     ├─ current.is_terminal()?  -> refuse, log, return false
//!     ├─ hooks.exit(current)
//!     ├─ hooks.reset_triggers()  (skipped when next is terminal)
//!     ├─ current = next, clocks reset
//!     └─ hooks.enter(next)
//! ```
//!
//! Per-state update logic lives with the owner (a `match` on the state value),
//! which keeps dispatch a single function per entity kind.

pub mod substate;

use std::fmt::Debug;

use bevy::prelude::*;

use crate::plugins::core::FightSet;

pub use substate::{Guard, SubStateKind, SubStateTimer, SubStates};

/// A closed set of states for one kind of entity.
pub trait MachineState: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// Terminal states accept no further transitions.
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Side effects of entering and leaving states.
pub trait StateHooks<S: MachineState> {
    fn exit(&mut self, _state: S) {}
    fn enter(&mut self, _state: S) {}
    /// Reset reusable one-shot animation triggers.
    fn reset_triggers(&mut self) {}
}

/// Hooks that do nothing; for owners with no enter/exit side effects.
pub struct NoHooks;

impl<S: MachineState> StateHooks<S> for NoHooks {}

#[derive(Component, Debug, Clone)]
pub struct StateMachine<S: MachineState> {
    current: S,
    previous: Option<S>,
    time_in_state: f32,
    ticks_in_state: u32,
}

impl<S: MachineState> StateMachine<S> {
    /// Start in `initial` without running any enter hook.
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            previous: None,
            time_in_state: 0.0,
            ticks_in_state: 0,
        }
    }

    #[inline]
    pub fn current(&self) -> S {
        self.current
    }

    #[inline]
    pub fn previous(&self) -> Option<S> {
        self.previous
    }

    #[inline]
    pub fn is(&self, state: S) -> bool {
        self.current == state
    }

    /// Game time spent in the current state, as of the last clock advance.
    #[inline]
    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    /// Number of clock advances since the state was entered.
    #[inline]
    pub fn ticks_in_state(&self) -> u32 {
        self.ticks_in_state
    }

    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }

    /// Move to `next`. Returns `false` if the machine is in a terminal state.
    pub fn change_state(&mut self, next: S, hooks: &mut impl StateHooks<S>) -> bool {
        if self.current.is_terminal() {
            debug!(
                "Refusing transition {:?} -> {:?}: current state is terminal",
                self.current, next
            );
            return false;
        }

        hooks.exit(self.current);
        if !next.is_terminal() {
            hooks.reset_triggers();
        }

        self.previous = Some(self.current);
        self.current = next;
        self.time_in_state = 0.0;
        self.ticks_in_state = 0;

        hooks.enter(next);
        true
    }

    /// Advance the per-state clocks by one tick of `dt` seconds.
    ///
    /// The tick a state is entered in counts towards its time, so a state
    /// lasting `d` seconds is visible for exactly `ceil(d / dt)` ticks.
    pub fn advance(&mut self, dt: f32) {
        self.time_in_state += dt.max(0.0);
        self.ticks_in_state = self.ticks_in_state.saturating_add(1);
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedPostUpdate, advance_substates.in_set(FightSet::Advance));
}

/// Fixed-step clock advance for every machine of state type `S`.
pub fn advance_state_clocks<S: MachineState>(
    time: Res<Time<Fixed>>,
    mut q: Query<&mut StateMachine<S>>,
) {
    let dt = time.delta_secs();
    for mut machine in &mut q {
        machine.advance(dt);
    }
}

/// Fixed-step advance of every entity's sub-state timers.
pub fn advance_substates(time: Res<Time<Fixed>>, mut q: Query<&mut SubStates>) {
    let dt = time.delta_secs();
    for mut subs in &mut q {
        subs.advance(dt);
    }
}
