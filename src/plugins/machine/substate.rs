//! Sub-state timers: short timed windows layered on top of the main state.
//!
//! Each kind holds `(elapsed, duration)`. A timer is *active* while
//! `0 < elapsed < duration`, so a freshly armed timer only reads as active
//! after its first advance. Advancing stops at `duration`.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubStateKind {
    PreAttackDelay,
    PostAttackDelay,
    Invincibility,
    Defense,
}

impl SubStateKind {
    pub const ALL: [SubStateKind; 4] = [
        SubStateKind::PreAttackDelay,
        SubStateKind::PostAttackDelay,
        SubStateKind::Invincibility,
        SubStateKind::Defense,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            SubStateKind::PreAttackDelay => 0,
            SubStateKind::PostAttackDelay => 1,
            SubStateKind::Invincibility => 2,
            SubStateKind::Defense => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SubStateTimer {
    pub elapsed: f32,
    pub duration: f32,
}

impl SubStateTimer {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.elapsed > 0.0 && self.elapsed < self.duration
    }

    /// The window was armed and has run its full length.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.duration > 0.0 && self.elapsed >= self.duration
    }

    /// Armed and not yet finished (includes the tick it was armed on).
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.duration > 0.0 && self.elapsed < self.duration
    }

    fn advance(&mut self, dt: f32) {
        if self.elapsed < self.duration {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
    }
}

/// Incoming-damage gate derived from the sub-state windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Guard {
    pub avoiding: bool,
    pub defending: bool,
}

impl Guard {
    #[inline]
    pub fn blocks(self) -> bool {
        self.avoiding || self.defending
    }
}

#[derive(Component, Clone, Debug, Default)]
pub struct SubStates {
    timers: [SubStateTimer; 4],
}

impl SubStates {
    /// Arm `kind` for `duration` seconds. Negative or NaN durations clamp to 0.
    pub fn set(&mut self, kind: SubStateKind, duration: f32) {
        let duration = if duration.is_nan() { 0.0 } else { duration.max(0.0) };
        self.timers[kind.index()] = SubStateTimer {
            elapsed: 0.0,
            duration,
        };
    }

    #[inline]
    pub fn timer(&self, kind: SubStateKind) -> SubStateTimer {
        self.timers[kind.index()]
    }

    #[inline]
    pub fn is_in(&self, kind: SubStateKind) -> bool {
        self.timer(kind).is_active()
    }

    #[inline]
    pub fn has_elapsed(&self, kind: SubStateKind) -> bool {
        self.timer(kind).is_finished()
    }

    #[inline]
    pub fn is_pending(&self, kind: SubStateKind) -> bool {
        self.timer(kind).is_pending()
    }

    pub fn clear(&mut self, kind: SubStateKind) {
        self.timers[kind.index()] = SubStateTimer::default();
    }

    pub fn cancel_all(&mut self) {
        self.timers = Default::default();
    }

    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for t in &mut self.timers {
            t.advance(dt);
        }
    }

    pub fn guard(&self) -> Guard {
        Guard {
            avoiding: self.is_in(SubStateKind::Invincibility),
            defending: self.is_in(SubStateKind::Defense),
        }
    }
}
