use bevy::prelude::*;

use crate::plugins::machine::MachineState;

#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub damage: i32,
    /// Set by the first collision; later collisions are ignored.
    pub has_hit: bool,
    pub origin: Vec3,
    /// Range limit, measured from the owner (or `origin` once it is gone).
    pub max_distance: f32,
    pub spawn_effect: bool,
    pub owner: Option<Entity>,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Hover,
    Ballistic { velocity: Vec3 },
    Homing { target: Entity, speed: f32 },
}

#[derive(Component, Debug, Clone)]
pub struct Lifetime(pub Timer);

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds.max(0.0), TimerMode::Once))
    }
}

/// Homing minion. Its behaviour runs on `StateMachine<MinionState>`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Minion {
    pub target: Option<Entity>,
    pub speed: f32,
    pub emerge: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinionState {
    Emerge,
    Chase,
    /// Target lost; the minion is removed without side effects.
    Spent,
}

impl MachineState for MinionState {
    fn is_terminal(&self) -> bool {
        matches!(self, MinionState::Spent)
    }
}
