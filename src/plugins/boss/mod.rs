//! Boss plugin: the two-phase boss entity and its AI.
//!
//! The boss is one entity carrying a [`StateMachine<BossState>`], its
//! [`SubStates`] timers, the current [`AttackSelection`] and the animator
//! parameters it exposes. The AI runs in `FightSet::Think`; damage reactions
//! (Stun, Death) are applied by the combat resolver in `FightSet::Resolve`
//! through the same [`BossHooks`].
//!
//! ```text
//!            idle_duration              in range & arc: arm PreAttackDelay
//!   ┌──────┐ ───────────────► ┌──────┐ ─────────────────────────────────► Idle (windup)
//!   │ Idle │                  │ Walk │                                        │
//!   └──────┘ ◄─────────────── └──────┘ ◄── target left the tolerance ─────────┤
//!      ▲     no target                                                        │ windup elapsed
//!      │                                                                      ▼
//!      └──── PostAttackDelay armed ◄──── Attack(kind) ◄─── (Phase2: far -> Teleport -> Idle)
//!
//!   Idle/Walk --hit--> Stun{resume} --stun_duration--> resume
//!   any --killing hit--> Death (terminal)
//! ```

mod brain;
mod hooks;
pub mod selection;

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::PhaseTuning;
use crate::plugins::combat::{ContactDamage, Health};
use crate::plugins::core::{FightSet, sync_registry};
use crate::plugins::feedback::{AnimSignal, AnimationSignal};
use crate::plugins::machine::{MachineState, StateMachine, SubStates, advance_state_clocks};

pub use crate::common::tunables::AttackKind;
pub use brain::update_bosses;
pub use hooks::{BossHooks, arm_post_attack};
pub use selection::{attack_for_roll, roll_attack};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BossPhase {
    Phase1,
    Phase2,
}

/// State a stun returns to once it wears off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResumeState {
    Idle,
    Walk,
}

impl From<ResumeState> for BossState {
    fn from(r: ResumeState) -> Self {
        match r {
            ResumeState::Idle => BossState::Idle,
            ResumeState::Walk => BossState::Walk,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossState {
    Idle,
    Walk,
    /// `Attack(Melee)` is Attack1, `Attack(Ranged)` is Attack2.
    Attack(AttackKind),
    Stun { resume: ResumeState },
    Teleport,
    Death,
}

impl BossState {
    /// Where a stun entered from this state resumes, if hits may preempt it.
    pub fn stun_resume(self) -> Option<ResumeState> {
        match self {
            BossState::Idle => Some(ResumeState::Idle),
            BossState::Walk => Some(ResumeState::Walk),
            _ => None,
        }
    }
}

impl MachineState for BossState {
    fn is_terminal(&self) -> bool {
        matches!(self, BossState::Death)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boss {
    pub phase: BossPhase,
}

/// The attack the boss has committed to, if any.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttackSelection {
    pub kind: Option<AttackKind>,
    /// The attack state has been entered for this selection.
    pub initiated: bool,
    /// The strike (hit or shot) already happened in this attack.
    pub struck: bool,
}

impl AttackSelection {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Animator parameters mirrored on the entity.
///
/// `attack` and `damage` are reusable triggers, reset on every non-terminal
/// transition. `death` and `enraged` are never reset.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnimatorParams {
    pub idle: bool,
    pub walk: bool,
    pub attack: bool,
    pub damage: bool,
    pub death: bool,
    pub enraged: bool,
}

/// Weak reference to the current target, re-resolved from the registry when stale.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TargetEntity(pub Option<Entity>);

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedPostUpdate,
        announce_bosses.in_set(FightSet::Intake).after(sync_registry),
    )
    .add_systems(FixedPostUpdate, update_bosses.in_set(FightSet::Think))
    .add_systems(
        FixedPostUpdate,
        advance_state_clocks::<BossState>.in_set(FightSet::Advance),
    );
}

/// Spawn a boss for `phase` at `transform`.
pub fn spawn_boss(
    commands: &mut Commands,
    phase: BossPhase,
    transform: Transform,
    tuning: &PhaseTuning,
    radius: f32,
) -> Entity {
    commands
        .spawn((
            Name::new(format!("Boss({phase:?})")),
            Boss { phase },
            Health::new(tuning.max_health),
            StateMachine::new(BossState::Idle),
            SubStates::default(),
            AttackSelection::default(),
            AnimatorParams {
                idle: true,
                enraged: tuning.enraged,
                ..default()
            },
            TargetEntity::default(),
            ContactDamage {
                on_enter: tuning.contact.on_enter,
                per_second: tuning.contact.per_second,
            },
            transform,
            DespawnOnExit(GameState::InGame),
        ))
        .insert((
            RigidBody::Kinematic,
            Collider::sphere(radius),
            Sensor,
            CollisionLayers::new(Layer::Boss, [Layer::Player]),
            CollisionEventsEnabled,
        ))
        .id()
}

/// Publish the initial animator state of freshly spawned bosses.
fn announce_bosses(
    q: Query<(Entity, &AnimatorParams), Added<Boss>>,
    mut out: MessageWriter<AnimationSignal>,
) {
    for (entity, anim) in &q {
        out.write(AnimationSignal {
            entity,
            signal: AnimSignal::Idle,
            value: anim.idle,
        });
        if anim.enraged {
            info!("Boss {:?} enters the fight enraged", entity);
            out.write(AnimationSignal {
                entity,
                signal: AnimSignal::Enraged,
                value: true,
            });
        }
    }
}
