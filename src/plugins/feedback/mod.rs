//! Feedback plugin: outgoing signals for animation, audio and the HUD.
//!
//! Gameplay never drives an animator or mixer directly. It writes
//! [`AnimationSignal`] and [`AudioCue`] messages and rewrites [`HudSnapshot`]
//! once per fixed tick; whatever presents the fight consumes those.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::boss::{Boss, BossPhase, BossState};
use crate::plugins::combat::Health;
use crate::plugins::core::{EntityRegistry, FightSet};
use crate::plugins::machine::StateMachine;
use crate::plugins::player::{Gauge, Player, SkillCooldowns};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimSignal {
    Idle,
    Walk,
    Attack,
    Damage,
    Death,
    Enraged,
}

/// Animator parameter change. Triggers are sent with `value: true`.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationSignal {
    pub entity: Entity,
    pub signal: AnimSignal,
    pub value: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    AttackStart,
    Strike,
    Hit,
    Blocked,
    Teleport,
    Death,
    Heal,
    Ultimate,
}

/// Fire-and-forget sound request.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioCue {
    pub cue: Cue,
    pub entity: Option<Entity>,
}

/// Signals collected while components are mutably borrowed, written afterwards.
#[derive(Debug, Default)]
pub struct Outbox {
    pub anim: Vec<AnimationSignal>,
    pub audio: Vec<AudioCue>,
}

impl Outbox {
    pub fn anim(&mut self, entity: Entity, signal: AnimSignal, value: bool) {
        self.anim.push(AnimationSignal {
            entity,
            signal,
            value,
        });
    }

    pub fn cue(&mut self, cue: Cue, entity: Entity) {
        self.audio.push(AudioCue {
            cue,
            entity: Some(entity),
        });
    }

    pub fn flush(
        &mut self,
        anim: &mut MessageWriter<AnimationSignal>,
        audio: &mut MessageWriter<AudioCue>,
    ) {
        anim.write_batch(self.anim.drain(..));
        audio.write_batch(self.audio.drain(..));
    }
}

/// What the UI shows. Rewritten at the end of every fight tick.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct HudSnapshot {
    pub player_hp: i32,
    pub player_max_hp: i32,
    pub gauge: i32,
    pub gauge_limit: i32,
    /// Remaining cooldown per skill, in `Skill::ALL` order.
    pub cooldowns: [f32; 5],
    pub boss_hp: i32,
    pub boss_max_hp: i32,
    pub boss_phase: Option<BossPhase>,
    pub boss_state: Option<BossState>,
    /// Signed yaw from the player's facing to the boss, in degrees.
    /// Positive means the boss is to the player's left. `None` without a live boss.
    pub boss_bearing: Option<f32>,
}

pub fn plugin(app: &mut App) {
    app.add_message::<AnimationSignal>()
        .add_message::<AudioCue>()
        .init_resource::<HudSnapshot>()
        .add_systems(FixedPostUpdate, update_hud.in_set(FightSet::Cleanup))
        .add_systems(Update, (log_animation_signals, log_audio_cues))
        .add_systems(OnEnter(GameState::InGame), reset_hud);
}

fn reset_hud(mut hud: ResMut<HudSnapshot>) {
    *hud = HudSnapshot::default();
}

pub fn update_hud(
    registry: Res<EntityRegistry>,
    mut hud: ResMut<HudSnapshot>,
    q_player: Query<(&Transform, &Health, &Gauge, &SkillCooldowns), With<Player>>,
    q_boss: Query<(&Transform, &Health, &Boss, &StateMachine<BossState>), Without<Player>>,
) {
    let player = registry.player.and_then(|e| q_player.get(e).ok());
    let boss = registry.boss.and_then(|e| q_boss.get(e).ok());

    if let Some((_, health, gauge, cooldowns)) = player {
        hud.player_hp = health.hp;
        hud.player_max_hp = health.max;
        hud.gauge = gauge.value;
        hud.gauge_limit = gauge.limit;
        hud.cooldowns = cooldowns.remaining();
    }

    match boss {
        Some((boss_tf, health, b, machine)) => {
            hud.boss_hp = health.hp;
            hud.boss_max_hp = health.max;
            hud.boss_phase = Some(b.phase);
            hud.boss_state = Some(machine.current());
            hud.boss_bearing = player.and_then(|(tf, ..)| bearing_degrees(tf, boss_tf.translation));
        }
        None => {
            hud.boss_phase = None;
            hud.boss_state = None;
            hud.boss_bearing = None;
        }
    }
}

/// Signed horizontal angle from `from`'s forward to `target`, in degrees.
pub fn bearing_degrees(from: &Transform, target: Vec3) -> Option<f32> {
    let to = (target - from.translation).with_y(0.0);
    let fwd = from.forward().as_vec3().with_y(0.0);
    if to.length_squared() < 1e-6 || fwd.length_squared() < 1e-6 {
        return None;
    }
    let fwd = fwd.xz().normalize();
    let to = to.xz().normalize();
    // Rotating -Z towards -X is a left turn.
    let cross = fwd.x * to.y - fwd.y * to.x;
    let angle = fwd.dot(to).clamp(-1.0, 1.0).acos();
    Some(-cross.signum() * angle.to_degrees())
}

fn log_animation_signals(mut signals: MessageReader<AnimationSignal>) {
    for s in signals.read() {
        debug!("anim {:?} {:?}={}", s.entity, s.signal, s.value);
    }
}

fn log_audio_cues(mut cues: MessageReader<AudioCue>) {
    for c in cues.read() {
        debug!("audio {:?} from {:?}", c.cue, c.entity);
    }
}

#[cfg(test)]
mod tests;
