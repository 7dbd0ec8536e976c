//! Tunable gameplay constants.
//!
//! Everything here can be overridden from `config/tunables.ron`. Missing fields
//! keep their defaults, and out-of-range values are clamped on load rather than
//! rejected.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

pub const TUNABLES_PATH: &str = "config/tunables.ron";

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub phase1: PhaseTuning,
    pub phase2: PhaseTuning,
    pub attack_roll: AttackRollTable,
    pub player: PlayerTuning,
    pub skills: SkillTuning,
    pub arena: ArenaTuning,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            phase1: PhaseTuning::phase1(),
            phase2: PhaseTuning::phase2(),
            attack_roll: AttackRollTable::default(),
            player: PlayerTuning::default(),
            skills: SkillTuning::default(),
            arena: ArenaTuning::default(),
        }
    }
}

/// Balance sheet for one boss phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTuning {
    pub max_health: i32,
    /// Applied to every incoming hit, rounded to the nearest integer.
    pub damage_taken_multiplier: f32,
    pub walk_speed: f32,
    /// Radians per second.
    pub turn_speed: f32,
    pub idle_duration: f32,
    pub pre_attack_delay: f32,
    pub post_attack_delay: f32,
    pub stun_duration: f32,
    pub attack_arc_degrees: f32,
    /// Wider tolerance used while waiting out the windup.
    pub windup_tolerance_degrees: f32,
    /// A windup aborts once the target is farther than `distance * factor`.
    pub abort_distance_factor: f32,
    pub melee: AttackTuning,
    pub ranged: AttackTuning,
    pub projectile: ProjectileTuning,
    pub teleport: Option<TeleportTuning>,
    pub contact: ContactTuning,
    /// How long the Death state lingers before the body is removed.
    pub death_duration: f32,
    /// Game time between this phase's death and the follow-up (next phase or victory).
    pub transition_delay: f32,
    pub enraged: bool,
}

impl PhaseTuning {
    pub fn phase1() -> Self {
        Self {
            max_health: 100,
            damage_taken_multiplier: 1.0,
            walk_speed: 0.6,
            turn_speed: 4.0,
            idle_duration: 1.5,
            pre_attack_delay: 0.8,
            post_attack_delay: 1.2,
            stun_duration: 0.6,
            attack_arc_degrees: 45.0,
            windup_tolerance_degrees: 60.0,
            abort_distance_factor: 1.5,
            melee: AttackTuning {
                distance: 2.0,
                duration: 2.0,
                strike_at: 0.9,
                damage: 10,
            },
            ranged: AttackTuning {
                distance: 6.0,
                duration: 2.5,
                strike_at: 1.2,
                damage: 8,
            },
            projectile: ProjectileTuning::default(),
            teleport: None,
            contact: ContactTuning::default(),
            death_duration: 2.5,
            transition_delay: 3.0,
            enraged: false,
        }
    }

    pub fn phase2() -> Self {
        Self {
            max_health: 150,
            damage_taken_multiplier: 0.8,
            walk_speed: 0.9,
            turn_speed: 6.0,
            idle_duration: 1.0,
            pre_attack_delay: 0.5,
            post_attack_delay: 0.8,
            melee: AttackTuning {
                distance: 2.0,
                duration: 1.6,
                strike_at: 0.7,
                damage: 14,
            },
            ranged: AttackTuning {
                distance: 6.0,
                duration: 2.0,
                strike_at: 0.9,
                damage: 6,
            },
            projectile: ProjectileTuning {
                homing: true,
                count: 3,
                speed: 1.8,
                lifetime: 6.0,
                emerge: 0.6,
                ..default()
            },
            teleport: Some(TeleportTuning::default()),
            contact: ContactTuning {
                on_enter: 8,
                per_second: 3,
            },
            death_duration: 3.0,
            transition_delay: 3.5,
            enraged: true,
            ..Self::phase1()
        }
    }

    pub fn attack(&self, kind: AttackKind) -> &AttackTuning {
        match kind {
            AttackKind::Melee => &self.melee,
            AttackKind::Ranged => &self.ranged,
        }
    }

    fn sanitize(&mut self) {
        self.max_health = self.max_health.max(1);
        self.damage_taken_multiplier = non_negative(self.damage_taken_multiplier);
        self.walk_speed = non_negative(self.walk_speed);
        self.turn_speed = non_negative(self.turn_speed);
        self.idle_duration = non_negative(self.idle_duration);
        self.pre_attack_delay = non_negative(self.pre_attack_delay);
        self.post_attack_delay = non_negative(self.post_attack_delay);
        self.stun_duration = non_negative(self.stun_duration);
        self.attack_arc_degrees = self.attack_arc_degrees.clamp(0.0, 180.0);
        self.windup_tolerance_degrees = self
            .windup_tolerance_degrees
            .clamp(self.attack_arc_degrees, 180.0);
        self.abort_distance_factor = self.abort_distance_factor.max(1.0);
        self.melee.sanitize();
        self.ranged.sanitize();
        self.projectile.sanitize();
        self.death_duration = non_negative(self.death_duration);
        self.transition_delay = non_negative(self.transition_delay);
    }
}

impl Default for PhaseTuning {
    fn default() -> Self {
        Self::phase1()
    }
}

/// Which of the two boss attacks is meant. `Melee` is Attack1, `Ranged` is Attack2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Melee,
    Ranged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTuning {
    pub distance: f32,
    /// Approximates the clip length; the boss stays in the attack state this long.
    pub duration: f32,
    /// Seconds into the attack when the hit lands or the shot leaves.
    pub strike_at: f32,
    pub damage: i32,
}

impl AttackTuning {
    fn sanitize(&mut self) {
        self.distance = non_negative(self.distance);
        self.duration = non_negative(self.duration);
        self.strike_at = self.strike_at.clamp(0.0, self.duration);
        self.damage = self.damage.max(0);
    }
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            distance: 2.0,
            duration: 2.0,
            strike_at: 0.9,
            damage: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub speed: f32,
    pub lifetime: f32,
    pub max_distance: f32,
    /// Homing shots become minions that chase the player.
    pub homing: bool,
    pub count: u32,
    /// Minions hover in place this long before chasing.
    pub emerge: f32,
    pub spawn_effect: bool,
}

impl ProjectileTuning {
    fn sanitize(&mut self) {
        self.speed = non_negative(self.speed);
        self.lifetime = non_negative(self.lifetime);
        self.max_distance = non_negative(self.max_distance);
        self.count = self.count.max(1);
        self.emerge = non_negative(self.emerge);
    }
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 3.0,
            lifetime: 4.0,
            max_distance: 12.0,
            homing: false,
            count: 1,
            emerge: 0.0,
            spawn_effect: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportTuning {
    /// Attack entry teleports when the target is farther than this.
    pub trigger_distance: f32,
    /// Distance from the target the boss reappears at.
    pub offset: f32,
    /// Invincibility window armed right after reappearing.
    pub grace: f32,
}

impl Default for TeleportTuning {
    fn default() -> Self {
        Self {
            trigger_distance: 4.0,
            offset: 1.2,
            grace: 0.5,
        }
    }
}

/// Damage dealt by touching the boss body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactTuning {
    pub on_enter: i32,
    pub per_second: i32,
}

impl Default for ContactTuning {
    fn default() -> Self {
        Self {
            on_enter: 5,
            per_second: 2,
        }
    }
}

/// Roll table for attack selection over `1..=100`.
///
/// Rolls up to `melee_max` pick melee, rolls from `ranged_min` pick ranged,
/// and anything in between falls back to a coin flip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackRollTable {
    pub melee_max: u32,
    pub ranged_min: u32,
}

impl Default for AttackRollTable {
    fn default() -> Self {
        Self {
            melee_max: 30,
            ranged_min: 71,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: i32,
    pub gauge_limit: i32,
    pub collider_radius: f32,
    /// Desktop fallback movement, meters per second.
    pub move_speed: f32,
    /// Desktop fallback yaw rate, radians per second.
    pub turn_speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            gauge_limit: 100,
            collider_radius: 0.3,
            move_speed: 1.5,
            turn_speed: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillTuning {
    pub basic_cooldown: f32,
    pub basic_damage: i32,
    pub basic_gauge_gain: i32,
    pub ultimate_cooldown: f32,
    pub ultimate_damage: i32,
    pub heal_cooldown: f32,
    pub heal_amount: i32,
    pub defense_cooldown: f32,
    pub defense_window: f32,
    pub avoid_cooldown: f32,
    pub avoid_window: f32,
}

impl SkillTuning {
    fn sanitize(&mut self) {
        for v in [
            &mut self.basic_cooldown,
            &mut self.ultimate_cooldown,
            &mut self.heal_cooldown,
            &mut self.defense_cooldown,
            &mut self.defense_window,
            &mut self.avoid_cooldown,
            &mut self.avoid_window,
        ] {
            *v = non_negative(*v);
        }
        self.basic_damage = self.basic_damage.max(0);
        self.basic_gauge_gain = self.basic_gauge_gain.max(0);
        self.ultimate_damage = self.ultimate_damage.max(0);
        self.heal_amount = self.heal_amount.max(0);
    }
}

impl Default for SkillTuning {
    fn default() -> Self {
        Self {
            basic_cooldown: 0.8,
            basic_damage: 5,
            basic_gauge_gain: 10,
            ultimate_cooldown: 1.0,
            ultimate_damage: 40,
            heal_cooldown: 8.0,
            heal_amount: 20,
            defense_cooldown: 4.0,
            defense_window: 1.5,
            avoid_cooldown: 3.0,
            avoid_window: 0.6,
        }
    }
}

/// Placement of actors relative to the AR anchor, in meters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub boss_offset: [f32; 3],
    pub player_offset: [f32; 3],
    pub boss_radius: f32,
    /// Delay before the defeat screen once the player falls.
    pub defeat_fade: f32,
}

impl ArenaTuning {
    pub fn boss_offset(&self) -> Vec3 {
        Vec3::from_array(self.boss_offset)
    }

    pub fn player_offset(&self) -> Vec3 {
        Vec3::from_array(self.player_offset)
    }
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            boss_offset: [0.0, 0.0, 0.0],
            player_offset: [0.0, 0.0, 4.0],
            boss_radius: 0.5,
            defeat_fade: 1.5,
        }
    }
}

impl Tunables {
    pub fn phase(&self, phase: crate::plugins::boss::BossPhase) -> &PhaseTuning {
        use crate::plugins::boss::BossPhase;
        match phase {
            BossPhase::Phase1 => &self.phase1,
            BossPhase::Phase2 => &self.phase2,
        }
    }

    /// Parse tunables from RON text and clamp them into range.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let mut tunables: Tunables = ron::from_str(text)?;
        tunables.sanitize()?;
        Ok(tunables)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Load from `path`, falling back to defaults when the file is missing or broken.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No tunables at {:?}, using defaults.", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(tunables) => {
                info!("Loaded tunables from {:?}", path);
                tunables
            }
            Err(e) => {
                warn!("{e}. Using default tunables.");
                Self::default()
            }
        }
    }

    fn sanitize(&mut self) -> Result<(), ConfigError> {
        let roll = &self.attack_roll;
        if roll.melee_max >= roll.ranged_min || roll.ranged_min > 101 {
            return Err(ConfigError::Invalid(format!(
                "attack roll bands overlap: melee_max={} ranged_min={}",
                roll.melee_max, roll.ranged_min
            )));
        }
        self.phase1.sanitize();
        self.phase2.sanitize();
        self.player.max_health = self.player.max_health.max(1);
        self.player.gauge_limit = self.player.gauge_limit.max(1);
        self.player.collider_radius = non_negative(self.player.collider_radius);
        self.player.move_speed = non_negative(self.player.move_speed);
        self.player.turn_speed = non_negative(self.player.turn_speed);
        self.skills.sanitize();
        self.arena.boss_radius = non_negative(self.arena.boss_radius);
        self.arena.defeat_fade = non_negative(self.arena.defeat_fade);
        Ok(())
    }
}

/// Clamp to `>= 0`, mapping NaN to 0.
#[inline]
fn non_negative(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.max(0.0) }
}
