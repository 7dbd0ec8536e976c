//! Player plugin.
//!
//! In the AR build the player *is* the tracked camera: its pose arrives as
//! [`PlayerPose`] messages. On desktop, WASD and Q/E drive the same transform.
//!
//! Pipeline:
//! - Update: sample keyboard and gesture flags, write `SkillPressed`
//! - FixedUpdate: desktop movement
//! - FixedPostUpdate `Intake`: apply pose, run the skill controller
//! - FixedPostUpdate `Advance`: skill cooldowns tick down

mod input;
mod skills;

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::combat::{ContactExposure, Health};
use crate::plugins::core::{FightSet, sync_registry};
use crate::plugins::machine::SubStates;
use crate::plugins::phases::{ArenaAnchor, PhaseDirector, start_phase1};

pub use input::{GestureFlags, InputSource, PlayerPose, SkillPressed};
pub use skills::{Skill, run_skills};

#[derive(Component, Debug, Clone, Copy)]
pub struct Player;

/// Ultimate meter. Filled by basic attacks, emptied by the ultimate.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gauge {
    pub value: i32,
    pub limit: i32,
}

impl Gauge {
    pub fn new(limit: i32) -> Self {
        Self { value: 0, limit }
    }

    pub fn add(&mut self, amount: i32) {
        self.value = (self.value + amount.max(0)).min(self.limit);
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.value >= self.limit
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

/// Seconds until each skill is usable again, indexed like `Skill::ALL`.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct SkillCooldowns {
    remaining: [f32; 5],
}

impl SkillCooldowns {
    #[inline]
    pub fn is_ready(&self, skill: Skill) -> bool {
        self.remaining[skill.index()] <= 0.0
    }

    pub fn start(&mut self, skill: Skill, seconds: f32) {
        self.remaining[skill.index()] = seconds.max(0.0);
    }

    pub fn tick(&mut self, dt: f32) {
        for r in &mut self.remaining {
            *r = (*r - dt).max(0.0);
        }
    }

    pub fn remaining(&self) -> [f32; 5] {
        self.remaining
    }
}

#[derive(Resource, Default, Debug)]
struct MoveInput {
    axis: Vec2,
    yaw: f32,
}

pub fn plugin(app: &mut App) {
    app.add_message::<SkillPressed>()
        .add_message::<PlayerPose>()
        .init_resource::<GestureFlags>()
        .insert_resource(MoveInput::default())
        .add_systems(OnEnter(GameState::InGame), spawn.after(start_phase1))
        .add_systems(
            Update,
            (
                input::read_skill_keys,
                input::read_gestures,
                gather_move_input,
            )
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedUpdate,
            apply_movement.run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            (input::apply_pose, run_skills)
                .chain()
                .after(sync_registry)
                .in_set(FightSet::Intake),
        )
        .add_systems(FixedPostUpdate, tick_cooldowns.in_set(FightSet::Advance));
}

fn spawn(
    mut commands: Commands,
    tunables: Res<Tunables>,
    anchor: Res<ArenaAnchor>,
    director: Res<PhaseDirector>,
) {
    let start = anchor.0 + tunables.arena.player_offset();
    let facing = director.spawn_point.with_y(start.y);

    let layers = CollisionLayers::new(
        Layer::Player,
        [Layer::World, Layer::Boss, Layer::EnemyProjectile],
    );

    commands.spawn((
        Name::new("Player"),
        Player,
        Health::new(tunables.player.max_health),
        Gauge::new(tunables.player.gauge_limit),
        SkillCooldowns::default(),
        SubStates::default(),
        ContactExposure::default(),
        Transform::from_translation(start).looking_at(facing, Vec3::Y),
        RigidBody::Kinematic,
        Collider::sphere(tunables.player.collider_radius),
        layers,
        CollisionEventsEnabled,
        DespawnOnExit(GameState::InGame),
    ));
}

fn gather_move_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<MoveInput>) {
    let Some(keys) = keys else {
        return;
    };
    let mut axis = Vec2::ZERO;
    let mut yaw = 0.0;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }
    if keys.pressed(KeyCode::KeyQ) {
        yaw += 1.0;
    }
    if keys.pressed(KeyCode::KeyE) {
        yaw -= 1.0;
    }

    input.axis = axis.normalize_or_zero();
    input.yaw = yaw;
}

/// Move on the ground plane relative to where the player is looking.
fn apply_movement(
    time: Res<Time>,
    tunables: Res<Tunables>,
    input: Res<MoveInput>,
    mut q_player: Query<&mut Transform, With<Player>>,
) {
    let Ok(mut tf) = q_player.single_mut() else {
        return;
    };
    let dt = time.delta_secs();

    tf.rotate_y(input.yaw * tunables.player.turn_speed * dt);

    let forward = tf.forward().as_vec3().with_y(0.0).normalize_or_zero();
    let right = tf.right().as_vec3().with_y(0.0).normalize_or_zero();
    let step = (forward * input.axis.y + right * input.axis.x) * tunables.player.move_speed * dt;
    tf.translation += step;
}

fn tick_cooldowns(time: Res<Time<Fixed>>, mut q: Query<&mut SkillCooldowns>) {
    let dt = time.delta_secs();
    for mut cd in &mut q {
        cd.tick(dt);
    }
}

#[cfg(test)]
mod tests;
