//! Input sources. Keyboard and gestures are interchangeable: both only ever
//! produce `SkillPressed`.

use bevy::prelude::*;

use super::{Player, Skill};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    Gesture,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillPressed {
    pub skill: Skill,
    pub source: InputSource,
}

/// Tracked camera pose from the AR layer.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct PlayerPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

/// Per-skill boolean signals written by the gesture recognizer.
///
/// A skill fires on the rising edge only; holding a pose does not repeat it.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GestureFlags {
    held: [bool; 5],
}

impl GestureFlags {
    pub fn set(&mut self, skill: Skill, held: bool) {
        self.held[skill.index()] = held;
    }

    pub fn is_held(&self, skill: Skill) -> bool {
        self.held[skill.index()]
    }
}

const SKILL_KEYS: [(KeyCode, Skill); 5] = [
    (KeyCode::Digit1, Skill::Basic),
    (KeyCode::Digit2, Skill::Ultimate),
    (KeyCode::Digit3, Skill::Heal),
    (KeyCode::Digit4, Skill::Defense),
    (KeyCode::Space, Skill::Avoid),
];

pub fn read_skill_keys(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut out: MessageWriter<SkillPressed>,
) {
    let Some(keys) = keys else {
        return;
    };
    for (key, skill) in SKILL_KEYS {
        if keys.just_pressed(key) {
            out.write(SkillPressed {
                skill,
                source: InputSource::Keyboard,
            });
        }
    }
}

pub fn read_gestures(
    flags: Res<GestureFlags>,
    mut previous: Local<GestureFlags>,
    mut out: MessageWriter<SkillPressed>,
) {
    for skill in Skill::ALL {
        if flags.is_held(skill) && !previous.is_held(skill) {
            out.write(SkillPressed {
                skill,
                source: InputSource::Gesture,
            });
        }
    }
    *previous = *flags;
}

pub fn apply_pose(
    mut poses: MessageReader<PlayerPose>,
    mut q_player: Query<&mut Transform, With<Player>>,
) {
    let Some(pose) = poses.read().last() else {
        return;
    };
    let Ok(mut tf) = q_player.single_mut() else {
        debug!("Pose update without a player");
        return;
    };
    tf.translation = pose.translation;
    tf.rotation = pose.rotation;
}
