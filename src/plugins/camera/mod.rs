//! Camera plugin (render-only).
//!
//! The player is the viewpoint: the camera copies the player's transform every
//! frame, which in the AR build is the tracked device pose.
//!
//! Disjointness is spelled out with `Without<...>` so the read of the player
//! transform and the write of the camera transform can share a system.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy::transform::TransformSystems;

use crate::common::state::GameState;
use crate::plugins::player::Player;

#[derive(Component)]
pub struct MainCamera;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::Placement), spawn_placement_camera)
        .add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            follow_player
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

/// Overview while waiting for the arena to be placed.
fn spawn_placement_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("PlacementCamera"),
        Camera3d::default(),
        Transform::from_xyz(0.0, 3.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        DespawnOnExit(GameState::Placement),
    ));
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        MainCamera,
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.5, 4.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player(
    q_player: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut q_cam: Query<&mut Transform, (With<MainCamera>, Without<Player>)>,
) {
    let Ok(tf_player) = q_player.single() else {
        return;
    };
    let Ok(mut tf_cam) = q_cam.single_mut() else {
        return;
    };
    *tf_cam = *tf_player;
}
