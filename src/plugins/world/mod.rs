//! World plugin: the ground slab under the placed arena.
//!
//! Shots that miss end on the ground rather than flying forever.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::plugins::phases::ArenaAnchor;

/// Half extent of the square ground slab, in meters.
pub const GROUND_HALF_EXTENT: f32 = 10.0;
const GROUND_THICKNESS: f32 = 0.1;

#[derive(Component, Debug, Clone, Copy)]
pub struct Ground;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_ground);
}

fn spawn_ground(mut commands: Commands, anchor: Res<ArenaAnchor>) {
    let ground_layers =
        CollisionLayers::new(Layer::World, [Layer::Player, Layer::Boss, Layer::EnemyProjectile]);

    // Top face sits at the anchor height.
    let center = anchor.0 - Vec3::Y * (GROUND_THICKNESS * 0.5);

    commands.spawn((
        Name::new("Ground"),
        Ground,
        Transform::from_translation(center),
        RigidBody::Static,
        Collider::cuboid(
            GROUND_HALF_EXTENT * 2.0,
            GROUND_THICKNESS,
            GROUND_HALF_EXTENT * 2.0,
        ),
        ground_layers,
        DespawnOnExit(GameState::InGame),
    ));
}
