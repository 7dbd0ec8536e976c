//! Lighting plugin (render-only): a sun over the arena and a soft fill that
//! follows the player.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::phases::ArenaAnchor;
use crate::plugins::player::Player;

#[derive(Component)]
pub struct PlayerLight;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(
            Update,
            follow_player_light.run_if(in_state(GameState::InGame)),
        );
}

fn setup(mut commands: Commands, anchor: Res<ArenaAnchor>) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(anchor.0 + Vec3::new(3.0, 8.0, 4.0))
            .looking_at(anchor.0, Vec3::Y),
        DespawnOnExit(GameState::InGame),
    ));

    commands.spawn((
        Name::new("PlayerLight"),
        PlayerLight,
        PointLight {
            color: Color::srgb(1.0, 0.9, 0.75),
            intensity: 60_000.0,
            range: 8.0,
            ..default()
        },
        Transform::from_translation(anchor.0 + Vec3::Y * 2.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player_light(
    q_player: Query<&Transform, (With<Player>, Without<PlayerLight>)>,
    mut q_light: Query<&mut Transform, (With<PlayerLight>, Without<Player>)>,
) {
    let Ok(tf_player) = q_player.single() else {
        return;
    };
    let Ok(mut tf_light) = q_light.single_mut() else {
        return;
    };
    tf_light.translation = tf_player.translation + Vec3::Y * 0.5;
}
