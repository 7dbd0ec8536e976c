//! Visuals plugin (render-only): primitive meshes for gameplay entities.
//!
//! Gameplay spawns bodies without any render components; this plugin dresses
//! them when they appear, so headless apps never touch mesh assets.

use bevy::prelude::*;

use crate::plugins::boss::{AnimatorParams, Boss, BossPhase};
use crate::plugins::projectiles::{ImpactEffect, Minion, Projectile};
use crate::plugins::world::{GROUND_HALF_EXTENT, Ground};

#[derive(Resource)]
struct Palette {
    boss: Handle<Mesh>,
    phase1: Handle<StandardMaterial>,
    phase2: Handle<StandardMaterial>,
    enraged: Handle<StandardMaterial>,
    shot: Handle<Mesh>,
    bolt: Handle<StandardMaterial>,
    minion: Handle<StandardMaterial>,
    ground: Handle<Mesh>,
    ground_mat: Handle<StandardMaterial>,
}

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, build_palette).add_systems(
        Update,
        (dress_bosses, dress_projectiles, dress_ground, tint_enraged, log_impacts),
    );
}

fn build_palette(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut mat = |c: Color| materials.add(StandardMaterial::from(c));
    let palette = Palette {
        phase1: mat(Color::srgb(0.55, 0.2, 0.2)),
        phase2: mat(Color::srgb(0.35, 0.1, 0.45)),
        enraged: mat(Color::srgb(0.9, 0.15, 0.1)),
        bolt: mat(Color::srgb(1.0, 0.85, 0.3)),
        minion: mat(Color::srgb(0.4, 0.9, 0.5)),
        ground_mat: mat(Color::srgba(0.2, 0.2, 0.25, 0.6)),
        boss: meshes.add(Capsule3d::new(0.5, 1.0)),
        shot: meshes.add(Sphere::new(0.12)),
        ground: meshes.add(Plane3d::default().mesh().size(
            GROUND_HALF_EXTENT * 2.0,
            GROUND_HALF_EXTENT * 2.0,
        )),
    };
    commands.insert_resource(palette);
}

fn dress_bosses(
    mut commands: Commands,
    palette: Option<Res<Palette>>,
    q: Query<(Entity, &Boss), Added<Boss>>,
) {
    let Some(palette) = palette else {
        return;
    };
    for (e, boss) in &q {
        let material = match boss.phase {
            BossPhase::Phase1 => palette.phase1.clone(),
            BossPhase::Phase2 => palette.phase2.clone(),
        };
        commands
            .entity(e)
            .insert((Mesh3d(palette.boss.clone()), MeshMaterial3d(material)));
    }
}

fn dress_projectiles(
    mut commands: Commands,
    palette: Option<Res<Palette>>,
    q: Query<(Entity, Has<Minion>), Added<Projectile>>,
) {
    let Some(palette) = palette else {
        return;
    };
    for (e, is_minion) in &q {
        let material = if is_minion {
            palette.minion.clone()
        } else {
            palette.bolt.clone()
        };
        commands
            .entity(e)
            .insert((Mesh3d(palette.shot.clone()), MeshMaterial3d(material)));
    }
}

fn dress_ground(
    mut commands: Commands,
    palette: Option<Res<Palette>>,
    q: Query<Entity, Added<Ground>>,
) {
    let Some(palette) = palette else {
        return;
    };
    for e in &q {
        // The collider is centered below the surface; the plane sits on top.
        let plane = commands
            .spawn((
                Mesh3d(palette.ground.clone()),
                MeshMaterial3d(palette.ground_mat.clone()),
                Transform::from_xyz(0.0, 0.05, 0.0),
            ))
            .id();
        commands.entity(e).add_child(plane);
    }
}

fn tint_enraged(
    palette: Option<Res<Palette>>,
    mut q: Query<(&AnimatorParams, &mut MeshMaterial3d<StandardMaterial>), Changed<AnimatorParams>>,
) {
    let Some(palette) = palette else {
        return;
    };
    for (anim, mut material) in &mut q {
        if anim.enraged && material.0 != palette.enraged {
            material.0 = palette.enraged.clone();
        }
    }
}

fn log_impacts(mut impacts: MessageReader<ImpactEffect>) {
    for ev in impacts.read() {
        debug!("impact at {} (player: {})", ev.position, ev.hit_player);
    }
}
