use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use super::components::{Lifetime, Minion, MinionState, Motion, Projectile};
use super::messages::{ProjectileKind, SpawnProjectileRequest};
use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::plugins::machine::StateMachine;

pub const PROJECTILE_RADIUS: f32 = 0.12;

#[inline]
fn projectile_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::EnemyProjectile, [Layer::World, Layer::Player])
}

/// Turn spawn requests into projectile entities.
pub fn spawn_projectiles(mut commands: Commands, mut requests: MessageReader<SpawnProjectileRequest>) {
    for req in requests.read() {
        let direction = req.direction.normalize_or(Vec3::NEG_Z);
        let projectile = Projectile {
            damage: req.damage,
            has_hit: false,
            origin: req.origin,
            max_distance: req.max_distance,
            spawn_effect: req.spawn_effect,
            owner: req.owner,
        };

        let mut entity = commands.spawn((
            projectile,
            Lifetime::new(req.lifetime),
            Transform::from_translation(req.origin).looking_to(direction, Vec3::Y),
            RigidBody::Dynamic,
            GravityScale(0.0),
            Collider::sphere(PROJECTILE_RADIUS),
            Sensor,
            projectile_layers(),
            CollisionEventsEnabled,
            DespawnOnExit(GameState::InGame),
        ));

        match req.kind {
            ProjectileKind::Bolt => {
                entity.insert((
                    Name::new("Bolt"),
                    Motion::Ballistic {
                        velocity: direction * req.speed,
                    },
                ));
            }
            ProjectileKind::Minion => {
                entity.insert((
                    Name::new("Minion"),
                    Motion::Hover,
                    Minion {
                        target: req.target,
                        speed: req.speed,
                        emerge: req.emerge,
                    },
                    StateMachine::new(MinionState::Emerge),
                ));
            }
        }
    }
}
