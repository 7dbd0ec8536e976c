//! Buffered projectile traffic.
//!
//! The boss never spawns projectiles itself. It writes a
//! [`SpawnProjectileRequest`] and the spawner turns requests into entities.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    /// Flies straight along its launch direction.
    Bolt,
    /// Hovers while emerging, then homes in on its target.
    Minion,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnProjectileRequest {
    pub kind: ProjectileKind,
    pub origin: Vec3,
    pub direction: Vec3,
    pub target: Option<Entity>,
    pub damage: i32,
    pub speed: f32,
    pub lifetime: f32,
    pub max_distance: f32,
    /// Minions only: seconds spent hovering before the chase.
    pub emerge: f32,
    pub spawn_effect: bool,
    pub owner: Option<Entity>,
}

/// A projectile struck something. Presentation plays a burst here.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct ImpactEffect {
    pub position: Vec3,
    pub hit_player: bool,
}
