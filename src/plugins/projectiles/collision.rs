use avian3d::prelude::*;
use bevy::prelude::*;

use super::components::Projectile;
use super::messages::ImpactEffect;
use crate::plugins::combat::DamageRequest;
use crate::plugins::core::PendingDespawn;
use crate::plugins::player::Player;

/// First contact of a projectile: damage the player if that is what it hit,
/// optionally request an impact effect, then remove the projectile.
pub fn resolve_projectile_hits(
    mut commands: Commands,
    mut started: MessageReader<CollisionStart>,
    mut q_projectiles: Query<(&mut Projectile, &Transform)>,
    q_players: Query<(), With<Player>>,
    mut damage: MessageWriter<DamageRequest>,
    mut impacts: MessageWriter<ImpactEffect>,
) {
    for ev in started.read() {
        let p1 = q_projectiles.contains(ev.collider1);
        let p2 = q_projectiles.contains(ev.collider2);
        if !(p1 ^ p2) {
            continue; // exactly one side must be a projectile
        }
        let (shot, other) = if p1 {
            (ev.collider1, ev.body2.unwrap_or(ev.collider2))
        } else {
            (ev.collider2, ev.body1.unwrap_or(ev.collider1))
        };

        let Ok((mut projectile, tf)) = q_projectiles.get_mut(shot) else {
            continue;
        };
        if projectile.has_hit {
            continue;
        }
        projectile.has_hit = true;

        let hit_player = q_players.contains(other);
        if hit_player {
            damage.write(DamageRequest {
                target: other,
                amount: projectile.damage,
                source: projectile.owner,
            });
        }
        if projectile.spawn_effect {
            impacts.write(ImpactEffect {
                position: tf.translation,
                hit_player,
            });
        }
        commands.entity(shot).insert(PendingDespawn);
    }
}
