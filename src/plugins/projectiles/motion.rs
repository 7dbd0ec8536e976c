use bevy::prelude::*;

use super::components::{Lifetime, Minion, MinionState, Motion, Projectile};
use crate::plugins::core::PendingDespawn;
use crate::plugins::machine::{NoHooks, StateMachine};
use crate::plugins::player::Player;

/// Minion behaviour: hover while emerging, then chase until the target is gone.
pub fn update_minions(
    mut commands: Commands,
    mut q: Query<(Entity, &Minion, &mut StateMachine<MinionState>, &mut Motion), Without<PendingDespawn>>,
    q_targets: Query<(), With<Player>>,
) {
    for (entity, minion, mut machine, mut motion) in &mut q {
        let target = minion.target.filter(|e| q_targets.contains(*e));

        let next = match (machine.current(), target) {
            (_, None) if !machine.is_terminal() => Some(MinionState::Spent),
            (MinionState::Emerge, Some(target)) if machine.time_in_state() >= minion.emerge => {
                *motion = Motion::Homing {
                    target,
                    speed: minion.speed,
                };
                Some(MinionState::Chase)
            }
            _ => None,
        };

        if let Some(next) = next {
            machine.change_state(next, &mut NoHooks);
        }
        if machine.is(MinionState::Spent) {
            commands.entity(entity).insert(PendingDespawn);
        }
    }
}

pub fn move_projectiles(
    time: Res<Time<Fixed>>,
    mut q: Query<(&Motion, &mut Transform), (With<Projectile>, Without<PendingDespawn>)>,
    q_targets: Query<&Transform, (With<Player>, Without<Projectile>)>,
) {
    let dt = time.delta_secs();
    for (motion, mut tf) in &mut q {
        match *motion {
            Motion::Hover => {}
            Motion::Ballistic { velocity } => tf.translation += velocity * dt,
            Motion::Homing { target, speed } => {
                let Ok(target_tf) = q_targets.get(target) else {
                    continue;
                };
                let to = target_tf.translation - tf.translation;
                let step = (speed * dt).min(to.length());
                let dir = to.normalize_or_zero();
                tf.translation += dir * step;
                if dir != Vec3::ZERO {
                    tf.look_to(dir, Vec3::Y);
                }
            }
        }
    }
}

/// Remove projectiles past their lifetime or too far from their owner.
/// No damage, no effect.
pub fn expire_projectiles(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut q: Query<(Entity, &Projectile, &mut Lifetime, &Transform), Without<PendingDespawn>>,
    q_owners: Query<&Transform, Without<Projectile>>,
) {
    let delta = time.delta();
    for (entity, projectile, mut lifetime, tf) in &mut q {
        lifetime.0.tick(delta);
        let anchor = projectile
            .owner
            .and_then(|owner| q_owners.get(owner).ok())
            .map_or(projectile.origin, |owner_tf| owner_tf.translation);
        let reach = tf.translation.distance(anchor);
        if lifetime.0.is_finished() || reach > projectile.max_distance {
            commands.entity(entity).insert(PendingDespawn);
        }
    }
}
