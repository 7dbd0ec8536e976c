//! Body contact damage.
//!
//! Touching a body that carries [`ContactDamage`] costs `on_enter` once, then
//! `per_second` for every full second the contact is held. Exposure is tracked
//! on the victim so several sources can overlap.

use avian3d::prelude::{CollisionEnd, CollisionStart};
use bevy::prelude::*;

use super::{DamageRequest, Health};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactDamage {
    pub on_enter: i32,
    pub per_second: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Exposure {
    source: Entity,
    held: f32,
    seconds_paid: u32,
}

#[derive(Component, Debug, Default, Clone)]
pub struct ContactExposure {
    touching: Vec<Exposure>,
}

impl ContactExposure {
    pub fn is_touching(&self, source: Entity) -> bool {
        self.touching.iter().any(|x| x.source == source)
    }

    /// Returns `false` if the contact was already being tracked.
    fn begin(&mut self, source: Entity) -> bool {
        if self.is_touching(source) {
            return false;
        }
        self.touching.push(Exposure {
            source,
            held: 0.0,
            seconds_paid: 0,
        });
        true
    }

    fn end(&mut self, source: Entity) {
        self.touching.retain(|x| x.source != source);
    }
}

#[inline]
fn owner(collider: Entity, body: Option<Entity>) -> Entity {
    body.unwrap_or(collider)
}

/// Translate collision start/end into exposure records, charging `on_enter`.
pub fn track_contacts(
    mut started: MessageReader<CollisionStart>,
    mut ended: MessageReader<CollisionEnd>,
    mut q_victims: Query<&mut ContactExposure>,
    q_sources: Query<(&ContactDamage, Option<&Health>)>,
    mut damage: MessageWriter<DamageRequest>,
) {
    for ev in started.read() {
        let a = owner(ev.collider1, ev.body1);
        let b = owner(ev.collider2, ev.body2);
        for (victim, source) in [(a, b), (b, a)] {
            let Ok(mut exposure) = q_victims.get_mut(victim) else {
                continue;
            };
            let Ok((contact, health)) = q_sources.get(source) else {
                continue;
            };
            if health.is_some_and(Health::is_dead) {
                continue;
            }
            if exposure.begin(source) {
                damage.write(DamageRequest {
                    target: victim,
                    amount: contact.on_enter,
                    source: Some(source),
                });
            }
        }
    }

    for ev in ended.read() {
        let a = owner(ev.collider1, ev.body1);
        let b = owner(ev.collider2, ev.body2);
        for (victim, source) in [(a, b), (b, a)] {
            if let Ok(mut exposure) = q_victims.get_mut(victim) {
                exposure.end(source);
            }
        }
    }
}

/// Charge `per_second` for each full second of held contact.
pub fn tick_contact_damage(
    time: Res<Time<Fixed>>,
    mut q_victims: Query<(Entity, &mut ContactExposure)>,
    q_sources: Query<(&ContactDamage, Option<&Health>)>,
    mut damage: MessageWriter<DamageRequest>,
) {
    let dt = time.delta_secs();

    for (victim, mut exposure) in &mut q_victims {
        // Despawned or dead sources stop hurting.
        exposure.touching.retain(|x| {
            q_sources
                .get(x.source)
                .is_ok_and(|(_, h)| !h.is_some_and(Health::is_dead))
        });

        for x in &mut exposure.touching {
            let Ok((contact, _)) = q_sources.get(x.source) else {
                continue;
            };
            x.held += dt;
            let whole = x.held.floor() as u32;
            if whole > x.seconds_paid {
                let owed = (whole - x.seconds_paid) as i32;
                x.seconds_paid = whole;
                damage.write(DamageRequest {
                    target: victim,
                    amount: contact.per_second * owed,
                    source: Some(x.source),
                });
            }
        }
    }
}
