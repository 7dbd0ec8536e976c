//! Combat resolution: damage and heal requests applied to health.
//!
//! Producers (boss strikes, projectiles, contact, player skills) never touch
//! `Health` directly. They write a [`DamageRequest`] or [`HealRequest`] and the
//! resolver for the target's kind applies it during `FightSet::Resolve`:
//!
//! ```text
//!   Intake/Think: DamageRequest { target, amount }
//!        │
//!        ▼
//!   Resolve: guard check -> hp -= amount -> Hurt / Killed
//!        ├─ boss:   Stun preemption, death handling, phase follow-up
//!        └─ player: defeat sequencing
//! ```
//! Each entity's health therefore has exactly one writer.

pub mod contact;
pub mod resolve;

use avian3d::prelude::{CollisionEnd, CollisionStart};
use bevy::prelude::*;

use crate::plugins::core::FightSet;
use crate::plugins::machine::Guard;

pub use contact::{ContactDamage, ContactExposure};

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: i32,
    pub source: Option<Entity>,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealRequest {
    pub target: Entity,
    pub amount: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Dead target or non-positive amount. Nothing changed.
    Ignored,
    /// Blocked by an avoid or defense window. Nothing changed.
    Absorbed,
    Hurt,
    /// Health reached zero. Reported once per entity.
    Killed,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub hp: i32,
    pub max: i32,
    /// Set on the hit that kills; later hits are ignored.
    pub dead: bool,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self {
            hp: max,
            max,
            dead: false,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn take_damage(&mut self, amount: i32, guard: Guard) -> DamageOutcome {
        if self.dead || amount <= 0 {
            return DamageOutcome::Ignored;
        }
        if guard.blocks() {
            return DamageOutcome::Absorbed;
        }

        self.hp -= amount;
        if self.hp <= 0 {
            self.dead = true;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt
        }
    }

    /// Restore up to `amount`, capped at `max`. Returns what was applied.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.dead || amount <= 0 {
            return 0;
        }
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max);
        self.hp - before
    }
}

/// Scale an incoming hit by a phase multiplier, rounding to the nearest integer.
#[inline]
pub fn scale_damage(amount: i32, multiplier: f32) -> i32 {
    (amount as f32 * multiplier).round() as i32
}

pub fn plugin(app: &mut App) {
    app.add_message::<DamageRequest>()
        .add_message::<HealRequest>()
        // Written by avian when physics runs; registered here so the readers
        // stay valid in headless apps too.
        .add_message::<CollisionStart>()
        .add_message::<CollisionEnd>();

    app.add_systems(
        FixedPostUpdate,
        (contact::track_contacts, contact::tick_contact_damage)
            .chain()
            .in_set(FightSet::Think),
    );
    app.add_systems(
        FixedPostUpdate,
        (resolve::resolve_boss_damage, resolve::resolve_player_damage).in_set(FightSet::Resolve),
    );
}
