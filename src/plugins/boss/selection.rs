//! Weighted attack choice.

use rand::Rng;

use super::AttackKind;
use crate::common::tunables::AttackRollTable;

/// Map a roll in `1..=100` to an attack. The middle band uses `coin`.
pub fn attack_for_roll(table: &AttackRollTable, roll: u32, coin: bool) -> AttackKind {
    if roll <= table.melee_max {
        AttackKind::Melee
    } else if roll >= table.ranged_min {
        AttackKind::Ranged
    } else if coin {
        AttackKind::Melee
    } else {
        AttackKind::Ranged
    }
}

pub fn roll_attack(rng: &mut impl Rng, table: &AttackRollTable) -> AttackKind {
    let roll = rng.random_range(1..=100u32);
    let coin = rng.random_bool(0.5);
    attack_for_roll(table, roll, coin)
}
