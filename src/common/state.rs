//! Global state machine.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    /// Waiting for the AR layer to report where the arena sits.
    #[default]
    Placement,
    InGame,
    Victory,
    Defeat,
}
