//! Physics: avian3d with gravity off. Only the full app installs it; headless
//! tests feed collision messages directly.

use avian3d::prelude::*;
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default());
    // Nothing in the arena falls; bodies are moved by gameplay.
    app.insert_resource(Gravity(Vec3::ZERO));
}
