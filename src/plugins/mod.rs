//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod boss;
pub mod combat;
pub mod core;
pub mod feedback;
pub mod machine;
pub mod phases;
pub mod physics;
pub mod player;
pub mod projectiles;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;
pub mod visuals;

/// Register gameplay plugins that work in headless tests.
///
/// Physics is not part of this set: headless tests write collision messages
/// themselves.
pub fn register_gameplay(app: &mut App) {
    // Configures the fight sets everything else lands in.
    core::plugin(app);
    machine::plugin(app);
    feedback::plugin(app);
    combat::plugin(app);
    boss::plugin(app);
    phases::plugin(app);
    player::plugin(app);
    world::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
    visuals::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    physics::plugin(app);
    register_gameplay(app);
    register_render(app);
}
