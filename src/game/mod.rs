//! Game composition root.
//!
//! Provides two public configuration functions:
//! - `configure_full`: DefaultPlugins (window/render) + physics + game plugins.
//! - `configure_headless`: minimal configuration for integration tests.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins;
use crate::plugins::core::ArenaRng;
use crate::plugins::phases::ArenaPlaced;

/// Seed used by headless apps so attack rolls replay identically.
pub const HEADLESS_SEED: u64 = 0x5EED_B055;

pub fn run() {
    App::new().add_plugins(configure_full).run();
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Boss Arena".into(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    }));

    plugins::physics::plugin(app);
    configure_game(app);
    plugins::register_render(app);

    // Without an AR session the arena is placed on the desktop origin.
    app.add_systems(
        Update,
        place_on_keypress.run_if(in_state(GameState::Placement)),
    );
}

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - Do NOT add physics or render-only plugins (camera/lighting/visuals).
/// - Tunables are the built-in defaults and the RNG is seeded.
pub fn configure_headless(app: &mut App) {
    app.insert_resource(Tunables::default())
        .insert_resource(ArenaRng::seeded(HEADLESS_SEED));
    configure_game(app);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App) {
    app.init_state::<GameState>();
    plugins::register_gameplay(app);
}

fn place_on_keypress(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut placed: MessageWriter<ArenaPlaced>,
) {
    if keys.just_pressed(KeyCode::Enter) || mouse.just_pressed(MouseButton::Left) {
        placed.write(ArenaPlaced {
            position: Vec3::ZERO,
        });
    }
}
