//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime, `StatesPlugin` the game states.
//! - we then call `boss_arena::game::configure_headless` to install gameplay plugins.
//!
//! Virtual time is paused so `app.update()` never runs the fixed loop on its
//! own. Fight ticks are driven explicitly with [`fixed_tick`], which makes
//! every test independent of wall-clock time.
#![allow(dead_code)]

use std::time::Duration;

use bevy::ecs::message::{Message, Messages};
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use boss_arena::common::state::GameState;
use boss_arena::common::tunables::Tunables;
use boss_arena::plugins::boss::{Boss, BossState};
use boss_arena::plugins::core::EntityRegistry;
use boss_arena::plugins::machine::StateMachine;
use boss_arena::plugins::phases::ArenaPlaced;

/// Fixed step used by the tests. Binary-exact so sums of it stay exact.
pub const DT: f32 = 0.25;

pub fn app_headless() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));

    boss_arena::game::configure_headless(&mut app);
    app.world_mut().resource_mut::<Time<Virtual>>().pause();
    app
}

/// Headless app with custom tunables.
pub fn app_with(tunables: Tunables) -> App {
    let mut app = app_headless();
    app.insert_resource(tunables);
    app
}

/// Place the arena at the origin and run until `InGame` has been entered.
pub fn enter_fight(app: &mut App) {
    app.world_mut().write_message(ArenaPlaced {
        position: Vec3::ZERO,
    });
    // Placement is read in Update; the state switch lands on the next frame.
    app.update();
    app.update();
    assert_eq!(game_state(app), GameState::InGame);
}

/// Run one fight tick of `dt` seconds.
pub fn fixed_tick(app: &mut App, dt: f32) {
    let mut time = Time::<Fixed>::default();
    time.advance_by(Duration::from_secs_f32(dt));
    app.world_mut().insert_resource(time);
    app.world_mut().run_schedule(FixedPostUpdate);
}

pub fn ticks(app: &mut App, n: usize) {
    for _ in 0..n {
        fixed_tick(app, DT);
    }
}

pub fn game_state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

pub fn registry(app: &App) -> EntityRegistry {
    *app.world().resource::<EntityRegistry>()
}

pub fn bosses(app: &mut App) -> Vec<(Entity, Boss)> {
    app.world_mut()
        .query::<(Entity, &Boss)>()
        .iter(app.world())
        .map(|(e, b)| (e, *b))
        .collect()
}

pub fn boss_state(app: &App, boss: Entity) -> BossState {
    app.world()
        .get::<StateMachine<BossState>>(boss)
        .expect("boss has a state machine")
        .current()
}

pub fn send<M: Message>(app: &mut App, message: M) {
    app.world_mut().resource_mut::<Messages<M>>().write(message);
}

pub fn drain<M: Message>(app: &mut App) -> Vec<M> {
    app.world_mut().resource_mut::<Messages<M>>().drain().collect()
}
