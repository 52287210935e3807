use bevy::prelude::*;
use bevy::window::WindowResolution;

use orrery::camera::{self, CameraRig};
use orrery::catalog::{self, BodyCatalog};
use orrery::config::{self, SimConfig};
use orrery::damage::{self, BodyDepleted, RestartRequest, SessionState};
use orrery::effects::EffectsPlugin;
use orrery::gravity::{self, CollisionEvent, ProbeCounter};
use orrery::hud::HudPlugin;
use orrery::registry::{self, BodyRegistry};
use orrery::rendering::RenderingPlugin;
use orrery::selection::{self, DragTracker, SelectedBody, SelectionChanged};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Orrery".into(),
                resolution: WindowResolution::new(1280, 720),
                ..Default::default()
            }),
            ..Default::default()
        }))
        // Deep-space blue-black, matching the fog-free void between the stars.
        .insert_resource(ClearColor(Color::srgb(0.0, 0.031, 0.078)))
        // Compiled defaults; the Startup loaders overwrite them from
        // assets/sim.toml and assets/bodies.toml when present.
        .insert_resource(SimConfig::default())
        .insert_resource(BodyCatalog::default())
        .insert_resource(BodyRegistry::default())
        .insert_resource(CameraRig::default())
        .insert_resource(SelectedBody::default())
        .insert_resource(DragTracker::default())
        .insert_resource(ProbeCounter::default())
        .init_state::<SessionState>()
        .add_message::<CollisionEvent>()
        .add_message::<SelectionChanged>()
        .add_message::<BodyDepleted>()
        .add_message::<RestartRequest>()
        .add_systems(
            Startup,
            (
                // Load config first so every other startup system sees the
                // final values.
                config::load_sim_config,
                catalog::load_body_catalog.after(config::load_sim_config),
                registry::spawn_bodies.after(catalog::load_body_catalog),
                camera::setup_camera.after(config::load_sim_config),
            ),
        )
        // The core tick: restart observation, input routing, scripted
        // orbits, probe integration + collisions, damage, then the camera.
        // Each stage depends on the one before it, hence the explicit chain.
        .add_systems(
            Update,
            (
                registry::apply_restart_system,
                selection::click_router_system.run_if(in_state(SessionState::Running)),
                registry::advance_orbits_system,
                registry::spin_bodies_system,
                gravity::gravity_step_system,
                gravity::cull_particles_system,
                damage::damage_system,
                camera::camera_free_input_system,
                camera::camera_animate_system,
            )
                .chain(),
        )
        .add_plugins((EffectsPlugin, RenderingPlugin, HudPlugin))
        .run();
}
