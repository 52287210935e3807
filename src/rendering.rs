//! Scene presentation: body and probe meshes, the sun light, orbit rings,
//! the starfield, and depleted-body tinting.
//!
//! Everything here consumes the core's components and messages
//! ([`BodyInfo`], [`Particle`], [`BodyDepleted`], [`RestartRequest`]) and
//! writes only render-side state; the simulation never reads back from
//! this module.

use crate::config::SimConfig;
use crate::damage::{BodyDepleted, RestartRequest};
use crate::gravity::Particle;
use crate::registry::{Attractor, BodyColor, BodyInfo, Planet, ScriptedOrbit, Sun};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::PrimitiveTopology;
use rand::Rng;

// ── Component markers ─────────────────────────────────────────────────────────

/// Marker for the point light parented to the sun.
#[derive(Component)]
pub struct SunLight;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_lighting, setup_starfield))
            .add_systems(
                Update,
                (
                    attach_body_mesh_system,
                    attach_probe_mesh_system,
                    orbit_rings_system,
                    depleted_tint_system,
                    restore_tint_system,
                ),
            );
    }
}

// ── Materials ─────────────────────────────────────────────────────────────────

fn sun_material(color: [f32; 3]) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb(color[0], color[1], color[2]),
        emissive: LinearRgba::rgb(color[0] * 6.0, color[1] * 6.0, color[2] * 6.0),
        ..default()
    }
}

fn planet_material(color: [f32; 3]) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb(color[0], color[1], color[2]),
        perceptual_roughness: 0.9,
        ..default()
    }
}

fn depleted_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb(0.16, 0.14, 0.13),
        perceptual_roughness: 1.0,
        ..default()
    }
}

// ── Startup systems ───────────────────────────────────────────────────────────

/// Faint ambient fill so night sides stay readable against the void.
pub fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 60.0,
        ..default()
    });
}

/// Scatter the background starfield: a single point-list mesh with one
/// vertex per star, unlit white.
pub fn setup_starfield(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = rand::thread_rng();
    let spread = config.star_spread;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(config.star_count);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(config.star_count);
    for _ in 0..config.star_count {
        positions.push([
            rng.gen_range(-spread..spread),
            rng.gen_range(-spread..spread),
            rng.gen_range(-spread..spread),
        ]);
        normals.push([0.0, 1.0, 0.0]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::PointList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        })),
        Transform::default(),
        Visibility::default(),
    ));
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Attach a sphere mesh and material to every newly-spawned body.
///
/// The sun also receives its point light as a child, so the light tracks
/// the (stationary) sun without a dedicated system.
pub fn attach_body_mesh_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    query: Query<(Entity, &Attractor, &BodyColor, Option<&Sun>), Added<BodyInfo>>,
) {
    for (entity, attractor, color, sun) in query.iter() {
        let mesh = meshes.add(Sphere::new(attractor.collision_radius));
        let material = if sun.is_some() {
            materials.add(sun_material(color.0))
        } else {
            materials.add(planet_material(color.0))
        };
        commands.entity(entity).insert((Mesh3d(mesh), MeshMaterial3d(material)));

        if sun.is_some() {
            commands.entity(entity).with_children(|parent| {
                parent.spawn((
                    SunLight,
                    PointLight {
                        color: Color::WHITE,
                        intensity: 2_000_000.0,
                        range: 200.0,
                        shadows_enabled: true,
                        ..default()
                    },
                ));
            });
        }
    }
}

/// Attach a small bright sphere to every newly-launched probe.
pub fn attach_probe_mesh_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    query: Query<Entity, Added<Particle>>,
) {
    for entity in query.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(0.12))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.75, 0.95, 1.0),
                emissive: LinearRgba::rgb(1.2, 2.4, 3.0),
                ..default()
            })),
        ));
    }
}

/// Draw a translucent ring on the orbital plane for every planet.
pub fn orbit_rings_system(mut gizmos: Gizmos, query: Query<&ScriptedOrbit, With<Planet>>) {
    let flat = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
    for orbit in query.iter() {
        gizmos
            .circle(
                Isometry3d::from_rotation(flat),
                orbit.radius,
                Color::srgba(1.0, 1.0, 1.0, 0.25),
            )
            .resolution(96);
    }
}

/// Swap a depleted body's material for the burned-out look; a depleted sun
/// also loses most of its light.
pub fn depleted_tint_system(
    mut depletions: MessageReader<BodyDepleted>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    bodies: Query<(&MeshMaterial3d<StandardMaterial>, Option<&Sun>)>,
    mut sun_lights: Query<&mut PointLight, With<SunLight>>,
) {
    for depletion in depletions.read() {
        let Ok((material_handle, sun)) = bodies.get(depletion.body) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&material_handle.0) {
            *material = depleted_material();
        }
        if sun.is_some() {
            for mut light in sun_lights.iter_mut() {
                light.intensity = 40_000.0;
            }
        }
    }
}

/// Restore every body's catalog material (and the sun light) on restart.
pub fn restore_tint_system(
    mut restarts: MessageReader<RestartRequest>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    bodies: Query<(&MeshMaterial3d<StandardMaterial>, &BodyColor, Option<&Sun>), With<BodyInfo>>,
    mut sun_lights: Query<&mut PointLight, With<SunLight>>,
) {
    if restarts.read().next().is_none() {
        return;
    }
    for (material_handle, color, sun) in bodies.iter() {
        if let Some(material) = materials.get_mut(&material_handle.0) {
            *material = if sun.is_some() {
                sun_material(color.0)
            } else {
                planet_material(color.0)
            };
        }
    }
    for mut light in sun_lights.iter_mut() {
        light.intensity = 2_000_000.0;
    }
}
