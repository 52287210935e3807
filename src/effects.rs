//! Impact flashes: fire-and-forget glow bursts at collision points.
//!
//! These are presentation-only entities: the simulation core emits
//! [`CollisionEvent`] and never looks at them again.  Each flash owns its
//! age, grows while fading with a quadratic ease-out, and despawns itself
//! when its lifetime runs out.
//!
//! A single shared sphere mesh ([`FlashMesh`]) is created at startup; each
//! flash receives its own material so its alpha and emissive strength can be
//! faded individually.

use crate::config::SimConfig;
use crate::gravity::CollisionEvent;
use bevy::prelude::*;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Shared sphere mesh used by all flash entities (created once at startup).
#[derive(Resource)]
pub struct FlashMesh(pub Handle<Mesh>);

// ── Component ─────────────────────────────────────────────────────────────────

/// Short-lived glow burst at an impact point.
///
/// After spawning, `attach_flash_mesh_system` inserts the `Mesh3d` /
/// `MeshMaterial3d` pair and records the material handle; `flash_update_system`
/// then grows, fades, and eventually despawns it.
#[derive(Component)]
pub struct ImpactFlash {
    /// Time alive so far (s).
    pub age: f32,
    /// Total lifetime (s); the entity despawns when `age >= lifetime`.
    pub lifetime: f32,
    /// This flash's unique material, written by `attach_flash_mesh_system`.
    pub material: Option<Handle<StandardMaterial>>,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_flash_mesh).add_systems(
            Update,
            (
                spawn_impact_flash_system,
                attach_flash_mesh_system,
                flash_update_system,
            )
                .chain(),
        );
    }
}

// ── Startup system ────────────────────────────────────────────────────────────

fn init_flash_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(Sphere::new(0.3));
    commands.insert_resource(FlashMesh(handle));
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Spawn one flash per collision event at the recorded impact position.
pub fn spawn_impact_flash_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut collisions: MessageReader<CollisionEvent>,
) {
    for collision in collisions.read() {
        commands.spawn((
            ImpactFlash {
                age: 0.0,
                lifetime: config.flash_lifetime,
                material: None,
            },
            Transform::from_translation(collision.position),
            Visibility::default(),
        ));
    }
}

/// Attach the shared mesh and a unique material to every new flash.
///
/// Uses [`Added<ImpactFlash>`] so steady-state flashes cost nothing here.
pub fn attach_flash_mesh_system(
    mut commands: Commands,
    flash_mesh: Res<FlashMesh>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(Entity, &mut ImpactFlash), Added<ImpactFlash>>,
) {
    for (entity, mut flash) in query.iter_mut() {
        let handle = materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 0.75, 0.25, 1.0),
            emissive: LinearRgba::rgb(6.0, 3.5, 0.8),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        flash.material = Some(handle.clone());
        commands
            .entity(entity)
            .insert((Mesh3d(flash_mesh.0.clone()), MeshMaterial3d(handle)));
    }
}

/// Grow each flash, fade it with a quadratic ease-out, and despawn expired
/// ones.
pub fn flash_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(Entity, &mut Transform, &mut ImpactFlash)>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut flash) in query.iter_mut() {
        flash.age += dt;

        if flash.age >= flash.lifetime {
            commands.entity(entity).despawn();
            continue;
        }

        let t = flash.age / flash.lifetime; // 0 → 1
        let fade = (1.0 - t).powi(2);
        transform.scale = Vec3::splat(1.0 + 2.5 * t);

        if let Some(ref handle) = flash.material {
            if let Some(material) = materials.get_mut(handle) {
                material.base_color = Color::srgba(1.0, 0.75, 0.25, fade);
                material.emissive = LinearRgba::rgb(6.0 * fade, 3.5 * fade, 0.8 * fade);
            }
        }
    }
}
