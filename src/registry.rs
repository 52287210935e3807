//! Orbital body registry: components, spawn, and scripted motion.
//!
//! Bodies follow *scripted* circular orbits: they are gravity sources for
//! probes but do not attract each other.  That simplification is deliberate
//! and kept out of the solver: this module owns the scripted update rule,
//! [`crate::gravity`] owns free-particle integration, and the two never mix.
//!
//! [`BodyRegistry`] records the bodies in deterministic order (sun first,
//! then planets in catalog order).  The solver iterates that order for both
//! force accumulation and collision testing, which makes the first-hit-wins
//! tie-break explicit instead of an accident of ECS query order.

use crate::camera::{CameraMode, CameraRig};
use crate::catalog::BodyCatalog;
use crate::config::SimConfig;
use crate::damage::{Health, RestartRequest, SessionState};
use crate::gravity::{Particle, ProbeCounter};
use crate::selection::{SelectedBody, SelectionChanged};
use bevy::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Display metadata for a body, consumed only by the presentation layer.
#[derive(Component, Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub description: String,
    pub fun_fact: String,
}

/// Gravity-source weight and collision sphere of a body.
#[derive(Component, Debug, Clone, Copy)]
pub struct Attractor {
    /// Design-constant mass; only ever used as `G * mass / d²`.
    pub mass: f32,
    /// Probes closer than this to the body's centre collide with it.
    pub collision_radius: f32,
}

/// Scripted circular orbit around the sun at the origin.
#[derive(Component, Debug, Clone, Copy)]
pub struct ScriptedOrbit {
    /// Orbit radius (validated > 0 at catalog load).
    pub radius: f32,
    /// Current phase angle (radians).
    pub angle: f32,
    /// Phase assigned at spawn; restored on session restart.
    pub initial_angle: f32,
}

/// Cosmetic self-rotation about local +Y.
#[derive(Component, Debug, Clone, Copy)]
pub struct SpinPhase {
    pub angle: f32,
    pub rate: f32,
}

/// Base material color from the catalog, kept so the presentation layer can
/// restore it after a depleted tint.
#[derive(Component, Debug, Clone, Copy)]
pub struct BodyColor(pub [f32; 3]);

/// Marker for the sun entity.
#[derive(Component)]
pub struct Sun;

/// Marker for planet entities.
#[derive(Component)]
pub struct Planet;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Bodies in deterministic iteration order: sun first, then planets in
/// catalog order.  This is the documented collision tie-break.
#[derive(Resource, Debug, Clone, Default)]
pub struct BodyRegistry(pub Vec<Entity>);

// ── Pure orbit math ───────────────────────────────────────────────────────────

/// Phase advance for one frame: inner orbits move faster by `1/sqrt(r)`.
#[inline]
pub fn advance_angle(angle: f32, orbit_radius: f32, base_rate: f32, dt: f32) -> f32 {
    angle + base_rate / orbit_radius.sqrt() * dt
}

/// World position on the orbital plane (y = 0) for a phase angle.
#[inline]
pub fn orbit_position(angle: f32, orbit_radius: f32) -> Vec3 {
    Vec3::new(angle.cos() * orbit_radius, 0.0, angle.sin() * orbit_radius)
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Spawn the sun and every validated planet, and record registry order.
///
/// Planet `i` of `n` starts at phase `TAU / n * i`, spreading the planets
/// evenly around the sun on the first frame.
pub fn spawn_bodies(
    mut commands: Commands,
    catalog: Res<BodyCatalog>,
    config: Res<SimConfig>,
    mut registry: ResMut<BodyRegistry>,
) {
    registry.0.clear();

    let star = &catalog.star;
    let sun = commands
        .spawn((
            Sun,
            BodyInfo {
                name: star.name.clone(),
                description: star.description.clone(),
                fun_fact: star.fun_fact.clone(),
            },
            Attractor {
                mass: star.mass,
                collision_radius: star.size,
            },
            Health::new(star.max_hp),
            SpinPhase {
                angle: 0.0,
                rate: config.sun_spin_rate,
            },
            BodyColor(star.color),
            Transform::from_translation(Vec3::ZERO),
            Visibility::default(),
        ))
        .id();
    registry.0.push(sun);

    let count = catalog.planets.len().max(1) as f32;
    for (index, entry) in catalog.planets.iter().enumerate() {
        let initial_angle = std::f32::consts::TAU / count * index as f32;
        let planet = commands
            .spawn((
                Planet,
                BodyInfo {
                    name: entry.name.clone(),
                    description: entry.description.clone(),
                    fun_fact: entry.fun_fact.clone(),
                },
                Attractor {
                    mass: entry.mass,
                    collision_radius: entry.size,
                },
                Health::new(entry.max_hp),
                ScriptedOrbit {
                    radius: entry.orbit,
                    angle: initial_angle,
                    initial_angle,
                },
                SpinPhase {
                    angle: 0.0,
                    rate: config.planet_spin_rate,
                },
                BodyColor(entry.color),
                Transform::from_translation(orbit_position(initial_angle, entry.orbit)),
                Visibility::default(),
            ))
            .id();
        registry.0.push(planet);
    }

    info!(
        "Spawned {} ({} planets orbiting {})",
        registry.0.len(),
        catalog.planets.len(),
        star.name
    );
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Advance every scripted orbit and recompute the planet's world position.
///
/// The sun has no [`ScriptedOrbit`] and stays pinned at the origin.
pub fn advance_orbits_system(
    time: Res<Time>,
    config: Res<SimConfig>,
    mut query: Query<(&mut ScriptedOrbit, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (mut orbit, mut transform) in query.iter_mut() {
        orbit.angle = advance_angle(orbit.angle, orbit.radius, config.base_angular_rate, dt);
        transform.translation = orbit_position(orbit.angle, orbit.radius);
    }
}

/// Advance cosmetic self-rotation for sun and planets.
pub fn spin_bodies_system(time: Res<Time>, mut query: Query<(&mut SpinPhase, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut spin, mut transform) in query.iter_mut() {
        spin.angle += spin.rate * dt;
        transform.rotation = Quat::from_rotation_y(spin.angle);
    }
}

/// Apply a pending [`RestartRequest`] at the top of the tick.
///
/// A restart requested during frame N is observed here at the start of frame
/// N+1, never mid-computation.  Probes are despawned, every body's health
/// and orbit phase return to their spawn values, the selection is cleared,
/// and the camera animates home.
#[allow(clippy::too_many_arguments)]
pub fn apply_restart_system(
    mut commands: Commands,
    mut restarts: MessageReader<RestartRequest>,
    mut next_state: ResMut<NextState<SessionState>>,
    mut selected: ResMut<SelectedBody>,
    mut selection_events: MessageWriter<SelectionChanged>,
    mut rig: ResMut<CameraRig>,
    mut counter: ResMut<ProbeCounter>,
    particles: Query<Entity, With<Particle>>,
    mut bodies: Query<(&mut Health, Option<&mut ScriptedOrbit>), With<BodyInfo>>,
) {
    if restarts.read().next().is_none() {
        return;
    }

    for entity in particles.iter() {
        commands.entity(entity).despawn();
    }
    for (mut health, orbit) in bodies.iter_mut() {
        health.reset();
        if let Some(mut orbit) = orbit {
            orbit.angle = orbit.initial_angle;
        }
    }

    if selected.0.take().is_some() {
        selection_events.write(SelectionChanged { body: None });
    }
    rig.mode = CameraMode::Returning;
    counter.0 = 0;
    next_state.set(SessionState::Running);
    info!("Session restarted");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_increment_scales_with_inverse_sqrt_radius() {
        let rate = 0.3;
        let dt = 0.016;
        for radius in [6.0_f32, 8.0, 10.0] {
            let next = advance_angle(1.0, radius, rate, dt);
            let expected = 1.0 + rate / radius.sqrt() * dt;
            assert!((next - expected).abs() < 1e-6, "radius {radius}");
        }
    }

    #[test]
    fn inner_orbit_outpaces_outer_orbit() {
        let inner = advance_angle(0.0, 6.0, 0.3, 1.0);
        let outer = advance_angle(0.0, 10.0, 0.3, 1.0);
        assert!(inner > outer);
    }

    #[test]
    fn orbit_position_places_cos_on_x_and_sin_on_z() {
        let pos = orbit_position(0.0, 10.0);
        assert!((pos - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-6);

        let pos = orbit_position(std::f32::consts::FRAC_PI_2, 10.0);
        assert!((pos - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);

        // The plane is y = 0 for every phase.
        for i in 0..16 {
            let angle = i as f32 * 0.4;
            assert_eq!(orbit_position(angle, 8.0).y, 0.0);
        }
    }

    #[test]
    fn reconstruction_is_consistent_with_advance() {
        let mut angle = 0.7;
        let radius = 8.0;
        for _ in 0..100 {
            angle = advance_angle(angle, radius, 0.3, 0.016);
        }
        let pos = orbit_position(angle, radius);
        assert!((pos.length() - radius).abs() < 1e-3);
    }
}
