//! Gravity and collision solver for user-launched probes.
//!
//! Probes are free particles integrated with explicit (forward) Euler under
//! the pull of every registered body.  Bodies are unaffected; the scripted
//! orbits in [`crate::registry`] are the only thing that moves them.
//!
//! ## Determinism
//!
//! Force accumulation and collision testing both iterate
//! [`BodyRegistry`](crate::registry::BodyRegistry) order (sun first, then
//! planets in catalog order).  Given identical body and probe state, a step
//! therefore produces identical results; the first-hit-wins collision
//! tie-break is registry order by construction, not ECS query order.
//!
//! ## Removal safety
//!
//! Collision despawns are queued through [`Commands`] and applied after the
//! system finishes, so in-pass removal can never skip or double-process a
//! probe.  A probe is fully integrated before its collision test runs; at
//! most one collision is consumed per probe per step.

use crate::config::SimConfig;
use crate::registry::{Attractor, BodyInfo, BodyRegistry};
use bevy::prelude::*;

// ── Components / resources ────────────────────────────────────────────────────

/// A live probe: its velocity and cosmetic name.
///
/// Position lives in the entity's [`Transform`].  Probes are despawned on
/// collision with any body or when they pass the cull distance.
#[derive(Component, Debug, Clone)]
pub struct Particle {
    /// World-space velocity (units/s).
    pub velocity: Vec3,
    /// Cosmetic identifier ("Probe-7"), used by the collision log.
    pub name: String,
}

/// Monotonic counter behind probe names.  Reset on session restart.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ProbeCounter(pub u32);

// ── Messages ──────────────────────────────────────────────────────────────────

/// A probe struck a body this frame.
///
/// Consumed by the damage tracker (HP), the collision log, and the impact
/// flash spawner.  Fired at most once per probe.
#[derive(Message, Debug, Clone)]
pub struct CollisionEvent {
    pub particle: Entity,
    pub particle_name: String,
    pub body: Entity,
    pub body_name: String,
    /// Probe position at the moment of impact (flash placement).
    pub position: Vec3,
}

// ── Pure force math ───────────────────────────────────────────────────────────

/// Acceleration applied to a probe at `from` by a body of `mass` at `to`.
///
/// Simplified isotropic point-mass model: `G * mass / d²` toward the body.
/// Distances below `min_dist` are clamped before the division, the explicit
/// guard that keeps a probe grazing a body's centre from receiving a
/// near-infinite kick.  At exactly zero separation the direction is
/// undefined and the body contributes nothing.
#[inline]
pub fn gravity_accel(from: Vec3, to: Vec3, mass: f32, gravity_const: f32, min_dist: f32) -> Vec3 {
    let delta = to - from;
    let dist = delta.length();
    let dist_sq = (dist * dist).max(min_dist * min_dist);
    delta.normalize_or_zero() * (gravity_const * mass / dist_sq)
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Spawn a probe with the next sequential name.
pub fn spawn_probe(
    commands: &mut Commands,
    counter: &mut ProbeCounter,
    position: Vec3,
    velocity: Vec3,
) -> Entity {
    counter.0 += 1;
    let name = format!("Probe-{}", counter.0);
    info!("Launched {name}");
    commands
        .spawn((
            Particle { velocity, name },
            Transform::from_translation(position),
            Visibility::default(),
        ))
        .id()
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Advance every probe one Euler step and resolve collisions.
///
/// Per probe: accumulate acceleration over all bodies (registry order),
/// integrate `velocity += a·dt; position += v·dt`, then test collision in
/// registry order and despawn on the first hit.  No-op when no probes live.
pub fn gravity_step_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<SimConfig>,
    registry: Res<BodyRegistry>,
    bodies: Query<(&Transform, &Attractor, &BodyInfo), Without<Particle>>,
    mut particles: Query<(Entity, &mut Transform, &mut Particle)>,
    mut collisions: MessageWriter<CollisionEvent>,
) {
    let dt = time.delta_secs();

    // Snapshot attractors once, in registry order.
    let mut attractors: Vec<(Entity, Vec3, f32, f32, &str)> = Vec::with_capacity(registry.0.len());
    for &entity in &registry.0 {
        if let Ok((transform, attractor, info)) = bodies.get(entity) {
            attractors.push((
                entity,
                transform.translation,
                attractor.mass,
                attractor.collision_radius,
                info.name.as_str(),
            ));
        }
    }

    for (entity, mut transform, mut particle) in particles.iter_mut() {
        let mut accel = Vec3::ZERO;
        for &(_, body_pos, mass, _, _) in &attractors {
            accel += gravity_accel(
                transform.translation,
                body_pos,
                mass,
                config.gravity_const,
                config.min_gravity_dist,
            );
        }
        let velocity = particle.velocity + accel * dt;
        particle.velocity = velocity;
        transform.translation += velocity * dt;

        for &(body, body_pos, _, collision_radius, name) in &attractors {
            if transform.translation.distance(body_pos) < collision_radius {
                collisions.write(CollisionEvent {
                    particle: entity,
                    particle_name: particle.name.clone(),
                    body,
                    body_name: name.to_owned(),
                    position: transform.translation,
                });
                commands.entity(entity).despawn();
                break;
            }
        }
    }
}

/// Remove probes that have escaped past the cull distance.
pub fn cull_particles_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    particles: Query<(Entity, &Transform, &Particle)>,
) {
    for (entity, transform, particle) in particles.iter() {
        if transform.translation.length() > config.particle_cull_distance {
            info!("{} left the system", particle.name);
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BodyRegistry;

    /// Collected copies of the frame's collision messages.
    #[derive(Resource, Default)]
    struct CapturedCollisions(Vec<CollisionEvent>);

    fn capture_collisions(
        mut reader: MessageReader<CollisionEvent>,
        mut captured: ResMut<CapturedCollisions>,
    ) {
        for message in reader.read() {
            captured.0.push(message.clone());
        }
    }

    fn solver_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(SimConfig::default());
        app.insert_resource(BodyRegistry::default());
        app.insert_resource(CapturedCollisions::default());
        app.add_message::<CollisionEvent>();
        app.add_systems(Update, (gravity_step_system, capture_collisions).chain());
        app
    }

    fn spawn_body(app: &mut App, pos: Vec3, mass: f32, radius: f32, name: &str) -> Entity {
        let entity = app
            .world_mut()
            .spawn((
                BodyInfo {
                    name: name.into(),
                    description: String::new(),
                    fun_fact: String::new(),
                },
                Attractor {
                    mass,
                    collision_radius: radius,
                },
                Transform::from_translation(pos),
            ))
            .id();
        app.world_mut().resource_mut::<BodyRegistry>().0.push(entity);
        entity
    }

    fn spawn_test_probe(app: &mut App, pos: Vec3, vel: Vec3, name: &str) -> Entity {
        app.world_mut()
            .spawn((
                Particle {
                    velocity: vel,
                    name: name.into(),
                },
                Transform::from_translation(pos),
            ))
            .id()
    }

    fn particle_count(world: &mut World) -> usize {
        world
            .query_filtered::<Entity, With<Particle>>()
            .iter(world)
            .count()
    }

    #[test]
    fn acceleration_points_toward_the_body() {
        let accel = gravity_accel(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 900.0, 0.5, 0.25);
        assert!(accel.x < 0.0);
        assert!(accel.y.abs() < 1e-6 && accel.z.abs() < 1e-6);
    }

    #[test]
    fn acceleration_is_deterministic() {
        let a = gravity_accel(Vec3::new(3.0, 1.0, -2.0), Vec3::ZERO, 900.0, 0.5, 0.25);
        let b = gravity_accel(Vec3::new(3.0, 1.0, -2.0), Vec3::ZERO, 900.0, 0.5, 0.25);
        assert_eq!(a, b);
    }

    #[test]
    fn near_zero_distance_is_clamped_finite() {
        let accel = gravity_accel(Vec3::new(1e-5, 0.0, 0.0), Vec3::ZERO, 900.0, 0.5, 0.25);
        assert!(accel.is_finite());
        let cap = 0.5 * 900.0 / (0.25 * 0.25);
        assert!(accel.length() <= cap + 1e-3);
    }

    #[test]
    fn zero_distance_contributes_nothing() {
        let accel = gravity_accel(Vec3::ZERO, Vec3::ZERO, 900.0, 0.5, 0.25);
        assert_eq!(accel, Vec3::ZERO);
    }

    #[test]
    fn a_full_step_sequence_is_reproducible() {
        let bodies = [
            (Vec3::ZERO, 900.0),
            (Vec3::new(10.0, 0.0, 0.0), 60.0),
            (Vec3::new(0.0, 0.0, 8.0), 45.0),
        ];
        let run = || {
            let dt = 0.016;
            let mut pos = Vec3::new(6.0, 1.0, -4.0);
            let mut vel = Vec3::new(0.0, 0.0, 2.0);
            for _ in 0..50 {
                let mut accel = Vec3::ZERO;
                for &(body, mass) in &bodies {
                    accel += gravity_accel(pos, body, mass, 0.5, 0.25);
                }
                vel += accel * dt;
                pos += vel * dt;
            }
            (pos, vel)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn empty_particle_set_is_a_no_op() {
        let mut app = solver_app();
        spawn_body(&mut app, Vec3::ZERO, 900.0, 1.5, "Sun");
        app.update();
        assert!(app.world().resource::<CapturedCollisions>().0.is_empty());
    }

    #[test]
    fn all_colliding_probes_are_removed_with_one_event_each() {
        let mut app = solver_app();
        spawn_body(&mut app, Vec3::ZERO, 900.0, 1.5, "Sun");

        // All eight start inside the collision radius, in varied directions.
        for i in 0..8 {
            let angle = i as f32 * 0.7;
            let pos = Vec3::new(angle.cos(), 0.1, angle.sin()) * 0.9;
            spawn_test_probe(&mut app, pos, Vec3::ZERO, &format!("P{i}"));
        }
        app.update();

        assert_eq!(particle_count(app.world_mut()), 0);
        let captured = app.world().resource::<CapturedCollisions>();
        assert_eq!(captured.0.len(), 8);
        let mut names: Vec<_> = captured.0.iter().map(|c| c.particle_name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8, "no probe may collide twice");
    }

    #[test]
    fn probe_inside_sun_collides_without_nan() {
        let mut app = solver_app();
        let sun = spawn_body(&mut app, Vec3::ZERO, 900.0, 1.5, "Sun");

        // Directly on the sun-probe line, already within the collision
        // radius: the same step must both clamp the near-field force and
        // consume the collision.
        spawn_test_probe(&mut app, Vec3::new(0.01, 0.0, 0.0), Vec3::ZERO, "Grazer");
        app.update();

        assert_eq!(particle_count(app.world_mut()), 0);
        let captured = app.world().resource::<CapturedCollisions>();
        assert_eq!(captured.0.len(), 1);
        assert_eq!(captured.0[0].body, sun);
        assert!(captured.0[0].position.is_finite());
    }

    #[test]
    fn first_hit_follows_registry_order() {
        let mut app = solver_app();
        let sun = spawn_body(&mut app, Vec3::ZERO, 900.0, 2.0, "Sun");
        let _planet = spawn_body(&mut app, Vec3::new(0.5, 0.0, 0.0), 40.0, 2.0, "Overlap");

        // Inside both collision spheres: the sun wins because it is first in
        // the registry.
        spawn_test_probe(&mut app, Vec3::new(0.3, 0.0, 0.0), Vec3::ZERO, "Tie");
        app.update();

        let captured = app.world().resource::<CapturedCollisions>();
        assert_eq!(captured.0.len(), 1);
        assert_eq!(captured.0[0].body, sun);
    }

    #[test]
    fn surviving_probe_keeps_integrating() {
        let mut app = solver_app();
        spawn_body(&mut app, Vec3::ZERO, 900.0, 1.5, "Sun");
        let probe = spawn_test_probe(&mut app, Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, "Far");

        // First update has dt = 0 under MinimalPlugins; run a few frames so
        // real time accumulates.
        for _ in 0..5 {
            app.update();
        }

        let particle = app.world().get::<Particle>(probe).expect("probe alive");
        // Pulled toward the origin along -X.
        assert!(particle.velocity.x <= 0.0);
        assert!(particle.velocity.is_finite());
    }
}
