//! Input/selection router: one decision point for select-vs-launch.
//!
//! A click (a mouse or touch release with less than `tap_max_drag_px` of
//! travel, so orbit drags never misfire) is unprojected
//! through the camera and ray-cast against sun + planets:
//!
//! - hit the current follow target  → release it (camera returns home);
//! - hit any other body             → follow it and show its info panel;
//! - miss while following          → release, no probe;
//! - miss otherwise                → launch a probe into the scene.
//!
//! The routing itself lives in [`CameraRig::route_click`]; this module only
//! performs the ray cast and acts on the returned [`ClickAction`].

use crate::camera::{CameraRig, ClickAction, MainCamera};
use crate::config::SimConfig;
use crate::gravity::{spawn_probe, ProbeCounter};
use crate::registry::{Attractor, BodyInfo, BodyRegistry};
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

// ── Resources / messages ──────────────────────────────────────────────────────

/// The body the camera is locked onto, or `None`.  Kept in lockstep with
/// [`CameraRig::mode`] by the router.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SelectedBody(pub Option<Entity>);

/// The follow target changed.  `None` hides the info panel.
#[derive(Message, Debug, Clone, Copy)]
pub struct SelectionChanged {
    pub body: Option<Entity>,
}

/// Accumulated pointer travel since the last left-button press, used to
/// tell taps from orbit drags.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DragTracker {
    pub moved: f32,
}

// ── Pure ray math ─────────────────────────────────────────────────────────────

/// Nearest non-negative ray parameter at which a unit-direction ray hits a
/// sphere, or `None` on a miss.  An origin inside the sphere hits at the
/// exit point.
pub fn ray_sphere_hit(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let near = -b - sqrt_disc;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sqrt_disc;
    (far >= 0.0).then_some(far)
}

/// Cast against every body sphere and return the nearest hit.
///
/// `spheres` is expected in registry order; a strict `<` comparison means
/// exact distance ties resolve to the earlier (registry-order) body.
pub fn pick_body(origin: Vec3, dir: Vec3, spheres: &[(Entity, Vec3, f32)]) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;
    for &(entity, center, radius) in spheres {
        if let Some(t) = ray_sphere_hit(origin, dir, center, radius) {
            if best.is_none_or(|(_, best_t)| t < best_t) {
                best = Some((entity, t));
            }
        }
    }
    best.map(|(entity, _)| entity)
}

/// Initial probe velocity: perpendicular to the launch ray.
///
/// The perpendicular is `dir × (0,1,0)`, falling back to `(1,0,0)` when the
/// ray is nearly parallel to +Y and the cross product would degenerate.
pub fn launch_velocity(dir: Vec3, speed: f32) -> Vec3 {
    let reference = if dir.dot(Vec3::Y).abs() > 0.99 {
        Vec3::X
    } else {
        Vec3::Y
    };
    dir.cross(reference).normalize() * speed
}

// ── Update system ─────────────────────────────────────────────────────────────

/// Route pointer taps into selection changes or probe launches.
///
/// Only runs in [`SessionState::Running`](crate::damage::SessionState);
/// while the restart overlay is up, clicks belong to the overlay.
#[allow(clippy::too_many_arguments)]
pub fn click_router_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut motions: MessageReader<MouseMotion>,
    mut tracker: ResMut<DragTracker>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    registry: Res<BodyRegistry>,
    bodies: Query<(&Transform, &Attractor, &BodyInfo)>,
    mut rig: ResMut<CameraRig>,
    mut selected: ResMut<SelectedBody>,
    mut selection_events: MessageWriter<SelectionChanged>,
    mut counter: ResMut<ProbeCounter>,
) {
    if buttons.just_pressed(MouseButton::Left) {
        tracker.moved = 0.0;
    }
    for motion in motions.read() {
        if buttons.pressed(MouseButton::Left) {
            tracker.moved += motion.delta.length();
        }
    }

    // A tap is a release with under-threshold travel.
    let mut tap: Option<Vec2> = None;
    if buttons.just_released(MouseButton::Left) && tracker.moved <= config.tap_max_drag_px {
        if let Ok(window) = windows.single() {
            tap = window.cursor_position();
        }
    }
    for touch in touches.iter_just_released() {
        if touch.distance().length() <= config.tap_max_drag_px {
            tap = Some(touch.position());
        }
    }
    let Some(pointer) = tap else {
        return;
    };

    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, pointer) else {
        return;
    };
    let dir = ray.direction.as_vec3();

    let mut spheres: Vec<(Entity, Vec3, f32)> = Vec::with_capacity(registry.0.len());
    for &entity in &registry.0 {
        if let Ok((transform, attractor, _)) = bodies.get(entity) {
            spheres.push((entity, transform.translation, attractor.collision_radius));
        }
    }

    match rig.route_click(pick_body(ray.origin, dir, &spheres)) {
        ClickAction::Follow(body) => {
            selected.0 = Some(body);
            selection_events.write(SelectionChanged { body: Some(body) });
            if let Ok((_, _, info)) = bodies.get(body) {
                info!("Following {}", info.name);
            }
        }
        ClickAction::Release => {
            selected.0 = None;
            selection_events.write(SelectionChanged { body: None });
            info!("Follow released");
        }
        ClickAction::Spawn => {
            let position = ray.origin + dir * config.spawn_distance;
            let velocity = launch_velocity(dir, config.spawn_speed);
            spawn_probe(&mut commands, &mut counter, position, velocity);
        }
    }
}
