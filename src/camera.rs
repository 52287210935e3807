//! Camera controller: free orbit, target follow, and the return animation.
//!
//! The camera is always in exactly one of three modes, held in
//! [`CameraRig`]:
//!
//! | Mode        | Behavior                                                    |
//! |-------------|-------------------------------------------------------------|
//! | `Free`      | Pointer drag orbits around the origin; wheel/pinch zooms    |
//! | `Following` | Exponential approach to `body + offset`, look-at the body   |
//! | `Returning` | Same approach toward the default pose, then back to `Free`  |
//!
//! Mode is a single tagged state consumed by [`CameraRig::route_click`], the
//! one transition function, so there are no independent "selected" /
//! "animating" booleans to fall out of sync.  Manual rotate/zoom input only
//! applies in `Free`; zoom is clamped into the configured distance band
//! after every individual adjustment, so no input sequence can push the
//! camera through a body or out to infinity.

use crate::config::SimConfig;
use crate::constants::{DEFAULT_CAMERA_POS, FOLLOW_OFFSET};
use crate::registry::BodyInfo;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

/// Marker for the one scene camera.
#[derive(Component)]
pub struct MainCamera;

// ── Rig state ─────────────────────────────────────────────────────────────────

/// The camera's current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// User-driven orbit/zoom around the origin.
    #[default]
    Free,
    /// Offset-locked onto a body, tracking its live position.
    Following { target: Entity },
    /// Animating back to the default pose; becomes `Free` on arrival.
    Returning,
}

/// Camera state machine plus the poses it animates between.
#[derive(Resource, Debug, Clone)]
pub struct CameraRig {
    pub mode: CameraMode,
    /// Pose restored when a follow is released.
    pub default_pos: Vec3,
    /// Viewing offset from a followed body.
    pub follow_offset: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            mode: CameraMode::Free,
            default_pos: Vec3::from_array(DEFAULT_CAMERA_POS),
            follow_offset: Vec3::from_array(FOLLOW_OFFSET),
        }
    }
}

/// What the input router should do after a click has been routed through the
/// state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// A new body became the follow target.
    Follow(Entity),
    /// The follow target was released (toggle-off or empty click while
    /// following); the camera is returning.
    Release,
    /// Empty space was clicked while not following: launch a probe.
    Spawn,
}

impl CameraRig {
    /// The single select-vs-spawn decision point.
    ///
    /// `hit` is the ray-cast result for this click.  Transitions:
    /// `Free → Following` on selection, `Following → Returning` on toggle-off
    /// or empty-space click, and re-targeting while already following.
    /// `Returning → Free` is *not* decided here; only arrival within
    /// epsilon does that (see [`camera_animate_system`]).
    pub fn route_click(&mut self, hit: Option<Entity>) -> ClickAction {
        match (hit, self.mode) {
            (Some(body), CameraMode::Following { target }) if target == body => {
                self.mode = CameraMode::Returning;
                ClickAction::Release
            }
            (Some(body), _) => {
                self.mode = CameraMode::Following { target: body };
                ClickAction::Follow(body)
            }
            (None, CameraMode::Following { .. }) => {
                self.mode = CameraMode::Returning;
                ClickAction::Release
            }
            (None, _) => ClickAction::Spawn,
        }
    }
}

// ── Pure orbit math ───────────────────────────────────────────────────────────

/// Rotate a pivot-relative camera offset by a pointer drag.
///
/// Yaw about world +Y, then pitch about the camera's current right axis
/// (recomputed from the yawed offset), then renormalize to the pre-drag
/// radius.  Near the poles the right axis degenerates; that drag sample
/// keeps its yaw and skips the pitch instead of producing NaN.
pub fn orbit_rotate(offset: Vec3, drag: Vec2, rotation_speed: f32) -> Vec3 {
    let radius = offset.length();
    if radius <= f32::EPSILON {
        return offset;
    }
    let yawed = Quat::from_axis_angle(Vec3::Y, -drag.x * rotation_speed) * offset;
    let right = yawed.cross(Vec3::Y).normalize_or_zero();
    let pitched = if right == Vec3::ZERO {
        yawed
    } else {
        Quat::from_axis_angle(right, -drag.y * rotation_speed) * yawed
    };
    pitched.normalize() * radius
}

/// Move a pivot-relative offset along its own direction by `delta`, clamped
/// into `[min, max]`.  Called once per wheel line / pinch sample, never on
/// an accumulated total, so intermediate adjustments can't tunnel through
/// the band.
pub fn apply_zoom(offset: Vec3, delta: f32, min: f32, max: f32) -> Vec3 {
    let dist = offset.length();
    if dist <= f32::EPSILON {
        return Vec3::new(0.0, 0.0, min);
    }
    let clamped = (dist + delta).clamp(min, max);
    offset / dist * clamped
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Spawn the scene camera at the configured default pose and sync the rig.
pub fn setup_camera(mut commands: Commands, config: Res<SimConfig>, mut rig: ResMut<CameraRig>) {
    rig.default_pos = config.default_camera_vec();
    rig.follow_offset = config.follow_offset_vec();
    rig.mode = CameraMode::Free;
    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Transform::from_translation(rig.default_pos).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Free-orbit manual control: left-drag / one-finger rotation, wheel lines
/// and two-finger pinch zoom.
///
/// Input messages are drained every frame, including while following, so
/// stale deltas can't snap the camera on the frame control returns.
pub fn camera_free_input_system(
    config: Res<SimConfig>,
    rig: Res<CameraRig>,
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut motions: MessageReader<MouseMotion>,
    mut wheels: MessageReader<MouseWheel>,
    mut camera: Query<&mut Transform, With<MainCamera>>,
) {
    let mut drag = Vec2::ZERO;
    for motion in motions.read() {
        if buttons.pressed(MouseButton::Left) {
            drag += motion.delta;
        }
    }

    let mut zoom_deltas: Vec<f32> = Vec::new();
    for wheel in wheels.read() {
        let lines = match wheel.unit {
            MouseScrollUnit::Line => wheel.y,
            // Trackpads report pixels; ~20 px per nominal line.
            MouseScrollUnit::Pixel => wheel.y / 20.0,
        };
        zoom_deltas.push(-lines * config.zoom_step);
    }

    let active: Vec<&bevy::input::touch::Touch> = touches.iter().collect();
    match active.as_slice() {
        [touch] => drag += touch.delta(),
        [a, b] => {
            let current = a.position().distance(b.position());
            let previous = a.previous_position().distance(b.previous_position());
            zoom_deltas.push(-(current - previous) * config.pinch_zoom_factor);
        }
        _ => {}
    }

    if rig.mode != CameraMode::Free {
        return;
    }
    let Ok(mut transform) = camera.single_mut() else {
        return;
    };

    let mut offset = transform.translation;
    if drag != Vec2::ZERO {
        offset = orbit_rotate(offset, drag, config.rotation_speed);
    }
    for delta in zoom_deltas {
        offset = apply_zoom(
            offset,
            delta,
            config.min_camera_distance,
            config.max_camera_distance,
        );
    }
    transform.translation = offset;
    transform.look_at(Vec3::ZERO, Vec3::Y);
}

/// Follow / return animation step.
///
/// `Following`: exponential approach to the target body plus the rig offset,
/// looking at the body's live position.  `Returning`: the same approach
/// toward the default pose; within `return_epsilon` the mode becomes `Free`
/// and manual control resumes.  A follow target that disappeared (should
/// not happen; bodies are never despawned) degrades to `Returning`.
pub fn camera_animate_system(
    config: Res<SimConfig>,
    mut rig: ResMut<CameraRig>,
    bodies: Query<&Transform, (With<BodyInfo>, Without<MainCamera>)>,
    mut camera: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut cam) = camera.single_mut() else {
        return;
    };
    match rig.mode {
        CameraMode::Free => {}
        CameraMode::Following { target } => {
            let Ok(body) = bodies.get(target) else {
                rig.mode = CameraMode::Returning;
                return;
            };
            let desired = body.translation + rig.follow_offset;
            cam.translation = cam.translation.lerp(desired, config.follow_lerp);
            cam.look_at(body.translation, Vec3::Y);
        }
        CameraMode::Returning => {
            cam.translation = cam.translation.lerp(rig.default_pos, config.follow_lerp);
            cam.look_at(Vec3::ZERO, Vec3::Y);
            if cam.translation.distance(rig.default_pos) < config.return_epsilon {
                rig.mode = CameraMode::Free;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_entity(world: &mut World) -> Entity {
        world.spawn_empty().id()
    }

    #[test]
    fn click_routing_walks_the_state_machine() {
        let mut world = World::new();
        let mut rig = CameraRig::default();
        let body = fresh_entity(&mut world);

        assert_eq!(rig.route_click(Some(body)), ClickAction::Follow(body));
        assert_eq!(rig.mode, CameraMode::Following { target: body });

        // Same body again: toggle off.
        assert_eq!(rig.route_click(Some(body)), ClickAction::Release);
        assert_eq!(rig.mode, CameraMode::Returning);

        // Empty click while returning: spawn, mode unchanged.
        assert_eq!(rig.route_click(None), ClickAction::Spawn);
        assert_eq!(rig.mode, CameraMode::Returning);
    }

    #[test]
    fn empty_click_while_following_releases_without_spawning() {
        let mut world = World::new();
        let mut rig = CameraRig::default();
        let body = fresh_entity(&mut world);
        rig.route_click(Some(body));

        assert_eq!(rig.route_click(None), ClickAction::Release);
        assert_eq!(rig.mode, CameraMode::Returning);
    }

    #[test]
    fn selecting_another_body_retargets_directly() {
        let mut world = World::new();
        let mut rig = CameraRig::default();
        let first = fresh_entity(&mut world);
        let second = fresh_entity(&mut world);

        rig.route_click(Some(first));
        assert_eq!(rig.route_click(Some(second)), ClickAction::Follow(second));
        assert_eq!(rig.mode, CameraMode::Following { target: second });
    }

    #[test]
    fn rotation_preserves_orbit_radius() {
        let mut offset = Vec3::new(20.0, 10.0, 20.0);
        let radius = offset.length();
        for i in 0..200 {
            let drag = Vec2::new((i as f32 * 13.0) % 31.0 - 15.0, (i as f32 * 7.0) % 23.0 - 11.0);
            offset = orbit_rotate(offset, drag, 0.002);
            assert!((offset.length() - radius).abs() < 1e-3);
            assert!(offset.is_finite());
        }
    }

    #[test]
    fn rotation_near_the_pole_stays_finite() {
        // Nearly parallel to +Y: the right axis degenerates.
        let offset = Vec3::new(1e-6, 10.0, 1e-6);
        let rotated = orbit_rotate(offset, Vec2::new(40.0, 40.0), 0.002);
        assert!(rotated.is_finite());
        assert!((rotated.length() - offset.length()).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped_for_any_delta_sequence() {
        let mut offset = Vec3::new(20.0, 10.0, 20.0);
        let deltas = [1e6, -1e6, 3.0, -500.0, 42.0, f32::MAX / 2.0, -40.0, -40.0];
        for delta in deltas {
            offset = apply_zoom(offset, delta, 5.0, 100.0);
            let dist = offset.length();
            assert!((5.0 - 1e-3..=100.0 + 1e-3).contains(&dist), "dist {dist}");
        }
    }

    #[test]
    fn zoom_direction_is_preserved() {
        let offset = Vec3::new(20.0, 10.0, 20.0);
        let zoomed = apply_zoom(offset, -10.0, 5.0, 100.0);
        assert!((zoomed.normalize() - offset.normalize()).length() < 1e-5);
        assert!(zoomed.length() < offset.length());
    }
}
