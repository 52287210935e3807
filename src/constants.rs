//! Centralised simulation and camera constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::SimConfig`] mirrors every constant in this file and can
//! override any of them from `assets/sim.toml` without recompiling.

// ── Orbital Motion ────────────────────────────────────────────────────────────

/// Base angular rate (rad/s) shared by every planet before the per-orbit
/// slowdown is applied.
///
/// A planet's effective rate is `BASE_ANGULAR_RATE / sqrt(orbit_radius)`, so
/// inner planets visibly outpace outer ones.  At 0.3, Mercury (orbit 6)
/// completes a revolution in roughly 50 s.
pub const BASE_ANGULAR_RATE: f32 = 0.3;

/// Cosmetic self-rotation rate for planets (rad/s about local +Y).
pub const PLANET_SPIN_RATE: f32 = 0.12;

/// Cosmetic self-rotation rate for the sun.  Slower than the planets so the
/// surface drift reads as mass rather than spin.
pub const SUN_SPIN_RATE: f32 = 0.06;

// ── Probe Gravity ─────────────────────────────────────────────────────────────

/// Gravity strength constant applied to every body's pull on a probe.
///
/// Higher values bend probe trajectories harder.  Tested range: 0.2–2.0.
/// At 0.5 a probe launched tangentially near Earth's orbit loops the sun in
/// a handful of seconds without immediately plunging in.
pub const GRAVITY_CONST: f32 = 0.5;

/// Probe-to-body distances below this value are clamped before the
/// inverse-square division.
///
/// Without the clamp a probe grazing a body's centre would receive a
/// near-infinite acceleration and its position would go NaN.  Collision
/// radii are all larger than this, so the clamp only matters for the single
/// frame in which a collision is detected.
pub const MIN_GRAVITY_DIST: f32 = 0.25;

/// Probes farther than this from the origin are removed.
///
/// Escaping probes would otherwise accumulate forever; this is the outer
/// lifetime bound.  Far outside `MAX_CAMERA_DISTANCE` so removal is never
/// visible.
pub const PARTICLE_CULL_DISTANCE: f32 = 400.0;

/// Distance in front of the camera at which a probe is launched.
pub const SPAWN_DISTANCE: f32 = 6.0;

/// Initial probe speed (world units/s), directed perpendicular to the
/// launch ray.
pub const SPAWN_SPEED: f32 = 3.5;

// ── Camera: Free Orbit ────────────────────────────────────────────────────────

/// Radians of camera rotation per pixel of pointer drag.
pub const ROTATION_SPEED: f32 = 0.002;

/// Orbit-radius change (world units) per mouse-wheel line.
pub const ZOOM_STEP: f32 = 2.0;

/// Orbit-radius change per pixel of pinch-distance change on touch screens.
pub const PINCH_ZOOM_FACTOR: f32 = 0.1;

/// Closest the camera may orbit to the pivot.  Keeps the near plane outside
/// the sun's surface.
pub const MIN_CAMERA_DISTANCE: f32 = 5.0;

/// Farthest the camera may orbit from the pivot.
pub const MAX_CAMERA_DISTANCE: f32 = 100.0;

/// Default camera position, restored whenever a follow is released.
pub const DEFAULT_CAMERA_POS: [f32; 3] = [20.0, 10.0, 20.0];

// ── Camera: Follow / Return ───────────────────────────────────────────────────

/// Viewing offset from a followed body's position.
pub const FOLLOW_OFFSET: [f32; 3] = [0.0, 2.0, 5.0];

/// Per-frame interpolation factor for follow and return animation.
///
/// This is an exponential approach (5 % of the remaining distance each
/// rendered frame), not a fixed-duration tween, and is deliberately not
/// dt-corrected: the feel was tuned against a 60 Hz frame loop and the
/// difference is imperceptible at common refresh rates.
pub const FOLLOW_LERP: f32 = 0.05;

/// Distance from the default pose below which a returning camera snaps back
/// to free-orbit control.
pub const RETURN_EPSILON: f32 = 0.1;

// ── Input ─────────────────────────────────────────────────────────────────────

/// Maximum finger travel (pixels) for a touch to still count as a tap
/// (selection / launch) rather than a drag (orbit).
pub const TAP_MAX_DRAG_PX: f32 = 10.0;

// ── Presentation ──────────────────────────────────────────────────────────────

/// Number of background stars scattered at startup.
pub const STAR_COUNT: usize = 3000;

/// Half-extent of the cube the stars are scattered in.
pub const STAR_SPREAD: f32 = 500.0;

/// Font size for HUD text.
pub const HUD_FONT_SIZE: f32 = 15.0;

/// Number of lines retained in the collision log.
pub const COLLISION_LOG_LINES: usize = 6;

/// Lifetime (s) of the glow flash spawned at an impact point.
pub const FLASH_LIFETIME: f32 = 0.45;
