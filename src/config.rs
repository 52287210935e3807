//! Runtime simulation configuration loaded from `assets/sim.toml`.
//!
//! [`SimConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_sim_config`] reads
//! `assets/sim.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<SimConfig>` to any system parameter list and read values
//! with `config.gravity_const`, `config.follow_lerp`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `SimConfig::default()`.

use crate::constants::*;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable simulation and camera configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/sim.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // ── Orbital Motion ───────────────────────────────────────────────────────
    pub base_angular_rate: f32,
    pub planet_spin_rate: f32,
    pub sun_spin_rate: f32,

    // ── Probe Gravity ────────────────────────────────────────────────────────
    pub gravity_const: f32,
    pub min_gravity_dist: f32,
    pub particle_cull_distance: f32,
    pub spawn_distance: f32,
    pub spawn_speed: f32,

    // ── Camera: Free Orbit ───────────────────────────────────────────────────
    pub rotation_speed: f32,
    pub zoom_step: f32,
    pub pinch_zoom_factor: f32,
    pub min_camera_distance: f32,
    pub max_camera_distance: f32,
    pub default_camera_pos: [f32; 3],

    // ── Camera: Follow / Return ──────────────────────────────────────────────
    pub follow_offset: [f32; 3],
    pub follow_lerp: f32,
    pub return_epsilon: f32,

    // ── Input ────────────────────────────────────────────────────────────────
    pub tap_max_drag_px: f32,

    // ── Presentation ─────────────────────────────────────────────────────────
    pub star_count: usize,
    pub star_spread: f32,
    pub hud_font_size: f32,
    pub collision_log_lines: usize,
    pub flash_lifetime: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Orbital Motion
            base_angular_rate: BASE_ANGULAR_RATE,
            planet_spin_rate: PLANET_SPIN_RATE,
            sun_spin_rate: SUN_SPIN_RATE,
            // Probe Gravity
            gravity_const: GRAVITY_CONST,
            min_gravity_dist: MIN_GRAVITY_DIST,
            particle_cull_distance: PARTICLE_CULL_DISTANCE,
            spawn_distance: SPAWN_DISTANCE,
            spawn_speed: SPAWN_SPEED,
            // Camera: Free Orbit
            rotation_speed: ROTATION_SPEED,
            zoom_step: ZOOM_STEP,
            pinch_zoom_factor: PINCH_ZOOM_FACTOR,
            min_camera_distance: MIN_CAMERA_DISTANCE,
            max_camera_distance: MAX_CAMERA_DISTANCE,
            default_camera_pos: DEFAULT_CAMERA_POS,
            // Camera: Follow / Return
            follow_offset: FOLLOW_OFFSET,
            follow_lerp: FOLLOW_LERP,
            return_epsilon: RETURN_EPSILON,
            // Input
            tap_max_drag_px: TAP_MAX_DRAG_PX,
            // Presentation
            star_count: STAR_COUNT,
            star_spread: STAR_SPREAD,
            hud_font_size: HUD_FONT_SIZE,
            collision_log_lines: COLLISION_LOG_LINES,
            flash_lifetime: FLASH_LIFETIME,
        }
    }
}

impl SimConfig {
    /// Default camera pose as a vector.
    #[inline]
    pub fn default_camera_vec(&self) -> Vec3 {
        Vec3::from_array(self.default_camera_pos)
    }

    /// Follow offset as a vector.
    #[inline]
    pub fn follow_offset_vec(&self) -> Vec3 {
        Vec3::from_array(self.follow_offset)
    }
}

/// Startup system: attempt to load `assets/sim.toml` and overwrite the
/// `SimConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are
/// logged but do not abort the simulation.  A missing file is silently
/// ignored (defaults are already in place from `insert_resource`).
pub fn load_sim_config(mut config: ResMut<SimConfig>) {
    let path = "assets/sim.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded simulation config from {path}");
            }
            Err(e) => {
                error!("Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present; defaults are already in place.
            info!("No {path} found; using compiled defaults");
        }
    }
}
