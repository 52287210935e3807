//! Headless tests for the camera state machine.
//!
//! These use [`MinimalPlugins`] plus the input plugin (no window, no
//! rendering) so they run fast and deterministically in CI.  The camera is
//! a bare `(MainCamera, Transform)` entity; the systems under test never
//! touch render state.
//!
//! Covered scenarios:
//! 1. Selecting a body, toggling it off, and arriving home walks
//!    FREE → FOLLOWING → RETURNING → FREE with no skipped state.
//! 2. RETURNING only exits within epsilon of the default pose.
//! 3. Free-mode zoom never leaves the configured distance band, even for
//!    adversarial wheel deltas.
//! 4. Following clamps onto the body's live position + offset.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use orrery::camera::{
    camera_animate_system, camera_free_input_system, CameraMode, CameraRig, MainCamera,
};
use orrery::config::SimConfig;
use orrery::registry::BodyInfo;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn camera_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, bevy::input::InputPlugin));
    app.insert_resource(SimConfig::default());
    app.insert_resource(CameraRig::default());
    app.add_systems(
        Update,
        (camera_free_input_system, camera_animate_system).chain(),
    );

    let default_pos = app.world().resource::<CameraRig>().default_pos;
    app.world_mut().spawn((
        MainCamera,
        Transform::from_translation(default_pos).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    app
}

fn spawn_body(app: &mut App, pos: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            BodyInfo {
                name: "Earth".into(),
                description: String::new(),
                fun_fact: String::new(),
            },
            Transform::from_translation(pos),
        ))
        .id()
}

fn camera_pos(app: &mut App) -> Vec3 {
    let world = app.world_mut();
    let mut query = world.query_filtered::<&Transform, With<MainCamera>>();
    query.single(world).unwrap().translation
}

fn mode(app: &App) -> CameraMode {
    app.world().resource::<CameraRig>().mode
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Select → toggle off → arrive: the full FREE → FOLLOWING → RETURNING →
/// FREE sequence, with no intermediate state skipped and the RETURNING exit
/// happening only within epsilon of the default pose.
#[test]
fn select_toggle_and_return_walks_every_state() {
    let mut app = camera_app();
    let body = spawn_body(&mut app, Vec3::new(10.0, 0.0, 0.0));
    app.update();

    assert_eq!(mode(&app), CameraMode::Free);

    // Selection: FREE → FOLLOWING, directly and visibly.
    app.world_mut()
        .resource_mut::<CameraRig>()
        .route_click(Some(body));
    assert_eq!(mode(&app), CameraMode::Following { target: body });

    // Following persists across frames with no new click.
    for _ in 0..10 {
        app.update();
        assert_eq!(mode(&app), CameraMode::Following { target: body });
    }

    // Toggle the same body off: FOLLOWING → RETURNING.
    app.world_mut()
        .resource_mut::<CameraRig>()
        .route_click(Some(body));
    assert_eq!(mode(&app), CameraMode::Returning);

    // RETURNING must persist until the camera is within epsilon of home,
    // then deterministically become FREE.
    let (default_pos, epsilon) = {
        let rig = app.world().resource::<CameraRig>();
        let config = app.world().resource::<SimConfig>();
        (rig.default_pos, config.return_epsilon)
    };
    let mut arrived = false;
    for _ in 0..1000 {
        app.update();
        match mode(&app) {
            CameraMode::Returning => {
                // The animate step transitions the instant it lands within
                // epsilon, so any frame still in RETURNING must be outside.
                assert!(
                    camera_pos(&mut app).distance(default_pos) >= epsilon - 1e-4,
                    "stayed in RETURNING although within epsilon"
                );
            }
            CameraMode::Free => {
                arrived = true;
                break;
            }
            other => panic!("unexpected state during return: {other:?}"),
        }
    }
    assert!(arrived, "camera never arrived home");
    assert!(
        camera_pos(&mut app).distance(default_pos) <= epsilon,
        "RETURNING exited outside epsilon"
    );
}

/// Clicking empty space while following releases the target without
/// entering any other state first.
#[test]
fn empty_click_while_following_goes_straight_to_returning() {
    let mut app = camera_app();
    let body = spawn_body(&mut app, Vec3::new(10.0, 0.0, 0.0));
    app.update();

    app.world_mut()
        .resource_mut::<CameraRig>()
        .route_click(Some(body));
    app.update();

    app.world_mut().resource_mut::<CameraRig>().route_click(None);
    assert_eq!(mode(&app), CameraMode::Returning);
}

/// While following, the camera converges onto `body + follow_offset`.
#[test]
fn following_converges_on_the_body_offset() {
    let mut app = camera_app();
    let body_pos = Vec3::new(10.0, 0.0, 0.0);
    let body = spawn_body(&mut app, body_pos);
    app.update();

    app.world_mut()
        .resource_mut::<CameraRig>()
        .route_click(Some(body));
    for _ in 0..600 {
        app.update();
    }

    let offset = app.world().resource::<CameraRig>().follow_offset;
    let distance = camera_pos(&mut app).distance(body_pos + offset);
    assert!(distance < 0.5, "camera still {distance} away after settling");
}

/// No sequence of wheel deltas, including absurd ones, may push the
/// camera outside the configured distance band.
#[test]
fn zoom_stays_inside_the_distance_band() {
    let mut app = camera_app();
    app.update();

    let (min_dist, max_dist) = {
        let config = app.world().resource::<SimConfig>();
        (config.min_camera_distance, config.max_camera_distance)
    };

    let window = app.world_mut().spawn_empty().id();
    let deltas = [
        -1.0e6_f32, 1.0e6, -3.0, 250.0, -250.0, 7.5, 1.0e6, -1.0e6, 0.5,
    ];
    for delta in deltas {
        app.world_mut().write_message(MouseWheel {
            unit: MouseScrollUnit::Line,
            x: 0.0,
            y: delta,
            window,
        });
        app.update();

        let dist = camera_pos(&mut app).length();
        assert!(
            dist >= min_dist - 1e-3 && dist <= max_dist + 1e-3,
            "distance {dist} escaped [{min_dist}, {max_dist}]"
        );
    }
}
