//! HUD: the body info panel, the collision log, the control hint line, and
//! the sun-destroyed restart overlay.
//!
//! The panel is driven by [`SelectionChanged`] (show/hide + static text) and
//! refreshes the live HP line each frame from [`SelectedBody`].  The restart
//! overlay is spawned on entering [`SessionState::Ended`] and despawned on
//! leaving it; both its button and the `R` key write [`RestartRequest`],
//! which the core applies at the top of the next tick.

use crate::config::SimConfig;
use crate::damage::{BodyDepleted, Health, RestartRequest, SessionState};
use crate::gravity::CollisionEvent;
use crate::registry::BodyInfo;
use crate::selection::{SelectedBody, SelectionChanged};
use bevy::prelude::*;
use std::collections::VecDeque;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Rolling presentation log of recent impacts and depletions, newest first.
#[derive(Resource, Debug, Default)]
pub struct CollisionLog(pub VecDeque<String>);

/// Entities of the info-panel widgets, recorded at setup so the refresh
/// system can address each text line directly.
#[derive(Resource, Debug, Clone, Copy)]
pub struct InfoPanelWidgets {
    pub root: Entity,
    pub name: Entity,
    pub description: Entity,
    pub fun_fact: Entity,
    pub hp: Entity,
}

// ── Component markers ─────────────────────────────────────────────────────────

/// Marker for the collision log text node.
#[derive(Component)]
pub struct CollisionLogText;

/// Root node of the restart overlay; despawned on `OnExit(Ended)`.
#[derive(Component)]
pub struct RestartOverlayRoot;

/// Tags the "PLAY AGAIN" button.
#[derive(Component)]
pub struct RestartButton;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(CollisionLog::default())
            .add_systems(Startup, (setup_info_panel, setup_collision_log, setup_hint_line))
            .add_systems(
                Update,
                (
                    info_panel_update_system,
                    collision_log_system,
                    collision_log_text_system,
                    restart_button_system.run_if(in_state(SessionState::Ended)),
                    restart_key_system.run_if(in_state(SessionState::Ended)),
                ),
            )
            .add_systems(OnEnter(SessionState::Ended), setup_restart_overlay)
            .add_systems(OnExit(SessionState::Ended), teardown_restart_overlay);
    }
}

// ── Startup systems ───────────────────────────────────────────────────────────

/// Spawn the (initially hidden) info panel in the top-right corner.
pub fn setup_info_panel(mut commands: Commands, config: Res<SimConfig>) {
    let text = |value: &str, size: f32, color: Color| {
        (
            Text::new(value),
            TextFont {
                font_size: size,
                ..default()
            },
            TextColor(color),
        )
    };

    let name = commands
        .spawn(text("", config.hud_font_size + 7.0, Color::srgb(1.0, 0.9, 0.55)))
        .id();
    let description = commands
        .spawn(text("", config.hud_font_size, Color::srgb(0.9, 0.9, 0.9)))
        .id();
    let fun_fact = commands
        .spawn(text("", config.hud_font_size - 1.0, Color::srgb(0.65, 0.78, 0.95)))
        .id();
    let hp = commands
        .spawn(text("", config.hud_font_size, Color::srgb(0.95, 0.6, 0.45)))
        .id();

    let root = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(14.0),
                top: Val::Px(14.0),
                width: Val::Px(320.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                padding: UiRect::all(Val::Px(14.0)),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.02, 0.05, 0.10, 0.85)),
            BorderColor::all(Color::srgba(0.5, 0.6, 0.8, 0.5)),
            Visibility::Hidden,
        ))
        .id();
    commands
        .entity(root)
        .add_children(&[name, description, fun_fact, hp]);

    commands.insert_resource(InfoPanelWidgets {
        root,
        name,
        description,
        fun_fact,
        hp,
    });
}

/// Spawn the collision log node in the bottom-left corner.
pub fn setup_collision_log(mut commands: Commands, config: Res<SimConfig>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                bottom: Val::Px(34.0),
                ..default()
            },
            CollisionLogText,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: config.hud_font_size - 2.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.75, 0.55)),
            ));
        });
}

/// Spawn the one-line control hint along the bottom edge.
pub fn setup_hint_line(mut commands: Commands, config: Res<SimConfig>) {
    commands
        .spawn((Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            bottom: Val::Px(8.0),
            ..default()
        },))
        .with_children(|parent| {
            parent.spawn((
                Text::new(
                    "drag: orbit  ·  wheel/pinch: zoom  ·  click body: follow  ·  click space: launch probe",
                ),
                TextFont {
                    font_size: config.hud_font_size - 3.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.45)),
            ));
        });
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Show/hide the info panel on selection changes and keep the HP line live.
pub fn info_panel_update_system(
    widgets: Option<Res<InfoPanelWidgets>>,
    mut selections: MessageReader<SelectionChanged>,
    selected: Res<SelectedBody>,
    bodies: Query<(&BodyInfo, &Health)>,
    mut visibility: Query<&mut Visibility>,
    mut texts: Query<&mut Text>,
) {
    let Some(widgets) = widgets else {
        return;
    };

    for change in selections.read() {
        let Ok(mut vis) = visibility.get_mut(widgets.root) else {
            continue;
        };
        match change.body {
            Some(body) => {
                if let Ok((info, _)) = bodies.get(body) {
                    if let Ok(mut text) = texts.get_mut(widgets.name) {
                        *text = Text::new(info.name.clone());
                    }
                    if let Ok(mut text) = texts.get_mut(widgets.description) {
                        *text = Text::new(info.description.clone());
                    }
                    if let Ok(mut text) = texts.get_mut(widgets.fun_fact) {
                        *text = Text::new(info.fun_fact.clone());
                    }
                    *vis = Visibility::Visible;
                }
            }
            None => *vis = Visibility::Hidden,
        }
    }

    // Live HP readout for whichever body is selected right now.
    if let Some(body) = selected.0 {
        if let Ok((_, health)) = bodies.get(body) {
            if let Ok(mut text) = texts.get_mut(widgets.hp) {
                let line = if health.depleted {
                    "Depleted".to_string()
                } else {
                    format!("HP {}/{}", health.current, health.max)
                };
                if text.0 != line {
                    *text = Text::new(line);
                }
            }
        }
    }
}

/// Feed impacts and depletions into the rolling log; clear it on restart.
pub fn collision_log_system(
    config: Res<SimConfig>,
    mut log: ResMut<CollisionLog>,
    mut collisions: MessageReader<CollisionEvent>,
    mut depletions: MessageReader<BodyDepleted>,
    mut restarts: MessageReader<RestartRequest>,
) {
    if restarts.read().next().is_some() {
        log.0.clear();
    }
    for collision in collisions.read() {
        log.0
            .push_front(format!("{} struck {}", collision.particle_name, collision.body_name));
    }
    for depletion in depletions.read() {
        log.0.push_front(format!("{} is depleted!", depletion.name));
    }
    log.0.truncate(config.collision_log_lines);
}

/// Refresh the log text node whenever the log changed.
pub fn collision_log_text_system(
    log: Res<CollisionLog>,
    parent_query: Query<&Children, With<CollisionLogText>>,
    mut text_query: Query<&mut Text>,
) {
    if !log.is_changed() {
        return;
    }
    let joined = log.0.iter().cloned().collect::<Vec<_>>().join("\n");
    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(joined.clone());
            }
        }
    }
}

/// `R` restarts the session while the overlay is up.
pub fn restart_key_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut restarts: MessageWriter<RestartRequest>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        restarts.write(RestartRequest);
    }
}

/// The overlay button restarts the session.
pub fn restart_button_system(
    interactions: Query<&Interaction, (Changed<Interaction>, With<RestartButton>)>,
    mut restarts: MessageWriter<RestartRequest>,
) {
    for interaction in interactions.iter() {
        if *interaction == Interaction::Pressed {
            restarts.write(RestartRequest);
        }
    }
}

// ── Overlay spawn / teardown ──────────────────────────────────────────────────

/// Spawn the sun-destroyed overlay centred over the scene.
pub fn setup_restart_overlay(mut commands: Commands, config: Res<SimConfig>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.78)),
            ZIndex(300),
            RestartOverlayRoot,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(36.0)),
                        row_gap: Val::Px(14.0),
                        border: UiRect::all(Val::Px(2.0)),
                        min_width: Val::Px(320.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.05, 0.03, 0.01)),
                    BorderColor::all(Color::srgb(0.6, 0.35, 0.08)),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new("THE SUN HAS BURNED OUT"),
                        TextFont {
                            font_size: 34.0,
                            ..default()
                        },
                        TextColor(Color::srgb(1.0, 0.6, 0.2)),
                    ));
                    card.spawn((
                        Text::new("Your probes have extinguished the star."),
                        TextFont {
                            font_size: config.hud_font_size,
                            ..default()
                        },
                        TextColor(Color::srgb(0.8, 0.75, 0.7)),
                    ));
                    card.spawn((
                        Button,
                        Node {
                            width: Val::Px(220.0),
                            height: Val::Px(48.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            border: UiRect::all(Val::Px(2.0)),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.10, 0.07, 0.02)),
                        BorderColor::all(Color::srgb(0.85, 0.55, 0.15)),
                        RestartButton,
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new("PLAY AGAIN"),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(Color::srgb(1.0, 0.8, 0.4)),
                        ));
                    });
                    card.spawn((
                        Text::new("(or press R)"),
                        TextFont {
                            font_size: config.hud_font_size - 3.0,
                            ..default()
                        },
                        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.4)),
                    ));
                });
        });
}

/// Remove the overlay when the session resumes.
pub fn teardown_restart_overlay(
    mut commands: Commands,
    overlays: Query<Entity, With<RestartOverlayRoot>>,
) {
    for entity in overlays.iter() {
        commands.entity(entity).despawn();
    }
}
