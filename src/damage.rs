//! Damage tracker: converts collision events into hit-point state.
//!
//! Pure event-to-state transformation; no physics happens here.  Each
//! collision costs the struck body one hit point, floored at zero.  The
//! transition to zero fires [`BodyDepleted`] exactly once per body; the
//! sun's depletion additionally ends the session
//! ([`SessionState::Ended`]), which the HUD surfaces as a restart offer.

use crate::gravity::CollisionEvent;
use crate::registry::{BodyInfo, Sun};
use bevy::prelude::*;

// ── Session state ─────────────────────────────────────────────────────────────

/// Top-level session state machine.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Normal interactive simulation.
    #[default]
    Running,
    /// The sun has been depleted; the restart overlay is visible and probe
    /// launching is disabled.  Orbits keep turning underneath.
    Ended,
}

// ── Messages ──────────────────────────────────────────────────────────────────

/// A body's hit points just reached zero.  Fired once per body per session.
#[derive(Message, Debug, Clone)]
pub struct BodyDepleted {
    pub body: Entity,
    pub name: String,
}

/// Host request to reset the session.  Observed at the top of the next tick
/// by [`crate::registry::apply_restart_system`].
#[derive(Message, Debug, Clone, Copy)]
pub struct RestartRequest;

// ── Component ─────────────────────────────────────────────────────────────────

/// Hit points of a body.  `current` never exceeds `max` and never goes below
/// zero; `depleted` latches the one-shot depletion signal.
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub current: u32,
    pub max: u32,
    pub depleted: bool,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            depleted: false,
        }
    }

    /// Restore spawn-time health (session restart).
    pub fn reset(&mut self) {
        self.current = self.max;
        self.depleted = false;
    }

    /// Absorb one hit.  Returns `true` only on the transition to zero;
    /// hits against an already-depleted body change nothing.
    pub fn apply_hit(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        if self.current == 0 && !self.depleted {
            self.depleted = true;
            return true;
        }
        false
    }
}

// ── Update system ─────────────────────────────────────────────────────────────

/// Apply this frame's collisions to body health.
///
/// Runs after the solver in the tick chain, so every event it sees is from
/// the current frame.  A depleted planet stays in the scene (still
/// selectable, still hittable); only the sun's depletion is terminal.
pub fn damage_system(
    mut collisions: MessageReader<CollisionEvent>,
    mut bodies: Query<(&mut Health, &BodyInfo, Option<&Sun>)>,
    mut depleted: MessageWriter<BodyDepleted>,
    mut next_state: ResMut<NextState<SessionState>>,
) {
    for collision in collisions.read() {
        let Ok((mut health, info, sun)) = bodies.get_mut(collision.body) else {
            continue;
        };
        if health.apply_hit() {
            depleted.write(BodyDepleted {
                body: collision.body,
                name: info.name.clone(),
            });
            if sun.is_some() {
                warn!("{} depleted; session over", info.name);
                next_state.set(SessionState::Ended);
            } else {
                info!("{} depleted", info.name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    #[test]
    fn health_never_goes_negative() {
        let mut health = Health::new(3);
        for _ in 0..10 {
            health.apply_hit();
            assert!(health.current <= health.max);
        }
        assert_eq!(health.current, 0);
    }

    #[test]
    fn depletion_fires_exactly_once() {
        let mut health = Health::new(2);
        assert!(!health.apply_hit());
        assert!(health.apply_hit(), "second hit depletes");
        for _ in 0..5 {
            assert!(!health.apply_hit(), "depleted body must not re-fire");
        }
    }

    #[test]
    fn reset_restores_full_health_and_rearms_the_latch() {
        let mut health = Health::new(2);
        health.apply_hit();
        health.apply_hit();
        health.reset();
        assert_eq!(health.current, 2);
        assert!(!health.depleted);
        health.apply_hit();
        assert!(health.apply_hit(), "latch must re-arm after reset");
    }

    /// Collected copies of the frame's depletion messages.
    #[derive(Resource, Default)]
    struct CapturedDepletions(Vec<String>);

    fn capture_depletions(
        mut reader: MessageReader<BodyDepleted>,
        mut captured: ResMut<CapturedDepletions>,
    ) {
        for message in reader.read() {
            captured.0.push(message.name.clone());
        }
    }

    fn damage_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<SessionState>();
        app.add_message::<CollisionEvent>();
        app.add_message::<BodyDepleted>();
        app.insert_resource(CapturedDepletions::default());
        app.add_systems(Update, (damage_system, capture_depletions).chain());
        app
    }

    fn hit(app: &mut App, body: Entity) {
        app.world_mut().write_message(CollisionEvent {
            particle: Entity::PLACEHOLDER,
            particle_name: "Probe-1".into(),
            body,
            body_name: "Body".into(),
            position: Vec3::ZERO,
        });
    }

    #[test]
    fn sun_depletion_ends_the_session_once() {
        let mut app = damage_app();
        let sun = app
            .world_mut()
            .spawn((
                Sun,
                BodyInfo {
                    name: "Sun".into(),
                    description: String::new(),
                    fun_fact: String::new(),
                },
                Health::new(2),
            ))
            .id();
        app.update();

        hit(&mut app, sun);
        app.update();
        assert_eq!(
            *app.world().resource::<State<SessionState>>().get(),
            SessionState::Running,
            "one hit of two must not end the session"
        );

        hit(&mut app, sun);
        app.update();
        app.update(); // StateTransition applies before the next Update
        assert_eq!(
            *app.world().resource::<State<SessionState>>().get(),
            SessionState::Ended
        );

        // Further hits change nothing and never re-fire the signal.
        hit(&mut app, sun);
        app.update();
        let captured = app.world().resource::<CapturedDepletions>();
        assert_eq!(captured.0, vec!["Sun".to_string()]);
        assert_eq!(app.world().get::<Health>(sun).unwrap().current, 0);
    }

    #[test]
    fn planet_depletion_does_not_end_the_session() {
        let mut app = damage_app();
        let planet = app
            .world_mut()
            .spawn((
                BodyInfo {
                    name: "Mars".into(),
                    description: String::new(),
                    fun_fact: String::new(),
                },
                Health::new(1),
            ))
            .id();
        app.update();

        hit(&mut app, planet);
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<SessionState>>().get(),
            SessionState::Running
        );
        let captured = app.world().resource::<CapturedDepletions>();
        assert_eq!(captured.0, vec!["Mars".to_string()]);
    }
}
