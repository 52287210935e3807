//! Simulation-specific error types.
//!
//! Catalog validation failures are reported through these types rather than
//! panicking, so a malformed body entry degrades to a logged skip instead of
//! a crash.

use std::fmt;

/// Top-level error enum for the orrery simulation.
#[derive(Debug)]
pub enum SimError {
    /// A catalog entry carries a non-positive orbit radius.  Advancing such
    /// an orbit would divide by `sqrt(0)` and poison the body's position
    /// with NaN, so the entry is rejected at load time.
    InvalidOrbitRadius {
        /// Body name as written in the catalog file.
        name: String,
        /// The rejected radius.
        radius: f32,
    },

    /// A catalog entry carries a non-positive size.  Size doubles as the
    /// collision radius; zero would make the body unhittable and invisible.
    InvalidSize {
        /// Body name as written in the catalog file.
        name: String,
        /// The rejected size.
        size: f32,
    },

    /// A catalog entry carries a non-positive mass, which would make the
    /// body repel or ignore probes.
    InvalidMass {
        /// Body name as written in the catalog file.
        name: String,
        /// The rejected mass.
        mass: f32,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidOrbitRadius { name, radius } => write!(
                f,
                "body '{}' has orbit radius {} (must be > 0)",
                name, radius
            ),
            SimError::InvalidSize { name, size } => {
                write!(f, "body '{}' has size {} (must be > 0)", name, size)
            }
            SimError::InvalidMass { name, mass } => {
                write!(f, "body '{}' has mass {} (must be > 0)", name, mass)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;
