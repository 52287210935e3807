//! Orrery simulation engine library
//!
//! An interactive solar-system visualization: scripted orbital bodies,
//! gravity-driven probes, collision damage, and a state-machine camera,
//! built on Bevy.

pub mod camera;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod damage;
pub mod effects;
pub mod error;
pub mod gravity;
pub mod hud;
pub mod registry;
pub mod rendering;
pub mod selection;
