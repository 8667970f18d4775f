//! Simulation and motion-control core for a desktop file-drop vortex effect.
//!
//! Dragging a file warps the desktop into a disc, the dropped file spirals
//! into a star, and a particle starfield plays underneath. This crate is the
//! pure, testable part of that effect: the spring evaluator, the particle
//! fields, the spiral solver, and the state machine that sequences them.
//! Screen capture, drag monitoring, and rendering stay behind the small
//! interface boundary in [`platform`] and are suitable for any front-end,
//! native or web.

pub mod constants;
pub mod controller;
pub mod field;
pub mod platform;
pub mod spiral;
pub mod spring;

pub use controller::*;
pub use field::*;
pub use platform::*;
pub use spiral::*;
pub use spring::*;
