//! Seawater Simulation Library
//!
//! A mass-spring water surface coupled to a 2D rigid-body backend through
//! per-tick sensor columns, polygon clipping, buoyancy, drag and lift.
//! Exposes simulation components for testing and reuse.

pub mod geometry;
pub mod physics;
pub mod render;
pub mod resources;
pub mod simulation;
pub mod water;
