//! HUD module: coaching advice, gauges and the race scene.
//!
//! This module contains:
//! - [`coach`]: tips derived from swimmer state, never mutating it
//! - [`Gauge`]: resource and speed bars
//! - [`Scene`]: lays a race out onto the renderer

pub mod coach;
mod gauge;
mod scene;

pub use coach::{advise, coaching_line, tips, Tips};
pub use gauge::{Gauge, GaugeStyle, Readout};
pub use scene::{summary_lines, Scene, SceneLayout};
