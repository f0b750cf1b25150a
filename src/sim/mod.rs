//! Simulation: swimmer physics and the race controller.
//!
//! This module contains:
//! - [`Action`], [`Symbol`], [`KeyMap`]: the closed command vocabulary
//! - [`Swimmer`]: per-racer physics and resource state machine
//! - [`Race`]: routing, clock, cutoff and winner selection
//!
//! Nothing here touches the terminal or spawns threads. Everything is driven
//! by explicit timestamps and `dt` values, so it is fully testable.

mod action;
mod race;
mod swimmer;

pub use action::{Action, KeyMap, Side, Symbol};
pub use race::{Race, RaceConfig, RouteWarning, SetupError, Standing, TickReport};
pub use swimmer::{
    rhythm_efficiency, LastStroke, Level, Status, Swimmer, BREATH_COOLDOWN, BREATH_DRAG_FACTOR,
    BREATH_OXYGEN, DEFAULT_COURSE_LENGTH, FAST_CADENCE_THRESHOLD, LOW_OXYGEN, MIN_GLIDE_SPEED,
    OXYGEN_DRAIN_RATE, PENALTY_BACKWARD_IMPULSE, PENALTY_DURATION, TARGET_STROKE_INTERVAL,
};
