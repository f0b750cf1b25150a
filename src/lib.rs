//! # Swimrace
//!
//! A terminal swimming race for one or two players on one keyboard.
//!
//! Each swimmer is driven by a small command vocabulary (left stroke, right
//! stroke, kick, breathe). Rhythm, stamina, oxygen and fatigue decide speed;
//! mashing is punished and running out of air ends the race for that swimmer.
//!
//! ## Core Concepts
//!
//! - **Action queue**: the capture thread and the simulation share nothing but
//!   a thread-safe FIFO of timestamped actions
//! - **Deterministic simulation**: [`Race::step`] is driven by explicit `dt`,
//!   so every rule is testable without a terminal
//! - **Differential rendering**: only rows that changed since the last flush
//!   are written, in a single write per frame
//!
//! ## Example
//!
//! ```rust
//! use swimrace::{Action, KeyMap, Race, RaceConfig, Swimmer, Symbol};
//!
//! let swimmers = vec![Swimmer::new("Player 1", 0, KeyMap::PLAYER_ONE)];
//! let mut race = Race::new(swimmers, RaceConfig::default()).unwrap();
//! race.step([Action::new(0, Symbol::StrokeLeft, 0.0)], 0.1);
//! assert!(race.swimmers()[0].position() > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod error;
pub mod hud;
pub mod renderer;
pub mod sim;
pub mod terminal;

// Re-exports for convenience
pub use actor::{ActionQueue, Engine, EngineConfig, InputEvent};
pub use buffer::{FrameBuffer, RowUpdate};
pub use error::{Error, Result};
pub use hud::{advise, coaching_line, Scene};
pub use renderer::Renderer;
pub use sim::{
    Action, KeyMap, Race, RaceConfig, RouteWarning, SetupError, Standing, Status, Swimmer, Symbol,
    TickReport,
};
