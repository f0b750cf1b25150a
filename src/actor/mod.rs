//! Actor Model: threads and channels around the race.
//!
//! - **Input Actor**: polls terminal events, pushes swimmer actions onto the
//!   [`ActionQueue`] and control events onto a channel
//! - **Main Loop** ([`Engine`]): drains both, ticks the race, renders
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐      Action       ┌─────────────┐
//! │ Input Thread │ ────────────────▶ │ ActionQueue │
//! │              │                   └──────┬──────┘
//! │              │    InputEvent            │ drain_all
//! │              │ ───────────────▶  ┌──────▼──────┐
//! └──────────────┘                   │  Main Loop  │──▶ Renderer ──▶ stdout
//!                                    └─────────────┘
//! ```

mod engine;
mod input;
mod messages;
mod queue;

pub use engine::{Engine, EngineConfig};
pub use input::{InputActor, KeyRouter};
pub use messages::InputEvent;
pub use queue::ActionQueue;
