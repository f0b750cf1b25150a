//! Buffer module: frames and the row diffing engine.
//!
//! This module contains:
//! - [`FrameBuffer`]: a grid of fixed-width character rows
//! - [`fit_width`]: grapheme-aware truncation and padding
//! - [`diff`]: row diffing and ANSI emission

mod frame;
pub mod diff;

pub use diff::RowUpdate;
pub use frame::{display_width, fit_width, FrameBuffer};
