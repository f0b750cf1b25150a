//! Message types for actor communication.
//!
//! Keys that map to a swimmer never travel on this channel; they go straight
//! into the [`ActionQueue`](super::ActionQueue). Only session control does.

/// Control events from the input thread to the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Some key was pressed. Used to dismiss the result screen.
    KeyPressed,

    /// The player asked to quit (q or Esc).
    Quit,

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}
