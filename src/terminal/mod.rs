//! Terminal output primitives.

mod output;

pub use output::OutputBuffer;
