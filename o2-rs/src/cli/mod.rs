//! CLI command implementations.

pub mod args;
pub mod output;

pub mod duplicate;
pub mod move_note;
pub mod normalize;
pub mod promote;
pub mod rename;

pub use args::{Cli, Commands};
pub use output::Output;
