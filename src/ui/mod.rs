//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Frame layout and overlay dispatch
//! - `catalog` - Terminal `DisplaySurface` for header counts and cards
//! - `details` - Selected app popup
//! - `help` - Keybinding overlay
//! - `status` - Status bar widget
//! - `helpers` - Background task spawning and panic capture

mod catalog;
mod details;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
