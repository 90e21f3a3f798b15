//! A library to rotate the outputs of a GNOME session.
//!
//! This library talks to Mutter's display configuration service to list outputs and
//! rotate one of them, and keeps the desktop's subpixel order in sync with the rotation.

pub mod app;
pub mod cli;
mod config;
mod display;
pub mod error;
pub mod platforms;
mod properties;
pub mod settings;
mod types;

pub use config::*;
pub use display::*;
pub use properties::*;
pub use types::*;
