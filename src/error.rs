//! Error types for flipscreen
//!
//! Everything except a failed pixel order write ends the program.

use thiserror::Error;

use crate::{
    cli::UsageError, config::ConfigError, display::DisplayError, platforms::ServiceError,
    settings::SettingsError,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error("Failed to look up the output")]
    Display(#[from] DisplayError),

    #[error("Failed to talk to the display service")]
    Service(#[from] ServiceError),

    #[error("Display configuration does not match the outputs")]
    Config(#[from] ConfigError),

    #[error("Failed to set pixel order")]
    PixelOrder(#[source] SettingsError),

    #[error("Failed to print")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the program may carry on and exit successfully
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::PixelOrder(_))
    }

    /// Whether the usage help should be shown
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
