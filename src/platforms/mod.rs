//! Display services
//!
//! A display service owns the outputs of a session. It reports them, hands out
//! configuration snapshots and commits snapshots back.

pub mod dummy;
pub mod mutter;

use thiserror::Error;

use crate::{config::ConfigSnapshot, properties::OutputProperties, types::InvalidTransform};

/// Error type for display services
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("D-Bus call to the display service failed")]
    DBus(#[from] zbus::Error),
    #[error("Display service reported an invalid value")]
    InvalidTransform(#[from] InvalidTransform),
    #[error("Display service returned no configuration")]
    NoConfig,
    #[error("Monitor {0} has no current mode")]
    NoCurrentMode(String),
    #[error("Configuration serial {given} is stale, the session is at {current}")]
    StaleSerial { given: u32, current: u32 },
    #[error("Display service rejected the configuration: {0}")]
    Rejected(String),
}

pub type Result<T = ()> = std::result::Result<T, ServiceError>;

pub trait DisplayService {
    /// Lists the outputs of the session, in the order the service reports them.
    fn outputs(&self) -> Result<Vec<OutputProperties>>;

    /// Fetches a fresh snapshot of the display configuration.
    fn current_config(&self) -> Result<ConfigSnapshot>;

    /// Commits `config` to the session.
    ///
    /// The snapshot's serial lets the service reject it if the configuration
    /// changed since it was fetched.
    fn apply_config(&self, config: &ConfigSnapshot) -> Result;
}
