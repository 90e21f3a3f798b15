//! The display configuration snapshot.
//!
//! A snapshot is a point-in-time copy of every logical monitor of the session.
//! It is only valid for the serial it was fetched with: the service refuses to
//! apply a snapshot once another client changed the configuration.

use core::fmt;

use thiserror::Error;

use crate::types::Rotation;

/// Error type for the config module
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No configuration record found for output {0}")]
    NoRecord(String),
}

type Result<T = ()> = std::result::Result<T, ConfigError>;

/// A physical monitor known to the session
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorRecord {
    /// Connector name, shared with the output of the same name
    pub connector: String,
    pub display_name: Option<String>,
    /// Id of the mode in use, `None` if the monitor is disabled
    pub current_mode: Option<String>,
}

impl MonitorRecord {
    /// Human readable name, falls back to the connector
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.connector)
    }
}

/// A region of the desktop shown by one or more monitors
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalMonitorRecord {
    pub x: i32,
    pub y: i32,
    pub scale: f64,
    pub rotation: Rotation,
    /// Mirrored along the vertical axis before rotating
    pub reflected: bool,
    pub primary: bool,
    /// Connectors of the monitors showing this logical monitor
    pub connectors: Vec<String>,
}

impl LogicalMonitorRecord {
    fn drives(&self, connector: &str) -> bool {
        self.connectors
            .iter()
            .any(|c| c.eq_ignore_ascii_case(connector))
    }
}

/// A mutable copy of the session's display configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSnapshot {
    /// Generation token of the configuration this snapshot was taken from
    pub serial: u32,
    pub monitors: Vec<MonitorRecord>,
    pub logical_monitors: Vec<LogicalMonitorRecord>,
    /// Layout mode to pass back on commit, if the service lets clients change it
    pub layout_mode: Option<u32>,
}

impl ConfigSnapshot {
    /// Returns the logical monitor showing the output `name`
    pub fn record(&self, name: &str) -> Result<&LogicalMonitorRecord> {
        self.logical_monitors
            .iter()
            .find(|lm| lm.drives(name))
            .ok_or_else(|| ConfigError::NoRecord(name.to_string()))
    }

    pub fn record_mut(&mut self, name: &str) -> Result<&mut LogicalMonitorRecord> {
        self.logical_monitors
            .iter_mut()
            .find(|lm| lm.drives(name))
            .ok_or_else(|| ConfigError::NoRecord(name.to_string()))
    }

    /// Sets the rotation of the logical monitor showing the output `name`.
    /// Requires a call to `DisplayService::apply_config` afterwards.
    pub fn set_rotation(&mut self, name: &str, rotation: Rotation) -> Result {
        let record = self.record_mut(name)?;
        log::debug!(
            "Rotating logical monitor at ({}, {}) from {} to {}",
            record.x,
            record.y,
            record.rotation,
            rotation
        );
        record.rotation = rotation;
        record.reflected = false;
        Ok(())
    }

    /// Returns the monitor with the given connector
    pub fn monitor(&self, connector: &str) -> Option<&MonitorRecord> {
        self.monitors
            .iter()
            .find(|m| m.connector.eq_ignore_ascii_case(connector))
    }
}

impl fmt::Display for ConfigSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ConfigSnapshot {{ serial: {}, logical_monitors: [", self.serial)?;
        for lm in &self.logical_monitors {
            writeln!(
                f,
                "    ({}, {}) x{} {} primary: {} [{}]",
                lm.x,
                lm.y,
                lm.scale,
                lm.rotation,
                lm.primary,
                lm.connectors.join(", ")
            )?;
        }
        write!(f, "] }}")
    }
}
