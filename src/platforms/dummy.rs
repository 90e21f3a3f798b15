//! Dummy session.
//!
//! This is purely for testing or debugging.
//! It keeps the configuration in memory and logs changes.

use std::cell::{Cell, RefCell};

use super::{DisplayService, Result, ServiceError};
use crate::{
    config::{ConfigSnapshot, LogicalMonitorRecord, MonitorRecord},
    properties::{CrtcState, OutputProperties},
    settings::{SettingsError, SettingsStore},
    types::Rotation,
};

/// An in-memory display session
#[derive(Debug, Default)]
pub struct DummySession {
    outputs: RefCell<Vec<OutputProperties>>,
    config: RefCell<Option<ConfigSnapshot>>,
    fail_apply: Cell<bool>,
    /// Number of calls per service method, for assertions
    calls: Cell<Calls>,
    applied: RefCell<Vec<ConfigSnapshot>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Calls {
    pub outputs: usize,
    pub current_config: usize,
    pub apply_config: usize,
}

impl DummySession {
    /// Creates an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an output. Active outputs get their own logical monitor placed
    /// right of the previous one.
    pub fn with_output(
        self,
        name: &str,
        primary: bool,
        rotation: Option<Rotation>,
    ) -> Self {
        {
            let mut outputs = self.outputs.borrow_mut();
            let id = outputs.len() as u32;
            outputs.push(OutputProperties {
                id,
                name: name.to_string(),
                display_name: Some(format!("Dummy display {}", id)),
                primary,
                crtc: rotation.map(|rotation| CrtcState { id, rotation }),
            });

            let mut config = self.config.borrow_mut();
            let config = config.get_or_insert_with(|| ConfigSnapshot {
                serial: 1,
                monitors: Vec::new(),
                logical_monitors: Vec::new(),
                layout_mode: None,
            });
            config.monitors.push(MonitorRecord {
                connector: name.to_string(),
                display_name: Some(format!("Dummy display {}", id)),
                current_mode: rotation.map(|_| "1920x1080@60".to_string()),
            });
            if let Some(rotation) = rotation {
                let x = config.logical_monitors.len() as i32 * 1920;
                config.logical_monitors.push(LogicalMonitorRecord {
                    x,
                    y: 0,
                    scale: 1.0,
                    rotation,
                    reflected: false,
                    primary,
                    connectors: vec![name.to_string()],
                });
            }
        }
        self
    }

    /// Turns the pipeline of output `name` without touching its logical
    /// monitor, as on a panel mounted sideways. Lasts until the next commit.
    pub fn with_pipeline_rotation(mut self, name: &str, rotation: Rotation) -> Self {
        for output in self.outputs.get_mut().iter_mut().filter(|o| o.name == name) {
            if let Some(crtc) = output.crtc.as_mut() {
                crtc.rotation = rotation;
            }
        }
        self
    }

    /// Drops the configuration, as if the service had none to give
    pub fn without_config(self) -> Self {
        self.config.replace(None);
        self
    }

    /// Makes every commit fail
    pub fn failing_apply(self) -> Self {
        self.fail_apply.set(true);
        self
    }

    /// Simulates another client changing the configuration
    pub fn bump_serial(&self) {
        if let Some(config) = self.config.borrow_mut().as_mut() {
            config.serial += 1;
        }
    }

    pub fn calls(&self) -> Calls {
        self.calls.get()
    }

    /// Returns every configuration committed so far
    pub fn applied(&self) -> Vec<ConfigSnapshot> {
        self.applied.borrow().clone()
    }

    fn count(&self, f: impl FnOnce(&mut Calls)) {
        let mut calls = self.calls.get();
        f(&mut calls);
        self.calls.set(calls);
    }
}

impl DisplayService for DummySession {
    fn outputs(&self) -> Result<Vec<OutputProperties>> {
        self.count(|c| c.outputs += 1);
        Ok(self.outputs.borrow().clone())
    }

    fn current_config(&self) -> Result<ConfigSnapshot> {
        self.count(|c| c.current_config += 1);
        self.config.borrow().clone().ok_or(ServiceError::NoConfig)
    }

    fn apply_config(&self, config: &ConfigSnapshot) -> Result {
        self.count(|c| c.apply_config += 1);
        if self.fail_apply.get() {
            return Err(ServiceError::Rejected("dummy session refuses commits".to_string()));
        }

        let mut current = self.config.borrow_mut();
        let current = current.as_mut().ok_or(ServiceError::NoConfig)?;
        if config.serial != current.serial {
            return Err(ServiceError::StaleSerial {
                given: config.serial,
                current: current.serial,
            });
        }

        log::info!("dummy: applying {}", config);
        *current = config.clone();
        current.serial += 1;

        // keep the outputs in line with the new logical monitors
        for output in self.outputs.borrow_mut().iter_mut() {
            let lm = config
                .logical_monitors
                .iter()
                .find(|lm| lm.connectors.iter().any(|c| *c == output.name));
            if let (Some(crtc), Some(lm)) = (output.crtc.as_mut(), lm) {
                crtc.rotation = lm.rotation;
            }
        }

        self.applied.borrow_mut().push(config.clone());
        Ok(())
    }
}

/// An in-memory settings store
#[derive(Debug, Default)]
pub struct DummySettings {
    fail: bool,
    writes: RefCell<Vec<(String, String, String)>>,
}

impl DummySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write fail
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Returns every `(schema, key, value)` written so far
    pub fn writes(&self) -> Vec<(String, String, String)> {
        self.writes.borrow().clone()
    }
}

impl SettingsStore for DummySettings {
    fn set_string(&self, schema: &str, key: &str, value: &str) -> std::result::Result<(), SettingsError> {
        if self.fail {
            return Err(SettingsError::Rejected {
                schema: schema.to_string(),
                key: key.to_string(),
                status: "dummy".to_string(),
                stderr: "dummy settings refuse writes".to_string(),
            });
        }
        log::info!("dummy: {} {} = {}", schema, key, value);
        self.writes
            .borrow_mut()
            .push((schema.to_string(), key.to_string(), value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_serial_is_rejected() -> Result {
        let session = DummySession::new().with_output("eDP-1", true, Some(Rotation::Rotate0));
        let mut config = session.current_config()?;
        config.logical_monitors[0].rotation = Rotation::Rotate90;

        session.bump_serial();
        assert!(matches!(
            session.apply_config(&config),
            Err(ServiceError::StaleSerial { given: 1, current: 2 })
        ));
        assert!(session.applied().is_empty());
        Ok(())
    }

    #[test]
    fn commit_updates_outputs_and_serial() -> Result {
        let session = DummySession::new()
            .with_output("eDP-1", true, Some(Rotation::Rotate0))
            .with_output("HDMI-1", false, None);
        let mut config = session.current_config()?;
        config.logical_monitors[0].rotation = Rotation::Rotate180;
        session.apply_config(&config)?;

        let outputs = session.outputs()?;
        assert_eq!(outputs[0].current_rotation(), Some(Rotation::Rotate180));
        assert_eq!(outputs[1].current_rotation(), None);
        assert_eq!(session.current_config()?.serial, 2);
        assert_eq!(
            session.calls(),
            Calls {
                outputs: 1,
                current_config: 2,
                apply_config: 1
            }
        );
        Ok(())
    }
}
