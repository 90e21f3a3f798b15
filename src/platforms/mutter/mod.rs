//! GNOME's display service, reached over the session bus.

pub mod proxy;

use std::collections::HashMap;

use zbus::blocking::Connection;
use zbus::zvariant::Value;

use self::proxy::{
    ApplyLogicalMonitor, ApplyMonitor, Crtc, DisplayConfigProxyBlocking, LogicalMonitor, Method,
    Monitor, Properties, State, bool_property, str_property, u32_property,
};
use super::{DisplayService, Result, ServiceError};
use crate::{
    config::{ConfigSnapshot, LogicalMonitorRecord, MonitorRecord},
    properties::{CrtcState, OutputProperties},
    types::Rotation,
};

/// `org.gnome.Mutter.DisplayConfig` on the session bus
pub struct MutterDisplayConfig {
    proxy: DisplayConfigProxyBlocking<'static>,
}

impl MutterDisplayConfig {
    /// Connects to the session bus
    pub fn connect() -> Result<Self> {
        let connection = Connection::session()?;
        Self::with_connection(&connection)
    }

    pub fn with_connection(connection: &Connection) -> Result<Self> {
        let proxy = DisplayConfigProxyBlocking::new(connection)?;
        Ok(Self { proxy })
    }
}

impl DisplayService for MutterDisplayConfig {
    fn outputs(&self) -> Result<Vec<OutputProperties>> {
        let (serial, crtcs, outputs, _modes, _max_width, _max_height) =
            self.proxy.get_resources()?;
        log::debug!(
            "Resources {}: {} crtcs, {} outputs",
            serial,
            crtcs.len(),
            outputs.len()
        );

        outputs
            .into_iter()
            .map(|output| output_properties(output, &crtcs))
            .collect()
    }

    fn current_config(&self) -> Result<ConfigSnapshot> {
        snapshot(self.proxy.get_current_state()?)
    }

    fn apply_config(&self, config: &ConfigSnapshot) -> Result {
        let logical_monitors = config
            .logical_monitors
            .iter()
            .map(|lm| apply_logical_monitor(config, lm))
            .collect::<Result<Vec<_>>>()?;

        let mut properties = HashMap::new();
        if let Some(layout_mode) = config.layout_mode {
            properties.insert("layout-mode", Value::from(layout_mode));
        }

        log::debug!(
            "Applying {} logical monitors with serial {}",
            logical_monitors.len(),
            config.serial
        );
        self.proxy.apply_monitors_config(
            config.serial,
            Method::Temporary,
            &logical_monitors,
            properties,
        )?;
        Ok(())
    }
}

/// Links `output` to the CRTC driving it. Outputs without a CRTC, or whose
/// CRTC has no mode set, are inactive.
fn output_properties(output: proxy::Output, crtcs: &[Crtc]) -> Result<OutputProperties> {
    let crtc = match u32::try_from(output.current_crtc) {
        Ok(crtc_id) => crtcs
            .iter()
            .find(|crtc| crtc.id == crtc_id && crtc.current_mode >= 0)
            .map(|crtc| -> Result<CrtcState> {
                Ok(CrtcState {
                    id: crtc.id,
                    rotation: Rotation::from_transform(crtc.current_transform)?,
                })
            })
            .transpose()?,
        Err(_) => None,
    };

    Ok(OutputProperties {
        id: output.id,
        display_name: str_property(&output.properties, "display-name"),
        primary: bool_property(&output.properties, "primary"),
        name: output.name,
        crtc,
    })
}

fn monitor_record(monitor: Monitor) -> MonitorRecord {
    MonitorRecord {
        display_name: str_property(&monitor.properties, "display-name"),
        current_mode: monitor
            .modes
            .iter()
            .find(|mode| bool_property(&mode.properties, "is-current"))
            .map(|mode| mode.id.clone()),
        connector: monitor.spec.connector,
    }
}

fn logical_monitor_record(lm: LogicalMonitor) -> Result<LogicalMonitorRecord> {
    Ok(LogicalMonitorRecord {
        x: lm.x,
        y: lm.y,
        scale: lm.scale,
        rotation: Rotation::from_transform(lm.transform)?,
        reflected: lm.transform >= 4,
        primary: lm.primary,
        connectors: lm.monitors.into_iter().map(|m| m.connector).collect(),
    })
}

/// Turns the reply of `GetCurrentState` into a snapshot
fn snapshot(state: State) -> Result<ConfigSnapshot> {
    let (serial, monitors, logical_monitors, properties) = state;

    Ok(ConfigSnapshot {
        serial,
        monitors: monitors.into_iter().map(monitor_record).collect(),
        logical_monitors: logical_monitors
            .into_iter()
            .map(logical_monitor_record)
            .collect::<Result<Vec<_>>>()?,
        layout_mode: layout_mode(&properties),
    })
}

/// Only pass the layout mode back if the session lets clients change it
fn layout_mode(properties: &Properties) -> Option<u32> {
    if bool_property(properties, "supports-changing-layout-mode") {
        u32_property(properties, "layout-mode")
    } else {
        None
    }
}

fn apply_logical_monitor(
    config: &ConfigSnapshot,
    lm: &LogicalMonitorRecord,
) -> Result<ApplyLogicalMonitor> {
    let monitors = lm
        .connectors
        .iter()
        .map(|connector| -> Result<ApplyMonitor> {
            let mode_id = config
                .monitor(connector)
                .and_then(|m| m.current_mode.clone())
                .ok_or_else(|| ServiceError::NoCurrentMode(connector.clone()))?;
            Ok(ApplyMonitor {
                connector: connector.clone(),
                mode_id,
                properties: Properties::new(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let reflection = if lm.reflected { 4 } else { 0 };
    Ok(ApplyLogicalMonitor {
        x: lm.x,
        y: lm.y,
        scale: lm.scale,
        transform: lm.rotation.to_transform() + reflection,
        primary: lm.primary,
        monitors,
    })
}
