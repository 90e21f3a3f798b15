//! Wire types of `org.gnome.Mutter.DisplayConfig`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use zbus::dbus_proxy;
use zbus::zvariant::{OwnedValue, Type, Value};

pub type Properties = HashMap<String, OwnedValue>;

/// A display pipeline as listed by `GetResources`
#[derive(Debug, Type, Deserialize)]
pub struct Crtc {
    pub id: u32,
    pub winsys_id: i64,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// -1 when the CRTC is disabled
    pub current_mode: i32,
    pub current_transform: u32,
    pub transforms: Vec<u32>,
    pub properties: Properties,
}

/// An output as listed by `GetResources`
#[derive(Debug, Type, Deserialize)]
pub struct Output {
    pub id: u32,
    pub winsys_id: i64,
    /// -1 when the output is not driven by any CRTC
    pub current_crtc: i32,
    pub possible_crtcs: Vec<u32>,
    pub name: String,
    pub modes: Vec<u32>,
    pub clones: Vec<u32>,

    /* properties, including:
        - "display-name" (s): human readable name of the monitor
        - "primary" (b): whether this output is the primary one
        - "presentation" (b): whether this output is for presentation only
    */
    pub properties: Properties,
}

#[derive(Debug, Type, Deserialize)]
pub struct Mode {
    pub id: u32,
    pub winsys_id: i64,
    pub width: u32,
    pub height: u32,
    pub frequency: f64,
    pub flags: u32,
}

pub type Resources = (u32, Vec<Crtc>, Vec<Output>, Vec<Mode>, i32, i32);

#[derive(Debug, Clone, Type, Serialize, Deserialize)]
pub struct MonitorSpec {
    pub connector: String,
    pub vendor: String,
    pub product: String,
    pub serial: String,
}

#[derive(Debug, Type, Deserialize)]
pub struct MonitorMode {
    pub id: String,
    pub width: i32,
    pub height: i32,
    pub refresh_rate: f64,
    pub preferred_scale: f64,
    pub supported_scales: Vec<f64>,

    /* properties, including:
        - "is-current" (b): the mode is the active mode
        - "is-preferred" (b): the mode is the preferred mode
    */
    pub properties: Properties,
}

/// A physical monitor as listed by `GetCurrentState`
#[derive(Debug, Type, Deserialize)]
pub struct Monitor {
    pub spec: MonitorSpec,
    pub modes: Vec<MonitorMode>,
    /// includes "display-name" (s) and "is-builtin" (b)
    pub properties: Properties,
}

#[derive(Debug, Type, Deserialize)]
pub struct LogicalMonitor {
    pub x: i32,
    pub y: i32,
    pub scale: f64,
    pub transform: u32,
    pub primary: bool,
    pub monitors: Vec<MonitorSpec>,
    pub properties: Properties,
}

/* state properties, including:
    - "layout-mode" (u): 1 = logical, 2 = physical
    - "supports-changing-layout-mode" (b)
*/
pub type State = (u32, Vec<Monitor>, Vec<LogicalMonitor>, Properties);

#[derive(Debug, Type, Serialize)]
pub enum Method {
    Verify,
    Temporary,
    Persistent,
}

#[derive(Debug, Type, Serialize)]
pub struct ApplyMonitor {
    pub connector: String,
    pub mode_id: String,
    pub properties: Properties,
}

#[derive(Debug, Type, Serialize)]
pub struct ApplyLogicalMonitor {
    pub x: i32,
    pub y: i32,
    pub scale: f64,
    pub transform: u32,
    pub primary: bool,
    pub monitors: Vec<ApplyMonitor>,
}

#[dbus_proxy(
    interface = "org.gnome.Mutter.DisplayConfig",
    default_service = "org.gnome.Mutter.DisplayConfig",
    default_path = "/org/gnome/Mutter/DisplayConfig"
)]
trait DisplayConfig {
    fn get_resources(&self) -> zbus::Result<Resources>;

    fn get_current_state(&self) -> zbus::Result<State>;

    fn apply_monitors_config(
        &self,
        serial: u32,
        method: Method,
        logical_monitors: &[ApplyLogicalMonitor],
        properties: HashMap<&str, Value<'_>>,
    ) -> zbus::Result<()>;
}

/// Reads a boolean property, absent means `false`
pub fn bool_property(properties: &Properties, key: &str) -> bool {
    matches!(properties.get(key).map(|v| &**v), Some(Value::Bool(true)))
}

pub fn str_property(properties: &Properties, key: &str) -> Option<String> {
    match properties.get(key).map(|v| &**v) {
        Some(Value::Str(s)) => Some(s.as_str().to_string()),
        _ => None,
    }
}

pub fn u32_property(properties: &Properties, key: &str) -> Option<u32> {
    match properties.get(key).map(|v| &**v) {
        Some(Value::U32(v)) => Some(*v),
        _ => None,
    }
}
