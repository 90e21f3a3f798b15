//! Desktop rendering settings.
//!
//! The subpixel order is a single, desktop-wide GSettings key. It has to follow
//! the rotation of the screen, otherwise antialiased text gets colour fringes.

use std::process::Command;

use thiserror::Error;

use crate::types::{PixelOrder, Rotation};

/// Schema holding the subpixel order
pub const PIXEL_ORDER_SCHEMA: &str = "org.gnome.settings-daemon.plugins.xsettings";
/// Key of the subpixel order inside [`PIXEL_ORDER_SCHEMA`]
pub const PIXEL_ORDER_KEY: &str = "rgba-order";

/// Error type for the settings module
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to run `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Writing {schema} {key} failed ({status}): {stderr}")]
    Rejected {
        schema: String,
        key: String,
        status: String,
        stderr: String,
    },
}

type Result<T = ()> = std::result::Result<T, SettingsError>;

/// A store of string settings, addressed by schema and key
pub trait SettingsStore {
    fn set_string(&self, schema: &str, key: &str, value: &str) -> Result;
}

/// GSettings, written through the `gsettings` tool
#[derive(Debug, Clone)]
pub struct GSettings {
    program: String,
}

impl GSettings {
    /// Uses the given `gsettings` executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GSettings {
    fn default() -> Self {
        Self::with_program("gsettings")
    }
}

impl SettingsStore for GSettings {
    fn set_string(&self, schema: &str, key: &str, value: &str) -> Result {
        log::debug!("{} set {} {} {}", self.program, schema, key, value);
        let output = Command::new(&self.program)
            .arg("set")
            .arg(schema)
            .arg(key)
            .arg(value)
            .output()
            .map_err(|source| SettingsError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(SettingsError::Rejected {
                schema: schema.to_string(),
                key: key.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Writes the subpixel order matching `rotation`
pub fn sync_pixel_order(store: &impl SettingsStore, rotation: Rotation) -> Result<PixelOrder> {
    let order = rotation.pixel_order();
    log::debug!("pixel order: {}", order);
    store.set_string(PIXEL_ORDER_SCHEMA, PIXEL_ORDER_KEY, order.as_str())?;
    Ok(order)
}
