use core::fmt;

use crate::types::Rotation;

/// Contains the properties of an output as reported by the session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputProperties {
    pub id: u32,
    /// Connector name, e.g. `eDP-1`
    pub name: String,
    pub display_name: Option<String>,
    pub primary: bool,
    /// The display pipeline driving this output; `None` if the output is off
    pub crtc: Option<CrtcState>,
}

/// The current state of a display pipeline (CRTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CrtcState {
    pub id: u32,
    pub rotation: Rotation,
}

impl OutputProperties {
    /// Returns the rotation of the active pipeline
    pub fn current_rotation(&self) -> Option<Rotation> {
        self.crtc.map(|crtc| crtc.rotation)
    }
}

impl fmt::Display for OutputProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Output {{ id: {}, name: {}, display_name: {}, primary: {}, rotation: ",
            self.id,
            self.name,
            self.display_name.as_deref().unwrap_or("-"),
            self.primary
        )?;
        match self.current_rotation() {
            Some(rotation) => write!(f, "{} }}", rotation),
            None => write!(f, "inactive }}"),
        }
    }
}
