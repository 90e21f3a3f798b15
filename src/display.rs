use core::fmt;

use thiserror::Error;

use crate::{
    platforms::{DisplayService, ServiceError},
    properties::OutputProperties,
    types::Rotation,
};

/// Error type for the display module
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Error in the display service")]
    Service(#[from] ServiceError),
    #[error("Output with id {0} not found")]
    IdNotFound(u32),
    #[error("Output with name {0} not found")]
    NameNotFound(String),
    #[error("No output is flagged as primary")]
    NoPrimary,
    #[error("Output {0} is not active")]
    Inactive(String),
}

type Result<T = ()> = std::result::Result<T, DisplayError>;

/// A struct that represents an output (index)
#[derive(Debug, Clone, Copy)]
pub struct Output<'a> {
    /// The index of the output in the output set
    index: usize,
    /// The output set containing this output
    output_set: &'a OutputSet,
}

/// Generates getter for properties of an output
macro_rules! get_properties {
    ($field:ident: $ty:ty) => {
        pub fn $field(&self) -> $ty {
            self.properties().$field
        }
    };
}

impl<'a> Output<'a> {
    pub fn properties(&self) -> &'a OutputProperties {
        &self.output_set.outputs[self.index]
    }

    get_properties!(id: u32);
    get_properties!(primary: bool);

    pub fn name(&self) -> &'a str {
        self.properties().name.as_str()
    }

    /// Returns the current rotation, failing if the output has no active pipeline
    pub fn current_rotation(&self) -> Result<Rotation> {
        self.properties()
            .current_rotation()
            .ok_or_else(|| DisplayError::Inactive(self.name().to_string()))
    }
}

/// Selects one output of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSelector {
    Id(u32),
    Name(String),
    Primary,
}

impl fmt::Display for OutputSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputSelector::Id(id) => write!(f, "id {}", id),
            OutputSelector::Name(name) => write!(f, "name {}", name),
            OutputSelector::Primary => write!(f, "primary"),
        }
    }
}

/// A struct that represents the outputs of a session, in service order
#[derive(Debug, Clone)]
pub struct OutputSet {
    outputs: Vec<OutputProperties>,
}

impl OutputSet {
    pub fn new(outputs: Vec<OutputProperties>) -> Self {
        Self { outputs }
    }

    /// Iterates over the outputs in this set
    pub fn outputs(&self) -> impl ExactSizeIterator<Item = Output<'_>> {
        (0..self.outputs.len()).map(move |index| Output {
            index,
            output_set: self,
        })
    }

    /// Returns the output with the given `id`
    pub fn get(&self, id: u32) -> Option<Output<'_>> {
        self.outputs().find(|o| o.id() == id)
    }

    /// Returns the output with the given `name`, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<Output<'_>> {
        self.outputs().find(|o| o.name().eq_ignore_ascii_case(name))
    }

    /// Returns the primary output
    pub fn primary(&self) -> Option<Output<'_>> {
        self.outputs().find(|o| o.primary())
    }

    /// Picks the output described by `selector`
    pub fn resolve(&self, selector: &OutputSelector) -> Result<Output<'_>> {
        match selector {
            OutputSelector::Id(id) => self.get(*id).ok_or(DisplayError::IdNotFound(*id)),
            OutputSelector::Name(name) => self
                .find_by_name(name)
                .ok_or_else(|| DisplayError::NameNotFound(name.clone())),
            OutputSelector::Primary => self.primary().ok_or(DisplayError::NoPrimary),
        }
    }
}

impl fmt::Display for OutputSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OutputSet {{ outputs: [")?;
        for (i, output) in self.outputs.iter().enumerate() {
            if i > 0 {
                writeln!(f, ", ")?;
            }
            write!(f, "    {}", output)?;
        }
        write!(f, "\n] }}")
    }
}

/// Returns a list of all outputs known to the session.
pub fn query_outputs(service: &impl DisplayService) -> Result<OutputSet> {
    let outputs = service.outputs()?;
    log::debug!("Session reported {} outputs", outputs.len());
    Ok(OutputSet::new(outputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::CrtcState;

    fn output(id: u32, name: &str, primary: bool, rotation: Option<Rotation>) -> OutputProperties {
        OutputProperties {
            id,
            name: name.to_string(),
            display_name: None,
            primary,
            crtc: rotation.map(|rotation| CrtcState { id: id + 100, rotation }),
        }
    }

    fn output_set() -> OutputSet {
        OutputSet::new(vec![
            output(3, "HDMI-1", false, None),
            output(1, "eDP-1", true, Some(Rotation::Rotate180)),
            output(5, "DP-2", false, Some(Rotation::Rotate0)),
        ])
    }

    #[test]
    fn resolve_by_id() -> Result {
        let set = output_set();
        assert_eq!(set.resolve(&OutputSelector::Id(5))?.name(), "DP-2");
        assert!(matches!(
            set.resolve(&OutputSelector::Id(2)),
            Err(DisplayError::IdNotFound(2))
        ));
        Ok(())
    }

    #[test]
    fn resolve_by_name_ignores_case() -> Result {
        let set = output_set();
        let output = set.resolve(&OutputSelector::Name("edp-1".to_string()))?;
        assert_eq!(output.id(), 1);
        assert!(matches!(
            set.resolve(&OutputSelector::Name("VGA-1".to_string())),
            Err(DisplayError::NameNotFound(name)) if name == "VGA-1"
        ));
        Ok(())
    }

    #[test]
    fn resolve_primary() -> Result {
        let set = output_set();
        assert_eq!(set.resolve(&OutputSelector::Primary)?.name(), "eDP-1");

        let no_primary = OutputSet::new(vec![output(0, "DP-1", false, None)]);
        assert!(matches!(
            no_primary.resolve(&OutputSelector::Primary),
            Err(DisplayError::NoPrimary)
        ));
        Ok(())
    }

    #[test]
    fn inactive_output_has_no_rotation() -> Result {
        let set = output_set();
        assert_eq!(set.get(1).map(|o| o.current_rotation().ok()), Some(Some(Rotation::Rotate180)));
        assert!(matches!(
            set.resolve(&OutputSelector::Id(3))?.current_rotation(),
            Err(DisplayError::Inactive(name)) if name == "HDMI-1"
        ));
        Ok(())
    }

    #[test]
    fn outputs_keep_service_order() {
        let set = output_set();
        let ids: Vec<u32> = set.outputs().map(|o| o.id()).collect();
        assert_eq!(ids, vec![3, 1, 5]);
    }

    #[test]
    fn display_lists_every_output() {
        let text = output_set().to_string();
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("name: HDMI-1, display_name: -, primary: false, rotation: inactive"));
        assert!(text.contains("name: eDP-1, display_name: -, primary: true, rotation: 180°"));
    }
}
