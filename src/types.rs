use core::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rotation of an output, counted in quarter turns
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

/// Orientation keywords accepted on the command line
const KEYWORDS: [(&str, Rotation); 10] = [
    ("left", Rotation::Rotate90),
    ("left-up", Rotation::Rotate90),
    ("right", Rotation::Rotate270),
    ("right-up", Rotation::Rotate270),
    ("flip", Rotation::Rotate180),
    ("bottom", Rotation::Rotate180),
    ("bottom-up", Rotation::Rotate180),
    ("up", Rotation::Rotate0),
    ("top-up", Rotation::Rotate0),
    ("reset", Rotation::Rotate0),
];

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Rotate0,
        Rotation::Rotate90,
        Rotation::Rotate180,
        Rotation::Rotate270,
    ];

    /// Looks up an orientation keyword, ignoring ASCII case
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(keyword))
            .map(|(_, rotation)| *rotation)
    }

    /// The next rotation in the cycle 0 -> 90 -> 180 -> 270 -> 0
    pub fn successor(self) -> Self {
        match self {
            Rotation::Rotate0 => Rotation::Rotate90,
            Rotation::Rotate90 => Rotation::Rotate180,
            Rotation::Rotate180 => Rotation::Rotate270,
            Rotation::Rotate270 => Rotation::Rotate0,
        }
    }

    pub fn to_degrees(self) -> u32 {
        match self {
            Rotation::Rotate0 => 0,
            Rotation::Rotate90 => 90,
            Rotation::Rotate180 => 180,
            Rotation::Rotate270 => 270,
        }
    }

    /// Creates a rotation from a Mutter monitor transform.
    ///
    /// Values 4 to 7 are the reflected variants of 0 to 3; the reflection is dropped.
    pub fn from_transform(transform: u32) -> Result<Self, InvalidTransform> {
        match transform {
            0 | 4 => Ok(Rotation::Rotate0),
            1 | 5 => Ok(Rotation::Rotate90),
            2 | 6 => Ok(Rotation::Rotate180),
            3 | 7 => Ok(Rotation::Rotate270),
            other => Err(InvalidTransform(other)),
        }
    }

    /// Converts to a Mutter monitor transform without reflection
    pub fn to_transform(self) -> u32 {
        match self {
            Rotation::Rotate0 => 0,
            Rotation::Rotate90 => 1,
            Rotation::Rotate180 => 2,
            Rotation::Rotate270 => 3,
        }
    }

    /// The subpixel order matching this rotation
    pub fn pixel_order(self) -> PixelOrder {
        match self {
            Rotation::Rotate0 => PixelOrder::Rgb,
            Rotation::Rotate90 => PixelOrder::Vrgb,
            Rotation::Rotate180 => PixelOrder::Bgr,
            Rotation::Rotate270 => PixelOrder::Vbgr,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.to_degrees())
    }
}

/// Errors that occur while parsing an orientation keyword
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseRotationError {
    #[error(
        "Invalid orientation `{0}`. Allowed values: left, left-up, right, right-up, flip, bottom, bottom-up, up, top-up, reset"
    )]
    UnknownKeyword(String),
}

impl FromStr for Rotation {
    type Err = ParseRotationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Rotation::from_keyword(s).ok_or_else(|| ParseRotationError::UnknownKeyword(s.to_string()))
    }
}

/// A transform value the display service reported but we don't know
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown monitor transform: {0}")]
pub struct InvalidTransform(pub u32);

/// Subpixel layout used for font antialiasing
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PixelOrder {
    Rgb,
    Vrgb,
    Bgr,
    Vbgr,
}

impl PixelOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixelOrder::Rgb => "rgb",
            PixelOrder::Vrgb => "vrgb",
            PixelOrder::Bgr => "bgr",
            PixelOrder::Vbgr => "vbgr",
        }
    }
}

impl fmt::Display for PixelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn keywords_map_to_rotations() -> Result<(), ParseRotationError> {
        assert_eq!("left".parse::<Rotation>()?, Rotation::Rotate90);
        assert_eq!("left-up".parse::<Rotation>()?, Rotation::Rotate90);
        assert_eq!("right".parse::<Rotation>()?, Rotation::Rotate270);
        assert_eq!("right-up".parse::<Rotation>()?, Rotation::Rotate270);
        assert_eq!("flip".parse::<Rotation>()?, Rotation::Rotate180);
        assert_eq!("bottom".parse::<Rotation>()?, Rotation::Rotate180);
        assert_eq!("bottom-up".parse::<Rotation>()?, Rotation::Rotate180);
        assert_eq!("up".parse::<Rotation>()?, Rotation::Rotate0);
        assert_eq!("top-up".parse::<Rotation>()?, Rotation::Rotate0);
        assert_eq!("reset".parse::<Rotation>()?, Rotation::Rotate0);
        Ok(())
    }

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(Rotation::from_keyword("LEFT"), Some(Rotation::Rotate90));
        assert_eq!(Rotation::from_keyword("Bottom-Up"), Some(Rotation::Rotate180));
        assert_eq!(Rotation::from_keyword("ReSeT"), Some(Rotation::Rotate0));
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        assert_eq!(
            "sideways".parse::<Rotation>(),
            Err(ParseRotationError::UnknownKeyword("sideways".to_string()))
        );
        assert!(Rotation::from_keyword("").is_none());
        assert!(Rotation::from_keyword("left ").is_none());
    }

    #[test]
    fn successor_cycles_in_quarter_turns() {
        assert_eq!(Rotation::Rotate0.successor(), Rotation::Rotate90);
        assert_eq!(Rotation::Rotate90.successor(), Rotation::Rotate180);
        assert_eq!(Rotation::Rotate180.successor(), Rotation::Rotate270);
        assert_eq!(Rotation::Rotate270.successor(), Rotation::Rotate0);

        for rotation in Rotation::ALL {
            assert_ne!(rotation.successor().successor(), rotation);
            assert_eq!(
                rotation.successor().successor().successor().successor(),
                rotation
            );
        }
    }

    #[test]
    fn pixel_order_is_total_and_unique() {
        let orders: HashSet<&str> = Rotation::ALL
            .iter()
            .map(|r| r.pixel_order().as_str())
            .collect();
        assert_eq!(orders.len(), 4);

        assert_eq!(Rotation::Rotate0.pixel_order().as_str(), "rgb");
        assert_eq!(Rotation::Rotate90.pixel_order().as_str(), "vrgb");
        assert_eq!(Rotation::Rotate180.pixel_order().as_str(), "bgr");
        assert_eq!(Rotation::Rotate270.pixel_order().as_str(), "vbgr");
    }

    #[test]
    fn transforms_drop_reflection() -> Result<(), InvalidTransform> {
        for rotation in Rotation::ALL {
            assert_eq!(Rotation::from_transform(rotation.to_transform())?, rotation);
            assert_eq!(
                Rotation::from_transform(rotation.to_transform() + 4)?,
                rotation
            );
        }
        assert_eq!(Rotation::from_transform(8), Err(InvalidTransform(8)));
        Ok(())
    }
}
