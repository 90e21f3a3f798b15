//! Command line options and the request built from them.

use std::io::Write;

use structopt::{StructOpt, clap};
use thiserror::Error;

use crate::{
    display::OutputSelector,
    types::{ParseRotationError, Rotation},
};

/// CLI arguments
#[derive(StructOpt, Debug)]
#[structopt(
    name = "flip-screen",
    about = "Rotates an output of the GNOME session and keeps the subpixel order in sync."
)]
pub struct Opts {
    /// List existing outputs, perform no action
    #[structopt(short = "l", long)]
    pub list_outputs: bool,
    /// List existing output infos, perform no action
    #[structopt(long)]
    pub list_output_infos: bool,
    /// Manual display orientation
    #[structopt(
        short,
        long,
        long_help = "Manual display orientation. One of: `left`, `left-up`, `right`, `right-up`, `flip`, `bottom`, `bottom-up`, `up`, `top-up`, `reset`. Without it, the output is rotated by a quarter turn."
    )]
    pub orientation: Option<String>,
    /// Screen output id
    #[structopt(short = "i", long)]
    pub output_id: Option<u32>,
    /// Screen output name
    #[structopt(short = "n", long)]
    pub output_name: Option<String>,
    /// Output debug info
    #[structopt(short, long)]
    pub verbose: bool,
}

/// Errors in otherwise well-formed arguments
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("Only one of 'output-id' and 'output-name' must be specified.")]
    ConflictingSelectors,
    #[error(transparent)]
    InvalidOrientation(#[from] ParseRotationError),
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListOutputs,
    ListOutputInfos,
    Rotate(RotateRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotateRequest {
    pub selector: OutputSelector,
    /// `None` rotates the output a quarter turn from where it is
    pub rotation: Option<Rotation>,
}

impl TryFrom<&Opts> for Request {
    type Error = UsageError;

    /// Listing flags win over everything else, the remaining options are not validated then.
    fn try_from(opts: &Opts) -> Result<Self, Self::Error> {
        if opts.list_outputs {
            return Ok(Request::ListOutputs);
        }
        if opts.list_output_infos {
            return Ok(Request::ListOutputInfos);
        }

        let selector = match (opts.output_id, &opts.output_name) {
            (Some(_), Some(_)) => return Err(UsageError::ConflictingSelectors),
            (Some(id), None) => OutputSelector::Id(id),
            (None, Some(name)) => OutputSelector::Name(name.clone()),
            (None, None) => OutputSelector::Primary,
        };

        let rotation = opts
            .orientation
            .as_deref()
            .map(str::parse::<Rotation>)
            .transpose()?;

        Ok(Request::Rotate(RotateRequest { selector, rotation }))
    }
}

/// Writes the diagnostic for `err` followed by the help text
pub fn write_usage_error(err: &UsageError, out: &mut impl Write) -> clap::Result<()> {
    writeln!(out, "{}", err)?;
    Opts::clap().write_help(out)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(args: &[&str]) -> Result<Request, UsageError> {
        let opts = Opts::from_iter_safe(std::iter::once("flip-screen").chain(args.iter().copied()))
            .expect("arguments should parse");
        Request::try_from(&opts)
    }

    #[test]
    fn defaults_to_flipping_the_primary_output() {
        assert_eq!(
            request(&[]),
            Ok(Request::Rotate(RotateRequest {
                selector: OutputSelector::Primary,
                rotation: None,
            }))
        );
    }

    #[test]
    fn short_and_long_flags() {
        assert_eq!(
            request(&["-i", "2", "-o", "Left"]),
            Ok(Request::Rotate(RotateRequest {
                selector: OutputSelector::Id(2),
                rotation: Some(Rotation::Rotate90),
            }))
        );
        assert_eq!(
            request(&["--output-name=HDMI-1", "--orientation=bottom-up"]),
            Ok(Request::Rotate(RotateRequest {
                selector: OutputSelector::Name("HDMI-1".to_string()),
                rotation: Some(Rotation::Rotate180),
            }))
        );
    }

    #[test]
    fn both_selectors_are_a_usage_error() {
        assert_eq!(
            request(&["--output-id=5", "--output-name=eDP-1"]),
            Err(UsageError::ConflictingSelectors)
        );
    }

    #[test]
    fn unknown_orientation_is_a_usage_error() {
        assert_eq!(
            request(&["--orientation=sideways"]),
            Err(UsageError::InvalidOrientation(
                ParseRotationError::UnknownKeyword("sideways".to_string())
            ))
        );
    }

    #[test]
    fn listing_skips_validation() {
        assert_eq!(
            request(&["-l", "--output-id=5", "--output-name=eDP-1", "-o", "sideways"]),
            Ok(Request::ListOutputs)
        );
        assert_eq!(
            request(&["--list-output-infos", "-o", "sideways"]),
            Ok(Request::ListOutputInfos)
        );
        assert_eq!(
            request(&["--list-output-infos", "--list-outputs"]),
            Ok(Request::ListOutputs)
        );
    }

    #[test]
    fn malformed_arguments_fail_to_parse() {
        let parse = |args: &[&str]| {
            Opts::from_iter_safe(std::iter::once("flip-screen").chain(args.iter().copied()))
        };
        assert!(parse(&["--output-id=-1"]).is_err());
        assert!(parse(&["--output-id=abc"]).is_err());
        assert!(parse(&["--rotate"]).is_err());
        assert!(parse(&["--orientation"]).is_err());
    }

    #[test]
    fn usage_error_is_written_before_help() -> clap::Result<()> {
        let mut out = Vec::new();
        write_usage_error(&UsageError::ConflictingSelectors, &mut out)?;

        let text = String::from_utf8_lossy(&out);
        assert_eq!(
            text.lines().next(),
            Some("Only one of 'output-id' and 'output-name' must be specified.")
        );
        assert!(text.contains("USAGE:"));
        assert!(text.contains("--output-name"));
        Ok(())
    }
}
