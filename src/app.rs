//! The pipeline behind the CLI: resolve an output, compute its new rotation,
//! commit it and bring the pixel order in line.

use std::io::Write;

use crate::{
    cli::{Request, RotateRequest},
    config::ConfigSnapshot,
    display::{Output, query_outputs},
    error::{Error, Result},
    platforms::DisplayService,
    settings::{SettingsStore, sync_pixel_order},
    types::{PixelOrder, Rotation},
};

/// What a successful run did
#[derive(Debug)]
pub enum Outcome {
    /// Printed this many lines, changed nothing
    Listed(usize),
    Rotated(Rotated),
}

#[derive(Debug)]
pub struct Rotated {
    pub output: String,
    pub rotation: Rotation,
    pub pixel_order: PixelOrder,
    /// Set if the pixel order could not be written; the rotation still happened
    pub pixel_order_error: Option<Error>,
}

/// Carries out `request`, printing listings to `out`
pub fn run<D, S, W>(request: &Request, display: &D, settings: &S, out: &mut W) -> Result<Outcome>
where
    D: DisplayService,
    S: SettingsStore,
    W: Write,
{
    match request {
        Request::ListOutputs => list_outputs(display, out).map(Outcome::Listed),
        Request::ListOutputInfos => list_output_infos(display, out).map(Outcome::Listed),
        Request::Rotate(rotate_request) => {
            rotate(rotate_request, display, settings).map(Outcome::Rotated)
        }
    }
}

/// Prints `<id>: <name>` for every output
pub fn list_outputs(display: &impl DisplayService, out: &mut impl Write) -> Result<usize> {
    let output_set = query_outputs(display)?;
    log::debug!("Discovered outputs:\n{}", output_set);

    let mut count = 0;
    for output in output_set.outputs() {
        writeln!(out, "{}: {}", output.id(), output.name())?;
        count += 1;
    }
    Ok(count)
}

/// Prints the name and display name of every monitor in the configuration
pub fn list_output_infos(display: &impl DisplayService, out: &mut impl Write) -> Result<usize> {
    let config = display.current_config()?;
    for monitor in &config.monitors {
        writeln!(
            out,
            "name: {}, display-name: {}",
            monitor.connector,
            monitor.display_name()
        )?;
    }
    Ok(config.monitors.len())
}

/// Picks the requested rotation, or the next quarter turn from the current one.
///
/// The current rotation is the one of the logical monitor showing `output`, as
/// that is the value a commit replaces. It can differ from the pipeline's when
/// the panel is mounted rotated, but the pipeline still has to be active.
pub fn compute_rotation(
    output: &Output<'_>,
    requested: Option<Rotation>,
    config: &ConfigSnapshot,
) -> Result<Rotation> {
    match requested {
        Some(rotation) => {
            log::debug!("orientation: {}", rotation);
            Ok(rotation)
        }
        None => {
            let pipeline = output.current_rotation()?;
            let current = config.record(output.name())?.rotation;
            if current != pipeline {
                log::debug!(
                    "{} pipeline is at {}, its logical monitor at {}",
                    output.name(),
                    pipeline,
                    current
                );
            }
            let rotation = current.successor();
            log::debug!("auto flip: {}", rotation);
            Ok(rotation)
        }
    }
}

/// Sets the rotation of output `name` in `config` and commits it
pub fn apply_rotation(
    display: &impl DisplayService,
    mut config: ConfigSnapshot,
    name: &str,
    rotation: Rotation,
) -> Result<()> {
    config.set_rotation(name, rotation)?;
    log::debug!("{}", config);

    log::debug!("Applying display configuration.");
    display.apply_config(&config)?;
    Ok(())
}

/// Rotates one output and syncs the pixel order
pub fn rotate(
    request: &RotateRequest,
    display: &impl DisplayService,
    settings: &impl SettingsStore,
) -> Result<Rotated> {
    log::debug!("Retrieving display output ({}).", request.selector);
    let output_set = query_outputs(display)?;
    log::debug!("Discovered outputs:\n{}", output_set);
    let output = output_set.resolve(&request.selector)?;

    if request.rotation.is_none() {
        // an inactive output fails before the snapshot is fetched
        output.current_rotation()?;
    }

    log::debug!("Retrieving output configuration.");
    let config = display.current_config()?;
    let rotation = compute_rotation(&output, request.rotation, &config)?;
    apply_rotation(display, config, output.name(), rotation)?;
    log::info!("Rotated {} to {}", output.name(), rotation);

    log::debug!("Applying pixel order.");
    let pixel_order_error = match sync_pixel_order(settings, rotation) {
        Ok(_) => None,
        Err(err) => {
            log::warn!("Failed to set pixel order: {}", err);
            Some(Error::PixelOrder(err))
        }
    };

    Ok(Rotated {
        output: output.name().to_string(),
        rotation,
        pixel_order: rotation.pixel_order(),
        pixel_order_error,
    })
}
