// ABOUTME: Combines the config file with command-line overrides.
// ABOUTME: Produces the trail options and stream geometry the engine runs with.

use std::path::Path;

use anyhow::{bail, Context, Result};
use vidicon_core::{Config, StreamGeometry, VidiconOptions};

use crate::args::Args;

/// Load `explicit` if given, else the default config file.
///
/// An explicit file must load. A broken default file yields the defaults plus
/// the load error, so it can be reported once logging is running.
pub fn load_config(
    explicit: Option<&Path>,
    default: Option<&Path>,
) -> Result<(Config, Option<anyhow::Error>)> {
    if let Some(path) = explicit {
        let config = Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        return Ok((config, None));
    }

    let Some(path) = default else {
        return Ok((Config::default(), None));
    };
    match Config::load_or_default(path) {
        Ok(config) => Ok((config, None)),
        Err(e) => {
            let ignored = anyhow::Error::new(e).context(format!("Ignoring {}", path.display()));
            Ok((Config::default(), Some(ignored)))
        }
    }
}

/// Trail options and geometry after command-line overrides.
///
/// `--options` is applied over `[trail]`, `--no-burn` clears `burn_in` and
/// `--size` wins over `[stream]`.
pub fn effective(args: &Args, config: &Config) -> Result<(VidiconOptions, StreamGeometry)> {
    let mut options = config.trail.clone();
    if let Some(extra) = &args.options {
        options.apply_str(extra).context("Invalid --options")?;
    }
    if args.no_burn {
        options.burn_in = false;
    }

    let geometry = match (args.size, config.stream.geometry()) {
        (Some(size), _) => size,
        (None, Some(size)) => size.context("Invalid [stream] size in config")?,
        (None, None) => bail!("Frame size unknown; pass --size WIDTHxHEIGHT"),
    };
    Ok((options, geometry))
}
