// ABOUTME: User-facing trail options and their parser.
// ABOUTME: Twelve float options with ranges, parsed from `key=value:key=value` strings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::channel::{Channel, Rgb};
use crate::params::{ChannelParams, Parameter, TrailParams};

/// One row of the option table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub parameter: Parameter,
    /// `None` for the shared option
    pub channel: Option<Channel>,
}

impl OptionSpec {
    const fn new(
        name: &'static str,
        help: &'static str,
        parameter: Parameter,
        channel: Option<Channel>,
    ) -> Self {
        Self {
            name,
            help,
            parameter,
            channel,
        }
    }

    pub fn find(name: &str) -> Option<&'static OptionSpec> {
        OPTIONS.iter().find(|spec| spec.name == name)
    }

    fn check(&self, value: f32) -> Result<(), OptionError> {
        let range = self.parameter.range();
        if range.contains(&value) {
            Ok(())
        } else {
            Err(OptionError::OutOfRange {
                key: self.name,
                value,
                min: *range.start(),
                max: *range.end(),
            })
        }
    }
}

/// Every option the filter accepts, shared values first
pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec::new("fade", "Fade factor for all channels", Parameter::Fade, None),
    OptionSpec::new("gain", "Gain factor for all channels", Parameter::Gain, None),
    OptionSpec::new("burn", "Burn factor for all channels", Parameter::Burn, None),
    OptionSpec::new("fade_r", "Fade factor for red channel", Parameter::Fade, Some(Channel::Red)),
    OptionSpec::new("fade_g", "Fade factor for green channel", Parameter::Fade, Some(Channel::Green)),
    OptionSpec::new("fade_b", "Fade factor for blue channel", Parameter::Fade, Some(Channel::Blue)),
    OptionSpec::new("gain_r", "Gain factor for red channel", Parameter::Gain, Some(Channel::Red)),
    OptionSpec::new("gain_g", "Gain factor for green channel", Parameter::Gain, Some(Channel::Green)),
    OptionSpec::new("gain_b", "Gain factor for blue channel", Parameter::Gain, Some(Channel::Blue)),
    OptionSpec::new("burn_r", "Burn factor for red channel", Parameter::Burn, Some(Channel::Red)),
    OptionSpec::new("burn_g", "Burn factor for green channel", Parameter::Burn, Some(Channel::Green)),
    OptionSpec::new("burn_b", "Burn factor for blue channel", Parameter::Burn, Some(Channel::Blue)),
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionError {
    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    #[error("Option '{0}' has no value (expected key=value)")]
    MissingValue(String),

    #[error("Invalid value '{value}' for option '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("Value {value} for option '{key}' is out of range [{min}, {max}]")]
    OutOfRange {
        key: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Raw option values as the user gave them.
///
/// Negative fade/gain and burn below -1.0 mean "not specified"; see
/// [`Parameter::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VidiconOptions {
    /// Fade factor for all channels (1.0 = endless trails, 0.0 = none)
    pub fade: f32,
    /// Gain factor for all channels
    pub gain: f32,
    /// Burn factor for all channels
    pub burn: f32,

    pub fade_r: f32,
    pub fade_g: f32,
    pub fade_b: f32,

    pub gain_r: f32,
    pub gain_g: f32,
    pub gain_b: f32,

    pub burn_r: f32,
    pub burn_g: f32,
    pub burn_b: f32,

    /// Enable highlight burn-in (halves gain to leave headroom for burn energy)
    pub burn_in: bool,
}

impl Default for VidiconOptions {
    fn default() -> Self {
        let fade = Parameter::Fade.unset();
        let gain = Parameter::Gain.unset();
        let burn = Parameter::Burn.unset();
        Self {
            fade,
            gain,
            burn,
            fade_r: fade,
            fade_g: fade,
            fade_b: fade,
            gain_r: gain,
            gain_g: gain,
            gain_b: gain,
            burn_r: burn,
            burn_g: burn,
            burn_b: burn,
            burn_in: true,
        }
    }
}

impl VidiconOptions {
    /// Read the value an option-table row refers to
    pub fn get(&self, parameter: Parameter, channel: Option<Channel>) -> f32 {
        match (parameter, channel) {
            (Parameter::Fade, None) => self.fade,
            (Parameter::Gain, None) => self.gain,
            (Parameter::Burn, None) => self.burn,
            (Parameter::Fade, Some(ch)) => self.fades()[ch],
            (Parameter::Gain, Some(ch)) => self.gains()[ch],
            (Parameter::Burn, Some(ch)) => self.burns()[ch],
        }
    }

    fn slot_mut(&mut self, parameter: Parameter, channel: Option<Channel>) -> &mut f32 {
        match (parameter, channel) {
            (Parameter::Fade, None) => &mut self.fade,
            (Parameter::Gain, None) => &mut self.gain,
            (Parameter::Burn, None) => &mut self.burn,
            (Parameter::Fade, Some(Channel::Red)) => &mut self.fade_r,
            (Parameter::Fade, Some(Channel::Green)) => &mut self.fade_g,
            (Parameter::Fade, Some(Channel::Blue)) => &mut self.fade_b,
            (Parameter::Gain, Some(Channel::Red)) => &mut self.gain_r,
            (Parameter::Gain, Some(Channel::Green)) => &mut self.gain_g,
            (Parameter::Gain, Some(Channel::Blue)) => &mut self.gain_b,
            (Parameter::Burn, Some(Channel::Red)) => &mut self.burn_r,
            (Parameter::Burn, Some(Channel::Green)) => &mut self.burn_g,
            (Parameter::Burn, Some(Channel::Blue)) => &mut self.burn_b,
        }
    }

    fn fades(&self) -> Rgb<f32> {
        Rgb::new(self.fade_r, self.fade_g, self.fade_b)
    }

    fn gains(&self) -> Rgb<f32> {
        Rgb::new(self.gain_r, self.gain_g, self.gain_b)
    }

    fn burns(&self) -> Rgb<f32> {
        Rgb::new(self.burn_r, self.burn_g, self.burn_b)
    }

    /// Assign one option by name, rejecting unknown names and out-of-range values
    pub fn set(&mut self, key: &str, value: f32) -> Result<(), OptionError> {
        let spec = OptionSpec::find(key).ok_or_else(|| OptionError::UnknownOption(key.to_string()))?;
        spec.check(value)?;
        *self.slot_mut(spec.parameter, spec.channel) = value;
        Ok(())
    }

    /// Apply a `key=value:key=value` option string on top of the current values
    pub fn apply_str(&mut self, options: &str) -> Result<(), OptionError> {
        for entry in options.split(':').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, raw) = entry
                .split_once('=')
                .ok_or_else(|| OptionError::MissingValue(entry.to_string()))?;
            let (key, raw) = (key.trim(), raw.trim());
            let value: f32 = raw.parse().map_err(|_| OptionError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
            })?;
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Check every value against its range (for values that skipped `set`)
    pub fn validate(&self) -> Result<(), OptionError> {
        OPTIONS
            .iter()
            .try_for_each(|spec| spec.check(self.get(spec.parameter, spec.channel)))
    }

    /// Resolve shared and per-channel values into effective parameters
    pub fn resolve(&self) -> Result<TrailParams, OptionError> {
        self.validate()?;

        let (fades, gains, burns) = (self.fades(), self.gains(), self.burns());
        let channels = Rgb::from_fn(|ch| ChannelParams {
            fade: Parameter::Fade.resolve(fades[ch], self.fade),
            gain: Parameter::Gain.resolve(gains[ch], self.gain),
            burn: Parameter::Burn.resolve(burns[ch], self.burn),
        });

        Ok(TrailParams {
            channels,
            burn_in: self.burn_in,
        })
    }
}

impl FromStr for VidiconOptions {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut options = Self::default();
        options.apply_str(s)?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_twelve_unique_options() {
        assert_eq!(OPTIONS.len(), 12);
        for (i, spec) in OPTIONS.iter().enumerate() {
            assert!(OPTIONS[i + 1..].iter().all(|other| other.name != spec.name));
        }
    }

    #[test]
    fn defaults_resolve_to_hard_defaults() {
        let params = VidiconOptions::default().resolve().unwrap();
        for (_, ch) in params.channels.iter() {
            assert_eq!(*ch, ChannelParams::default());
        }
        assert!(params.burn_in);
    }

    #[test]
    fn parse_shared_and_channel_values() {
        let options: VidiconOptions = "fade=0.2:fade_r=0.1:gain_b=1.5:burn=0.3".parse().unwrap();
        let params = options.resolve().unwrap();

        assert_eq!(params.channels.r.fade, 0.1);
        assert_eq!(params.channels.g.fade, 0.2);
        assert_eq!(params.channels.b.fade, 0.2);
        assert_eq!(params.channels.r.gain, 1.0);
        assert_eq!(params.channels.b.gain, 1.5);
        assert_eq!(params.channels.g.burn, 0.3);
    }

    #[test]
    fn parse_trims_whitespace_and_skips_empty_entries() {
        let options: VidiconOptions = " fade = 0.9 :: gain=2 :".parse().unwrap();
        assert_eq!(options.fade, 0.9);
        assert_eq!(options.gain, 2.0);
    }

    #[test]
    fn parse_rejects_unknown_key() {
        let err = "fade=0.5:glow=1".parse::<VidiconOptions>().unwrap_err();
        assert_eq!(err, OptionError::UnknownOption("glow".to_string()));
    }

    #[test]
    fn parse_rejects_missing_value() {
        let err = "fade".parse::<VidiconOptions>().unwrap_err();
        assert_eq!(err, OptionError::MissingValue("fade".to_string()));
    }

    #[test]
    fn parse_rejects_garbage_number() {
        let err = "gain=lots".parse::<VidiconOptions>().unwrap_err();
        assert!(matches!(err, OptionError::InvalidValue { ref key, .. } if key == "gain"));
    }

    #[test]
    fn parse_rejects_out_of_range() {
        let err = "gain_g=2.5".parse::<VidiconOptions>().unwrap_err();
        assert!(matches!(err, OptionError::OutOfRange { key: "gain_g", .. }));

        let err = "burn=-2.1".parse::<VidiconOptions>().unwrap_err();
        assert!(matches!(err, OptionError::OutOfRange { key: "burn", .. }));

        assert!("fade=NaN".parse::<VidiconOptions>().is_err());
    }

    #[test]
    fn range_edges_are_accepted() {
        let options: VidiconOptions = "fade=1:gain=2:burn=-2:burn_r=1:gain_g=-1".parse().unwrap();
        assert!(options.validate().is_ok());
    }

    #[test]
    fn validate_catches_values_set_directly() {
        let options = VidiconOptions {
            fade_b: 3.0,
            ..VidiconOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(OptionError::OutOfRange { key: "fade_b", .. })
        ));
        assert!(options.resolve().is_err());
    }

    #[test]
    fn get_reads_every_table_row() {
        let mut options = VidiconOptions::default();
        for (i, spec) in OPTIONS.iter().enumerate() {
            let value = i as f32 / 20.0;
            options.set(spec.name, value).unwrap();
            assert_eq!(options.get(spec.parameter, spec.channel), value, "{}", spec.name);
        }
    }
}
