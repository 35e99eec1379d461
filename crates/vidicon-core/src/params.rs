// ABOUTME: Trail parameters and the per-channel resolver.
// ABOUTME: Turns shared/per-channel option values with sentinels into effective values.

use std::ops::RangeInclusive;

use crate::channel::Rgb;

/// The three tunable quantities of the trail filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Per-frame decay multiplier of the accumulator
    Fade,
    /// Blend weight of the incoming sample
    Gain,
    /// How strongly accumulated burn energy bleeds into the image
    Burn,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [Parameter::Fade, Parameter::Gain, Parameter::Burn];

    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Fade => "fade",
            Parameter::Gain => "gain",
            Parameter::Burn => "burn",
        }
    }

    /// Accepted option values, including the "unset" region
    pub fn range(&self) -> RangeInclusive<f32> {
        match self {
            Parameter::Fade => -1.0..=1.0,
            Parameter::Gain => -1.0..=2.0,
            Parameter::Burn => -2.0..=1.0,
        }
    }

    /// Option default, which always lies in the "unset" region
    pub fn unset(&self) -> f32 {
        *self.range().start()
    }

    /// Value used when neither the channel nor the shared option is set
    pub fn fallback(&self) -> f32 {
        match self {
            Parameter::Fade => 0.5,
            Parameter::Gain => 1.0,
            Parameter::Burn => 0.0,
        }
    }

    /// Whether `value` was explicitly given.
    ///
    /// Fade and gain treat every negative value as unset. Burn reserves only
    /// `[-2.0, -1.0)` as unset, so `-1.0` stays a valid minimal burn.
    pub fn is_set(&self, value: f32) -> bool {
        match self {
            Parameter::Fade | Parameter::Gain => value >= 0.0,
            Parameter::Burn => value >= -1.0,
        }
    }

    /// Pick the channel value, else the shared value, else the fallback
    pub fn resolve(&self, channel_value: f32, shared_value: f32) -> f32 {
        if self.is_set(channel_value) {
            channel_value
        } else if self.is_set(shared_value) {
            shared_value
        } else {
            self.fallback()
        }
    }
}

/// Effective parameters for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelParams {
    pub fade: f32,
    pub gain: f32,
    pub burn: f32,
}

impl ChannelParams {
    pub fn get(&self, parameter: Parameter) -> f32 {
        match parameter {
            Parameter::Fade => self.fade,
            Parameter::Gain => self.gain,
            Parameter::Burn => self.burn,
        }
    }
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            fade: Parameter::Fade.fallback(),
            gain: Parameter::Gain.fallback(),
            burn: Parameter::Burn.fallback(),
        }
    }
}

/// Fully resolved filter configuration, fixed for a configured stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailParams {
    pub channels: Rgb<ChannelParams>,
    /// Selects the burn-in variant of the accumulation law
    pub burn_in: bool,
}

impl TrailParams {
    /// Log the resolved triples, one line per parameter
    pub fn log_summary(&self) {
        for parameter in Parameter::ALL {
            let v = self.channels.map(|c| c.get(parameter));
            tracing::info!(
                "{} R/G/B = {:.6} / {:.6} / {:.6}",
                title(parameter.name()),
                v.r,
                v.g,
                v.b
            );
        }
        tracing::info!("Burn-in {}", if self.burn_in { "enabled" } else { "disabled" });
    }
}

impl Default for TrailParams {
    fn default() -> Self {
        Self {
            channels: Rgb::splat(ChannelParams::default()),
            burn_in: true,
        }
    }
}

fn title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fade_falls_back_to_default() {
        assert_eq!(Parameter::Fade.resolve(-1.0, -1.0), 0.5);
    }

    #[test]
    fn unset_fade_takes_shared_value() {
        assert_eq!(Parameter::Fade.resolve(-1.0, 0.2), 0.2);
    }

    #[test]
    fn explicit_fade_wins_over_shared() {
        assert_eq!(Parameter::Fade.resolve(0.1, 0.2), 0.1);
        assert_eq!(Parameter::Fade.resolve(0.1, -1.0), 0.1);
    }

    #[test]
    fn zero_is_an_explicit_value() {
        assert_eq!(Parameter::Fade.resolve(0.0, 0.7), 0.0);
        assert_eq!(Parameter::Gain.resolve(-1.0, 0.0), 0.0);
    }

    #[test]
    fn negative_gain_is_unset() {
        assert_eq!(Parameter::Gain.resolve(-0.5, -0.25), 1.0);
    }

    #[test]
    fn burn_sentinel_is_below_minus_one() {
        // -1.0 is the minimal valid burn, not "unset"
        assert_eq!(Parameter::Burn.resolve(-1.0, 0.5), -1.0);
        assert_eq!(Parameter::Burn.resolve(-0.5, 0.5), -0.5);
        // [-2.0, -1.0) is unset
        assert_eq!(Parameter::Burn.resolve(-1.5, 0.5), 0.5);
        assert_eq!(Parameter::Burn.resolve(-2.0, -1.0), -1.0);
        assert_eq!(Parameter::Burn.resolve(-2.0, -2.0), 0.0);
    }

    #[test]
    fn defaults_lie_in_unset_region() {
        for parameter in Parameter::ALL {
            assert!(!parameter.is_set(parameter.unset()), "{:?}", parameter);
            assert!(parameter.range().contains(&parameter.fallback()));
        }
    }

    #[test]
    fn title_capitalises_first_letter() {
        assert_eq!(title("fade"), "Fade");
        assert_eq!(title(""), "");
    }
}
