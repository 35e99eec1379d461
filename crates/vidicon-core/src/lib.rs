// ABOUTME: Shared types and configuration for vidicon-trail.
// ABOUTME: Defines channels, trail options, the parameter resolver and config file handling.

pub mod channel;
pub mod config;
pub mod geometry;
pub mod options;
pub mod params;

pub use channel::{Channel, Rgb};
pub use config::{Config, ConfigError};
pub use geometry::{GeometryError, StreamGeometry};
pub use options::{OptionError, OptionSpec, VidiconOptions, OPTIONS};
pub use params::{ChannelParams, Parameter, TrailParams};
