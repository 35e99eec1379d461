// ABOUTME: Per-pixel phosphor accumulation engine for vidicon light trails.
// ABOUTME: Splits RGB24 rows into planes, advances persistent per-channel state, merges back.

pub mod accumulator;
pub mod engine;
pub mod frame;
pub mod planes;

pub use accumulator::{BurnLaw, PhosphorGrid, PixelLaw};
pub use engine::{EngineError, VidiconEngine};
pub use frame::{Frame, FrameError};
pub use planes::PlaneBuffers;
