// ABOUTME: Stateful vidicon trail engine.
// ABOUTME: Resolves options once per geometry and filters RGB24 frames in place.

use std::collections::TryReserveError;

use vidicon_core::{Channel, OptionError, Rgb, StreamGeometry, TrailParams, VidiconOptions};

use crate::accumulator::{update_row, PhosphorGrid, PixelLaw};
use crate::frame::Frame;
use crate::planes::PlaneBuffers;

/// Frames between periodic progress logs
const LOG_INTERVAL: u64 = 500;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to allocate {bytes} bytes of phosphor state for {geometry}")]
    Allocation {
        geometry: StreamGeometry,
        bytes: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("Invalid trail options: {0}")]
    Options(#[from] OptionError),
}

/// Everything sized by the stream geometry. Replaced as a whole on resize.
#[derive(Debug)]
struct StreamState {
    geometry: StreamGeometry,
    grids: Rgb<PhosphorGrid>,
    planes: PlaneBuffers,
}

impl StreamState {
    fn allocate(geometry: StreamGeometry, burn_in: bool) -> Result<Self, EngineError> {
        let alloc_err = |bytes: usize| {
            move |source: TryReserveError| EngineError::Allocation {
                geometry,
                bytes,
                source,
            }
        };
        let grid_bytes = PhosphorGrid::footprint(geometry, burn_in).saturating_mul(Channel::COUNT);
        let grid = || PhosphorGrid::new(geometry, burn_in).map_err(alloc_err(grid_bytes));
        let grids = Rgb::new(grid()?, grid()?, grid()?);
        let planes = PlaneBuffers::new(geometry.width())
            .map_err(alloc_err(PlaneBuffers::footprint(geometry.width())))?;

        Ok(Self {
            geometry,
            grids,
            planes,
        })
    }
}

pub struct VidiconEngine {
    options: VidiconOptions,
    params: TrailParams,
    laws: Rgb<PixelLaw>,
    state: StreamState,
    frame_count: u64,
}

impl VidiconEngine {
    /// Resolve `options` and allocate zeroed state for `geometry`
    pub fn new(options: VidiconOptions, geometry: StreamGeometry) -> Result<Self, EngineError> {
        let (params, laws) = resolve(&options)?;
        let state = StreamState::allocate(geometry, params.burn_in)?;
        tracing::info!(
            "Configured {} stream ({} bytes of phosphor state)",
            geometry,
            PhosphorGrid::footprint(geometry, params.burn_in).saturating_mul(Channel::COUNT)
        );

        Ok(Self {
            options,
            params,
            laws,
            state,
            frame_count: 0,
        })
    }

    /// Re-run resolution and allocation for a new geometry.
    ///
    /// Accumulated trails are discarded. On failure the previous state is kept.
    pub fn configure(&mut self, geometry: StreamGeometry) -> Result<(), EngineError> {
        let (params, laws) = resolve(&self.options)?;
        let state = StreamState::allocate(geometry, params.burn_in)?;
        self.params = params;
        self.laws = laws;
        self.state = state;
        self.frame_count = 0;
        tracing::info!("Reconfigured for {} stream", geometry);
        Ok(())
    }

    /// Filter one frame in place.
    ///
    /// A frame with a different geometry reconfigures the engine first.
    pub fn filter_frame(&mut self, frame: &mut Frame) -> Result<(), EngineError> {
        if frame.geometry() != self.state.geometry {
            tracing::warn!(
                "Frame geometry changed from {} to {}, resetting trails",
                self.state.geometry,
                frame.geometry()
            );
            self.configure(frame.geometry())?;
        }

        let StreamState { grids, planes, .. } = &mut self.state;
        for (y, row) in frame.rows_mut().enumerate() {
            planes.split_from(row);
            for channel in Channel::ALL {
                let (accum, burn) = grids[channel].row_mut(y);
                update_row(
                    &self.laws[channel],
                    &planes.input[channel],
                    &mut planes.output[channel],
                    accum,
                    burn,
                );
            }
            planes.merge_into(row);
        }

        self.frame_count += 1;
        if self.frame_count % LOG_INTERVAL == 0 {
            tracing::debug!("Filtered {} frames", self.frame_count);
        }
        Ok(())
    }

    /// Forget all accumulated trails and burn-in, keeping the geometry
    pub fn reset(&mut self) {
        for channel in Channel::ALL {
            self.state.grids[channel].clear();
        }
        self.frame_count = 0;
    }

    pub fn geometry(&self) -> StreamGeometry {
        self.state.geometry
    }

    pub fn params(&self) -> &TrailParams {
        &self.params
    }

    /// Frames filtered since the last (re)configuration
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn grid(&self, channel: Channel) -> &PhosphorGrid {
        &self.state.grids[channel]
    }
}

fn resolve(options: &VidiconOptions) -> Result<(TrailParams, Rgb<PixelLaw>), EngineError> {
    let params = options.resolve()?;
    params.log_summary();
    let laws = params.channels.map(|c| PixelLaw::new(&c, params.burn_in));
    Ok((params, laws))
}
