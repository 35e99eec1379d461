// ABOUTME: Per-pixel phosphor accumulation with optional highlight burn-in.
// ABOUTME: Owns the geometry-sized accumulator grids and the row update kernel.

use std::collections::TryReserveError;

use vidicon_core::{ChannelParams, StreamGeometry};

/// Pixels handled per block; rows that are not a multiple finish in a tail pass
pub const LANES: usize = 8;

/// Highlight extraction slope, scaled by the blend factor
pub const BURN_KNEE_GAIN: f32 = 20.0;

/// Highlight extraction offset, scaled by the blend factor
pub const BURN_KNEE_OFFSET: f32 = 19.0;

/// Per-frame decay of burned-in energy
pub const BURN_DECAY: f32 = 0.99;

/// `burn` option is divided by this to get the bleed depth
pub const BURN_DEPTH_DIVISOR: f32 = 10.0;

/// Burn-in terms of the update law
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnLaw {
    pub decay: f32,
    pub depth: f32,
    pub knee_gain: f32,
    pub knee_offset: f32,
}

impl BurnLaw {
    /// Energy above the knee; zero for everything darker
    #[inline(always)]
    pub fn extract(&self, sample: f32) -> f32 {
        (sample * self.knee_gain - self.knee_offset).max(0.0)
    }

    #[inline(always)]
    fn step(&self, burn: f32, sample: f32) -> f32 {
        burn * self.decay + self.extract(sample)
    }
}

/// Coefficients of the recursive filter for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelLaw {
    pub fade: f32,
    pub blend: f32,
    pub burn: Option<BurnLaw>,
}

impl PixelLaw {
    /// Plain decay-and-blend law
    pub fn trail(params: &ChannelParams) -> Self {
        Self {
            fade: params.fade,
            blend: params.gain,
            burn: None,
        }
    }

    /// Burn-in law. Gain is halved to leave headroom for burn energy.
    pub fn burn_in(params: &ChannelParams) -> Self {
        let blend = params.gain / 2.0;
        Self {
            fade: params.fade,
            blend,
            burn: Some(BurnLaw {
                decay: BURN_DECAY,
                depth: params.burn / BURN_DEPTH_DIVISOR,
                knee_gain: BURN_KNEE_GAIN * blend,
                knee_offset: BURN_KNEE_OFFSET * blend,
            }),
        }
    }

    pub fn new(params: &ChannelParams, burn_in: bool) -> Self {
        if burn_in {
            Self::burn_in(params)
        } else {
            Self::trail(params)
        }
    }

    #[inline(always)]
    fn accumulate(&self, accum: f32, sample: f32) -> f32 {
        accum * self.fade + sample * self.blend
    }
}

#[inline(always)]
pub fn normalize(sample: u8) -> f32 {
    sample as f32 / 255.0
}

/// Back to display range: round half to even, saturate to 0..=255
#[inline(always)]
pub fn to_display(value: f32) -> u8 {
    // NaN survives clamp and casts to 0
    (value * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
}

/// Advance one row of one channel by a frame.
///
/// `burn` is used only when `law` carries a burn term. All slices must be
/// the same length.
pub fn update_row(
    law: &PixelLaw,
    src: &[u8],
    dst: &mut [u8],
    accum: &mut [f32],
    burn: Option<&mut [f32]>,
) {
    debug_assert_eq!(src.len(), dst.len());
    debug_assert_eq!(src.len(), accum.len());

    match (law.burn, burn) {
        (Some(burn_law), Some(burn)) => {
            debug_assert_eq!(src.len(), burn.len());
            update_burn_row(law, &burn_law, src, dst, accum, burn)
        }
        _ => update_trail_row(law, src, dst, accum),
    }
}

fn update_trail_row(law: &PixelLaw, src: &[u8], dst: &mut [u8], accum: &mut [f32]) {
    let mut src_blocks = src.chunks_exact(LANES);
    let mut dst_blocks = dst.chunks_exact_mut(LANES);
    let mut acc_blocks = accum.chunks_exact_mut(LANES);

    for ((s, d), a) in (&mut src_blocks).zip(&mut dst_blocks).zip(&mut acc_blocks) {
        trail_pixels(law, s, d, a);
    }
    trail_pixels(
        law,
        src_blocks.remainder(),
        dst_blocks.into_remainder(),
        acc_blocks.into_remainder(),
    );
}

#[inline(always)]
fn trail_pixels(law: &PixelLaw, src: &[u8], dst: &mut [u8], accum: &mut [f32]) {
    for ((s, d), a) in src.iter().zip(dst.iter_mut()).zip(accum.iter_mut()) {
        *a = law.accumulate(*a, normalize(*s));
        *d = to_display(*a);
    }
}

fn update_burn_row(
    law: &PixelLaw,
    burn_law: &BurnLaw,
    src: &[u8],
    dst: &mut [u8],
    accum: &mut [f32],
    burn: &mut [f32],
) {
    let mut src_blocks = src.chunks_exact(LANES);
    let mut dst_blocks = dst.chunks_exact_mut(LANES);
    let mut acc_blocks = accum.chunks_exact_mut(LANES);
    let mut burn_blocks = burn.chunks_exact_mut(LANES);

    for (((s, d), a), b) in (&mut src_blocks)
        .zip(&mut dst_blocks)
        .zip(&mut acc_blocks)
        .zip(&mut burn_blocks)
    {
        burn_pixels(law, burn_law, s, d, a, b);
    }
    burn_pixels(
        law,
        burn_law,
        src_blocks.remainder(),
        dst_blocks.into_remainder(),
        acc_blocks.into_remainder(),
        burn_blocks.into_remainder(),
    );
}

#[inline(always)]
fn burn_pixels(
    law: &PixelLaw,
    burn_law: &BurnLaw,
    src: &[u8],
    dst: &mut [u8],
    accum: &mut [f32],
    burn: &mut [f32],
) {
    let cells = accum.iter_mut().zip(burn.iter_mut());
    for ((s, d), (a, b)) in src.iter().zip(dst.iter_mut()).zip(cells) {
        let sample = normalize(*s);
        *b = burn_law.step(*b, sample);
        *a = law.accumulate(*a, sample) + *b * burn_law.depth;
        *d = to_display(*a);
    }
}

/// Zero-filled vector whose allocation failure is reported instead of aborting
pub(crate) fn zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>, TryReserveError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, T::default());
    Ok(v)
}

/// Persistent state of one channel: accumulator grid and optional burn grid
#[derive(Debug, Clone)]
pub struct PhosphorGrid {
    width: usize,
    accum: Vec<f32>,
    burn: Option<Vec<f32>>,
}

impl PhosphorGrid {
    pub fn new(geometry: StreamGeometry, burn_in: bool) -> Result<Self, TryReserveError> {
        let cells = geometry.pixel_count();
        let burn = if burn_in { Some(zeroed(cells)?) } else { None };
        Ok(Self {
            width: geometry.width(),
            accum: zeroed(cells)?,
            burn,
        })
    }

    /// Bytes held by a grid of this geometry
    pub fn footprint(geometry: StreamGeometry, burn_in: bool) -> usize {
        let grids = if burn_in { 2 } else { 1 };
        geometry
            .pixel_count()
            .saturating_mul(std::mem::size_of::<f32>() * grids)
    }

    /// Accumulator and burn cells of row `y`
    pub fn row_mut(&mut self, y: usize) -> (&mut [f32], Option<&mut [f32]>) {
        let span = y * self.width..(y + 1) * self.width;
        let burn = self.burn.as_mut().map(|b| &mut b[span.clone()]);
        (&mut self.accum[span], burn)
    }

    pub fn accum(&self) -> &[f32] {
        &self.accum
    }

    pub fn burn(&self) -> Option<&[f32]> {
        self.burn.as_deref()
    }

    pub fn clear(&mut self) {
        self.accum.fill(0.0);
        if let Some(burn) = &mut self.burn {
            burn.fill(0.0);
        }
    }
}
