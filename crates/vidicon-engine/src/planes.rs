// ABOUTME: Splits packed RGB24 scanlines into per-channel planes and merges them back.
// ABOUTME: Holds the reusable row-width scratch buffers the engine works in.

use vidicon_core::{Channel, Rgb};

use crate::accumulator::zeroed;

const R: usize = Channel::Red.offset();
const G: usize = Channel::Green.offset();
const B: usize = Channel::Blue.offset();

/// Deinterleave a packed row into three planes of `r.len()` pixels
pub fn split(row: &[u8], r: &mut [u8], g: &mut [u8], b: &mut [u8]) {
    debug_assert_eq!(row.len(), r.len() * Channel::COUNT);
    debug_assert!(r.len() == g.len() && g.len() == b.len());

    let planes = r.iter_mut().zip(g.iter_mut()).zip(b.iter_mut());
    for (px, ((r, g), b)) in row.chunks_exact(Channel::COUNT).zip(planes) {
        *r = px[R];
        *g = px[G];
        *b = px[B];
    }
}

/// Interleave three planes back into a packed row; inverse of [`split`]
pub fn merge(row: &mut [u8], r: &[u8], g: &[u8], b: &[u8]) {
    debug_assert_eq!(row.len(), r.len() * Channel::COUNT);
    debug_assert!(r.len() == g.len() && g.len() == b.len());

    let planes = r.iter().zip(g.iter()).zip(b.iter());
    for (px, ((r, g), b)) in row.chunks_exact_mut(Channel::COUNT).zip(planes) {
        px[R] = *r;
        px[G] = *g;
        px[B] = *b;
    }
}

/// Row-width scratch: split input planes and computed output planes
#[derive(Debug)]
pub struct PlaneBuffers {
    pub input: Rgb<Vec<u8>>,
    pub output: Rgb<Vec<u8>>,
}

impl PlaneBuffers {
    pub fn new(width: usize) -> Result<Self, std::collections::TryReserveError> {
        Ok(Self {
            input: Rgb::new(zeroed(width)?, zeroed(width)?, zeroed(width)?),
            output: Rgb::new(zeroed(width)?, zeroed(width)?, zeroed(width)?),
        })
    }

    /// Bytes of scratch needed for a row of `width` pixels
    pub fn footprint(width: usize) -> usize {
        width.saturating_mul(Channel::COUNT * 2)
    }

    pub fn width(&self) -> usize {
        self.input.r.len()
    }

    /// Fill the input planes from a packed row
    pub fn split_from(&mut self, row: &[u8]) {
        let Rgb { r, g, b } = &mut self.input;
        split(row, r, g, b);
    }

    /// Write the output planes into a packed row
    pub fn merge_into(&self, row: &mut [u8]) {
        let Rgb { r, g, b } = &self.output;
        merge(row, r, g, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_extracts_channel_offsets() {
        let row = [10, 20, 30, 11, 21, 31];
        let (mut r, mut g, mut b) = ([0; 2], [0; 2], [0; 2]);
        split(&row, &mut r, &mut g, &mut b);
        assert_eq!(r, [10, 11]);
        assert_eq!(g, [20, 21]);
        assert_eq!(b, [30, 31]);
    }

    #[test]
    fn merge_places_each_channel_at_its_offset() {
        let mut row = [0u8; 3];
        merge(&mut row, &[1], &[2], &[3]);
        for (channel, value) in Channel::ALL.into_iter().zip([1, 2, 3]) {
            assert_eq!(row[channel.offset()], value);
        }
    }

    #[test]
    fn merge_inverts_split() {
        for width in [1usize, 7, 8, 9, 33] {
            let row: Vec<u8> = (0..width * 3).map(|i| (i * 37 % 251) as u8).collect();
            let mut buffers = PlaneBuffers::new(width).unwrap();
            buffers.split_from(&row);
            buffers.output = buffers.input.clone();

            let mut merged = vec![0u8; row.len()];
            buffers.merge_into(&mut merged);
            assert_eq!(merged, row, "width {}", width);
        }
    }

    #[test]
    fn buffers_are_row_width() {
        let buffers = PlaneBuffers::new(5).unwrap();
        assert_eq!(buffers.width(), 5);
        assert_eq!(buffers.output.b.len(), 5);
        assert_eq!(PlaneBuffers::footprint(5), 30);
    }

    #[test]
    fn oversized_row_fails_to_allocate() {
        assert!(PlaneBuffers::new(usize::MAX).is_err());
        assert_eq!(PlaneBuffers::footprint(usize::MAX), usize::MAX);
    }
}
