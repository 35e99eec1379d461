// ABOUTME: Stream geometry shared by frames and persistent engine state.
// ABOUTME: Non-zero width/height with overflow-checked buffer sizes.

use std::fmt;
use std::str::FromStr;

use crate::channel::Channel;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("Stream geometry must be non-zero, got {width}x{height}")]
    Empty { width: usize, height: usize },

    #[error("Stream geometry {width}x{height} is too large")]
    Overflow { width: usize, height: usize },

    #[error("Invalid size '{0}', expected WIDTHxHEIGHT")]
    Parse(String),
}

/// Width and height of a configured stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamGeometry {
    width: usize,
    height: usize,
}

impl StreamGeometry {
    pub fn new(width: usize, height: usize) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::Empty { width, height });
        }
        // Every size derived from the geometry must fit in usize
        width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(Channel::COUNT))
            .ok_or(GeometryError::Overflow { width, height })?;
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Bytes of pixel data in one packed RGB24 row
    pub fn row_bytes(&self) -> usize {
        self.width * Channel::COUNT
    }

    /// Bytes of one tightly packed RGB24 frame
    pub fn frame_bytes(&self) -> usize {
        self.pixel_count() * Channel::COUNT
    }
}

impl fmt::Display for StreamGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for StreamGeometry {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || GeometryError::Parse(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(parse_err)?;
        let width = w.trim().parse().map_err(|_| parse_err())?;
        let height = h.trim().parse().map_err(|_| parse_err())?;
        Self::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        let g = StreamGeometry::new(7, 3).unwrap();
        assert_eq!(g.pixel_count(), 21);
        assert_eq!(g.row_bytes(), 21);
        assert_eq!(g.frame_bytes(), 63);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert_eq!(
            StreamGeometry::new(0, 10),
            Err(GeometryError::Empty { width: 0, height: 10 })
        );
        assert!(StreamGeometry::new(10, 0).is_err());
    }

    #[test]
    fn huge_dimension_is_rejected() {
        assert!(matches!(
            StreamGeometry::new(usize::MAX / 2, 2),
            Err(GeometryError::Overflow { .. })
        ));
    }

    #[test]
    fn parse_size_string() {
        let g: StreamGeometry = "640x480".parse().unwrap();
        assert_eq!((g.width(), g.height()), (640, 480));
        assert_eq!(g.to_string(), "640x480");
        assert!("640".parse::<StreamGeometry>().is_err());
        assert!("axb".parse::<StreamGeometry>().is_err());
        assert!("0x480".parse::<StreamGeometry>().is_err());
    }
}
