// ABOUTME: Packed RGB24 frame buffer with an explicit row stride.
// ABOUTME: Frames are filtered in place, one row at a time.

use vidicon_core::{Channel, StreamGeometry};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("Stride {stride} is shorter than a {geometry} row ({row_bytes} bytes)")]
    StrideTooSmall {
        geometry: StreamGeometry,
        stride: usize,
        row_bytes: usize,
    },

    #[error("Frame buffer holds {actual} bytes, {geometry} needs {expected}")]
    BufferTooSmall {
        geometry: StreamGeometry,
        expected: usize,
        actual: usize,
    },
}

/// An RGB24 image. Rows start every `stride` bytes; only the first
/// `width * 3` bytes of a row are pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    geometry: StreamGeometry,
    stride: usize,
    data: Vec<u8>,
}

impl Frame {
    /// A black, tightly packed frame
    pub fn new(geometry: StreamGeometry) -> Self {
        Self {
            geometry,
            stride: geometry.row_bytes(),
            data: vec![0; geometry.frame_bytes()],
        }
    }

    /// Wrap a tightly packed buffer
    pub fn from_vec(geometry: StreamGeometry, data: Vec<u8>) -> Result<Self, FrameError> {
        Self::with_stride(geometry, geometry.row_bytes(), data)
    }

    /// Wrap a buffer whose rows are `stride` bytes apart.
    ///
    /// The last row only needs `width * 3` bytes, so padding after it is optional.
    pub fn with_stride(
        geometry: StreamGeometry,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, FrameError> {
        let row_bytes = geometry.row_bytes();
        if stride < row_bytes {
            return Err(FrameError::StrideTooSmall {
                geometry,
                stride,
                row_bytes,
            });
        }
        let expected = stride
            .checked_mul(geometry.height() - 1)
            .and_then(|n| n.checked_add(row_bytes))
            .unwrap_or(usize::MAX);
        if data.len() < expected {
            return Err(FrameError::BufferTooSmall {
                geometry,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            geometry,
            stride,
            data,
        })
    }

    pub fn geometry(&self) -> StreamGeometry {
        self.geometry
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw buffer, including any row padding
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel bytes of row `y`
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.geometry.row_bytes()]
    }

    /// Pixel bytes of every row, top to bottom
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        let row_bytes = self.geometry.row_bytes();
        self.data
            .chunks_mut(self.stride)
            .take(self.geometry.height())
            .map(move |row| &mut row[..row_bytes])
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = y * self.stride + x * Channel::COUNT;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = y * self.stride + x * Channel::COUNT;
        self.data[i..i + Channel::COUNT].copy_from_slice(&rgb);
    }

    /// Set every pixel to one color
    pub fn fill(&mut self, rgb: [u8; 3]) {
        for row in self.rows_mut() {
            for px in row.chunks_exact_mut(Channel::COUNT) {
                px.copy_from_slice(&rgb);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(w: usize, h: usize) -> StreamGeometry {
        StreamGeometry::new(w, h).unwrap()
    }

    #[test]
    fn new_frame_is_black_and_packed() {
        let frame = Frame::new(geometry(4, 3));
        assert_eq!(frame.stride(), 12);
        assert_eq!(frame.data().len(), 36);
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn from_vec_rejects_short_buffer() {
        let err = Frame::from_vec(geometry(4, 3), vec![0; 35]).unwrap_err();
        assert_eq!(
            err,
            FrameError::BufferTooSmall {
                geometry: geometry(4, 3),
                expected: 36,
                actual: 35
            }
        );
    }

    #[test]
    fn stride_must_cover_a_row() {
        assert!(matches!(
            Frame::with_stride(geometry(4, 2), 11, vec![0; 64]),
            Err(FrameError::StrideTooSmall { .. })
        ));
    }

    #[test]
    fn padded_rows_skip_padding() {
        // 2x2 image, stride 8: each row has 2 padding bytes, last row unpadded
        let data = vec![1, 2, 3, 4, 5, 6, 0xEE, 0xEE, 7, 8, 9, 10, 11, 12];
        let mut frame = Frame::with_stride(geometry(2, 2), 8, data).unwrap();

        assert_eq!(frame.row(1), &[7, 8, 9, 10, 11, 12]);
        assert_eq!(frame.pixel(1, 0), [4, 5, 6]);

        frame.fill([0, 0, 0]);
        assert_eq!(frame.data()[6..8], [0xEE, 0xEE]);
        assert_eq!(frame.rows_mut().count(), 2);
    }

    #[test]
    fn set_pixel_writes_one_pixel() {
        let mut frame = Frame::new(geometry(3, 1));
        frame.set_pixel(2, 0, [9, 8, 7]);
        assert_eq!(frame.row(0), &[0, 0, 0, 0, 0, 0, 9, 8, 7]);
    }
}
