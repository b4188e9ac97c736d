//! RGB frame views handed to the tracker.

use ndarray::{ArrayView3, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    #[inline]
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Borrowed RGB888 image of shape `(height, width, 3)`.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pixels: ArrayView3<'a, u8>,
}

impl<'a> Frame<'a> {
    /// Wrap an `ndarray` view, checking it is a non-empty three-channel image.
    pub fn new(pixels: ArrayView3<'a, u8>) -> Result<Self> {
        let (height, width, channels) = pixels.dim();
        if channels != 3 {
            return Err(Error::InvalidFrame(format!(
                "expected 3 channels, got {channels}"
            )));
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidFrame(format!(
                "frame has no pixels ({width}x{height})"
            )));
        }
        Ok(Self { pixels })
    }

    /// Wrap a packed, row-major RGB888 buffer.
    pub fn from_raw(input: &'a [u8], width: usize, height: usize) -> Result<Self> {
        let view = ArrayView3::from_shape((height, width, 3), input).map_err(|e| {
            Error::InvalidFrame(format!(
                "{} bytes do not form a {width}x{height} RGB image: {e}",
                input.len()
            ))
        })?;
        Self::new(view)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.len_of(Axis(1))
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.len_of(Axis(0))
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// The underlying pixel view.
    #[inline]
    pub fn pixels(&self) -> ArrayView3<'a, u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_from_raw() {
        let data = vec![0u8; 4 * 2 * 3];
        let frame = Frame::from_raw(&data, 4, 2).unwrap();
        assert_eq!(frame.size(), Size::new(4, 2));
    }

    #[test]
    fn test_from_raw_wrong_length() {
        let data = vec![0u8; 10];
        assert!(matches!(
            Frame::from_raw(&data, 4, 2),
            Err(Error::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_rejects_non_rgb() {
        let gray = Array3::<u8>::zeros((4, 4, 1));
        assert!(Frame::new(gray.view()).is_err());
    }

    #[test]
    fn test_rejects_empty() {
        let empty = Array3::<u8>::zeros((0, 4, 3));
        assert!(Frame::new(empty.view()).is_err());
    }
}
